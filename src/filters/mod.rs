// src/filters/mod.rs
pub mod definition;
pub mod filter;

pub use definition::{load_filters, parse_filters, FilterDefinition};
pub use filter::{Filter, FilterBuilder, Tolerance, ToleranceKind};
