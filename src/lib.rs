// src/lib.rs
//! Tolerance-aware comparison of program output against a reference.
//!
//! Filters cut sections out of both texts, numbers are pulled from the
//! sections and paired up in order, and each pair is judged against the
//! filter's tolerance. Mismatches are collected into a diff report and
//! turned into a single failure at the end; broken filters fail at once.

pub mod compare;
pub mod extractors;
pub mod filters;
pub mod storage;
pub mod utils;

pub use compare::{check, compare_texts, ComparisonReport, SourceText};
pub use filters::{Filter, FilterBuilder, ToleranceKind};
pub use utils::error::{CompareError, FilterError};
