// src/compare/mod.rs
pub mod driver;
pub mod report;
pub mod tuple;

pub use driver::{check, compare_files, compare_texts, evaluate_filter, verdict, SourceText};
pub use report::{ComparisonReport, FilterOutcome};
pub use tuple::{tuple_matches, MatchPolicy, Verdict};
