// src/compare/report.rs
//! Text blocks of the diff stream and the aggregate report they fold into.

use crate::compare::tuple::Verdict;
use crate::extractors::numbers::NumericToken;

const LINE_PREFIX: &str = ".       ";
const ERROR_PREFIX: &str = "ERROR   ";
const MARKER: char = '#';

/// What a single filter contributed to the comparison.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    pub filtered: Vec<String>,
    pub reference: Vec<String>,
    pub diff: String,
    pub compared: usize,
    pub mismatches: usize,
}

/// The three artifact streams plus counters, accumulated in filter order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonReport {
    pub filtered: String,
    pub reference: String,
    pub diff: String,
    pub filters: usize,
    pub compared: usize,
    pub mismatches: usize,
}

impl ComparisonReport {
    pub fn fold(mut self, outcome: FilterOutcome) -> Self {
        self.filtered.push_str(&join_lines(&outcome.filtered));
        self.reference.push_str(&join_lines(&outcome.reference));
        self.diff.push_str(&outcome.diff);
        self.filters += 1;
        self.compared += outcome.compared;
        self.mismatches += outcome.mismatches;
        self
    }

    pub fn passed(&self) -> bool {
        self.diff.is_empty()
    }
}

/// Each line terminated by a newline.
pub fn join_lines(lines: &[String]) -> String {
    lines.iter().fold(String::new(), |mut acc, line| {
        acc.push_str(line);
        acc.push('\n');
        acc
    })
}

pub fn string_mismatch_block(own: &[String], reference: &[String]) -> String {
    format!(
        "ERROR: extracted strings do not match\nown gave:\n{}\nreference gave:\n{}\n",
        join_lines(own),
        join_lines(reference)
    )
}

pub fn size_mismatch_block(own: &[String], own_count: usize, reference: &[String], reference_count: usize) -> String {
    format!(
        "ERROR: extracted sizes do not match\nown gave {} numbers:\n{}\nreference gave {} numbers:\n{}\n",
        own_count,
        join_lines(own),
        reference_count,
        join_lines(reference)
    )
}

/// Actual-side lines, each followed by a marker row per mismatching number.
pub fn annotated_block(lines: &[String], tokens: &[NumericToken], verdicts: &[Verdict]) -> String {
    let mut block = String::from("\n");
    for (k, line) in lines.iter().enumerate() {
        block.push_str(LINE_PREFIX);
        block.push_str(line);
        block.push('\n');
        for (token, verdict) in tokens.iter().zip(verdicts) {
            if token.location.line != k || verdict.annotation.is_empty() {
                continue;
            }
            block.push_str(ERROR_PREFIX);
            block.push_str(&" ".repeat(token.location.start));
            block.extend(std::iter::repeat(MARKER).take(token.location.length));
            block.push(' ');
            block.push_str(&verdict.annotation);
            block.push('\n');
        }
    }
    block
}
