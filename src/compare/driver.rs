// src/compare/driver.rs

// --- Imports ---
use crate::compare::report::{annotated_block, size_mismatch_block, string_mismatch_block, ComparisonReport, FilterOutcome};
use crate::compare::tuple::{MatchPolicy, Verdict};
use crate::extractors::numbers::{extract_numbers, NumericToken};
use crate::extractors::section::extract_section;
use crate::filters::filter::Filter;
use crate::storage::ArtifactStore;
use crate::utils::error::CompareError;
use std::path::Path;

/// A named text, split into lines.
#[derive(Debug, Clone)]
pub struct SourceText {
    pub name: String,
    pub lines: Vec<String>,
}

impl SourceText {
    pub fn new(name: impl Into<String>, text: &str) -> Self {
        Self { name: name.into(), lines: text.lines().map(str::to_string).collect() }
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, CompareError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let text = std::fs::read_to_string(path)
            .map_err(|source| CompareError::Io { path: name.clone(), source })?;
        Ok(Self::new(name, &text))
    }
}

struct Side {
    lines: Vec<String>,
    numbers: Vec<NumericToken>,
}

// Section and numbers of one input; configuration errors abort here.
fn extract_side(filter: &Filter, source: &SourceText) -> Result<Side, CompareError> {
    let lines = extract_section(&source.lines, filter.section());
    if lines.is_empty() {
        tracing::error!("Filter {} matched nothing in {}", filter, source.name);
        return Err(CompareError::BadFilter { filter: filter.to_string(), file: source.name.clone() });
    }

    let numbers = extract_numbers(&lines, filter.mask());
    if let Some(mask) = filter.mask() {
        if numbers.is_empty() {
            tracing::error!("Mask {} extracted no numbers from {}", mask, source.name);
            return Err(CompareError::FilterKeyword(format!(
                "mask {} did not extract any numbers from file {}",
                mask, source.name
            )));
        }
    }
    Ok(Side { lines, numbers })
}

/// Runs one filter over both inputs.
pub fn evaluate_filter(filter: &Filter, actual: &SourceText, reference: &SourceText) -> Result<FilterOutcome, CompareError> {
    let own = extract_side(filter, actual)?;
    let theirs = extract_side(filter, reference)?;
    tracing::debug!(
        "Filter {}: {} lines / {} numbers vs {} lines / {} numbers",
        filter,
        own.lines.len(),
        own.numbers.len(),
        theirs.lines.len(),
        theirs.numbers.len()
    );

    let mut diff = String::new();
    let mut compared = 0;
    let mut mismatches = 0;

    if own.numbers.is_empty() && theirs.numbers.is_empty() {
        // Nothing numeric: the sections themselves have to agree.
        if own.lines != theirs.lines {
            tracing::warn!("Filter {}: extracted strings differ", filter);
            diff.push_str(&string_mismatch_block(&own.lines, &theirs.lines));
            mismatches += 1;
        }
    } else if own.numbers.len() == theirs.numbers.len() {
        let has_float = own.numbers.iter().chain(&theirs.numbers).any(|t| t.value.is_float());
        if !filter.tolerance_is_set() && has_float {
            tracing::error!("Filter {} compares floats without a tolerance", filter);
            return Err(CompareError::FilterKeyword(format!(
                "filter {}: for floats you have to specify either rel_tolerance or abs_tolerance",
                filter
            )));
        }

        let policy = MatchPolicy::from(filter);
        let verdicts: Vec<Verdict> = own
            .numbers
            .iter()
            .zip(&theirs.numbers)
            .map(|(x, x_ref)| policy.check(x, x_ref))
            .collect();
        compared = verdicts.len();
        mismatches = verdicts.iter().filter(|v| !v.matches).count();
        if mismatches > 0 {
            tracing::warn!("Filter {}: {} of {} numbers out of tolerance", filter, mismatches, compared);
            diff.push_str(&annotated_block(&own.lines, &own.numbers, &verdicts));
        }
    } else {
        tracing::warn!(
            "Filter {}: own gave {} numbers, reference gave {}",
            filter,
            own.numbers.len(),
            theirs.numbers.len()
        );
        diff.push_str(&size_mismatch_block(&own.lines, own.numbers.len(), &theirs.lines, theirs.numbers.len()));
        mismatches += 1;
    }

    Ok(FilterOutcome { filtered: own.lines, reference: theirs.lines, diff, compared, mismatches })
}

/// Applies every filter in order and folds the outcomes into one report.
/// Stops at the first configuration error; mismatches only end up in the diff.
pub fn compare_texts(filters: &[Filter], actual: &SourceText, reference: &SourceText) -> Result<ComparisonReport, CompareError> {
    filters.iter().try_fold(ComparisonReport::default(), |report, filter| {
        evaluate_filter(filter, actual, reference).map(|outcome| report.fold(outcome))
    })
}

/// Reads both files, compares them and writes `<actual>.filtered`,
/// `<actual>.reference` and `<actual>.diff`. The three files are emptied
/// first, so a configuration error leaves them empty. Mismatches do not
/// fail here; see [`verdict`].
pub fn compare_files<P: AsRef<Path>, Q: AsRef<Path>>(
    filters: &[Filter],
    actual_path: P,
    reference_path: Q,
) -> Result<ComparisonReport, CompareError> {
    let actual = SourceText::read(&actual_path)?;
    let reference = SourceText::read(&reference_path)?;

    // The artifacts start out empty, whatever happens to the comparison.
    let store = ArtifactStore::for_output(actual_path.as_ref());
    store.reset()?;

    let report = compare_texts(filters, &actual, &reference)?;
    store.save_report(&report)?;
    Ok(report)
}

/// Turns a non-empty diff into [`CompareError::TestFailed`]. With `verbose`
/// the error carries the diff text.
pub fn verdict(name: &str, report: ComparisonReport, verbose: bool) -> Result<ComparisonReport, CompareError> {
    if report.passed() {
        tracing::info!("Test {} passed ({} numbers compared)", name, report.compared);
        return Ok(report);
    }

    tracing::info!("Test {} failed with {} mismatches", name, report.mismatches);
    Err(CompareError::TestFailed {
        name: name.to_string(),
        diff: verbose.then_some(report.diff),
    })
}

/// Compares two files and fails when any filter found a mismatch.
pub fn check<P: AsRef<Path>, Q: AsRef<Path>>(
    filters: &[Filter],
    actual_path: P,
    reference_path: Q,
    verbose: bool,
) -> Result<ComparisonReport, CompareError> {
    let report = compare_files(filters, &actual_path, reference_path)?;
    verdict(&actual_path.as_ref().display().to_string(), report, verbose)
}
