// src/compare/tuple.rs

use crate::extractors::numbers::{Number, NumericToken};
use crate::filters::filter::{Filter, Tolerance, ToleranceKind};

/// Everything the matcher needs to judge one pair of numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchPolicy {
    pub tolerance: Option<Tolerance>,
    pub ignore_sign: bool,
    pub skip_below: Option<f64>,
    pub skip_above: Option<f64>,
}

impl From<&Filter> for MatchPolicy {
    fn from(filter: &Filter) -> Self {
        MatchPolicy {
            tolerance: filter.tolerance(),
            ignore_sign: filter.ignore_sign(),
            skip_below: filter.ignore_below(),
            skip_above: filter.ignore_above(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub matches: bool,
    /// Empty unless the pair mismatched.
    pub annotation: String,
}

impl Verdict {
    fn pass() -> Self {
        Verdict { matches: true, annotation: String::new() }
    }

    fn fail(annotation: String) -> Self {
        Verdict { matches: false, annotation }
    }
}

impl MatchPolicy {
    fn in_skip_window(&self, magnitude: f64) -> bool {
        self.skip_below.is_some_and(|below| magnitude < below)
            || self.skip_above.is_some_and(|above| magnitude > above)
    }

    /// Compares an actual token against its reference counterpart.
    pub fn check(&self, actual: &NumericToken, reference: &NumericToken) -> Verdict {
        let (mut x, mut x_ref) = (actual.value, reference.value);
        if self.ignore_sign {
            x = magnitude(x);
            x_ref = magnitude(x_ref);
        }

        if self.in_skip_window(x.as_f64().abs()) || self.in_skip_window(x_ref.as_f64().abs()) {
            return Verdict::pass();
        }

        let Some(tolerance) = self.tolerance else {
            return if exactly_equal(x, x_ref) {
                Verdict::pass()
            } else {
                Verdict::fail(format!("expected: {}", reference.text))
            };
        };

        let diff = (x.as_f64() - x_ref.as_f64()).abs();
        let reference_size = x_ref.as_f64().abs();
        match tolerance.kind {
            // Relative to zero is undefined, so a zero reference is held to the absolute bound.
            ToleranceKind::Absolute => judge(diff, tolerance.value, "abs", &reference.text),
            ToleranceKind::Relative if reference_size == 0.0 => {
                judge(diff, tolerance.value, "abs", &reference.text)
            }
            ToleranceKind::Relative => {
                judge(diff / reference_size, tolerance.value, "rel", &reference.text)
            }
        }
    }
}

fn judge(deviation: f64, tolerance: f64, label: &str, expected: &str) -> Verdict {
    // NaN deviations fail the comparison.
    if deviation <= tolerance {
        Verdict::pass()
    } else {
        Verdict::fail(format!("expected: {} ({} diff: {:.2e})", expected, label, deviation))
    }
}

fn magnitude(n: Number) -> Number {
    match n {
        Number::Int(i) => Number::Int(i.saturating_abs()),
        Number::Float(x) => Number::Float(x.abs()),
    }
}

fn exactly_equal(a: Number, b: Number) -> bool {
    match (a, b) {
        (Number::Int(a), Number::Int(b)) => a == b,
        _ => a.as_f64() == b.as_f64(),
    }
}

/// Convenience wrapper for a single `(actual, reference)` pair.
pub fn tuple_matches(pair: (&NumericToken, &NumericToken), policy: &MatchPolicy) -> Verdict {
    policy.check(pair.0, pair.1)
}
