// src/filters/filter.rs

// --- Imports ---
use crate::extractors::mask::Mask;
use crate::extractors::section::{Marker, SectionDescriptor};
use crate::utils::error::FilterError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToleranceKind {
    /// Deviation as a fraction of the reference magnitude.
    Relative,
    /// Deviation as a raw difference.
    Absolute,
}

impl fmt::Display for ToleranceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToleranceKind::Relative => write!(f, "relative"),
            ToleranceKind::Absolute => write!(f, "absolute"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub value: f64,
    pub kind: ToleranceKind,
}

/// One comparison rule. Built through [`FilterBuilder`], immutable afterwards.
#[derive(Debug, Clone)]
pub struct Filter {
    section: SectionDescriptor,
    mask: Option<Mask>,
    tolerance: Option<Tolerance>,
    ignore_sign: bool,
    ignore_below: Option<f64>,
    ignore_above: Option<f64>,
}

impl Filter {
    pub fn builder() -> FilterBuilder {
        FilterBuilder::default()
    }

    pub fn section(&self) -> &SectionDescriptor {
        &self.section
    }

    pub fn mask(&self) -> Option<&Mask> {
        self.mask.as_ref()
    }

    pub fn tolerance(&self) -> Option<Tolerance> {
        self.tolerance
    }

    pub fn tolerance_is_set(&self) -> bool {
        self.tolerance.is_some()
    }

    pub fn ignore_sign(&self) -> bool {
        self.ignore_sign
    }

    pub fn ignore_below(&self) -> Option<f64> {
        self.ignore_below
    }

    pub fn ignore_above(&self) -> Option<f64> {
        self.ignore_above
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.section)
    }
}

#[derive(Debug, Default)]
pub struct FilterBuilder {
    from_string: Option<String>,
    from_re: Option<String>,
    to_string: Option<String>,
    to_re: Option<String>,
    num_lines: usize,
    all_sections: bool,
    mask: Option<Mask>,
    rel_tolerance: Option<f64>,
    abs_tolerance: Option<f64>,
    ignore_sign: bool,
    ignore_below: Option<f64>,
    ignore_above: Option<f64>,
}

impl FilterBuilder {
    pub fn from_string(mut self, s: impl Into<String>) -> Self {
        self.from_string = Some(s.into());
        self
    }

    pub fn from_re(mut self, s: impl Into<String>) -> Self {
        self.from_re = Some(s.into());
        self
    }

    pub fn to_string(mut self, s: impl Into<String>) -> Self {
        self.to_string = Some(s.into());
        self
    }

    pub fn to_re(mut self, s: impl Into<String>) -> Self {
        self.to_re = Some(s.into());
        self
    }

    pub fn num_lines(mut self, n: usize) -> Self {
        self.num_lines = n;
        self
    }

    pub fn all_sections(mut self, yes: bool) -> Self {
        self.all_sections = yes;
        self
    }

    pub fn mask(mut self, mask: Mask) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn rel_tolerance(mut self, t: f64) -> Self {
        self.rel_tolerance = Some(t);
        self
    }

    pub fn abs_tolerance(mut self, t: f64) -> Self {
        self.abs_tolerance = Some(t);
        self
    }

    pub fn ignore_sign(mut self, yes: bool) -> Self {
        self.ignore_sign = yes;
        self
    }

    pub fn ignore_below(mut self, v: f64) -> Self {
        self.ignore_below = Some(v);
        self
    }

    pub fn ignore_above(mut self, v: f64) -> Self {
        self.ignore_above = Some(v);
        self
    }

    pub fn build(self) -> Result<Filter, FilterError> {
        let from = marker(self.from_string, self.from_re, "from_string", "from_re")?;
        let to = marker(self.to_string, self.to_re, "to_string", "to_re")?;
        if self.num_lines > 0 && to.is_some() {
            return Err(FilterError::CountWithEndMarker);
        }
        if from.is_none() && to.is_some() {
            return Err(FilterError::EndMarkerWithoutStart);
        }

        let tolerance = match (self.rel_tolerance, self.abs_tolerance) {
            (Some(_), Some(_)) => {
                return Err(FilterError::ConflictingKeywords("rel_tolerance", "abs_tolerance"))
            }
            (Some(value), None) => Some(Tolerance { value, kind: ToleranceKind::Relative }),
            (None, Some(value)) => Some(Tolerance { value, kind: ToleranceKind::Absolute }),
            (None, None) => None,
        };
        if let Some(t) = tolerance {
            if !t.value.is_finite() || t.value < 0.0 {
                return Err(FilterError::InvalidTolerance(t.value));
            }
        }

        if let (Some(below), Some(above)) = (self.ignore_below, self.ignore_above) {
            if below > above {
                return Err(FilterError::InvalidSkipWindow { below, above });
            }
        }

        Ok(Filter {
            section: SectionDescriptor {
                from,
                to,
                num_lines: self.num_lines,
                all_sections: self.all_sections,
            },
            mask: self.mask,
            tolerance,
            ignore_sign: self.ignore_sign,
            ignore_below: self.ignore_below,
            ignore_above: self.ignore_above,
        })
    }
}

fn marker(
    literal: Option<String>,
    pattern: Option<String>,
    literal_key: &'static str,
    pattern_key: &'static str,
) -> Result<Option<Marker>, FilterError> {
    match (literal, pattern) {
        (Some(_), Some(_)) => Err(FilterError::ConflictingKeywords(literal_key, pattern_key)),
        (Some(s), None) => Ok(Some(Marker::literal(s))),
        (None, Some(p)) => Marker::pattern(&p).map(Some),
        (None, None) => Ok(None),
    }
}
