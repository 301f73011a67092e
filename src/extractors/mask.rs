// src/extractors/mask.rs

// --- Imports ---
use crate::extractors::numbers::NUMBER_PATTERN;
use crate::utils::error::FilterError;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// Placeholder marking a numeric field inside a template mask.
pub const FIELD_PLACEHOLDER: &str = "{}";

/// One piece of a template mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskSegment {
    /// Text that has to be present around the numbers, never extracted.
    Literal(String),
    /// A number to extract.
    Field,
}

/// Selects which numbers of a line take part in a comparison.
#[derive(Debug, Clone)]
pub enum Mask {
    /// 1-based positions of the numeric words on each line.
    Columns(Vec<usize>),
    /// Literal text interleaved with numeric fields, compiled to a regex.
    Template {
        source: String,
        segments: Vec<MaskSegment>,
        regex: Regex,
    },
}

impl Mask {
    pub fn columns(columns: Vec<usize>) -> Result<Self, FilterError> {
        if columns.is_empty() {
            return Err(FilterError::InvalidMask("[]".to_string(), "no columns given".to_string()));
        }
        if columns.contains(&0) {
            return Err(FilterError::InvalidMask(
                format_columns(&columns),
                "columns are counted from 1".to_string(),
            ));
        }
        Ok(Mask::Columns(columns))
    }

    pub fn template(source: &str) -> Result<Self, FilterError> {
        let segments = parse_segments(source);
        if !segments.contains(&MaskSegment::Field) {
            return Err(FilterError::InvalidMask(
                source.to_string(),
                format!("template has no '{}' field", FIELD_PLACEHOLDER),
            ));
        }

        let mut pattern = String::new();
        for segment in &segments {
            match segment {
                MaskSegment::Literal(text) => pattern.push_str(&literal_pattern(text)),
                MaskSegment::Field => {
                    pattern.push('(');
                    pattern.push_str(NUMBER_PATTERN);
                    pattern.push(')');
                }
            }
        }
        let regex = Regex::new(&pattern).map_err(|e| {
            FilterError::InvalidMask(source.to_string(), e.to_string())
        })?;

        Ok(Mask::Template { source: source.to_string(), segments, regex })
    }

    /// Is the `ordinal`-th numeric word of a line (1-based) selected?
    /// Only meaningful for column masks; templates select by position in the pattern.
    pub(crate) fn selects_column(&self, ordinal: usize) -> bool {
        match self {
            Mask::Columns(columns) => columns.contains(&ordinal),
            Mask::Template { .. } => false,
        }
    }

    /// Selected columns a line with `numeric_words` numeric words cannot supply.
    pub(crate) fn missing_columns(&self, numeric_words: usize) -> Vec<usize> {
        match self {
            Mask::Columns(columns) => columns.iter().copied().filter(|c| *c > numeric_words).collect(),
            Mask::Template { .. } => Vec::new(),
        }
    }
}

impl FromStr for Mask {
    type Err = FilterError;

    /// `"1,3"` is a column mask; anything else is a template with `{}` fields.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if !s.trim().is_empty() && parts.iter().all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit())) {
            let columns = parts
                .iter()
                .map(|p| p.parse::<usize>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| FilterError::InvalidMask(s.to_string(), e.to_string()))?;
            return Mask::columns(columns);
        }
        Mask::template(s)
    }
}

impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mask::Columns(columns) => write!(f, "{}", format_columns(columns)),
            Mask::Template { source, .. } => write!(f, "\"{}\"", source),
        }
    }
}

fn format_columns(columns: &[usize]) -> String {
    let joined: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    format!("[{}]", joined.join(", "))
}

fn parse_segments(source: &str) -> Vec<MaskSegment> {
    let mut segments = Vec::new();
    let mut rest = source;
    while let Some(idx) = rest.find(FIELD_PLACEHOLDER) {
        if idx > 0 {
            segments.push(MaskSegment::Literal(rest[..idx].to_string()));
        }
        segments.push(MaskSegment::Field);
        rest = &rest[idx + FIELD_PLACEHOLDER.len()..];
    }
    if !rest.is_empty() {
        segments.push(MaskSegment::Literal(rest.to_string()));
    }
    segments
}

// Whitespace runs in a literal match any whitespace run in the line.
fn literal_pattern(text: &str) -> String {
    let mut pattern = String::new();
    let mut in_space = false;
    let mut word = String::new();
    for c in text.chars() {
        if c.is_whitespace() {
            if !word.is_empty() {
                pattern.push_str(&regex::escape(&word));
                word.clear();
            }
            if !in_space {
                pattern.push_str(r"\s+");
                in_space = true;
            }
        } else {
            word.push(c);
            in_space = false;
        }
    }
    if !word.is_empty() {
        pattern.push_str(&regex::escape(&word));
    }
    pattern
}
