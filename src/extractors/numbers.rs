// src/extractors/numbers.rs

// --- Imports ---
use crate::extractors::mask::Mask;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Numeric literal grammar: optional sign, digits with an optional decimal
/// point, optional exponent (Fortran `D` exponents included).
/// Contains no capture groups so it can be embedded in mask templates.
pub const NUMBER_PATTERN: &str = r"[-+]?(?:\d*\.\d+|\d+\.?)(?:[EeDd][-+]?\d+)?";

// --- Regex Patterns (Lazy Static) ---
static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(NUMBER_PATTERN).expect("Failed to compile NUMBER_RE"));

static INTEGER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-+]?\d+$").expect("Failed to compile INTEGER_RE"));

// Words made of anything else (e.g. "TzB1g", "a.u.") never yield numbers.
static NUMERIC_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9.eEdD+\-]+$").expect("Failed to compile NUMERIC_WORD_RE"));

// --- Data Structures ---
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(i) => i as f64,
            Number::Float(x) => x,
        }
    }

    /// Parses one token of the numeric grammar.
    pub fn parse(token: &str) -> Option<Number> {
        if INTEGER_RE.is_match(token) {
            if let Ok(i) = token.parse::<i64>() {
                return Some(Number::Int(i));
            }
            // Too wide for i64, still a perfectly good float.
        }
        normalize_float(token).parse::<f64>().ok().map(Number::Float)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(x) => write!(f, "{:?}", x),
        }
    }
}

/// Where a number sits inside its extracted section. Offsets count characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub start: usize,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumericToken {
    pub value: Number,
    /// The number as written, used in mismatch annotations.
    pub text: String,
    pub location: Location,
}

// --- Extraction ---

/// Pulls every number out of `lines`, in reading order.
/// With a mask only the selected fields are returned.
pub fn extract_numbers<S: AsRef<str>>(lines: &[S], mask: Option<&Mask>) -> Vec<NumericToken> {
    let mut tokens = Vec::new();
    for (line_idx, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        match mask {
            Some(Mask::Template { regex, .. }) => extract_template(line_idx, line, regex, &mut tokens),
            _ => extract_words(line_idx, line, mask, &mut tokens),
        }
    }
    tracing::trace!("Extracted {} numbers from {} lines", tokens.len(), lines.len());
    tokens
}

fn extract_words(line_idx: usize, line: &str, mask: Option<&Mask>, tokens: &mut Vec<NumericToken>) {
    let mut ordinal = 0;
    for (word_start, word) in split_words(line) {
        if !NUMERIC_WORD_RE.is_match(word) {
            continue;
        }
        let found: Vec<_> = NUMBER_RE.find_iter(word).collect();
        if found.is_empty() {
            continue; // e.g. "---" or a lone "e"
        }
        ordinal += 1;
        if let Some(mask) = mask {
            if !mask.selects_column(ordinal) {
                continue;
            }
        }
        for m in found {
            push_token(line_idx, line, word_start + m.start(), m.as_str(), tokens);
        }
    }
    if let Some(mask) = mask {
        let missing = mask.missing_columns(ordinal);
        if !missing.is_empty() {
            tracing::debug!(
                "Mask {} selects columns {:?} but line {} has only {} numeric words",
                mask, missing, line_idx, ordinal
            );
        }
    }
}

fn extract_template(line_idx: usize, line: &str, regex: &Regex, tokens: &mut Vec<NumericToken>) {
    for caps in regex.captures_iter(line) {
        for group in caps.iter().skip(1).flatten() {
            push_token(line_idx, line, group.start(), group.as_str(), tokens);
        }
    }
}

fn push_token(line_idx: usize, line: &str, byte_start: usize, text: &str, tokens: &mut Vec<NumericToken>) {
    let Some(value) = Number::parse(text) else {
        tracing::debug!("Skipping unparsable numeric token '{}'", text);
        return;
    };
    tokens.push(NumericToken {
        value,
        text: text.to_string(),
        location: Location {
            line: line_idx,
            start: line[..byte_start].chars().count(),
            length: text.chars().count(),
        },
    });
}

/// Whitespace separated words with their byte offsets.
fn split_words(line: &str) -> impl Iterator<Item = (usize, &str)> {
    line.split(char::is_whitespace)
        .scan(0usize, |offset, word| {
            let start = *offset;
            // Every split consumed exactly one whitespace char after the word.
            *offset += word.len() + line[start + word.len()..].chars().next().map_or(0, char::len_utf8);
            Some((start, word))
        })
        .filter(|(_, word)| !word.is_empty())
}

fn normalize_float(token: &str) -> String {
    let mut s = token.replace(['d', 'D'], "e");
    // "1." and "1.e5" -> "1.0", "1.0e5"
    if let Some(dot) = s.find('.') {
        let next = s[dot + 1..].chars().next();
        if !matches!(next, Some(c) if c.is_ascii_digit()) {
            s.insert(dot + 1, '0');
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(tokens: &[NumericToken]) -> Vec<Number> {
        tokens.iter().map(|t| t.value).collect()
    }

    #[test]
    fn test_extracts_ints_and_floats() {
        let tokens = extract_numbers(&["step 3 energy -1.5e-3 .25 7."], None);
        assert_eq!(
            values(&tokens),
            vec![Number::Int(3), Number::Float(-1.5e-3), Number::Float(0.25), Number::Float(7.0)]
        );
    }

    #[test]
    fn test_fortran_exponent() {
        let tokens = extract_numbers(&["  1.0D-05  2.5d+2"], None);
        assert_eq!(values(&tokens), vec![Number::Float(1.0e-5), Number::Float(250.0)]);
        assert!(tokens.iter().all(|t| t.value.is_float()));
    }

    #[test]
    fn test_words_with_letters_are_ignored() {
        let tokens = extract_numbers(&["Energy = 1.00001 a.u. TzB1g"], None);
        assert_eq!(tokens.len(), 1, "only the energy should be found: {:?}", tokens);
        assert_eq!(tokens[0].text, "1.00001");
        assert_eq!(tokens[0].location, Location { line: 0, start: 9, length: 7 });
    }

    #[test]
    fn test_locations_across_lines() {
        let tokens = extract_numbers(&["a 1", "", "  22 b 3.0"], None);
        let locations: Vec<Location> = tokens.iter().map(|t| t.location).collect();
        assert_eq!(
            locations,
            vec![
                Location { line: 0, start: 2, length: 1 },
                Location { line: 2, start: 2, length: 2 },
                Location { line: 2, start: 7, length: 3 },
            ]
        );
    }

    #[test]
    fn test_locations_count_characters() {
        let tokens = extract_numbers(&["Énergie 2.0"], None);
        assert_eq!(tokens[0].location.start, 8);
    }

    #[test]
    fn test_compound_word_yields_several_numbers() {
        let tokens = extract_numbers(&["1.0-2.0"], None);
        assert_eq!(values(&tokens), vec![Number::Float(1.0), Number::Float(-2.0)]);
        assert_eq!(tokens[1].location.start, 3);
    }

    #[test]
    fn test_column_mask() {
        let mask: Mask = "2".parse().unwrap();
        let tokens = extract_numbers(&["1 2 3", "x 4 --- 5 6"], Some(&mask));
        assert_eq!(values(&tokens), vec![Number::Int(2), Number::Int(5)]);
    }

    #[test]
    fn test_template_mask_skips_literal_numbers() {
        let mask = Mask::template("iter 10: E = {}").unwrap();
        let tokens = extract_numbers(&["iter 10: E = -3.25 (step 4)", "nothing here 1.0"], Some(&mask));
        assert_eq!(values(&tokens), vec![Number::Float(-3.25)]);
        assert_eq!(tokens[0].location, Location { line: 0, start: 13, length: 5 });
    }

    #[test]
    fn test_template_mask_without_match_is_empty() {
        let mask = Mask::template("Dipole = {}").unwrap();
        assert!(extract_numbers(&["Energy = 1.0"], Some(&mask)).is_empty());
    }

    #[test]
    fn test_huge_integer_becomes_float() {
        let tokens = extract_numbers(&["123456789012345678901234567890"], None);
        assert!(tokens[0].value.is_float());
    }
}
