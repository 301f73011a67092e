// src/extractors/section.rs

// --- Imports ---
use crate::utils::error::FilterError;
use regex::Regex;
use std::fmt;

// --- Data Structures ---

/// A line selector: plain substring or regular expression.
#[derive(Debug, Clone)]
pub enum Marker {
    Literal(String),
    Pattern(Regex),
}

impl Marker {
    pub fn literal(text: impl Into<String>) -> Self {
        Marker::Literal(text.into())
    }

    pub fn pattern(pattern: &str) -> Result<Self, FilterError> {
        Regex::new(pattern)
            .map(Marker::Pattern)
            .map_err(|source| FilterError::InvalidPattern { pattern: pattern.to_string(), source })
    }

    pub fn is_pattern(&self) -> bool {
        matches!(self, Marker::Pattern(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Marker::Literal(s) => s,
            Marker::Pattern(re) => re.as_str(),
        }
    }

    pub fn matches(&self, line: &str) -> bool {
        match self {
            Marker::Literal(s) => line.contains(s.as_str()),
            Marker::Pattern(re) => re.is_match(line),
        }
    }
}

/// Describes which lines of a text a filter looks at.
///
/// * no `from` marker: the whole text;
/// * `num_lines > 0`: the `from` line plus the next `num_lines - 1` lines;
/// * a `to` marker: from the `from` line up to and including the first line
///   matching `to` (the search starts on the `from` line itself);
/// * neither: from the `from` line to the end of the text.
#[derive(Debug, Clone, Default)]
pub struct SectionDescriptor {
    pub from: Option<Marker>,
    pub to: Option<Marker>,
    pub num_lines: usize,
    /// Collect every occurrence instead of only the first one.
    pub all_sections: bool,
}

impl fmt::Display for SectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let from = self.from.as_ref().map_or("", Marker::as_str);
        match (&self.from, &self.to) {
            (None, _) => write!(f, "[entire file]"),
            _ if self.num_lines > 0 => write!(f, "[{} lines from \"{}\"]", self.num_lines, from),
            (Some(_), Some(to)) => write!(f, "[\"{}\" ... \"{}\"]", from, to.as_str()),
            (Some(_), None) => write!(f, "[\"{}\" ... end of file]", from),
        }
    }
}

// --- Extraction ---

/// Cuts the described section(s) out of `lines`.
///
/// An empty result means the descriptor did not match; turning that into an
/// error is up to the caller.
pub fn extract_section<S: AsRef<str>>(lines: &[S], section: &SectionDescriptor) -> Vec<String> {
    let Some(from) = &section.from else {
        return lines.iter().map(|l| l.as_ref().to_string()).collect();
    };

    let mut out = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if !from.matches(lines[i].as_ref()) {
            i += 1;
            continue;
        }

        let end = match section_end(lines, i, section) {
            Some(end) => end,
            None => {
                tracing::debug!("Section {} opened on line {} but never closed", section, i);
                break; // Later occurrences cannot close either.
            }
        };
        tracing::trace!("Section {} spans lines {}..{}", section, i, end);
        out.extend(lines[i..end].iter().map(|l| l.as_ref().to_string()));

        if !section.all_sections {
            break;
        }
        i = end.max(i + 1);
    }
    out
}

// Exclusive end index of a section opening at `start`.
fn section_end<S: AsRef<str>>(lines: &[S], start: usize, section: &SectionDescriptor) -> Option<usize> {
    if section.num_lines > 0 {
        return Some((start + section.num_lines).min(lines.len()));
    }
    match &section.to {
        Some(to) => lines[start..]
            .iter()
            .position(|l| to.matches(l.as_ref()))
            .map(|offset| start + offset + 1),
        None => Some(lines.len()),
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &[&str] = &[
        "header",
        "@ begin",
        "x = 1.0",
        "y = 2.0",
        "@ end",
        "footer",
        "@ begin",
        "x = 3.0",
        "@ end",
    ];

    fn descriptor(from: &str, to: Option<&str>, num_lines: usize) -> SectionDescriptor {
        SectionDescriptor {
            from: Some(Marker::literal(from)),
            to: to.map(Marker::literal),
            num_lines,
            all_sections: false,
        }
    }

    #[test]
    fn test_to_marker_line_is_included() {
        let section = extract_section(TEXT, &descriptor("@ begin", Some("@ end"), 0));
        assert_eq!(section, vec!["@ begin", "x = 1.0", "y = 2.0", "@ end"]);
        assert_eq!(section.first().map(String::as_str), Some("@ begin"), "from line must be included");
        assert_eq!(section.last().map(String::as_str), Some("@ end"), "to line must be included");
    }

    #[test]
    fn test_fixed_count() {
        let section = extract_section(TEXT, &descriptor("header", None, 3));
        assert_eq!(section, vec!["header", "@ begin", "x = 1.0"]);
    }

    #[test]
    fn test_fixed_count_truncated_at_end_of_input() {
        let section = extract_section(TEXT, &descriptor("x = 3.0", None, 5));
        assert_eq!(section, vec!["x = 3.0", "@ end"]);
    }

    #[test]
    fn test_missing_from_marker_is_empty() {
        assert!(extract_section(TEXT, &descriptor("nope", Some("@ end"), 0)).is_empty());
        assert!(extract_section(TEXT, &descriptor("nope", None, 5)).is_empty());
    }

    #[test]
    fn test_unclosed_section_is_empty() {
        assert!(extract_section(TEXT, &descriptor("footer", Some("never"), 0)).is_empty());
    }

    #[test]
    fn test_single_line_carrying_both_markers() {
        let section = extract_section(&["a", "Energy = 1.0 a.u.", "b"], &descriptor("Energy", Some("a.u."), 0));
        assert_eq!(section, vec!["Energy = 1.0 a.u."]);
    }

    #[test]
    fn test_regex_markers() {
        let section = extract_section(
            TEXT,
            &SectionDescriptor {
                from: Some(Marker::pattern(r"^x = \d").unwrap()),
                to: Some(Marker::pattern(r"^y").unwrap()),
                num_lines: 0,
                all_sections: false,
            },
        );
        assert_eq!(section, vec!["x = 1.0", "y = 2.0"]);
    }

    #[test]
    fn test_all_sections() {
        let mut d = descriptor("@ begin", Some("@ end"), 0);
        d.all_sections = true;
        let section = extract_section(TEXT, &d);
        assert_eq!(section, vec!["@ begin", "x = 1.0", "y = 2.0", "@ end", "@ begin", "x = 3.0", "@ end"]);
    }

    #[test]
    fn test_no_from_marker_takes_everything() {
        let section = extract_section(TEXT, &SectionDescriptor::default());
        assert_eq!(section.len(), TEXT.len());
    }

    #[test]
    fn test_from_marker_to_end_of_file() {
        let section = extract_section(TEXT, &descriptor("footer", None, 0));
        assert_eq!(section, vec!["footer", "@ begin", "x = 3.0", "@ end"]);
    }

    #[test]
    fn test_descriptor_display() {
        assert_eq!(descriptor("E", None, 5).to_string(), "[5 lines from \"E\"]");
        assert_eq!(descriptor("a", Some("b"), 0).to_string(), "[\"a\" ... \"b\"]");
        assert_eq!(SectionDescriptor::default().to_string(), "[entire file]");
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(Marker::pattern("(unclosed"), Err(FilterError::InvalidPattern { .. })));
    }
}
