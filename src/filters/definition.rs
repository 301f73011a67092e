// src/filters/definition.rs
//! JSON form of a filter list, as read by the command line tool.

use crate::extractors::mask::Mask;
use crate::filters::filter::Filter;
use crate::utils::error::{AppError, FilterError};
use serde::Deserialize;
use std::path::Path;

/// A mask as written in a filter file: `[1, 3]` or `"E = {} a.u."`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MaskDefinition {
    Columns(Vec<usize>),
    Text(String),
}

impl MaskDefinition {
    fn into_mask(self) -> Result<Mask, FilterError> {
        match self {
            MaskDefinition::Columns(columns) => Mask::columns(columns),
            MaskDefinition::Text(text) => text.parse(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterDefinition {
    pub from_string: Option<String>,
    pub from_re: Option<String>,
    pub to_string: Option<String>,
    pub to_re: Option<String>,
    #[serde(default)]
    pub num_lines: usize,
    #[serde(default)]
    pub all_sections: bool,
    pub mask: Option<MaskDefinition>,
    pub rel_tolerance: Option<f64>,
    pub abs_tolerance: Option<f64>,
    #[serde(default)]
    pub ignore_sign: bool,
    pub ignore_below: Option<f64>,
    pub ignore_above: Option<f64>,
}

impl TryFrom<FilterDefinition> for Filter {
    type Error = FilterError;

    fn try_from(def: FilterDefinition) -> Result<Self, Self::Error> {
        let mut builder = Filter::builder()
            .num_lines(def.num_lines)
            .all_sections(def.all_sections)
            .ignore_sign(def.ignore_sign);
        if let Some(s) = def.from_string {
            builder = builder.from_string(s);
        }
        if let Some(s) = def.from_re {
            builder = builder.from_re(s);
        }
        if let Some(s) = def.to_string {
            builder = builder.to_string(s);
        }
        if let Some(s) = def.to_re {
            builder = builder.to_re(s);
        }
        if let Some(mask) = def.mask {
            builder = builder.mask(mask.into_mask()?);
        }
        if let Some(t) = def.rel_tolerance {
            builder = builder.rel_tolerance(t);
        }
        if let Some(t) = def.abs_tolerance {
            builder = builder.abs_tolerance(t);
        }
        if let Some(v) = def.ignore_below {
            builder = builder.ignore_below(v);
        }
        if let Some(v) = def.ignore_above {
            builder = builder.ignore_above(v);
        }
        builder.build()
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FilterFile {
    List(Vec<FilterDefinition>),
    Wrapped { filters: Vec<FilterDefinition> },
}

/// Parses a filter list from JSON text.
pub fn parse_filters(json: &str) -> Result<Vec<Filter>, AppError> {
    let file: FilterFile = serde_json::from_str(json)
        .map_err(|e| AppError::Config(format!("Invalid filter definition: {}", e)))?;
    let definitions = match file {
        FilterFile::List(list) => list,
        FilterFile::Wrapped { filters } => filters,
    };
    if definitions.is_empty() {
        return Err(AppError::Config("Filter definition contains no filters".to_string()));
    }
    definitions
        .into_iter()
        .enumerate()
        .map(|(i, def)| {
            Filter::try_from(def).map_err(|e| {
                tracing::error!("Filter #{} is invalid: {}", i + 1, e);
                AppError::Filter(e)
            })
        })
        .collect()
}

/// Reads and parses a filter file.
pub fn load_filters<P: AsRef<Path>>(path: P) -> Result<Vec<Filter>, AppError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let filters = parse_filters(&json)?;
    tracing::info!("Loaded {} filters from {}", filters.len(), path.display());
    Ok(filters)
}
