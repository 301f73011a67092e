// src/storage/mod.rs
use crate::compare::report::ComparisonReport;
use crate::utils::error::StorageError;
use std::fs;
use std::path::{Path, PathBuf};

/// Artifact files of one comparison, named after the actual output file.
pub struct ArtifactStore {
    output: PathBuf,
}

impl ArtifactStore {
    pub fn for_output<P: AsRef<Path>>(output: P) -> Self {
        Self { output: output.as_ref().to_path_buf() }
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut name = self.output.clone().into_os_string();
        name.push(".");
        name.push(suffix);
        PathBuf::from(name)
    }

    pub fn filtered_path(&self) -> PathBuf {
        self.with_suffix("filtered")
    }

    pub fn reference_path(&self) -> PathBuf {
        self.with_suffix("reference")
    }

    pub fn diff_path(&self) -> PathBuf {
        self.with_suffix("diff")
    }

    pub fn summary_path(&self) -> PathBuf {
        self.with_suffix("summary.json")
    }

    /// Truncates the filtered, reference and diff files so no earlier run survives.
    pub fn reset(&self) -> Result<(), StorageError> {
        for path in [self.filtered_path(), self.reference_path(), self.diff_path()] {
            write_file(&path, "")?;
        }
        tracing::debug!("Reset comparison artifacts next to {}", self.output.display());
        Ok(())
    }

    /// Writes the filtered, reference and diff streams. Each file is written in one go.
    pub fn save_report(&self, report: &ComparisonReport) -> Result<(), StorageError> {
        write_file(&self.filtered_path(), &report.filtered)?;
        write_file(&self.reference_path(), &report.reference)?;
        write_file(&self.diff_path(), &report.diff)?;
        tracing::info!("Saved comparison artifacts next to {}", self.output.display());
        Ok(())
    }

    /// Saves metadata about the comparison in JSON format
    pub fn save_summary(&self, report: &ComparisonReport, reference: &Path) -> Result<PathBuf, StorageError> {
        let file_path = self.summary_path();

        let summary = serde_json::json!({
            "output": self.output.display().to_string(),
            "reference": reference.display().to_string(),
            "passed": report.passed(),
            "filters": report.filters,
            "compared_numbers": report.compared,
            "mismatches": report.mismatches,
            "diff_length": report.diff.len(),
            "comparison_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let summary_str = serde_json::to_string_pretty(&summary)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        write_file(&file_path, &summary_str)?;

        tracing::info!("Saved summary to {}", file_path.display());
        Ok(file_path)
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), StorageError> {
    fs::write(path, content).map_err(|source| StorageError::IoError {
        path: path.display().to_string(),
        source,
    })
}
