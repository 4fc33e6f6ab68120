//! Pluggable upload content validation
//!
//! Column requirements are deployment-specific, so the registry takes the
//! validator as a seam rather than hard-coding CSV rules.

use pairwise_common::{Error, Result};

/// Inspects uploaded file content before a record is created
pub trait ContentValidator: Send + Sync {
    fn validate(&self, file_name: &str, content: &[u8]) -> Result<()>;
}

/// Accepts everything
pub struct NoopValidator;

impl ContentValidator for NoopValidator {
    fn validate(&self, _file_name: &str, _content: &[u8]) -> Result<()> {
        Ok(())
    }
}

/// Requires a CSV header row containing every configured column name
/// (case-insensitive). An empty requirement list only checks that the
/// file has a non-empty header.
pub struct CsvColumnValidator {
    required_columns: Vec<String>,
}

impl CsvColumnValidator {
    pub fn new(required_columns: Vec<String>) -> Self {
        Self { required_columns }
    }
}

impl ContentValidator for CsvColumnValidator {
    fn validate(&self, file_name: &str, content: &[u8]) -> Result<()> {
        let text = std::str::from_utf8(content).map_err(|_| {
            Error::InvalidContent(format!("{} is not valid UTF-8", file_name))
        })?;

        let header = text
            .lines()
            .next()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .ok_or_else(|| {
                Error::InvalidContent(format!("{} has no header row", file_name))
            })?;

        let columns: Vec<String> = header
            .split(',')
            .map(|c| c.trim().trim_matches('"').to_ascii_lowercase())
            .collect();

        for required in &self.required_columns {
            if !columns.contains(&required.to_ascii_lowercase()) {
                return Err(Error::InvalidContent(format!(
                    "{} is missing required column '{}'",
                    file_name, required
                )));
            }
        }

        Ok(())
    }
}
