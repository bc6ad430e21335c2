//! Dataset loading.
//!
//! The dataset is static input: it is read once at process start and never
//! written back.

use std::path::Path;

use exotour_core::error::TourError;
use tracing::info;

use crate::domain::index::CatalogIndex;
use crate::domain::records::CatalogRecord;

/// Supported dataset encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    /// A JSON array of records.
    Json,
    /// A YAML sequence of records.
    Yaml,
}

impl DatasetFormat {
    /// Picks the format from a file extension; anything but `.yaml`/`.yml`
    /// is read as JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Parses dataset text into records.
///
/// # Errors
///
/// Returns `TourError::Validation` if the text is not a well-formed record
/// list.
pub fn parse_records(source: &str, format: DatasetFormat) -> Result<Vec<CatalogRecord>, TourError> {
    match format {
        DatasetFormat::Json => serde_json::from_str(source)
            .map_err(|e| TourError::Validation(format!("malformed catalog JSON: {e}"))),
        DatasetFormat::Yaml => serde_yaml::from_str(source)
            .map_err(|e| TourError::Validation(format!("malformed catalog YAML: {e}"))),
    }
}

/// Reads, parses and indexes the dataset at `path`.
///
/// # Errors
///
/// Returns `TourError::Infrastructure` if the file cannot be read, and
/// `TourError::Validation` if it cannot be parsed or indexed.
pub fn load_catalog(path: &Path) -> Result<CatalogIndex, TourError> {
    let source = std::fs::read_to_string(path).map_err(|e| {
        TourError::Infrastructure(format!("cannot read catalog {}: {e}", path.display()))
    })?;
    let records = parse_records(&source, DatasetFormat::from_path(path))?;
    let index = CatalogIndex::build(records)?;
    info!(
        path = %path.display(),
        records = index.len(),
        hosts = index.host_count(),
        "catalog loaded"
    );
    Ok(index)
}
