//! The catalog index: records grouped by host star.

use std::collections::{BTreeMap, HashMap};

use exotour_core::error::TourError;

use super::records::{CatalogId, CatalogRecord};

/// All records sharing one host star, in dataset order.
#[derive(Debug, Clone, PartialEq)]
pub struct StarGroup<'a> {
    /// Host star identifier.
    pub host: &'a str,
    /// Member records. Never empty.
    pub records: Vec<&'a CatalogRecord>,
}

impl<'a> StarGroup<'a> {
    /// The record star-level fields are read from. Star fields are assumed
    /// identical across the group; the first record wins.
    #[must_use]
    pub fn representative(&self) -> &'a CatalogRecord {
        self.records[0]
    }

    /// Number of planets in the system.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Groups records by host star. O(n) over the input.
#[must_use]
pub fn group_by_host(records: &[CatalogRecord]) -> BTreeMap<&str, StarGroup<'_>> {
    let mut groups: BTreeMap<&str, StarGroup<'_>> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.host.as_str())
            .or_insert_with(|| StarGroup {
                host: record.host.as_str(),
                records: Vec::new(),
            })
            .records
            .push(record);
    }
    groups
}

/// Finds the record with `id`.
///
/// # Errors
///
/// Returns `TourError::NotFound` if no record matches.
pub fn find_by_id(records: &[CatalogRecord], id: CatalogId) -> Result<&CatalogRecord, TourError> {
    records
        .iter()
        .find(|record| record.id == id)
        .ok_or_else(|| TourError::not_found("exoplanet", id))
}

/// Immutable, pre-grouped view of the dataset. Built once at startup and
/// shared for the lifetime of the process.
#[derive(Debug)]
pub struct CatalogIndex {
    records: Vec<CatalogRecord>,
    by_host: BTreeMap<String, Vec<usize>>,
    by_id: HashMap<CatalogId, usize>,
}

impl CatalogIndex {
    /// Builds the index.
    ///
    /// # Errors
    ///
    /// Returns `TourError::Validation` if two records share an id or a record
    /// has an empty host identifier.
    pub fn build(records: Vec<CatalogRecord>) -> Result<Self, TourError> {
        let mut by_host: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        let mut by_id = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if record.host.trim().is_empty() {
                return Err(TourError::Validation(format!(
                    "record {} has no host star",
                    record.id
                )));
            }
            if by_id.insert(record.id, position).is_some() {
                return Err(TourError::Validation(format!(
                    "duplicate record id {}",
                    record.id
                )));
            }
            by_host
                .entry(record.host.clone())
                .or_default()
                .push(position);
        }
        Ok(Self {
            records,
            by_host,
            by_id,
        })
    }

    /// Every record, in dataset order.
    #[must_use]
    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of distinct host stars.
    #[must_use]
    pub fn host_count(&self) -> usize {
        self.by_host.len()
    }

    /// Looks up the group for `host`.
    ///
    /// # Errors
    ///
    /// Returns `TourError::NotFound` if the host is not in the catalog.
    pub fn group(&self, host: &str) -> Result<StarGroup<'_>, TourError> {
        self.by_host
            .get_key_value(host)
            .map(|(host, positions)| self.materialize(host, positions))
            .ok_or_else(|| TourError::not_found("star", host))
    }

    /// Every group, ordered by host identifier.
    pub fn groups(&self) -> impl Iterator<Item = StarGroup<'_>> {
        self.by_host
            .iter()
            .map(|(host, positions)| self.materialize(host, positions))
    }

    /// Looks up a record by id in O(1).
    ///
    /// # Errors
    ///
    /// Returns `TourError::NotFound` if no record has `id`.
    pub fn find_by_id(&self, id: CatalogId) -> Result<&CatalogRecord, TourError> {
        self.by_id
            .get(&id)
            .map(|&position| &self.records[position])
            .ok_or_else(|| TourError::not_found("exoplanet", id))
    }

    fn materialize<'a>(&'a self, host: &'a str, positions: &[usize]) -> StarGroup<'a> {
        StarGroup {
            host,
            records: positions.iter().map(|&p| &self.records[p]).collect(),
        }
    }
}
