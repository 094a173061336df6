//! The in-memory record collection of one account.
//!
//! Order is insertion order and carries no meaning.  Ids are unique
//! within a vault; both `insert` and deserialization enforce it.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use super::record::{Record, RecordUpdate};
use crate::errors::{KryptosError, Result};

/// A detached, ordered collection of records.
///
/// Obtained from `VaultRepository::load`; changes are only persisted
/// by handing the whole collection back to `VaultRepository::save`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Vault {
    records: Vec<Record>,
}

impl Vault {
    /// An empty vault.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vault from records, rejecting duplicate ids.
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id.as_str()) {
                return Err(KryptosError::DuplicateRecord(record.id.clone()));
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record.  Fails if a record with the same id exists.
    pub fn insert(&mut self, record: Record) -> Result<()> {
        if self.get(&record.id).is_some() {
            return Err(KryptosError::DuplicateRecord(record.id));
        }
        self.records.push(record);
        Ok(())
    }

    /// Look up a record by exact id.
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Look up a record by exact id or by a unique id prefix.
    pub fn find(&self, id_or_prefix: &str) -> Result<&Record> {
        if let Some(record) = self.get(id_or_prefix) {
            return Ok(record);
        }
        if id_or_prefix.is_empty() {
            return Err(KryptosError::RecordNotFound(String::new()));
        }

        let mut hits = self
            .records
            .iter()
            .filter(|r| r.id.starts_with(id_or_prefix));
        match (hits.next(), hits.next()) {
            (Some(record), None) => Ok(record),
            (Some(_), Some(_)) => Err(KryptosError::AmbiguousRecord(id_or_prefix.to_string())),
            (None, _) => Err(KryptosError::RecordNotFound(id_or_prefix.to_string())),
        }
    }

    /// Apply `update` to the record with the given id and return it.
    pub fn update(&mut self, id: &str, update: RecordUpdate) -> Result<&Record> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| KryptosError::RecordNotFound(id.to_string()))?;
        record.apply(update);
        Ok(record)
    }

    /// Remove and return the record with the given id.
    pub fn remove(&mut self, id: &str) -> Result<Record> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| KryptosError::RecordNotFound(id.to_string()))?;
        Ok(self.records.remove(index))
    }

    /// Records matching a free-text term (see `Record::matches`).
    pub fn search<'a>(&'a self, term: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.records.iter().filter(move |r| r.matches(term))
    }

    /// Records carrying the given tag.
    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.records.iter().filter(move |r| r.has_tag(tag))
    }
}

impl<'de> Deserialize<'de> for Vault {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let records = Vec::<Record>::deserialize(deserializer)?;
        Self::from_records(records).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a Vault {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
