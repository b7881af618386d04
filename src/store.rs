//! In-memory record store
//!
//! Ordered sequence of records for one slice: append on create, replace in
//! place on edit (matched by id), remove on delete (matched by position).

use crate::error::{Error, Result};
use crate::records::{Record, RecordId};

/// Ordered, id-unique collection of records.
#[derive(Debug, Clone)]
pub struct RecordStore<R> {
    records: Vec<R>,
}

impl<R> Default for RecordStore<R> {
    fn default() -> Self {
        Self { records: Vec::new() }
    }
}

impl<R: Record> RecordStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn position_of(&self, id: &RecordId) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.position_of(id).is_some()
    }

    /// Identifier not used by any record in this store.
    pub fn generate_id(&self) -> RecordId {
        loop {
            let id = RecordId::generate();
            if !self.contains(&id) {
                return id;
            }
        }
    }

    /// Append a record. Rejects an identifier already present.
    pub fn push(&mut self, record: R) -> Result<()> {
        if self.contains(record.id()) {
            return Err(Error::DuplicateRecord {
                id: record.id().to_string(),
            });
        }
        self.records.push(record);
        Ok(())
    }

    /// Replace the record sharing `record`'s id, keeping its position.
    ///
    /// Returns the previous value, or `None` when no record matched.
    pub fn replace(&mut self, record: R) -> Option<R> {
        let position = self.position_of(record.id())?;
        Some(std::mem::replace(&mut self.records[position], record))
    }

    /// Remove the record at `position`; out-of-range positions leave the store untouched.
    pub fn remove_at(&mut self, position: usize) -> Option<R> {
        if position < self.records.len() {
            Some(self.records.remove(position))
        } else {
            None
        }
    }
}

#[cfg(test)]
impl<R: Record> RecordStore<R> {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&R> {
        self.records.get(position)
    }
}
