//! In-memory address store.
//!
//! One `Mutex` around the whole `Vec`. Every operation takes the lock, does a
//! bounded amount of in-memory work, and releases it. Nothing awaits while the
//! lock is held, so a plain `std::sync::Mutex` is the right tool.

use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::address::{Address, AddressId, AddressRecord, Zip};

/// No record carries the requested id.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("Address not found")]
pub struct NotFound;

/// Ordered, process-local collection of [`AddressRecord`]s.
///
/// Order is insertion order. Ids are minted here and never reused.
#[derive(Debug, Default)]
pub struct AddressStore {
    records: Mutex<Vec<AddressRecord>>,
}

impl AddressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the single example record the service boots with.
    ///
    /// The example's state is `"ss"`. Earlier deployments seeded
    /// `"somestate"`, which the two-letter rule would reject on re-submit.
    pub fn seeded() -> Self {
        let store = Self::new();
        store.insert(Self::example());
        store
    }

    fn example() -> Address {
        Address {
            first_name: "josh".into(),
            last_name: "vaughan".into(),
            address1: "1234 somestreet".into(),
            address2: Some("apt xyz".into()),
            city: "somewhere".into(),
            state: "ss".into(),
            zip: Zip::new(12345),
        }
    }

    /// Snapshot of every record, in insertion order.
    pub fn list(&self) -> Vec<AddressRecord> {
        self.lock().clone()
    }

    /// Assigns a fresh id and appends the record.
    pub fn insert(&self, address: Address) -> AddressRecord {
        let record = AddressRecord { id: AddressId::generate(), address };
        self.lock().push(record.clone());
        record
    }

    /// Removes the record with `id`, keeping the order of the rest.
    pub fn remove(&self, id: &AddressId) -> Result<AddressRecord, NotFound> {
        let mut records = self.lock();
        let index = records.iter().position(|r| r.id == *id).ok_or(NotFound)?;
        Ok(records.remove(index))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave the Vec half-updated: every
    // mutation is a single push or remove.
    fn lock(&self) -> MutexGuard<'_, Vec<AddressRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
