//! In-memory store

use jiff::Timestamp;
use rustc_hash::FxHashMap;

use crate::{
    discounts::{DiscountId, DiscountRecord},
    store::{DiscountStore, StoreError},
    usage,
};

/// Hash-map reference implementation of [`DiscountStore`].
///
/// Suitable for tests and single-threaded embedding. The `&mut` receivers
/// serialize usage increments; a SQL-backed store must provide the same
/// per-id serialization with a compare-and-swap or row lock.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: FxHashMap<DiscountId, DiscountRecord>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.records.values().filter(|r| !r.is_deleted()).count()
    }

    fn live_code_holder(&self, code: &str) -> Option<&DiscountRecord> {
        self.records
            .values()
            .find(|r| !r.is_deleted() && r.code == code)
    }
}

impl DiscountStore for MemoryStore {
    fn get(&self, id: DiscountId) -> Option<DiscountRecord> {
        self.records
            .get(&id)
            .filter(|r| !r.is_deleted())
            .cloned()
    }

    fn find_by_code(&self, code: &str) -> Option<DiscountRecord> {
        self.live_code_holder(code).cloned()
    }

    fn parent_of(&self, id: DiscountId) -> Option<DiscountId> {
        // Tombstoned ancestors still anchor chains, so no liveness filter.
        self.records.get(&id).and_then(|r| r.parent_discount_id)
    }

    fn insert(&mut self, record: DiscountRecord) -> Result<(), StoreError> {
        if self.records.contains_key(&record.id) {
            return Err(StoreError::AlreadyExists(record.id));
        }

        if self.live_code_holder(&record.code).is_some() {
            return Err(StoreError::DuplicateCode(record.code));
        }

        self.records.insert(record.id, record);

        Ok(())
    }

    fn update(&mut self, record: DiscountRecord) -> Result<(), StoreError> {
        match self.records.get(&record.id) {
            Some(current) if !current.is_deleted() => {}
            _ => return Err(StoreError::NotFound(record.id)),
        }

        if self
            .live_code_holder(&record.code)
            .is_some_and(|holder| holder.id != record.id)
        {
            return Err(StoreError::DuplicateCode(record.code));
        }

        self.records.insert(record.id, record);

        Ok(())
    }

    fn soft_delete(&mut self, id: DiscountId, now: Timestamp) -> Result<(), StoreError> {
        match self.records.get_mut(&id) {
            Some(record) if !record.is_deleted() => {
                record.deleted_at = Some(now);
                record.updated_at = now;

                Ok(())
            }
            _ => Err(StoreError::NotFound(id)),
        }
    }

    fn record_usage(
        &mut self,
        id: DiscountId,
        now: Timestamp,
    ) -> Result<DiscountRecord, StoreError> {
        let current = self.get(id).ok_or(StoreError::NotFound(id))?;
        let used = usage::record_usage(&current, now)?;

        self.records.insert(id, used.clone());

        Ok(used)
    }
}
