//! Discount service
//!
//! Orchestrates the pure core against a store: shaping, acceptance checks,
//! uniqueness, and the redemption flow. Every entry point takes the current
//! time from the caller; the service never reads a clock of its own.

use jiff::Timestamp;
use thiserror::Error;
use tracing::info;

use crate::{
    codes::{CodeError, normalize_code},
    discounts::{DiscountId, DiscountRecord, DiscountUpdate, NewDiscount},
    store::{DiscountStore, StoreError},
    validation::{ValidationErrors, validate_record},
};

/// Errors returned by the discount service.
#[derive(Debug, Error)]
pub enum DiscountServiceError {
    /// The candidate failed one or more acceptance checks; all failures are
    /// carried.
    #[error(transparent)]
    Rejected(#[from] ValidationErrors),

    /// A raw code handed to a lookup or redemption was blank.
    #[error(transparent)]
    Code(#[from] CodeError),

    /// No live discount holds this canonical code.
    #[error("no live discount with code {0:?}")]
    UnknownCode(String),

    /// The store refused the operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Validation, normalisation and lifecycle entry points over a
/// [`DiscountStore`].
#[derive(Debug)]
pub struct DiscountService<S> {
    store: S,
}

impl<S: DiscountStore> DiscountService<S> {
    /// Wraps a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Hands the store back.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Creates a discount: shapes the payload (normalised code, defaulted
    /// start, zeroed counter), runs every acceptance check, and inserts.
    ///
    /// # Errors
    ///
    /// - [`DiscountServiceError::Rejected`]: one or more checks failed.
    /// - [`DiscountServiceError::Store`]: the code is already held by a live
    ///   record.
    #[tracing::instrument(
        name = "discounts.service.create",
        skip(self, new),
        fields(discount_id = tracing::field::Empty, code = tracing::field::Empty),
        err
    )]
    pub fn create(
        &mut self,
        new: NewDiscount,
        now: Timestamp,
    ) -> Result<DiscountRecord, DiscountServiceError> {
        let record = new.into_record(DiscountId::new(), now);

        let span = tracing::Span::current();
        span.record("discount_id", tracing::field::display(record.id));
        span.record("code", tracing::field::display(&record.code));

        self.accept(&record)?;
        self.store.insert(record.clone())?;

        info!(discount_id = %record.id, code = %record.code, "created discount");

        Ok(record)
    }

    /// Replaces a discount's adjustable attributes, re-running normalisation
    /// and every acceptance check against the updated value.
    ///
    /// # Errors
    ///
    /// - [`DiscountServiceError::Store`]: the id is unknown, or the new code
    ///   collides with another live record.
    /// - [`DiscountServiceError::Rejected`]: one or more checks failed.
    #[tracing::instrument(
        name = "discounts.service.update",
        skip(self, update),
        fields(discount_id = %id),
        err
    )]
    pub fn update(
        &mut self,
        id: DiscountId,
        update: &DiscountUpdate,
        now: Timestamp,
    ) -> Result<DiscountRecord, DiscountServiceError> {
        let current = self.store.get(id).ok_or(StoreError::NotFound(id))?;
        let record = update.apply_to(&current, now);

        self.accept(&record)?;
        self.store.update(record.clone())?;

        info!(discount_id = %record.id, code = %record.code, "updated discount");

        Ok(record)
    }

    /// Flips the administrative kill switch.
    ///
    /// # Errors
    ///
    /// - [`DiscountServiceError::Store`]: the id is unknown.
    #[tracing::instrument(
        name = "discounts.service.set_disabled",
        skip(self),
        fields(discount_id = %id),
        err
    )]
    pub fn set_disabled(
        &mut self,
        id: DiscountId,
        disabled: bool,
        now: Timestamp,
    ) -> Result<DiscountRecord, DiscountServiceError> {
        let mut record = self.store.get(id).ok_or(StoreError::NotFound(id))?;

        record.is_disabled = disabled;
        record.updated_at = now;

        self.store.update(record.clone())?;

        info!(discount_id = %id, disabled, "toggled discount");

        Ok(record)
    }

    /// Tombstones a discount. Its code becomes reusable immediately; the
    /// record itself is retained by the store.
    ///
    /// # Errors
    ///
    /// - [`DiscountServiceError::Store`]: the id is unknown or already
    ///   tombstoned.
    #[tracing::instrument(
        name = "discounts.service.soft_delete",
        skip(self),
        fields(discount_id = %id),
        err
    )]
    pub fn soft_delete(
        &mut self,
        id: DiscountId,
        now: Timestamp,
    ) -> Result<(), DiscountServiceError> {
        self.store.soft_delete(id, now)?;

        info!(discount_id = %id, "soft-deleted discount");

        Ok(())
    }

    /// Redeems a discount by raw code: normalises the code, resolves the
    /// live record, and records one use through the store's serialized
    /// transition.
    ///
    /// # Errors
    ///
    /// - [`DiscountServiceError::Code`]: the raw code was blank.
    /// - [`DiscountServiceError::UnknownCode`]: no live record holds it.
    /// - [`DiscountServiceError::Store`]: the discount was not usable at
    ///   `now`.
    #[tracing::instrument(
        name = "discounts.service.redeem",
        skip(self, raw_code),
        fields(discount_id = tracing::field::Empty, code = tracing::field::Empty),
        err
    )]
    pub fn redeem(
        &mut self,
        raw_code: &str,
        now: Timestamp,
    ) -> Result<DiscountRecord, DiscountServiceError> {
        let code = normalize_code(raw_code)?;

        let span = tracing::Span::current();
        span.record("code", tracing::field::display(&code));

        let record = self
            .store
            .find_by_code(&code)
            .ok_or_else(|| DiscountServiceError::UnknownCode(code))?;

        span.record("discount_id", tracing::field::display(record.id));

        let used = self.store.record_usage(record.id, now)?;

        info!(
            discount_id = %used.id,
            usage_count = used.usage_count,
            "redeemed discount"
        );

        Ok(used)
    }

    /// Fetches a snapshot of a live discount.
    pub fn get(&self, id: DiscountId) -> Option<DiscountRecord> {
        self.store.get(id)
    }

    /// Looks up a live discount by raw code; lookups are case-insensitive
    /// because both sides are canonical. Blank codes resolve to nothing.
    pub fn find_by_code(&self, raw_code: &str) -> Option<DiscountRecord> {
        let code = normalize_code(raw_code).ok()?;

        self.store.find_by_code(&code)
    }

    fn accept(&self, record: &DiscountRecord) -> Result<(), ValidationErrors> {
        validate_record(record, |id| self.store.parent_of(id))
    }
}
