//! Stores
//!
//! Persistence enters through this trait rather than through inheritance:
//! the core hands stores fully normalised, validated values and relies on
//! them for the invariants only a store can uphold — code uniqueness among
//! live records and serialized usage increments.

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    discounts::{DiscountId, DiscountRecord},
    usage::UsageError,
};

pub mod memory;

/// Errors surfaced by discount stores.
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    /// A record with this id is already stored.
    #[error("discount {0} already exists")]
    AlreadyExists(DiscountId),

    /// Another live record already holds this code.
    #[error("a live discount with code {0:?} already exists")]
    DuplicateCode(String),

    /// No live record carries this id.
    #[error("discount {0} not found")]
    NotFound(DiscountId),

    /// The usage transition was refused.
    #[error(transparent)]
    Usage(#[from] UsageError),
}

/// Persistence capabilities the discount core consumes.
///
/// Lookups see only live records; tombstoned ones are invisible except to
/// [`parent_of`](Self::parent_of), which walks the full tree so that chains
/// anchored on a deleted ancestor still resolve.
///
/// Codes passed in are expected to be canonical (see
/// [`crate::codes::normalize_code`]); stores compare them verbatim.
#[cfg_attr(test, mockall::automock)]
pub trait DiscountStore {
    /// Fetches a snapshot of a live record.
    fn get(&self, id: DiscountId) -> Option<DiscountRecord>;

    /// Fetches a snapshot of the live record holding a canonical code.
    fn find_by_code(&self, code: &str) -> Option<DiscountRecord>;

    /// Parent lookup used for ancestor walks.
    fn parent_of(&self, id: DiscountId) -> Option<DiscountId>;

    /// Stores a new record.
    ///
    /// # Errors
    ///
    /// - [`StoreError::AlreadyExists`]: the id is already present.
    /// - [`StoreError::DuplicateCode`]: a live record holds the same code.
    fn insert(&mut self, record: DiscountRecord) -> Result<(), StoreError>;

    /// Replaces a live record with an updated value of the same identity.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`]: no live record with this id.
    /// - [`StoreError::DuplicateCode`]: the new code collides with another
    ///   live record.
    fn update(&mut self, record: DiscountRecord) -> Result<(), StoreError>;

    /// Tombstones a live record. The code becomes reusable immediately.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`]: no live record with this id.
    fn soft_delete(&mut self, id: DiscountId, now: Timestamp) -> Result<(), StoreError>;

    /// Applies [`crate::usage::record_usage`] against the current stored
    /// snapshot and persists the result, returning the updated record.
    ///
    /// Implementations must serialize this per discount id — a
    /// compare-and-swap on the counter or a row lock — so that two racing
    /// redemptions cannot both succeed past the limit.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`]: no live record with this id.
    /// - [`StoreError::Usage`]: the record was not usable.
    fn record_usage(&mut self, id: DiscountId, now: Timestamp)
    -> Result<DiscountRecord, StoreError>;
}
