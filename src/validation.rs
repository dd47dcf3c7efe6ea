//! Validation
//!
//! Acceptance checks for candidate records. Each check returns its own error;
//! [`validate_record`] runs all of them and collects every failure so a
//! rejected candidate reports everything wrong with it at once.

use jiff::Timestamp;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    codes::{CodeError, normalize_code},
    commissions::{CommissionError, validate_commission_percentage},
    discounts::{DiscountId, DiscountRecord},
};

/// Errors specific to validity windows.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowError {
    /// The window ends before it starts (start, end).
    #[error("validity window ends at {1}, before it starts at {0}")]
    EndsBeforeStart(Timestamp, Timestamp),
}

/// Errors specific to parent-chain traversal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CycleError {
    /// The ancestor chain revisits a discount; the offending id is carried.
    #[error("discount {0} appears twice in its own parent chain")]
    CyclicParent(DiscountId),
}

/// A single rejected acceptance check.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// The code is empty after normalisation.
    #[error(transparent)]
    Code(#[from] CodeError),

    /// The commission percentage lies outside `[0, 100]`.
    #[error(transparent)]
    Commission(#[from] CommissionError),

    /// The validity window is inverted.
    #[error(transparent)]
    Window(#[from] WindowError),

    /// The parent chain contains a cycle.
    #[error(transparent)]
    Cycle(#[from] CycleError),
}

/// Every check that failed for a candidate record.
///
/// Rejection is all-or-nothing: the record is refused as a whole and no
/// partially valid state is accepted.
#[derive(Debug, Error, PartialEq)]
#[error("discount rejected: {}", joined(.failures))]
pub struct ValidationErrors {
    failures: SmallVec<[ValidationError; 4]>,
}

impl ValidationErrors {
    /// The individual failures, in check order.
    #[must_use]
    pub fn failures(&self) -> &[ValidationError] {
        &self.failures
    }

    /// Number of failed checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Whether no check failed. Never true for a returned error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

fn joined(failures: &[ValidationError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Checks that a validity window is not inverted. An absent end means the
/// discount is open-ended and always passes.
///
/// # Errors
///
/// - [`WindowError::EndsBeforeStart`]: `ends_at` precedes `starts_at`.
pub fn validate_validity_window(
    starts_at: Timestamp,
    ends_at: Option<Timestamp>,
) -> Result<(), WindowError> {
    match ends_at {
        Some(ends_at) if ends_at < starts_at => {
            Err(WindowError::EndsBeforeStart(starts_at, ends_at))
        }
        _ => Ok(()),
    }
}

/// Walks the ancestor chain of `record` through `parent_of` and rejects any
/// repeat visit. The walk is bounded by the number of stored discounts: every
/// ancestor is visited at most once, and a missing ancestor ends the walk.
///
/// A record whose parent is itself fails immediately.
///
/// # Errors
///
/// - [`CycleError::CyclicParent`]: the chain revisits a discount.
pub fn validate_no_cycle<F>(record: &DiscountRecord, parent_of: F) -> Result<(), CycleError>
where
    F: Fn(DiscountId) -> Option<DiscountId>,
{
    let mut seen = FxHashSet::default();
    seen.insert(record.id);

    let mut next = record.parent_discount_id;

    while let Some(ancestor) = next {
        if !seen.insert(ancestor) {
            return Err(CycleError::CyclicParent(ancestor));
        }

        next = parent_of(ancestor);
    }

    Ok(())
}

/// Runs every acceptance check against a candidate record: non-empty
/// canonical code, commission bounds, window ordering and parent acyclicity.
/// All failures are collected before the record is rejected as a whole.
///
/// `parent_of` is the ancestor lookup supplied by the owning store.
///
/// # Errors
///
/// - [`ValidationErrors`]: one or more checks failed; every failure is
///   carried.
pub fn validate_record<F>(record: &DiscountRecord, parent_of: F) -> Result<(), ValidationErrors>
where
    F: Fn(DiscountId) -> Option<DiscountId>,
{
    let mut failures = SmallVec::new();

    if let Err(error) = normalize_code(&record.code) {
        failures.push(error.into());
    }

    if let Err(error) = validate_commission_percentage(record.commission_percentage) {
        failures.push(error.into());
    }

    if let Err(error) = validate_validity_window(record.starts_at, record.ends_at) {
        failures.push(error.into());
    }

    if let Err(error) = validate_no_cycle(record, parent_of) {
        failures.push(error.into());
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { failures })
    }
}
