//! Discounts

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{codes::normalize_code, ids::TypedUuid};

/// Identifier of a [`DiscountRecord`].
pub type DiscountId = TypedUuid<DiscountRecord>;

/// Marker for the DiscountRule aggregate, which lives outside this crate.
#[derive(Debug)]
pub struct DiscountRule;

/// Identifier of a discount rule. The discount holds a non-owning reference.
pub type RuleId = TypedUuid<DiscountRule>;

/// Marker for the User aggregate, which lives outside this crate.
#[derive(Debug)]
pub struct User;

/// Identifier of the user a discount is scoped to.
pub type UserId = TypedUuid<User>;

/// Marker for the Commission aggregate. Commissions own their discount
/// association; this crate only types the identifier.
#[derive(Debug)]
pub struct Commission;

/// Identifier of a commission record.
pub type CommissionId = TypedUuid<Commission>;

/// Marker for the Order aggregate, reached through a commission.
#[derive(Debug)]
pub struct Order;

/// Identifier of an order record.
pub type OrderId = TypedUuid<Order>;

/// One discount definition, identified by a code.
///
/// A plain value: the acceptance checks in [`crate::validation`] decide
/// whether a candidate is admissible, and [`crate::usage`] owns the
/// redemption transition. Stores hold and look these up but add no behaviour
/// of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountRecord {
    /// Record identity.
    pub id: DiscountId,

    /// Canonical code: trimmed, upper-cased, unique among live records.
    pub code: String,

    /// Whether the code is generated/ephemeral rather than a fixed
    /// promotional code.
    pub is_dynamic: bool,

    /// Optional reference to the rule this discount was derived from.
    pub rule_id: Option<RuleId>,

    /// Administrative kill switch, independent of the validity window.
    pub is_disabled: bool,

    /// Optional parent discount; chains must stay acyclic.
    pub parent_discount_id: Option<DiscountId>,

    /// Start of the validity window.
    pub starts_at: Timestamp,

    /// End of the validity window; `None` means open-ended.
    pub ends_at: Option<Timestamp>,

    /// Opaque validity-duration tag carried for callers that track one.
    /// `ends_at` is authoritative; this value is never interpreted here.
    pub valid_duration: Option<String>,

    /// Maximum number of redemptions; `None` means unlimited.
    pub usage_limit: Option<u32>,

    /// Redemptions so far.
    pub usage_count: u32,

    /// Restricts the discount to a single user when present.
    pub user_id: Option<UserId>,

    /// Payout percentage earned per sale, in `[0, 100]`; `None` means no
    /// commission.
    pub commission_percentage: Option<Decimal>,

    /// Creation time.
    pub created_at: Timestamp,

    /// Time of the last accepted mutation.
    pub updated_at: Timestamp,

    /// Soft-delete tombstone. Tombstoned records are excluded from lookups
    /// and from code uniqueness.
    pub deleted_at: Option<Timestamp>,
}

impl DiscountRecord {
    /// Whether the record has been tombstoned.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Payload for creating a discount.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewDiscount {
    /// Raw code; normalised before the record is accepted.
    pub code: String,

    /// See [`DiscountRecord::is_dynamic`].
    pub is_dynamic: bool,

    /// See [`DiscountRecord::rule_id`].
    pub rule_id: Option<RuleId>,

    /// See [`DiscountRecord::parent_discount_id`].
    pub parent_discount_id: Option<DiscountId>,

    /// Effective-from time; defaults to the creation timestamp when absent.
    pub starts_at: Option<Timestamp>,

    /// See [`DiscountRecord::ends_at`].
    pub ends_at: Option<Timestamp>,

    /// See [`DiscountRecord::valid_duration`].
    pub valid_duration: Option<String>,

    /// See [`DiscountRecord::usage_limit`].
    pub usage_limit: Option<u32>,

    /// See [`DiscountRecord::user_id`].
    pub user_id: Option<UserId>,

    /// See [`DiscountRecord::commission_percentage`].
    pub commission_percentage: Option<Decimal>,
}

impl NewDiscount {
    /// Shapes the payload into a record: the code is normalised (left empty
    /// when the raw code is blank, which the acceptance checks reject), the
    /// start defaults to `now`, and the counter starts at zero.
    ///
    /// Shaping never validates; run [`crate::validation::validate_record`]
    /// before handing the record to a store.
    #[must_use]
    pub fn into_record(self, id: DiscountId, now: Timestamp) -> DiscountRecord {
        DiscountRecord {
            id,
            code: normalize_code(&self.code).unwrap_or_default(),
            is_dynamic: self.is_dynamic,
            rule_id: self.rule_id,
            is_disabled: false,
            parent_discount_id: self.parent_discount_id,
            starts_at: self.starts_at.unwrap_or(now),
            ends_at: self.ends_at,
            valid_duration: self.valid_duration,
            usage_limit: self.usage_limit,
            usage_count: 0,
            user_id: self.user_id,
            commission_percentage: self.commission_percentage,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// Replacement values for a discount's adjustable attributes.
///
/// Identity, the usage counter and the lifecycle stamps are never written
/// through an update; the counter only moves through the usage transition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscountUpdate {
    /// Raw replacement code; normalised before the record is accepted.
    pub code: String,

    /// See [`DiscountRecord::is_dynamic`].
    pub is_dynamic: bool,

    /// See [`DiscountRecord::rule_id`].
    pub rule_id: Option<RuleId>,

    /// See [`DiscountRecord::is_disabled`].
    pub is_disabled: bool,

    /// See [`DiscountRecord::parent_discount_id`].
    pub parent_discount_id: Option<DiscountId>,

    /// See [`DiscountRecord::starts_at`].
    pub starts_at: Timestamp,

    /// See [`DiscountRecord::ends_at`].
    pub ends_at: Option<Timestamp>,

    /// See [`DiscountRecord::valid_duration`].
    pub valid_duration: Option<String>,

    /// See [`DiscountRecord::usage_limit`].
    pub usage_limit: Option<u32>,

    /// See [`DiscountRecord::user_id`].
    pub user_id: Option<UserId>,

    /// See [`DiscountRecord::commission_percentage`].
    pub commission_percentage: Option<Decimal>,
}

impl DiscountUpdate {
    /// Lays the replacement values over `current`, renormalising the code and
    /// stamping `updated_at`. Like shaping a new record, this never
    /// validates.
    #[must_use]
    pub fn apply_to(&self, current: &DiscountRecord, now: Timestamp) -> DiscountRecord {
        DiscountRecord {
            id: current.id,
            code: normalize_code(&self.code).unwrap_or_default(),
            is_dynamic: self.is_dynamic,
            rule_id: self.rule_id,
            is_disabled: self.is_disabled,
            parent_discount_id: self.parent_discount_id,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            valid_duration: self.valid_duration.clone(),
            usage_limit: self.usage_limit,
            usage_count: current.usage_count,
            user_id: self.user_id,
            commission_percentage: self.commission_percentage,
            created_at: current.created_at,
            updated_at: now,
            deleted_at: current.deleted_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn t0() -> Result<Timestamp, jiff::Error> {
        Timestamp::from_second(1_750_000_000)
    }

    #[test]
    fn shaping_normalises_and_stamps_defaults() -> TestResult {
        let now = t0()?;

        let record = NewDiscount {
            code: "  promo1 ".to_string(),
            ..NewDiscount::default()
        }
        .into_record(DiscountId::new(), now);

        assert_eq!(record.code, "PROMO1");
        assert_eq!(record.starts_at, now, "start defaults to creation time");
        assert_eq!(record.usage_count, 0, "counter starts at zero");
        assert!(!record.is_disabled, "records are created enabled");
        assert!(record.deleted_at.is_none(), "records are created live");

        Ok(())
    }

    #[test]
    fn shaping_keeps_an_explicit_start() -> TestResult {
        let now = t0()?;
        let starts_at = Timestamp::from_second(1_750_003_600)?;

        let record = NewDiscount {
            code: "later".to_string(),
            starts_at: Some(starts_at),
            ..NewDiscount::default()
        }
        .into_record(DiscountId::new(), now);

        assert_eq!(record.starts_at, starts_at);
        assert_eq!(record.created_at, now);

        Ok(())
    }

    #[test]
    fn blank_code_shapes_to_empty() -> TestResult {
        let record = NewDiscount {
            code: "   ".to_string(),
            ..NewDiscount::default()
        }
        .into_record(DiscountId::new(), t0()?);

        // The acceptance checks reject this; shaping just records the fact.
        assert!(record.code.is_empty(), "blank raw code shapes to empty");

        Ok(())
    }

    #[test]
    fn updates_preserve_identity_and_counter() -> TestResult {
        let now = t0()?;
        let later = Timestamp::from_second(1_750_007_200)?;

        let mut record = NewDiscount {
            code: "keep".to_string(),
            ..NewDiscount::default()
        }
        .into_record(DiscountId::new(), now);
        record.usage_count = 7;

        let updated = DiscountUpdate {
            code: " keep2 ".to_string(),
            is_disabled: true,
            starts_at: record.starts_at,
            ..DiscountUpdate::default()
        }
        .apply_to(&record, later);

        assert_eq!(updated.id, record.id);
        assert_eq!(updated.code, "KEEP2");
        assert_eq!(updated.usage_count, 7, "updates never move the counter");
        assert_eq!(updated.created_at, now);
        assert_eq!(updated.updated_at, later);
        assert!(updated.is_disabled);

        Ok(())
    }
}
