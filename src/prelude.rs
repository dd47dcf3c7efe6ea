//! Voucher prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    codes::{CodeError, normalize_code},
    commissions::{CommissionError, commission_amount, validate_commission_percentage},
    discounts::{
        CommissionId, DiscountId, DiscountRecord, DiscountUpdate, NewDiscount, OrderId, RuleId,
        UserId,
    },
    ids::TypedUuid,
    service::{DiscountService, DiscountServiceError},
    store::{DiscountStore, StoreError, memory::MemoryStore},
    usage::{UsageError, is_usable, record_usage},
    validation::{
        CycleError, ValidationError, ValidationErrors, WindowError, validate_no_cycle,
        validate_record, validate_validity_window,
    },
};
