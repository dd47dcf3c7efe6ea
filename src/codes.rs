//! Discount codes

use thiserror::Error;

/// Errors specific to discount-code normalisation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodeError {
    /// The code contained nothing but whitespace.
    #[error("discount code is empty after trimming")]
    Empty,
}

/// Canonicalises a raw discount code: leading and trailing whitespace is
/// trimmed and the remainder upper-cased. Codes are stored and looked up in
/// this form, which makes them case-insensitive.
///
/// Deterministic and idempotent: normalising an already canonical code
/// returns it unchanged.
///
/// # Errors
///
/// - [`CodeError::Empty`]: nothing is left once whitespace is trimmed.
pub fn normalize_code(raw: &str) -> Result<String, CodeError> {
    let code = raw.trim().to_uppercase();

    if code.is_empty() {
        return Err(CodeError::Empty);
    }

    Ok(code)
}
