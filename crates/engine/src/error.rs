//! The module contains the errors the engine can throw.
//!
//! Validation errors are detected before any write and returned immediately.
//! Store failures inside a transaction roll the whole transaction back and
//! surface as [`StoreUnavailable`], so callers may retry idempotently.
//!
//! [`StoreUnavailable`]: EngineError::StoreUnavailable
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("group not found: {0}")]
    GroupNotFound(String),
    #[error("group has no members: {0}")]
    EmptyGroup(String),
    #[error("split mismatch: {0}")]
    SplitMismatch(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("no matching debt: {0}")]
    NoMatchingDebt(String),
    #[error("amount exceeds outstanding debt: {0}")]
    AmountExceedsDebt(String),
    #[error("concurrent modification: {0}")]
    ConcurrentModification(String),
    #[error(transparent)]
    StoreUnavailable(#[from] DbErr),
}

impl EngineError {
    /// Stable machine-readable code for each error.
    ///
    /// The surrounding application decides presentation; these codes are part
    /// of the wire contract and must not change.
    pub fn code(&self) -> &'static str {
        match self {
            Self::GroupNotFound(_) => "group_not_found",
            Self::EmptyGroup(_) => "empty_group",
            Self::SplitMismatch(_) => "split_mismatch",
            Self::InvalidAmount(_) => "invalid_amount",
            Self::KeyNotFound(_) => "not_found",
            Self::ExistingKey(_) => "already_exists",
            Self::NoMatchingDebt(_) => "no_matching_debt",
            Self::AmountExceedsDebt(_) => "amount_exceeds_debt",
            Self::ConcurrentModification(_) => "concurrent_modification",
            Self::StoreUnavailable(_) => "store_unavailable",
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::GroupNotFound(a), Self::GroupNotFound(b)) => a == b,
            (Self::EmptyGroup(a), Self::EmptyGroup(b)) => a == b,
            (Self::SplitMismatch(a), Self::SplitMismatch(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::NoMatchingDebt(a), Self::NoMatchingDebt(b)) => a == b,
            (Self::AmountExceedsDebt(a), Self::AmountExceedsDebt(b)) => a == b,
            (Self::ConcurrentModification(a), Self::ConcurrentModification(b)) => a == b,
            (Self::StoreUnavailable(a), Self::StoreUnavailable(b)) => {
                a.to_string() == b.to_string()
            }
            _ => false,
        }
    }
}
