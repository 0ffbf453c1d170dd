//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::MoneyCents;

/// Record a shared expense and materialize its debt batch.
#[derive(Clone, Debug)]
pub struct RecordExpenseCmd {
    pub group_id: Uuid,
    pub description: String,
    pub total: MoneyCents,
    pub paid_by: Uuid,
    /// Custom shares per member. `None` means an equal split over the whole
    /// member set, payer included.
    pub splits: Option<HashMap<Uuid, MoneyCents>>,
    pub receipt_ref: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl RecordExpenseCmd {
    #[must_use]
    pub fn new(
        group_id: Uuid,
        description: impl Into<String>,
        total: MoneyCents,
        paid_by: Uuid,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            group_id,
            description: description.into(),
            total,
            paid_by,
            splits: None,
            receipt_ref: None,
            occurred_at,
        }
    }

    #[must_use]
    pub fn splits(mut self, splits: HashMap<Uuid, MoneyCents>) -> Self {
        self.splits = Some(splits);
        self
    }

    #[must_use]
    pub fn receipt_ref(mut self, receipt_ref: impl Into<String>) -> Self {
        self.receipt_ref = Some(receipt_ref.into());
        self
    }
}

/// Retire unpaid debts between one debtor and one creditor, oldest first.
#[derive(Clone, Debug)]
pub struct MarkPaidCmd {
    pub group_id: Uuid,
    pub debtor_id: Uuid,
    pub creditor_id: Uuid,
    pub amount: MoneyCents,
    /// Member on whose behalf the payment is reported. Must belong to the
    /// group; identity is established by the caller.
    pub acting_user_id: Uuid,
}

impl MarkPaidCmd {
    #[must_use]
    pub fn new(
        group_id: Uuid,
        debtor_id: Uuid,
        creditor_id: Uuid,
        amount: MoneyCents,
        acting_user_id: Uuid,
    ) -> Self {
        Self {
            group_id,
            debtor_id,
            creditor_id,
            amount,
            acting_user_id,
        }
    }
}
