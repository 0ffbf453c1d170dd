use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod group {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupNew {
        pub name: String,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupView {
        pub id: Uuid,
        pub name: String,
        pub description: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    /// Request body for adding a member.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberAdd {
        pub user_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberView {
        pub user_id: Uuid,
        pub username: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MembersResponse {
        pub members: Vec<MemberView>,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub description: String,
        /// Must be > 0.
        pub total_cents: i64,
        pub paid_by: Uuid,
        /// Per-member shares in cents. Omit for an equal split across all
        /// current members.
        pub splits: Option<Vec<SplitShare>>,
        pub receipt_ref: Option<String>,
        /// Optional: if absent, server uses now().
        pub occurred_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitShare {
        pub user_id: Uuid,
        pub amount_cents: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub group_id: Uuid,
        pub description: String,
        pub total_cents: i64,
        pub occurred_at: DateTime<Utc>,
        pub paid_by: Uuid,
        pub receipt_ref: Option<String>,
        pub debts: Vec<DebtView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtView {
        pub id: Uuid,
        pub payer_id: Uuid,
        pub debtor_id: Uuid,
        pub amount_cents: i64,
        pub status: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub expenses: Vec<ExpenseView>,
    }
}

pub mod balance {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberBalanceView {
        pub user_id: Uuid,
        pub username: String,
        /// Positive: the group owes this member. Negative: they owe.
        pub balance_cents: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalancesResponse {
        pub balances: Vec<MemberBalanceView>,
    }
}

pub mod settlement {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettlementEntry {
        pub from_id: Uuid,
        pub from_username: String,
        pub to_id: Uuid,
        pub to_username: String,
        pub amount_cents: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettlementPlanResponse {
        pub payments: Vec<SettlementEntry>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MarkPaidRequest {
        pub debtor_id: Uuid,
        pub creditor_id: Uuid,
        /// Must be > 0 and cover at least one whole debt row.
        pub amount_cents: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MarkPaidResponse {
        pub resolved_count: usize,
        pub amount_retired_cents: i64,
    }
}
