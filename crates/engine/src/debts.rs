//! Debt primitives.
//!
//! A `Debt` is a directed, single-expense obligation: one debtor owes one
//! payer a fixed amount. The only mutable field is `status`, which moves
//! unpaid -> resolved exactly once.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtStatus {
    Unpaid,
    Resolved,
}

impl DebtStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Resolved => "resolved",
        }
    }
}

impl TryFrom<&str> for DebtStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "unpaid" => Ok(Self::Unpaid),
            "resolved" => Ok(Self::Resolved),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid debt status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Debt {
    pub id: Uuid,
    pub expense_id: Uuid,
    pub payer_id: Uuid,
    pub debtor_id: Uuid,
    pub amount: MoneyCents,
    pub status: DebtStatus,
    pub created_at: DateTime<Utc>,
}

impl Debt {
    pub fn new(
        expense_id: Uuid,
        payer_id: Uuid,
        debtor_id: Uuid,
        amount: MoneyCents,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "debt amount must be > 0".to_string(),
            ));
        }
        if payer_id == debtor_id {
            return Err(EngineError::InvalidAmount(
                "debtor and payer must differ".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            expense_id,
            payer_id,
            debtor_id,
            amount,
            status: DebtStatus::Unpaid,
            created_at,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "debts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub expense_id: String,
    pub payer_user_id: String,
    pub debtor_user_id: String,
    pub amount_cents: i64,
    pub status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expenses::Entity",
        from = "Column::ExpenseId",
        to = "super::expenses::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Expenses,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Debt> for ActiveModel {
    fn from(debt: &Debt) -> Self {
        Self {
            id: ActiveValue::Set(debt.id.to_string()),
            expense_id: ActiveValue::Set(debt.expense_id.to_string()),
            payer_user_id: ActiveValue::Set(debt.payer_id.to_string()),
            debtor_user_id: ActiveValue::Set(debt.debtor_id.to_string()),
            amount_cents: ActiveValue::Set(debt.amount.cents()),
            status: ActiveValue::Set(debt.status.as_str().to_string()),
            created_at: ActiveValue::Set(debt.created_at),
        }
    }
}

impl TryFrom<Model> for Debt {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let parse = |raw: &str| {
            Uuid::parse_str(raw)
                .map_err(|_| EngineError::KeyNotFound("debt not exists".to_string()))
        };
        Ok(Self {
            id: parse(&model.id)?,
            expense_id: parse(&model.expense_id)?,
            payer_id: parse(&model.payer_user_id)?,
            debtor_id: parse(&model.debtor_user_id)?,
            amount: MoneyCents::new(model.amount_cents),
            status: DebtStatus::try_from(model.status.as_str())?,
            created_at: model.created_at,
        })
    }
}
