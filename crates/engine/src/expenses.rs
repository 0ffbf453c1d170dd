//! Expense primitives.
//!
//! An `Expense` is an immutable event: one member paid a total on behalf of
//! the group, and one `Debt` per owing member materializes what the others
//! owe the payer. The debt batch is created atomically with the expense and
//! is never re-created.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{Debt, EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub id: Uuid,
    pub group_id: Uuid,
    pub description: String,
    pub total: MoneyCents,
    pub occurred_at: DateTime<Utc>,
    pub paid_by: Uuid,
    pub receipt_ref: Option<String>,
    pub debts: Vec<Debt>,
}

impl Expense {
    pub fn new(
        group_id: Uuid,
        description: String,
        total: MoneyCents,
        occurred_at: DateTime<Utc>,
        paid_by: Uuid,
        receipt_ref: Option<String>,
    ) -> ResultEngine<Self> {
        if !total.is_positive() {
            return Err(EngineError::InvalidAmount(
                "total must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            group_id,
            description,
            total,
            occurred_at,
            paid_by,
            receipt_ref,
            debts: Vec::new(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub group_id: String,
    pub description: String,
    pub total_cents: i64,
    pub occurred_at: DateTimeUtc,
    pub paid_by_user_id: String,
    pub receipt_ref: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Groups,
    #[sea_orm(has_many = "super::debts::Entity")]
    Debts,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl Related<super::debts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Debts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            group_id: ActiveValue::Set(expense.group_id.to_string()),
            description: ActiveValue::Set(expense.description.clone()),
            total_cents: ActiveValue::Set(expense.total.cents()),
            occurred_at: ActiveValue::Set(expense.occurred_at),
            paid_by_user_id: ActiveValue::Set(expense.paid_by.to_string()),
            receipt_ref: ActiveValue::Set(expense.receipt_ref.clone()),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let parse = |raw: &str| {
            Uuid::parse_str(raw)
                .map_err(|_| EngineError::KeyNotFound("expense not exists".to_string()))
        };
        Ok(Self {
            id: parse(&model.id)?,
            group_id: parse(&model.group_id)?,
            description: model.description,
            total: MoneyCents::new(model.total_cents),
            occurred_at: model.occurred_at,
            paid_by: parse(&model.paid_by_user_id)?,
            receipt_ref: model.receipt_ref,
            debts: Vec::new(),
        })
    }
}
