use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Debt, EngineError, Expense, MoneyCents, RecordExpenseCmd, ResultEngine, debts, expenses, split,
};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    /// Records a shared expense and materializes its debt batch.
    ///
    /// The payer's own share is never materialized as a debt; one debt per
    /// non-payer member with a positive share is inserted in the same
    /// transaction as the expense row. If any insert fails the whole batch
    /// rolls back, so an expense never exists without its debts.
    pub async fn record_expense(&self, cmd: RecordExpenseCmd) -> ResultEngine<Expense> {
        let RecordExpenseCmd {
            group_id,
            description,
            total,
            paid_by,
            splits,
            receipt_ref,
            occurred_at,
        } = cmd;

        let description = normalize_required_text(&description, "expense description")?;
        let expense = Expense::new(
            group_id,
            description,
            total,
            occurred_at,
            paid_by,
            receipt_ref,
        )?;

        with_tx!(self, |db_tx| {
            self.insert_expense_with_debts(&db_tx, expense, splits.as_ref())
                .await
        })
    }

    async fn insert_expense_with_debts(
        &self,
        db: &DatabaseTransaction,
        mut expense: Expense,
        splits: Option<&HashMap<Uuid, MoneyCents>>,
    ) -> ResultEngine<Expense> {
        self.require_group(db, expense.group_id).await?;

        let members = self.group_members_of(db, expense.group_id).await?;
        if members.is_empty() {
            return Err(EngineError::EmptyGroup(expense.group_id.to_string()));
        }
        let member_ids: Vec<Uuid> = members.iter().map(|m| m.id).collect();
        if !member_ids.contains(&expense.paid_by) {
            return Err(EngineError::KeyNotFound(
                "payer is not a group member".to_string(),
            ));
        }

        let shares = match splits {
            None => split::equal_shares(expense.total, &member_ids),
            Some(map) => split::resolve_custom_shares(expense.total, map, &member_ids)?,
        };

        expenses::ActiveModel::from(&expense).insert(db).await?;

        let created_at = Utc::now();
        for (member_id, share) in shares {
            if member_id == expense.paid_by || !share.is_positive() {
                continue;
            }
            let debt = Debt::new(expense.id, expense.paid_by, member_id, share, created_at)?;
            debts::ActiveModel::from(&debt).insert(db).await?;
            expense.debts.push(debt);
        }

        Ok(expense)
    }

    /// Lists a group's expenses, newest first, each with its debt batch.
    pub async fn list_group_expenses(&self, group_id: Uuid) -> ResultEngine<Vec<Expense>> {
        with_tx!(self, |db_tx| {
            self.require_group(&db_tx, group_id).await?;

            let rows: Vec<(expenses::Model, Vec<debts::Model>)> = expenses::Entity::find()
                .filter(expenses::Column::GroupId.eq(group_id.to_string()))
                .order_by_desc(expenses::Column::OccurredAt)
                .find_with_related(debts::Entity)
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(rows.len());
            for (expense_model, debt_models) in rows {
                let mut expense = Expense::try_from(expense_model)?;
                for debt_model in debt_models {
                    expense.debts.push(Debt::try_from(debt_model)?);
                }
                out.push(expense);
            }
            Ok(out)
        })
    }
}
