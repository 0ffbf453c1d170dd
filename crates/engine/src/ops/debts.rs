use sea_orm::{
    DatabaseTransaction, JoinType, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    Debt, DebtStatus, EngineError, MarkPaidCmd, MoneyCents, ResultEngine, debts, expenses,
};

use super::{Engine, with_tx};

/// Result of a `mark_paid` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaymentOutcome {
    pub resolved_count: usize,
    pub amount_retired: MoneyCents,
}

impl Engine {
    /// Retires unpaid debts between one debtor and one creditor, oldest
    /// first, up to the reported payment amount.
    ///
    /// Only whole debt rows are retired: a row is marked resolved when its
    /// full amount fits within the remaining requested amount. The status
    /// flip uses a compare-and-swap on `status = 'unpaid'`; losing the race
    /// to a concurrent call surfaces as `ConcurrentModification` and rolls
    /// the whole batch back, so no row is ever double-resolved.
    pub async fn mark_paid(&self, cmd: MarkPaidCmd) -> ResultEngine<PaymentOutcome> {
        if !cmd.amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }
        if cmd.debtor_id == cmd.creditor_id {
            return Err(EngineError::InvalidAmount(
                "debtor and creditor must differ".to_string(),
            ));
        }

        let MarkPaidCmd {
            group_id,
            debtor_id,
            creditor_id,
            amount,
            acting_user_id,
        } = cmd;

        with_tx!(self, |db_tx| {
            self.retire_debts(&db_tx, group_id, debtor_id, creditor_id, amount, acting_user_id)
                .await
        })
    }

    async fn retire_debts(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
        debtor_id: Uuid,
        creditor_id: Uuid,
        amount: MoneyCents,
        acting_user_id: Uuid,
    ) -> ResultEngine<PaymentOutcome> {
        self.require_group(db, group_id).await?;
        self.require_group_member(db, group_id, acting_user_id)
            .await?;

        let debt_models: Vec<debts::Model> = debts::Entity::find()
            .join(JoinType::InnerJoin, debts::Relation::Expenses.def())
            .filter(expenses::Column::GroupId.eq(group_id.to_string()))
            .filter(debts::Column::PayerUserId.eq(creditor_id.to_string()))
            .filter(debts::Column::DebtorUserId.eq(debtor_id.to_string()))
            .filter(debts::Column::Status.eq(DebtStatus::Unpaid.as_str()))
            .order_by_asc(debts::Column::CreatedAt)
            .order_by_asc(debts::Column::Id)
            .all(db)
            .await?;

        if debt_models.is_empty() {
            return Err(EngineError::NoMatchingDebt(format!(
                "no unpaid debts from {debtor_id} to {creditor_id}"
            )));
        }

        let mut matching = Vec::with_capacity(debt_models.len());
        let mut outstanding = MoneyCents::ZERO;
        for model in debt_models {
            let debt = Debt::try_from(model)?;
            outstanding = outstanding
                .checked_add(debt.amount)
                .ok_or_else(|| EngineError::InvalidAmount("debt sum overflow".to_string()))?;
            matching.push(debt);
        }

        if amount > outstanding {
            return Err(EngineError::AmountExceedsDebt(format!(
                "requested {amount}, outstanding {outstanding}"
            )));
        }

        // Whole-row retirement only: a row is selected when its full amount
        // fits within what is left of the requested payment.
        let mut remaining = amount;
        let mut selected: Vec<&Debt> = Vec::new();
        for debt in &matching {
            if remaining.is_zero() {
                break;
            }
            if debt.amount <= remaining {
                selected.push(debt);
                remaining -= debt.amount;
            }
        }

        if selected.is_empty() {
            return Err(EngineError::InvalidAmount(
                "amount does not cover any whole debt".to_string(),
            ));
        }

        let mut amount_retired = MoneyCents::ZERO;
        for debt in &selected {
            let result = debts::Entity::update_many()
                .col_expr(
                    debts::Column::Status,
                    Expr::value(DebtStatus::Resolved.as_str()),
                )
                .filter(debts::Column::Id.eq(debt.id.to_string()))
                .filter(debts::Column::Status.eq(DebtStatus::Unpaid.as_str()))
                .exec(db)
                .await?;
            if result.rows_affected != 1 {
                return Err(EngineError::ConcurrentModification(format!(
                    "debt {} was resolved by a concurrent request",
                    debt.id
                )));
            }
            amount_retired += debt.amount;
        }

        Ok(PaymentOutcome {
            resolved_count: selected.len(),
            amount_retired,
        })
    }
}
