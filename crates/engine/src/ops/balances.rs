use std::collections::HashMap;

use sea_orm::{DatabaseTransaction, JoinType, QueryFilter, QuerySelect, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Debt, DebtStatus, EngineError, MoneyCents, NetBalance, ResultEngine, debts, expenses,
};

use super::{Engine, with_tx};

impl Engine {
    /// Computes the net balance of every current member of the group.
    ///
    /// Only unpaid debts whose owning expense belongs to the group are
    /// counted: +amount to the payer, -amount to the debtor. The balances of
    /// the counted debts always sum to zero (conservation of debt).
    pub async fn net_balances(&self, group_id: Uuid) -> ResultEngine<Vec<NetBalance>> {
        with_tx!(self, |db_tx| {
            self.group_net_balances(&db_tx, group_id).await
        })
    }

    /// A single member's aggregate position in the group.
    pub async fn member_balance(&self, group_id: Uuid, user_id: Uuid) -> ResultEngine<NetBalance> {
        with_tx!(self, |db_tx| {
            let balances = self.group_net_balances(&db_tx, group_id).await?;
            balances
                .into_iter()
                .find(|b| b.user_id == user_id)
                .ok_or_else(|| EngineError::KeyNotFound("user is not a group member".to_string()))
        })
    }

    pub(super) async fn group_net_balances(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
    ) -> ResultEngine<Vec<NetBalance>> {
        self.require_group(db, group_id).await?;
        let members = self.group_members_of(db, group_id).await?;

        let mut totals: HashMap<Uuid, MoneyCents> =
            members.iter().map(|m| (m.id, MoneyCents::ZERO)).collect();

        let debt_models: Vec<debts::Model> = debts::Entity::find()
            .join(JoinType::InnerJoin, debts::Relation::Expenses.def())
            .filter(expenses::Column::GroupId.eq(group_id.to_string()))
            .filter(debts::Column::Status.eq(DebtStatus::Unpaid.as_str()))
            .all(db)
            .await?;

        for model in debt_models {
            let debt = Debt::try_from(model)?;
            // Debts referencing users that since left the group are skipped;
            // counted rows therefore cancel out pairwise.
            if !totals.contains_key(&debt.payer_id) || !totals.contains_key(&debt.debtor_id) {
                continue;
            }
            if let Some(balance) = totals.get_mut(&debt.payer_id) {
                *balance += debt.amount;
            }
            if let Some(balance) = totals.get_mut(&debt.debtor_id) {
                *balance -= debt.amount;
            }
        }

        Ok(members
            .into_iter()
            .map(|m| {
                let balance = totals.get(&m.id).copied().unwrap_or(MoneyCents::ZERO);
                NetBalance {
                    user_id: m.id,
                    username: m.username,
                    balance,
                }
            })
            .collect())
    }
}
