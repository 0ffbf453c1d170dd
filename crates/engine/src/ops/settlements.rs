use sea_orm::TransactionTrait;
use uuid::Uuid;

use crate::{PlannedPayment, ResultEngine, settlement};

use super::{Engine, with_tx};

impl Engine {
    /// Produces the group's settlement plan from current net balances.
    ///
    /// Pure read; the plan is not stored and is recomputed on every call, so
    /// it reflects whatever debts are unpaid at snapshot time. Applying every
    /// entry as a payment zeroes out all balances.
    pub async fn plan_settlement(&self, group_id: Uuid) -> ResultEngine<Vec<PlannedPayment>> {
        with_tx!(self, |db_tx| {
            let balances = self.group_net_balances(&db_tx, group_id).await?;
            Ok(settlement::plan(&balances))
        })
    }
}
