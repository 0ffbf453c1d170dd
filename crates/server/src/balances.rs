//! Balance API endpoints

use api_types::balance::{BalancesResponse, MemberBalanceView};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::{NetBalance, users};

fn view(balance: NetBalance) -> MemberBalanceView {
    MemberBalanceView {
        user_id: balance.user_id,
        username: balance.username,
        balance_cents: balance.balance.cents(),
    }
}

pub async fn list(
    _: Extension<users::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<BalancesResponse>, ServerError> {
    let balances = state.engine.net_balances(group_id).await?;
    Ok(Json(BalancesResponse {
        balances: balances.into_iter().map(view).collect(),
    }))
}

pub async fn for_member(
    _: Extension<users::Model>,
    State(state): State<ServerState>,
    Path((group_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MemberBalanceView>, ServerError> {
    let balance = state.engine.member_balance(group_id, user_id).await?;
    Ok(Json(view(balance)))
}
