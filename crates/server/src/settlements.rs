//! Settlement API endpoints

use api_types::settlement::{
    MarkPaidRequest, MarkPaidResponse, SettlementEntry, SettlementPlanResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, acting_user_id, server::ServerState};
use engine::{MarkPaidCmd, MoneyCents, users};

pub async fn plan(
    _: Extension<users::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<SettlementPlanResponse>, ServerError> {
    let payments = state.engine.plan_settlement(group_id).await?;
    Ok(Json(SettlementPlanResponse {
        payments: payments
            .into_iter()
            .map(|p| SettlementEntry {
                from_id: p.from_id,
                from_username: p.from_username,
                to_id: p.to_id,
                to_username: p.to_username,
                amount_cents: p.amount.cents(),
            })
            .collect(),
    }))
}

pub async fn mark_paid(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
    Json(payload): Json<MarkPaidRequest>,
) -> Result<Json<MarkPaidResponse>, ServerError> {
    let acting = acting_user_id(&user)?;
    let outcome = state
        .engine
        .mark_paid(MarkPaidCmd::new(
            group_id,
            payload.debtor_id,
            payload.creditor_id,
            MoneyCents::new(payload.amount_cents),
            acting,
        ))
        .await?;

    Ok(Json(MarkPaidResponse {
        resolved_count: outcome.resolved_count,
        amount_retired_cents: outcome.amount_retired.cents(),
    }))
}
