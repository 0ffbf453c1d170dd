//! Expense API endpoints

use std::collections::HashMap;

use api_types::expense::{DebtView, ExpenseListResponse, ExpenseNew, ExpenseView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::{Expense, MoneyCents, RecordExpenseCmd, users};

fn view(expense: Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        group_id: expense.group_id,
        description: expense.description,
        total_cents: expense.total.cents(),
        occurred_at: expense.occurred_at,
        paid_by: expense.paid_by,
        receipt_ref: expense.receipt_ref,
        debts: expense
            .debts
            .into_iter()
            .map(|d| DebtView {
                id: d.id,
                payer_id: d.payer_id,
                debtor_id: d.debtor_id,
                amount_cents: d.amount.cents(),
                status: d.status.as_str().to_string(),
            })
            .collect(),
    }
}

pub async fn create(
    _: Extension<users::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let occurred_at = payload.occurred_at.unwrap_or_else(Utc::now);
    let mut cmd = RecordExpenseCmd::new(
        group_id,
        payload.description,
        MoneyCents::new(payload.total_cents),
        payload.paid_by,
        occurred_at,
    );

    if let Some(shares) = payload.splits {
        let mut splits: HashMap<Uuid, MoneyCents> = HashMap::with_capacity(shares.len());
        for share in shares {
            if splits
                .insert(share.user_id, MoneyCents::new(share.amount_cents))
                .is_some()
            {
                return Err(ServerError::Generic(format!(
                    "duplicate split entry for user {}",
                    share.user_id
                )));
            }
        }
        cmd = cmd.splits(splits);
    }
    if let Some(receipt_ref) = payload.receipt_ref {
        cmd = cmd.receipt_ref(receipt_ref);
    }

    let expense = state.engine.record_expense(cmd).await?;
    Ok((StatusCode::CREATED, Json(view(expense))))
}

pub async fn list(
    _: Extension<users::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<ExpenseListResponse>, ServerError> {
    let expenses = state.engine.list_group_expenses(group_id).await?;
    Ok(Json(ExpenseListResponse {
        expenses: expenses.into_iter().map(view).collect(),
    }))
}
