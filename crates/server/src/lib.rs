use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, router, run, run_with_listener, spawn_with_listener};

mod balances;
mod expenses;
mod groups;
mod server;
mod settlements;

pub mod types {
    pub mod group {
        pub use api_types::group::{GroupNew, GroupView, MemberAdd, MemberView, MembersResponse};
    }

    pub mod expense {
        pub use api_types::expense::{
            DebtView, ExpenseListResponse, ExpenseNew, ExpenseView, SplitShare,
        };
    }

    pub mod balance {
        pub use api_types::balance::{BalancesResponse, MemberBalanceView};
    }

    pub mod settlement {
        pub use api_types::settlement::{
            MarkPaidRequest, MarkPaidResponse, SettlementEntry, SettlementPlanResponse,
        };
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
    code: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::GroupNotFound(_)
        | EngineError::KeyNotFound(_)
        | EngineError::NoMatchingDebt(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) | EngineError::ConcurrentModification(_) => {
            StatusCode::CONFLICT
        }
        EngineError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::EmptyGroup(_)
        | EngineError::SplitMismatch(_)
        | EngineError::InvalidAmount(_)
        | EngineError::AmountExceedsDebt(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::StoreUnavailable(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error, code) = match self {
            ServerError::Engine(err) => {
                let status = status_for_engine_error(&err);
                let code = err.code().to_string();
                (status, message_for_engine_error(err), code)
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err, "bad_request".to_string()),
        };

        (status, Json(Error { error, code })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

/// The id of the authenticated user resolved by the auth middleware.
pub(crate) fn acting_user_id(user: &engine::users::Model) -> Result<uuid::Uuid, ServerError> {
    uuid::Uuid::parse_str(&user.id)
        .map_err(|_| ServerError::Generic("malformed user id".to_string()))
}
