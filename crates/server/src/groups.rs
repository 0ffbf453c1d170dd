//! Group and membership API endpoints

use api_types::group::{GroupNew, GroupView, MemberAdd, MemberView, MembersResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, acting_user_id, server::ServerState};
use engine::users;

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<GroupNew>,
) -> Result<(StatusCode, Json<GroupView>), ServerError> {
    let creator = acting_user_id(&user)?;
    let group = state
        .engine
        .create_group(
            &payload.name,
            payload.description.as_deref(),
            creator,
            Utc::now(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(GroupView {
            id: group.id,
            name: group.name,
            description: group.description,
            created_at: group.created_at,
        }),
    ))
}

pub async fn remove(
    _: Extension<users::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_group(group_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_members(
    _: Extension<users::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<MembersResponse>, ServerError> {
    let members = state.engine.list_group_members(group_id).await?;
    Ok(Json(MembersResponse {
        members: members
            .into_iter()
            .map(|m| MemberView {
                user_id: m.id,
                username: m.username,
            })
            .collect(),
    }))
}

pub async fn add_member(
    _: Extension<users::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
    Json(payload): Json<MemberAdd>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .add_group_member(group_id, payload.user_id)
        .await?;
    Ok(StatusCode::CREATED)
}

pub async fn remove_member(
    _: Extension<users::Model>,
    State(state): State<ServerState>,
    Path((group_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state.engine.remove_group_member(group_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
