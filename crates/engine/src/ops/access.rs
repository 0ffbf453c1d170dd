use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, group_members, groups, users};

use super::{Engine, groups::GroupMember};

pub(super) fn parse_user_uuid(raw: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(raw).map_err(|_| EngineError::KeyNotFound("user not exists".to_string()))
}

impl Engine {
    pub(super) async fn require_group(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
    ) -> ResultEngine<groups::Model> {
        groups::Entity::find_by_id(group_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::GroupNotFound(group_id.to_string()))
    }

    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }

    /// Loads the group's member set, ordered by ascending user id.
    ///
    /// The ordering makes share assignment and balance listings deterministic.
    pub(super) async fn group_members_of(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
    ) -> ResultEngine<Vec<GroupMember>> {
        let rows: Vec<(group_members::Model, Option<users::Model>)> =
            group_members::Entity::find()
                .filter(group_members::Column::GroupId.eq(group_id.to_string()))
                .find_also_related(users::Entity)
                .order_by_asc(group_members::Column::UserId)
                .all(db)
                .await?;

        let mut members = Vec::with_capacity(rows.len());
        for (membership, user) in rows {
            let Some(user) = user else { continue };
            members.push(GroupMember {
                id: parse_user_uuid(&membership.user_id)?,
                username: user.username,
            });
        }
        Ok(members)
    }

    pub(super) async fn require_group_member(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<()> {
        group_members::Entity::find_by_id((group_id.to_string(), user_id.to_string()))
            .one(db)
            .await?
            .map(|_| ())
            .ok_or_else(|| EngineError::KeyNotFound("user is not a group member".to_string()))
    }
}
