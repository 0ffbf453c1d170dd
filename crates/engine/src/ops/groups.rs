use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, Group, ResultEngine, group_members, groups};

use super::{Engine, normalize_optional_text, normalize_required_text, with_tx};

/// A user in the context of one group's ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupMember {
    pub id: Uuid,
    pub username: String,
}

impl Engine {
    /// Creates a group; the creator becomes its first member.
    pub async fn create_group(
        &self,
        name: &str,
        description: Option<&str>,
        creator_user_id: Uuid,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Group> {
        let name = normalize_required_text(name, "group name")?;
        let description = normalize_optional_text(description);
        let group = Group::new(name, description, created_at);

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, creator_user_id).await?;
            groups::ActiveModel::from(&group).insert(&db_tx).await?;
            let membership = group_members::ActiveModel {
                group_id: ActiveValue::Set(group.id.to_string()),
                user_id: ActiveValue::Set(creator_user_id.to_string()),
            };
            membership.insert(&db_tx).await?;
            Ok(group.clone())
        })
    }

    /// Deletes a group; the schema cascades to expenses, debts, and
    /// memberships.
    pub async fn delete_group(&self, group_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_group(&db_tx, group_id).await?;
            groups::Entity::delete_by_id(group_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Adds a user to the group's member set.
    pub async fn add_group_member(&self, group_id: Uuid, user_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_group(&db_tx, group_id).await?;
            let user = self.require_user(&db_tx, user_id).await?;

            let existing = group_members::Entity::find_by_id((
                group_id.to_string(),
                user_id.to_string(),
            ))
            .one(&db_tx)
            .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(user.username));
            }

            let membership = group_members::ActiveModel {
                group_id: ActiveValue::Set(group_id.to_string()),
                user_id: ActiveValue::Set(user_id.to_string()),
            };
            membership.insert(&db_tx).await?;
            Ok(())
        })
    }

    /// Removes a user from the group's member set.
    ///
    /// Debts referencing the removed user stay in the store; the balance
    /// aggregator simply stops counting them.
    pub async fn remove_group_member(&self, group_id: Uuid, user_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_group(&db_tx, group_id).await?;
            self.require_group_member(&db_tx, group_id, user_id).await?;
            group_members::Entity::delete_by_id((group_id.to_string(), user_id.to_string()))
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Lists the group's members, ordered by ascending user id.
    pub async fn list_group_members(&self, group_id: Uuid) -> ResultEngine<Vec<GroupMember>> {
        with_tx!(self, |db_tx| {
            self.require_group(&db_tx, group_id).await?;
            self.group_members_of(&db_tx, group_id).await
        })
    }
}
