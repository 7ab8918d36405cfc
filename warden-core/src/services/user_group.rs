use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, instrument};
use warden_types::{UserGroupId, UserId};

use crate::error::{AclError, Result};
use crate::model::UserGroup;
use crate::repository::{UserGroupRepository, UserRepository};

/// Administration of flat user groups
#[derive(Debug, Clone)]
pub struct UserGroupService {
    groups: Arc<dyn UserGroupRepository>,
    users: Arc<dyn UserRepository>,
}

impl UserGroupService {
    pub fn new(groups: Arc<dyn UserGroupRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { groups, users }
    }

    #[instrument(skip(self))]
    pub async fn create(&self, label: &str) -> Result<UserGroup> {
        let group = UserGroup::new(label);
        self.groups.persist(&group).await?;
        info!("Created user group {} ({})", group.id, group.label);
        Ok(group)
    }

    pub async fn find_required(&self, id: &UserGroupId) -> Result<UserGroup> {
        self.groups
            .find(id)
            .await?
            .ok_or_else(|| AclError::not_found("User group", id))
    }

    pub async fn find_all(&self) -> Result<Vec<UserGroup>> {
        self.groups.find_all().await
    }

    /// Add existing users to the group. Unknown users fail the whole call.
    #[instrument(skip(self))]
    pub async fn add_users(&self, id: &UserGroupId, users: &[UserId]) -> Result<()> {
        if users.is_empty() {
            return Ok(());
        }
        let mut group = self.find_required(id).await?;
        for user in users {
            if self.users.find(user).await?.is_none() {
                return Err(AclError::not_found("User", user));
            }
            group.add_member(user.clone());
        }
        self.groups.update(&group).await?;
        info!("Added {} users to group {}", users.len(), id);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn remove_users(&self, id: &UserGroupId, users: &[UserId]) -> Result<()> {
        if users.is_empty() {
            return Ok(());
        }
        let mut group = self.find_required(id).await?;
        for user in users {
            group.remove_member(user);
        }
        self.groups.update(&group).await?;
        info!("Removed {} users from group {}", users.len(), id);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: &UserGroupId) -> Result<()> {
        self.groups.remove(id).await?;
        info!("Removed user group {}", id);
        Ok(())
    }

    pub async fn groups_of(&self, user: &UserId) -> Result<BTreeSet<UserGroupId>> {
        self.groups.groups_of(user).await
    }
}
