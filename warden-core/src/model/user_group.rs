use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;
use warden_types::{UserGroupId, UserId};

/// Named, flat collection of users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGroup {
    pub id: UserGroupId,
    pub label: String,
    #[serde(default)]
    pub members: BTreeSet<UserId>,
    pub created_at: DateTime<Utc>,
}

impl UserGroup {
    /// Create an empty group with a generated identifier
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_id(format!("group-{}", Uuid::new_v4()), label)
    }

    pub fn with_id(id: impl Into<UserGroupId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            members: BTreeSet::new(),
            created_at: Utc::now(),
        }
    }

    /// Returns `false` if the user already was a member
    pub fn add_member(&mut self, user: UserId) -> bool {
        self.members.insert(user)
    }

    pub fn remove_member(&mut self, user: &UserId) -> bool {
        self.members.remove(user)
    }

    pub fn has_member(&self, user: &UserId) -> bool {
        self.members.contains(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership() {
        let mut group = UserGroup::new("Editors");
        assert!(group.id.as_str().starts_with("group-"));

        assert!(group.add_member(UserId::from("alice")));
        assert!(!group.add_member(UserId::from("alice")));
        assert!(group.has_member(&UserId::from("alice")));

        assert!(group.remove_member(&UserId::from("alice")));
        assert!(!group.has_member(&UserId::from("alice")));
    }
}
