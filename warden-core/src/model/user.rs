use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use warden_types::{RoleId, UserId};

/// Reference-level view of a user, as stored in change history and holders
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

impl User {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A user account together with the system roles it holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub roles: BTreeSet<RoleId>,
}

impl UserAccount {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            roles: BTreeSet::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<RoleId>) -> Self {
        self.roles.insert(role.into());
        self
    }

    pub fn has_role(&self, role: &RoleId) -> bool {
        self.roles.contains(role)
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// System-wide role such as "restricted user" or "full user"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    #[serde(default)]
    pub label: String,
}

impl Role {
    pub fn new(id: impl Into<RoleId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_roles() {
        let account = UserAccount::new("alice", "Alice")
            .with_role("full-user")
            .with_role("admin");

        assert!(account.has_role(&RoleId::from("full-user")));
        assert!(account.has_role(&RoleId::from("admin")));
        assert!(!account.has_role(&RoleId::from("restricted-user")));
        assert_eq!(account.to_user(), User::new("alice", "Alice"));
    }
}
