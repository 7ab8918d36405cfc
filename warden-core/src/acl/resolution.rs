use std::collections::BTreeSet;
use warden_types::{AccessLevel, RoleId, UserGroupId, UserId};

use super::list::AccessControlList;
use crate::model::UserAccount;

/// Everything about the acting user that access resolution looks at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user: UserId,
    pub groups: BTreeSet<UserGroupId>,
    pub roles: BTreeSet<RoleId>,
}

impl Principal {
    pub fn new(user: impl Into<UserId>) -> Self {
        Self {
            user: user.into(),
            groups: BTreeSet::new(),
            roles: BTreeSet::new(),
        }
    }

    pub fn of(account: &UserAccount, groups: BTreeSet<UserGroupId>) -> Self {
        Self {
            user: account.id.clone(),
            groups,
            roles: account.roles.clone(),
        }
    }

    pub fn with_group(mut self, group: impl Into<UserGroupId>) -> Self {
        self.groups.insert(group.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<RoleId>) -> Self {
        self.roles.insert(role.into());
        self
    }
}

/// Maximum access level over all records applying to `principal`.
///
/// Holder kinds have no precedence over each other: a direct user grant, a
/// group grant and a role grant all compete on level alone. `NONE` when no
/// record applies.
pub fn effective_access_level(acl: &AccessControlList, principal: &Principal) -> AccessLevel {
    acl.records()
        .filter(|record| record.applies_to(principal))
        .map(|record| record.access_level())
        .max()
        .unwrap_or(AccessLevel::None)
}
