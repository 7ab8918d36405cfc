use std::fmt;
use warden_types::{
    AccessControlRecordDto, AccessLevel, HolderDto, HolderKind, RecordId, RoleId, UserGroupId,
    UserId,
};

use super::resolution::Principal;

/// The entity a record grants access to.
///
/// Holders are references to existing users, groups and roles, never copies
/// of them. A holder is unique within one ACL.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Holder {
    User(UserId),
    UserGroup(UserGroupId),
    Role(RoleId),
}

impl Holder {
    pub fn kind(&self) -> HolderKind {
        match self {
            Holder::User(_) => HolderKind::User,
            Holder::UserGroup(_) => HolderKind::UserGroup,
            Holder::Role(_) => HolderKind::Role,
        }
    }

    pub fn id_str(&self) -> &str {
        match self {
            Holder::User(id) => id.as_str(),
            Holder::UserGroup(id) => id.as_str(),
            Holder::Role(id) => id.as_str(),
        }
    }

    pub fn from_parts(kind: HolderKind, id: impl Into<String>) -> Self {
        let id = id.into();
        match kind {
            HolderKind::User => Holder::User(UserId::from(id)),
            HolderKind::UserGroup => Holder::UserGroup(UserGroupId::from(id)),
            HolderKind::Role => Holder::Role(RoleId::from(id)),
        }
    }

    /// Whether a grant to this holder applies to the acting principal
    pub fn matches(&self, principal: &Principal) -> bool {
        match self {
            Holder::User(user) => *user == principal.user,
            Holder::UserGroup(group) => principal.groups.contains(group),
            Holder::Role(role) => principal.roles.contains(role),
        }
    }
}

impl fmt::Display for Holder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id_str())
    }
}

/// Grants one access level to one holder.
///
/// Only the access level may change after creation. Reassigning the holder
/// requires removing the record and adding a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessControlRecord {
    id: Option<RecordId>,
    holder: Holder,
    access_level: AccessLevel,
}

impl AccessControlRecord {
    pub fn new(holder: Holder, access_level: AccessLevel) -> Self {
        Self {
            id: None,
            holder,
            access_level,
        }
    }

    pub fn for_user(user: impl Into<UserId>, access_level: AccessLevel) -> Self {
        Self::new(Holder::User(user.into()), access_level)
    }

    pub fn for_group(group: impl Into<UserGroupId>, access_level: AccessLevel) -> Self {
        Self::new(Holder::UserGroup(group.into()), access_level)
    }

    pub fn for_role(role: impl Into<RoleId>, access_level: AccessLevel) -> Self {
        Self::new(Holder::Role(role.into()), access_level)
    }

    /// Rebuild a record that already has an identifier, e.g. from an update request
    pub fn with_id(id: RecordId, holder: Holder, access_level: AccessLevel) -> Self {
        Self {
            id: Some(id),
            holder,
            access_level,
        }
    }

    pub fn id(&self) -> Option<RecordId> {
        self.id
    }

    pub fn holder(&self) -> &Holder {
        &self.holder
    }

    pub fn access_level(&self) -> AccessLevel {
        self.access_level
    }

    pub fn set_access_level(&mut self, access_level: AccessLevel) {
        self.access_level = access_level;
    }

    pub fn is_role_record(&self) -> bool {
        matches!(self.holder, Holder::Role(_))
    }

    pub fn applies_to(&self, principal: &Principal) -> bool {
        self.holder.matches(principal)
    }

    /// Same holder and access level, regardless of identity
    pub fn same_grant(&self, other: &AccessControlRecord) -> bool {
        self.holder == other.holder && self.access_level == other.access_level
    }

    /// Set once, when the record is first persisted
    pub(crate) fn assign_id_if_missing(&mut self) {
        if self.id.is_none() {
            self.id = Some(RecordId::new());
        }
    }

    /// Copy of this grant without identity, used when cloning ACLs
    pub(crate) fn detached(&self) -> Self {
        Self::new(self.holder.clone(), self.access_level)
    }

    pub fn to_dto(&self) -> AccessControlRecordDto {
        AccessControlRecordDto {
            id: self.id,
            holder: HolderDto {
                kind: self.holder.kind(),
                id: self.holder.id_str().to_string(),
            },
            access_level: self.access_level,
        }
    }
}
