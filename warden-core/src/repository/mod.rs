//! Persistence boundary of the engine.
//!
//! The engine only talks to storage through these traits. The in-memory
//! implementations in [`memory`] back the command line tool and the tests; a
//! database-backed implementation has to honour the same contract, in
//! particular the version check in [`AccessControlListRepository::update`].

pub mod memory;

use async_trait::async_trait;
use std::collections::BTreeSet;
use warden_types::{AclId, AssetId, UserGroupId, UserId};

use crate::acl::{AccessControlList, AccessControlListRef};
use crate::error::Result;
use crate::model::{UserAccount, UserGroup};

pub use memory::{InMemoryAclRepository, InMemoryUserGroupRepository, InMemoryUserRepository};

#[async_trait]
pub trait AccessControlListRepository: Send + Sync + std::fmt::Debug {
    async fn find(&self, id: &AclId) -> Result<Option<AccessControlList>>;

    async fn get_reference(&self, id: &AclId) -> Result<Option<AccessControlListRef>>;

    async fn find_by_subject(&self, subject: &AssetId) -> Result<Option<AccessControlList>>;

    /// Store a new ACL. Assigns identifiers to records lacking one and sets
    /// the initial version. Fails with `AlreadyExists` if the subject is
    /// already guarded by another ACL.
    async fn persist(&self, acl: &mut AccessControlList) -> Result<()>;

    /// Replace the stored ACL if its stored version still equals
    /// `acl.version()`, bumping the version. Fails with `Conflict` otherwise
    /// and with `NotFound` if the ACL vanished.
    async fn update(&self, acl: &mut AccessControlList) -> Result<()>;

    async fn remove(&self, acl: &AccessControlList) -> Result<()>;
}

#[async_trait]
pub trait UserRepository: Send + Sync + std::fmt::Debug {
    async fn find(&self, id: &UserId) -> Result<Option<UserAccount>>;

    async fn find_all(&self) -> Result<Vec<UserAccount>>;
}

#[async_trait]
pub trait UserGroupRepository: Send + Sync + std::fmt::Debug {
    async fn find(&self, id: &UserGroupId) -> Result<Option<UserGroup>>;

    async fn find_all(&self) -> Result<Vec<UserGroup>>;

    async fn persist(&self, group: &UserGroup) -> Result<()>;

    async fn update(&self, group: &UserGroup) -> Result<()>;

    async fn remove(&self, id: &UserGroupId) -> Result<()>;

    /// Identifiers of all groups `user` is a member of
    async fn groups_of(&self, user: &UserId) -> Result<BTreeSet<UserGroupId>>;
}
