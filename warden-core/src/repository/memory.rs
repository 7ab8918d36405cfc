use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use warden_types::{AclId, AssetId, UserGroupId, UserId};

use super::{AccessControlListRepository, UserGroupRepository, UserRepository};
use crate::acl::{AccessControlList, AccessControlListRef};
use crate::error::{AclError, Result};
use crate::model::{UserAccount, UserGroup};

#[derive(Debug, Default)]
struct AclStore {
    acls: HashMap<AclId, AccessControlList>,
    by_subject: HashMap<AssetId, AclId>,
    writes: usize,
}

/// ACL repository keeping everything behind a single async lock.
///
/// Each call holds the write lock for the whole check-and-write, which gives
/// the atomic compare-and-swap the services rely on.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAclRepository {
    store: Arc<RwLock<AclStore>>,
}

impl InMemoryAclRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful persist/update/remove calls
    pub async fn write_count(&self) -> usize {
        self.store.read().await.writes
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.acls.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.acls.is_empty()
    }
}

#[async_trait]
impl AccessControlListRepository for InMemoryAclRepository {
    async fn find(&self, id: &AclId) -> Result<Option<AccessControlList>> {
        Ok(self.store.read().await.acls.get(id).cloned())
    }

    async fn get_reference(&self, id: &AclId) -> Result<Option<AccessControlListRef>> {
        Ok(self
            .store
            .read()
            .await
            .acls
            .get(id)
            .map(AccessControlList::reference))
    }

    async fn find_by_subject(&self, subject: &AssetId) -> Result<Option<AccessControlList>> {
        let store = self.store.read().await;
        Ok(store
            .by_subject
            .get(subject)
            .and_then(|id| store.acls.get(id))
            .cloned())
    }

    #[instrument(skip_all, fields(acl = %acl.id(), subject = %acl.subject()))]
    async fn persist(&self, acl: &mut AccessControlList) -> Result<()> {
        let mut store = self.store.write().await;

        if store.by_subject.contains_key(acl.subject()) {
            return Err(AclError::AlreadyExists {
                subject: acl.subject().clone(),
            });
        }
        if store.acls.contains_key(&acl.id()) {
            return Err(AclError::Storage(format!(
                "Access control list {} is already stored",
                acl.id()
            )));
        }

        acl.records_mut().for_each(|r| r.assign_id_if_missing());
        acl.set_version(1);

        store.by_subject.insert(acl.subject().clone(), acl.id());
        store.acls.insert(acl.id(), acl.clone());
        store.writes += 1;
        debug!("Persisted access control list with {} records", acl.len());
        Ok(())
    }

    #[instrument(skip_all, fields(acl = %acl.id(), version = acl.version()))]
    async fn update(&self, acl: &mut AccessControlList) -> Result<()> {
        let mut store = self.store.write().await;

        let stored_version = store
            .acls
            .get(&acl.id())
            .map(AccessControlList::version)
            .ok_or_else(|| AclError::acl_not_found(&acl.id()))?;

        if stored_version != acl.version() {
            return Err(AclError::Conflict {
                acl: acl.id(),
                expected: acl.version(),
                actual: stored_version,
            });
        }

        acl.records_mut().for_each(|r| r.assign_id_if_missing());
        acl.set_version(stored_version + 1);

        store.acls.insert(acl.id(), acl.clone());
        store.writes += 1;
        debug!("Updated access control list to version {}", acl.version());
        Ok(())
    }

    #[instrument(skip_all, fields(acl = %acl.id()))]
    async fn remove(&self, acl: &AccessControlList) -> Result<()> {
        let mut store = self.store.write().await;

        let removed = store
            .acls
            .remove(&acl.id())
            .ok_or_else(|| AclError::acl_not_found(&acl.id()))?;
        store.by_subject.remove(removed.subject());
        store.writes += 1;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, UserAccount>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, account: UserAccount) {
        self.users.write().await.insert(account.id.clone(), account);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find(&self, id: &UserId) -> Result<Option<UserAccount>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<UserAccount>> {
        let mut users: Vec<UserAccount> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(users)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryUserGroupRepository {
    groups: Arc<RwLock<HashMap<UserGroupId, UserGroup>>>,
}

impl InMemoryUserGroupRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserGroupRepository for InMemoryUserGroupRepository {
    async fn find(&self, id: &UserGroupId) -> Result<Option<UserGroup>> {
        Ok(self.groups.read().await.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<UserGroup>> {
        let mut groups: Vec<UserGroup> = self.groups.read().await.values().cloned().collect();
        groups.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(groups)
    }

    async fn persist(&self, group: &UserGroup) -> Result<()> {
        let mut groups = self.groups.write().await;
        if groups.contains_key(&group.id) {
            return Err(AclError::Storage(format!(
                "User group {} already exists",
                group.id
            )));
        }
        groups.insert(group.id.clone(), group.clone());
        Ok(())
    }

    async fn update(&self, group: &UserGroup) -> Result<()> {
        let mut groups = self.groups.write().await;
        match groups.get_mut(&group.id) {
            Some(stored) => {
                *stored = group.clone();
                Ok(())
            }
            None => Err(AclError::not_found("User group", &group.id)),
        }
    }

    async fn remove(&self, id: &UserGroupId) -> Result<()> {
        self.groups
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AclError::not_found("User group", id))
    }

    async fn groups_of(&self, user: &UserId) -> Result<BTreeSet<UserGroupId>> {
        Ok(self
            .groups
            .read()
            .await
            .values()
            .filter(|group| group.has_member(user))
            .map(|group| group.id.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acl::AccessControlRecord;
    use warden_types::AccessLevel;

    fn new_acl(subject: &str) -> AccessControlList {
        AccessControlList::with_records(
            AssetId::from(subject),
            vec![AccessControlRecord::for_user("alice", AccessLevel::Security)],
        )
    }

    #[tokio::test]
    async fn test_persist_assigns_record_ids_and_indexes_subject() {
        let repository = InMemoryAclRepository::new();
        let mut acl = new_acl("voc");

        repository.persist(&mut acl).await.unwrap();

        assert_eq!(acl.version(), 1);
        assert!(acl.records().all(|r| r.id().is_some()));
        let found = repository
            .find_by_subject(&AssetId::from("voc"))
            .await
            .unwrap();
        assert_eq!(found, Some(acl.clone()));
        let reference = repository.get_reference(&acl.id()).await.unwrap();
        assert_eq!(reference, Some(acl.reference()));
    }

    #[tokio::test]
    async fn test_one_acl_per_subject() {
        let repository = InMemoryAclRepository::new();
        repository.persist(&mut new_acl("voc")).await.unwrap();

        let err = repository.persist(&mut new_acl("voc")).await.unwrap_err();
        assert_eq!(
            err,
            AclError::AlreadyExists {
                subject: AssetId::from("voc")
            }
        );
        assert_eq!(repository.write_count().await, 1);
    }

    #[tokio::test]
    async fn test_stale_update_is_rejected() {
        let repository = InMemoryAclRepository::new();
        let mut acl = new_acl("voc");
        repository.persist(&mut acl).await.unwrap();

        let mut first = repository.find(&acl.id()).await.unwrap().unwrap();
        let mut second = repository.find(&acl.id()).await.unwrap().unwrap();

        first.add_record(AccessControlRecord::for_user("bob", AccessLevel::Read));
        repository.update(&mut first).await.unwrap();
        assert_eq!(first.version(), 2);

        second.add_record(AccessControlRecord::for_user("carol", AccessLevel::Read));
        let err = repository.update(&mut second).await.unwrap_err();
        assert!(err.is_conflict());

        let stored = repository.find(&acl.id()).await.unwrap().unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[tokio::test]
    async fn test_update_of_vanished_acl_is_not_found() {
        let repository = InMemoryAclRepository::new();
        let mut acl = new_acl("voc");
        repository.persist(&mut acl).await.unwrap();
        repository.remove(&acl).await.unwrap();

        let err = repository.update(&mut acl).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(repository
            .find_by_subject(&AssetId::from("voc"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_groups_of_user() {
        let repository = InMemoryUserGroupRepository::new();
        let mut editors = UserGroup::with_id("editors", "Editors");
        editors.add_member(UserId::from("alice"));
        let readers = UserGroup::with_id("readers", "Readers");
        repository.persist(&editors).await.unwrap();
        repository.persist(&readers).await.unwrap();

        let groups = repository.groups_of(&UserId::from("alice")).await.unwrap();
        assert_eq!(groups.len(), 1);
        assert!(groups.contains(&UserGroupId::from("editors")));
        assert!(repository
            .groups_of(&UserId::from("bob"))
            .await
            .unwrap()
            .is_empty());
    }
}
