use std::sync::Arc;
use tracing::{debug, info, instrument};
use warden_types::{AccessControlListDto, AclId};

use crate::acl::{
    build_default_records, AccessControlList, AccessControlListRef, AccessControlRecord,
};
use crate::error::{AclError, Result};
use crate::model::Asset;
use crate::providers::{ChangeHistory, CurrentUserProvider, RoleDirectory};
use crate::repository::AccessControlListRepository;
use crate::retry::{with_conflict_retry, RetryConfig};
use crate::settings::AclSettings;

/// Lifecycle of access control lists: lookup, default creation, record
/// administration and cloning.
///
/// Mutations never trust the ACL instance handed in by the caller. Only its
/// identifier is used; the authoritative copy is reloaded, changed and
/// written back with a version check, and the whole unit is re-run when a
/// concurrent writer got there first.
#[derive(Debug, Clone)]
pub struct AccessControlListService {
    repository: Arc<dyn AccessControlListRepository>,
    current_user: Arc<dyn CurrentUserProvider>,
    change_history: Arc<dyn ChangeHistory>,
    roles: Arc<dyn RoleDirectory>,
    settings: AclSettings,
    retry: RetryConfig,
}

impl AccessControlListService {
    pub fn new(
        repository: Arc<dyn AccessControlListRepository>,
        current_user: Arc<dyn CurrentUserProvider>,
        change_history: Arc<dyn ChangeHistory>,
        roles: Arc<dyn RoleDirectory>,
        settings: AclSettings,
    ) -> Self {
        let retry = settings.retry_config();
        Self {
            repository,
            current_user,
            change_history,
            roles,
            settings,
            retry,
        }
    }

    pub async fn find_required(&self, id: &AclId) -> Result<AccessControlList> {
        self.repository
            .find(id)
            .await?
            .ok_or_else(|| AclError::acl_not_found(id))
    }

    pub async fn get_required_reference(&self, id: &AclId) -> Result<AccessControlListRef> {
        self.repository
            .get_reference(id)
            .await?
            .ok_or_else(|| AclError::acl_not_found(id))
    }

    /// ACL guarding `asset`, if one was created. Never creates one.
    pub async fn find_for<A: Asset + ?Sized>(
        &self,
        asset: &A,
    ) -> Result<Option<AccessControlList>> {
        self.repository.find_by_subject(asset.asset_id()).await
    }

    pub async fn find_for_as_dto<A: Asset + ?Sized>(
        &self,
        asset: &A,
    ) -> Result<Option<AccessControlListDto>> {
        Ok(self.find_for(asset).await?.map(|acl| acl.to_dto()))
    }

    /// Create and persist the default ACL of `asset`.
    ///
    /// Works without a current user, so legacy assets can be bootstrapped
    /// from batch jobs.
    #[instrument(skip_all, fields(subject = %asset.asset_id()))]
    pub async fn create_for<A: Asset + ?Sized>(&self, asset: &A) -> Result<AccessControlList> {
        let subject = asset.asset_id();
        let current = self.current_user.current_user();
        let authors = self.change_history.authors_of(subject).await?;
        let roles = self.roles.all_roles().await?;
        let role_defaults = self.settings.role_defaults(&roles);

        let records =
            build_default_records(&authors, current.as_ref().map(|u| &u.id), &role_defaults);
        let mut acl = AccessControlList::with_records(subject.clone(), records);
        self.repository.persist(&mut acl).await?;

        info!(
            "Created access control list {} for '{}' with {} records",
            acl.id(),
            asset.label(),
            acl.len()
        );
        Ok(acl)
    }

    /// Existing ACL of `asset`, or a freshly created default one
    pub async fn ensure_for<A: Asset + ?Sized>(&self, asset: &A) -> Result<AccessControlList> {
        if let Some(acl) = self.find_for(asset).await? {
            return Ok(acl);
        }
        match self.create_for(asset).await {
            Err(AclError::AlreadyExists { subject }) => {
                debug!("Access control list for {} was created concurrently", subject);
                self.find_for(asset)
                    .await?
                    .ok_or_else(|| AclError::not_found("Access control list for asset", subject))
            }
            result => result,
        }
    }

    /// Add `record` to the stored version of `acl`.
    ///
    /// A holder that already has a record keeps it; the call then leaves
    /// the ACL untouched.
    #[instrument(skip_all, fields(acl = %acl.id(), holder = %record.holder()))]
    pub async fn add_record(
        &self,
        acl: &AccessControlList,
        record: AccessControlRecord,
    ) -> Result<AccessControlList> {
        let id = acl.id();
        let record = &record.detached();
        with_conflict_retry("add_record", &self.retry, move || async move {
            let mut target = self.find_required(&id).await?;
            if !target.add_record(record.clone()) {
                debug!("Holder {} already has a record, nothing to add", record.holder());
                return Ok(target);
            }
            self.repository.update(&mut target).await?;
            info!(
                "Added {} access for {} to access control list {}",
                record.access_level(),
                record.holder(),
                id
            );
            Ok(target)
        })
        .await
    }

    /// Remove the record matching `record` (by identifier, or by holder for
    /// records without one). Role records carry the configured defaults and
    /// cannot be removed, only changed. The stored record decides, so its
    /// holder must match `record`'s.
    #[instrument(skip_all, fields(acl = %acl.id(), holder = %record.holder()))]
    pub async fn remove_record(
        &self,
        acl: &AccessControlList,
        record: &AccessControlRecord,
    ) -> Result<AccessControlList> {
        if record.is_role_record() {
            return Err(AclError::UnsupportedOperation(format!(
                "Role record {} cannot be removed from an access control list",
                record.holder()
            )));
        }

        let id = acl.id();
        with_conflict_retry("remove_record", &self.retry, move || async move {
            let mut target = self.find_required(&id).await?;
            let stored = match record.id() {
                Some(record_id) => target.record(&record_id),
                None => target.record_for(record.holder()),
            };
            let Some(stored) = stored.cloned() else {
                debug!(
                    "No record for {} in access control list {}",
                    record.holder(),
                    id
                );
                return Ok(target);
            };
            if stored.is_role_record() {
                return Err(AclError::UnsupportedOperation(format!(
                    "Role record {} cannot be removed from an access control list",
                    stored.holder()
                )));
            }
            if stored.holder() != record.holder() {
                return Err(AclError::InvalidRecord(format!(
                    "Record belongs to {}, not {}",
                    stored.holder(),
                    record.holder()
                )));
            }
            target.remove_record(&stored);
            self.repository.update(&mut target).await?;
            info!(
                "Removed record of {} from access control list {}",
                record.holder(),
                id
            );
            Ok(target)
        })
        .await
    }

    /// Change the access level of the stored record with `record`'s
    /// identifier. The holder must match the stored one.
    #[instrument(skip_all, fields(acl = %acl.id(), holder = %record.holder()))]
    pub async fn update_record_access_level(
        &self,
        acl: &AccessControlList,
        record: &AccessControlRecord,
    ) -> Result<AccessControlList> {
        let record_id = record.id().ok_or_else(|| {
            AclError::InvalidRecord(format!(
                "Record of {} has no identifier and cannot be updated",
                record.holder()
            ))
        })?;

        let id = acl.id();
        let record_id = &record_id;
        with_conflict_retry(
            "update_record_access_level",
            &self.retry,
            move || async move {
                let mut target = self.find_required(&id).await?;
                let existing = target
                    .record(record_id)
                    .ok_or_else(|| AclError::not_found("Access control record", record_id))?;
                if existing.holder() != record.holder() {
                    return Err(AclError::InvalidRecord(format!(
                        "Record {} belongs to {}, not {}",
                        record_id,
                        existing.holder(),
                        record.holder()
                    )));
                }
                if existing.access_level() == record.access_level() {
                    return Ok(target);
                }
                target.update_access_level(record_id, record.access_level());
                self.repository.update(&mut target).await?;
                info!(
                    "Set access of {} to {} in access control list {}",
                    record.holder(),
                    record.access_level(),
                    id
                );
                Ok(target)
            },
        )
        .await
    }

    /// Persist a copy of `original`'s grants as the ACL of `subject`
    #[instrument(skip_all, fields(original = %original.id(), subject = %subject.asset_id()))]
    pub async fn clone_for<A: Asset + ?Sized>(
        &self,
        original: &AccessControlList,
        subject: &A,
    ) -> Result<AccessControlList> {
        let source = self.find_required(&original.id()).await?;
        let mut copy = source.duplicate_for(subject.asset_id().clone());
        self.repository.persist(&mut copy).await?;

        info!(
            "Cloned access control list {} into {} for '{}'",
            source.id(),
            copy.id(),
            subject.label()
        );
        Ok(copy)
    }

    /// Drop the ACL of `asset` together with the asset. Returns `false` if
    /// there was none.
    #[instrument(skip_all, fields(subject = %asset.asset_id()))]
    pub async fn delete_for<A: Asset + ?Sized>(&self, asset: &A) -> Result<bool> {
        match self.find_for(asset).await? {
            Some(acl) => {
                self.repository.remove(&acl).await?;
                info!("Removed access control list {}", acl.id());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
