use std::collections::BTreeMap;
use warden_types::{AccessControlListDto, AccessLevel, AclId, AssetId, RecordId};

use super::record::{AccessControlRecord, Holder};

/// Access control list guarding exactly one asset.
///
/// Records are keyed by holder, so the list holds at most one grant per
/// holder. `version` is owned by the repository and bumped on every
/// successful update; it is what makes stale writes detectable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessControlList {
    id: AclId,
    subject: AssetId,
    version: u64,
    records: BTreeMap<Holder, AccessControlRecord>,
}

/// Lightweight, existence-checked handle to a stored ACL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessControlListRef {
    pub id: AclId,
    pub subject: AssetId,
}

impl AccessControlList {
    pub fn new(subject: AssetId) -> Self {
        Self {
            id: AclId::new(),
            subject,
            version: 0,
            records: BTreeMap::new(),
        }
    }

    /// Build a list from records; later records for an already present holder are dropped
    pub fn with_records(
        subject: AssetId,
        records: impl IntoIterator<Item = AccessControlRecord>,
    ) -> Self {
        let mut acl = Self::new(subject);
        for record in records {
            acl.add_record(record);
        }
        acl
    }

    pub fn id(&self) -> AclId {
        self.id
    }

    pub fn subject(&self) -> &AssetId {
        &self.subject
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    pub fn records(&self) -> impl Iterator<Item = &AccessControlRecord> {
        self.records.values()
    }

    pub(crate) fn records_mut(&mut self) -> impl Iterator<Item = &mut AccessControlRecord> {
        self.records.values_mut()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, id: &RecordId) -> Option<&AccessControlRecord> {
        self.records.values().find(|r| r.id().as_ref() == Some(id))
    }

    pub fn record_for(&self, holder: &Holder) -> Option<&AccessControlRecord> {
        self.records.get(holder)
    }

    /// Set-like insert. Returns `false` and leaves the list untouched if the
    /// holder already has a record.
    pub fn add_record(&mut self, record: AccessControlRecord) -> bool {
        if self.records.contains_key(record.holder()) {
            return false;
        }
        self.records.insert(record.holder().clone(), record);
        true
    }

    /// Remove the record matching `record`'s identity: its identifier when it
    /// has one, otherwise its holder.
    pub fn remove_record(&mut self, record: &AccessControlRecord) -> Option<AccessControlRecord> {
        let holder = match record.id() {
            Some(id) => self.record(&id)?.holder().clone(),
            None => record.holder().clone(),
        };
        self.records.remove(&holder)
    }

    /// Change the access level of the record with identifier `id`
    pub fn update_access_level(&mut self, id: &RecordId, access_level: AccessLevel) -> bool {
        match self
            .records
            .values_mut()
            .find(|r| r.id().as_ref() == Some(id))
        {
            Some(record) => {
                record.set_access_level(access_level);
                true
            }
            None => false,
        }
    }

    /// Deep copy of the records under a fresh identifier, guarding `subject`.
    /// Copied records have no identifiers until persisted.
    pub fn duplicate_for(&self, subject: AssetId) -> Self {
        Self::with_records(subject, self.records().map(AccessControlRecord::detached))
    }

    pub fn reference(&self) -> AccessControlListRef {
        AccessControlListRef {
            id: self.id,
            subject: self.subject.clone(),
        }
    }

    pub fn to_dto(&self) -> AccessControlListDto {
        AccessControlListDto {
            id: self.id,
            subject: self.subject.clone(),
            records: self.records().map(AccessControlRecord::to_dto).collect(),
        }
    }
}
