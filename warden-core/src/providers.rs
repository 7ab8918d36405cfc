//! Collaborators the engine consumes but does not own: the acting user,
//! the change history of assets, the role directory and workspace
//! editability.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use warden_types::{AssetId, UserId};

use crate::error::Result;
use crate::model::{Role, User};
use crate::settings::WorkspaceSettings;

/// Identity of the caller, absent in batch and bootstrapping contexts
pub trait CurrentUserProvider: Send + Sync + std::fmt::Debug {
    fn current_user(&self) -> Option<User>;
}

#[derive(Debug, Clone, Default)]
pub struct StaticCurrentUser {
    user: Option<User>,
}

impl StaticCurrentUser {
    pub fn none() -> Self {
        Self { user: None }
    }

    pub fn of(user: User) -> Self {
        Self { user: Some(user) }
    }
}

impl CurrentUserProvider for StaticCurrentUser {
    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }
}

#[async_trait]
pub trait ChangeHistory: Send + Sync + std::fmt::Debug {
    /// Distinct users who created `subject`
    async fn authors_of(&self, subject: &AssetId) -> Result<BTreeSet<UserId>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Persist,
    Update,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub subject: AssetId,
    pub author: UserId,
    pub kind: ChangeKind,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryChangeHistory {
    records: Arc<RwLock<HashMap<AssetId, Vec<ChangeRecord>>>>,
}

impl InMemoryChangeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, subject: AssetId, author: UserId, kind: ChangeKind) {
        let record = ChangeRecord {
            subject: subject.clone(),
            author,
            kind,
            timestamp: Utc::now(),
        };
        self.records
            .write()
            .await
            .entry(subject)
            .or_default()
            .push(record);
    }

    pub async fn record_persist(&self, subject: AssetId, author: UserId) {
        self.record(subject, author, ChangeKind::Persist).await;
    }

    pub async fn record_update(&self, subject: AssetId, author: UserId) {
        self.record(subject, author, ChangeKind::Update).await;
    }

    /// All changes of `subject`, oldest first
    pub async fn changes_of(&self, subject: &AssetId) -> Vec<ChangeRecord> {
        let mut changes = self
            .records
            .read()
            .await
            .get(subject)
            .cloned()
            .unwrap_or_default();
        changes.sort_by_key(|c| c.timestamp);
        changes
    }
}

#[async_trait]
impl ChangeHistory for InMemoryChangeHistory {
    async fn authors_of(&self, subject: &AssetId) -> Result<BTreeSet<UserId>> {
        Ok(self
            .records
            .read()
            .await
            .get(subject)
            .map(|changes| {
                changes
                    .iter()
                    .filter(|c| c.kind == ChangeKind::Persist)
                    .map(|c| c.author.clone())
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
pub trait RoleDirectory: Send + Sync + std::fmt::Debug {
    async fn all_roles(&self) -> Result<Vec<Role>>;
}

#[derive(Debug, Clone, Default)]
pub struct StaticRoleDirectory {
    roles: Vec<Role>,
}

impl StaticRoleDirectory {
    pub fn new(roles: Vec<Role>) -> Self {
        Self { roles }
    }
}

#[async_trait]
impl RoleDirectory for StaticRoleDirectory {
    async fn all_roles(&self) -> Result<Vec<Role>> {
        Ok(self.roles.clone())
    }
}

pub trait EditableAssets: Send + Sync + std::fmt::Debug {
    fn is_editable(&self, asset: &AssetId) -> bool;
}

#[derive(Debug, Clone)]
pub struct WorkspaceEditableAssets {
    settings: WorkspaceSettings,
}

impl WorkspaceEditableAssets {
    pub fn new(settings: WorkspaceSettings) -> Self {
        Self { settings }
    }
}

impl EditableAssets for WorkspaceEditableAssets {
    fn is_editable(&self, asset: &AssetId) -> bool {
        self.settings.all_assets_editable || self.settings.editable_assets.contains(asset)
    }
}
