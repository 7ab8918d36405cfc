use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use warden_core::model::{Role, UserGroup};
use warden_core::providers::{
    InMemoryChangeHistory, StaticCurrentUser, StaticRoleDirectory, WorkspaceEditableAssets,
};
use warden_core::repository::{
    InMemoryAclRepository, InMemoryUserGroupRepository, InMemoryUserRepository,
    UserGroupRepository,
};
use warden_core::services::{
    AccessControlListBasedAuthorizationService, AccessControlListService, UserGroupService,
    VocabularyAuthorizationService,
};
use warden_core::settings::WorkspaceSettings;
use warden_types::UserId;

use crate::fixture::Fixture;
use crate::settings::config::Settings;

#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Settings,
    pub acls: InMemoryAclRepository,
    pub users: InMemoryUserRepository,
    pub groups: InMemoryUserGroupRepository,
    pub history: InMemoryChangeHistory,
    pub acl_service: Arc<AccessControlListService>,
    pub group_service: Arc<UserGroupService>,
    pub acl_authorization: Arc<AccessControlListBasedAuthorizationService>,
    pub vocabulary_authorization: Arc<VocabularyAuthorizationService>,
}

pub type SharedAppState = Arc<AppState>;

impl AppState {
    pub fn new(
        settings: Settings,
        roles: Vec<Role>,
        current_user: StaticCurrentUser,
        workspace: WorkspaceSettings,
    ) -> SharedAppState {
        let acls = InMemoryAclRepository::new();
        let users = InMemoryUserRepository::new();
        let groups = InMemoryUserGroupRepository::new();
        let history = InMemoryChangeHistory::new();

        let acl_service = Arc::new(AccessControlListService::new(
            Arc::new(acls.clone()),
            Arc::new(current_user),
            Arc::new(history.clone()),
            Arc::new(StaticRoleDirectory::new(roles)),
            settings.acl.clone(),
        ));
        let group_service = Arc::new(UserGroupService::new(
            Arc::new(groups.clone()),
            Arc::new(users.clone()),
        ));
        let acl_authorization = Arc::new(AccessControlListBasedAuthorizationService::new(
            acl_service.clone(),
            Arc::new(groups.clone()),
        ));
        let vocabulary_authorization = Arc::new(VocabularyAuthorizationService::new(
            acl_authorization.clone(),
            Arc::new(WorkspaceEditableAssets::new(workspace)),
            settings.acl.clone(),
        ));

        Arc::new(AppState {
            settings,
            acls,
            users,
            groups,
            history,
            acl_service,
            group_service,
            acl_authorization,
            vocabulary_authorization,
        })
    }

    /// State populated with the users, groups and change history of
    /// `fixture`, optionally acting as one of its users.
    pub async fn from_fixture(
        settings: Settings,
        fixture: &Fixture,
        acting_as: Option<&UserId>,
    ) -> Result<SharedAppState> {
        let current_user = match acting_as {
            Some(id) => {
                let account = fixture
                    .user(id)
                    .with_context(|| format!("Unknown user {id}"))?;
                StaticCurrentUser::of(account.to_user())
            }
            None => StaticCurrentUser::none(),
        };
        let workspace = match &fixture.workspace {
            Some(editable) => WorkspaceSettings::restricted_to(editable.iter().cloned()),
            None => settings.workspace.clone(),
        };

        let state = Self::new(settings, fixture.roles.clone(), current_user, workspace);

        for account in &fixture.users {
            state.users.add_user(account.clone()).await;
        }
        for group in &fixture.groups {
            let stored = UserGroup::with_id(group.id.clone(), &group.label);
            state.groups.persist(&stored).await?;
            state
                .group_service
                .add_users(&group.id, &group.members)
                .await
                .with_context(|| format!("Failed to populate group {}", group.id))?;
        }
        for asset in &fixture.assets {
            for author in &asset.authors {
                state
                    .history
                    .record_persist(asset.id.clone(), author.clone())
                    .await;
            }
            for editor in &asset.editors {
                state
                    .history
                    .record_update(asset.id.clone(), editor.clone())
                    .await;
            }
        }

        info!(
            "Loaded fixture with {} users, {} groups and {} assets",
            fixture.users.len(),
            fixture.groups.len(),
            fixture.assets.len()
        );
        Ok(state)
    }
}
