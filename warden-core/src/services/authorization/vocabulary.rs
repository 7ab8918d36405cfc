use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use super::{AccessControlListBasedAuthorizationService, AssetAuthorizationService};
use crate::error::Result;
use crate::model::{Asset, UserAccount, Vocabulary};
use crate::providers::EditableAssets;
use crate::settings::AclSettings;

/// Vocabulary rules layered on the ACL decision.
///
/// Creating a vocabulary happens before any ACL exists and only requires the
/// editor (or admin) role. Changing or removing one additionally requires
/// that role and that the workspace lets the vocabulary be edited.
#[derive(Debug, Clone)]
pub struct VocabularyAuthorizationService {
    acl_authorization: Arc<AccessControlListBasedAuthorizationService>,
    editable: Arc<dyn EditableAssets>,
    settings: AclSettings,
}

impl VocabularyAuthorizationService {
    pub fn new(
        acl_authorization: Arc<AccessControlListBasedAuthorizationService>,
        editable: Arc<dyn EditableAssets>,
        settings: AclSettings,
    ) -> Self {
        Self {
            acl_authorization,
            editable,
            settings,
        }
    }

    pub fn can_create(&self, user: &UserAccount) -> bool {
        let allowed = self.settings.is_at_least_editor(&user.roles);
        if !allowed {
            info!("Denied: user {} may not create vocabularies", user.id);
        }
        allowed
    }

    fn may_edit(&self, user: &UserAccount, vocabulary: &Vocabulary) -> bool {
        if !self.settings.is_at_least_editor(&user.roles) {
            info!("Denied: user {} lacks an editing role", user.id);
            return false;
        }
        if !self.editable.is_editable(vocabulary.asset_id()) {
            info!(
                "Denied: vocabulary {} is not editable in this workspace",
                vocabulary.id
            );
            return false;
        }
        true
    }
}

#[async_trait]
impl AssetAuthorizationService<Vocabulary> for VocabularyAuthorizationService {
    async fn can_read(&self, user: &UserAccount, vocabulary: &Vocabulary) -> Result<bool> {
        self.acl_authorization.can_read(user, vocabulary).await
    }

    async fn can_modify(&self, user: &UserAccount, vocabulary: &Vocabulary) -> Result<bool> {
        if !self.may_edit(user, vocabulary) {
            return Ok(false);
        }
        self.acl_authorization.can_modify(user, vocabulary).await
    }

    async fn can_remove(&self, user: &UserAccount, vocabulary: &Vocabulary) -> Result<bool> {
        if !self.may_edit(user, vocabulary) {
            return Ok(false);
        }
        self.acl_authorization.can_remove(user, vocabulary).await
    }
}
