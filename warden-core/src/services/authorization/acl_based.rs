use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use warden_types::AccessLevel;

use super::AssetAuthorizationService;
use crate::acl::{effective_access_level, Principal};
use crate::error::Result;
use crate::model::{Asset, UserAccount};
use crate::repository::UserGroupRepository;
use crate::services::acl::AccessControlListService;

/// Decides by the asset's access control list alone.
///
/// An asset without an ACL resolves to `NONE` for everybody. Holding the
/// admin role grants nothing here; asset-specific services may add such
/// rules on top.
#[derive(Debug, Clone)]
pub struct AccessControlListBasedAuthorizationService {
    acl_service: Arc<AccessControlListService>,
    groups: Arc<dyn UserGroupRepository>,
}

impl AccessControlListBasedAuthorizationService {
    pub fn new(
        acl_service: Arc<AccessControlListService>,
        groups: Arc<dyn UserGroupRepository>,
    ) -> Self {
        Self {
            acl_service,
            groups,
        }
    }

    pub async fn principal_of(&self, user: &UserAccount) -> Result<Principal> {
        let groups = self.groups.groups_of(&user.id).await?;
        Ok(Principal::of(user, groups))
    }

    pub async fn effective_access_level<A: Asset + ?Sized>(
        &self,
        user: &UserAccount,
        asset: &A,
    ) -> Result<AccessLevel> {
        let Some(acl) = self.acl_service.find_for(asset).await? else {
            warn!(
                "Asset {} has no access control list, denying access",
                asset.asset_id()
            );
            return Ok(AccessLevel::None);
        };
        let principal = self.principal_of(user).await?;
        Ok(effective_access_level(&acl, &principal))
    }

    #[instrument(skip_all, fields(user = %user.id, asset = %asset.asset_id(), required = %required))]
    async fn has_at_least<A: Asset + ?Sized>(
        &self,
        user: &UserAccount,
        asset: &A,
        required: AccessLevel,
    ) -> Result<bool> {
        let level = self.effective_access_level(user, asset).await?;
        let granted = level.is_at_least(required);
        if granted {
            debug!("Granted: effective access level {}", level);
        } else {
            info!(
                "Denied: user {} has {} on {}, {} required",
                user.id,
                level,
                asset.asset_id(),
                required
            );
        }
        Ok(granted)
    }
}

#[async_trait]
impl<A: Asset + ?Sized + Sync> AssetAuthorizationService<A>
    for AccessControlListBasedAuthorizationService
{
    async fn can_read(&self, user: &UserAccount, asset: &A) -> Result<bool> {
        self.has_at_least(user, asset, AccessLevel::Read).await
    }

    async fn can_modify(&self, user: &UserAccount, asset: &A) -> Result<bool> {
        self.has_at_least(user, asset, AccessLevel::Write).await
    }

    async fn can_remove(&self, user: &UserAccount, asset: &A) -> Result<bool> {
        self.has_at_least(user, asset, AccessLevel::Security).await
    }
}
