//! Access decisions.
//!
//! Denial is a `false` answer, never an error. Errors only surface when a
//! collaborator (storage, group directory) fails.

mod acl_based;
mod vocabulary;


pub use acl_based::AccessControlListBasedAuthorizationService;
pub use vocabulary::VocabularyAuthorizationService;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Asset, UserAccount};

/// Authorization of one kind of asset
#[async_trait]
pub trait AssetAuthorizationService<A: Asset + ?Sized + Sync>: Send + Sync {
    async fn can_read(&self, user: &UserAccount, asset: &A) -> Result<bool>;

    async fn can_modify(&self, user: &UserAccount, asset: &A) -> Result<bool>;

    async fn can_remove(&self, user: &UserAccount, asset: &A) -> Result<bool>;

    /// Reading nothing is always allowed
    async fn can_read_optional(&self, user: &UserAccount, asset: Option<&A>) -> Result<bool> {
        match asset {
            Some(asset) => self.can_read(user, asset).await,
            None => Ok(true),
        }
    }
}
