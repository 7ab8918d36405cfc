pub mod acl;
pub mod authorization;
pub mod user_group;

pub use acl::AccessControlListService;
pub use authorization::{
    AccessControlListBasedAuthorizationService, AssetAuthorizationService,
    VocabularyAuthorizationService,
};
pub use user_group::UserGroupService;
