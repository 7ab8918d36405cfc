//! Entities the ACL engine refers to but does not own.

pub mod asset;
pub mod user;
pub mod user_group;

pub use asset::{Asset, Vocabulary};
pub use user::{Role, User, UserAccount};
pub use user_group::UserGroup;
