pub mod acl;
pub mod workspace;

pub use acl::AclSettings;
pub use workspace::WorkspaceSettings;
