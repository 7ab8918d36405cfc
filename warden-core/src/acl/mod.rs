//! Access control list model and the pure parts of the engine: access level
//! resolution and default record construction.

pub mod defaults;
pub mod list;
pub mod record;
pub mod resolution;

pub use defaults::{build_default_records, RoleDefault};
pub use list::{AccessControlList, AccessControlListRef};
pub use record::{AccessControlRecord, Holder};
pub use resolution::{effective_access_level, Principal};
