pub mod acl;
pub mod error;
pub mod model;
pub mod providers;
pub mod repository;
pub mod retry;
pub mod services;
pub mod settings;

pub use error::{AclError, ErrorKind, Result};
