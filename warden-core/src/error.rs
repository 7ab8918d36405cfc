//! Error taxonomy of the ACL engine.
//!
//! Access denial is never an error: authorization checks answer `false`.
//! Errors are reserved for structural problems such as a missing ACL that was
//! required, an illegal record removal or a write-write conflict detected by
//! the store. [`AclError::status_code`] keeps administrative failures (404,
//! 405, 409) apart from authorization failures (403) for API layers built on
//! top of the engine.

use warden_types::{AclId, AssetId};

pub type Result<T> = std::result::Result<T, AclError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AclError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Access control list {acl} was modified concurrently (expected version {expected}, found {actual})")]
    Conflict {
        acl: AclId,
        expected: u64,
        actual: u64,
    },

    #[error("Asset {subject} is already guarded by an access control list")]
    AlreadyExists { subject: AssetId },

    #[error("Invalid access control record: {0}")]
    InvalidRecord(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Coarse classification used by callers to pick a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Unsupported,
    Conflict,
    Invalid,
    Internal,
}

impl AclError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        AclError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn acl_not_found(id: &AclId) -> Self {
        Self::not_found("Access control list", id)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AclError::NotFound { .. } => ErrorKind::NotFound,
            AclError::UnsupportedOperation(_) => ErrorKind::Unsupported,
            AclError::Conflict { .. } | AclError::AlreadyExists { .. } => ErrorKind::Conflict,
            AclError::InvalidRecord(_) => ErrorKind::Invalid,
            AclError::Storage(_) => ErrorKind::Internal,
        }
    }

    /// HTTP status an API layer should answer with
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::NotFound => 404,
            ErrorKind::Unsupported => 405,
            ErrorKind::Conflict => 409,
            ErrorKind::Invalid => 400,
            ErrorKind::Internal => 500,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AclError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, AclError::Conflict { .. })
    }
}
