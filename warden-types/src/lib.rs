/*!
 * Types shared between the warden engine and its consumers
 *
 * This crate only holds the access level scale, identifier newtypes and the
 * read-optimised ACL shapes handed out to API layers and the front end. It
 * intentionally carries none of the engine's dependencies.
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

pub use serde;
pub use ts_rs;
pub use uuid;

/// Ordered permission tier granted by an access control record.
///
/// Variants are declared in ascending order so the derived `Ord` matches the
/// ordinal scale `NONE < READ < WRITE < SECURITY`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
#[ts(export, rename_all = "lowercase")]
pub enum AccessLevel {
    #[default]
    #[serde(alias = "NONE")]
    None,
    #[serde(alias = "READ")]
    Read,
    #[serde(alias = "WRITE")]
    Write,
    /// Administrative control, including removal and permission management
    #[serde(alias = "SECURITY")]
    Security,
}

impl AccessLevel {
    /// All access levels in ascending order
    pub fn all() -> [AccessLevel; 4] {
        [
            AccessLevel::None,
            AccessLevel::Read,
            AccessLevel::Write,
            AccessLevel::Security,
        ]
    }

    pub fn ordinal(&self) -> u8 {
        match self {
            AccessLevel::None => 0,
            AccessLevel::Read => 1,
            AccessLevel::Write => 2,
            AccessLevel::Security => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::None => "none",
            AccessLevel::Read => "read",
            AccessLevel::Write => "write",
            AccessLevel::Security => "security",
        }
    }

    /// `true` if this level grants at least what `required` grants
    pub fn is_at_least(&self, required: AccessLevel) -> bool {
        self.ordinal() >= required.ordinal()
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAccessLevelError(pub String);

impl fmt::Display for ParseAccessLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown access level '{}', expected one of none, read, write, security",
            self.0
        )
    }
}

impl std::error::Error for ParseAccessLevelError {}

impl FromStr for AccessLevel {
    type Err = ParseAccessLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(AccessLevel::None),
            "read" => Ok(AccessLevel::Read),
            "write" => Ok(AccessLevel::Write),
            "security" => Ok(AccessLevel::Security),
            _ => Err(ParseAccessLevelError(s.to_string())),
        }
    }
}

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
        #[serde(transparent)]
        #[ts(export)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
        #[serde(transparent)]
        #[ts(export)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

uuid_id!(
    /// Identifier of an access control list
    AclId
);
uuid_id!(
    /// Identifier of a single access control record, assigned on first persistence
    RecordId
);
string_id!(
    /// Identifier of a user account
    UserId
);
string_id!(
    /// Identifier of a user group
    UserGroupId
);
string_id!(
    /// Identifier of a system-wide role, e.g. `full-user`
    RoleId
);
string_id!(
    /// Identifier of a protected asset, e.g. a vocabulary IRI
    AssetId
);

/// Kind of entity an access control record grants access to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
#[ts(export, rename_all = "snake_case")]
pub enum HolderKind {
    User,
    #[serde(alias = "group")]
    UserGroup,
    Role,
}

impl HolderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HolderKind::User => "user",
            HolderKind::UserGroup => "user_group",
            HolderKind::Role => "role",
        }
    }
}

impl fmt::Display for HolderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HolderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "user" => Ok(HolderKind::User),
            "user_group" | "group" => Ok(HolderKind::UserGroup),
            "role" => Ok(HolderKind::Role),
            other => Err(format!("unknown holder kind '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[ts(export)]
pub struct HolderDto {
    pub kind: HolderKind,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[ts(export)]
pub struct AccessControlRecordDto {
    /// Missing for records which were not persisted yet
    pub id: Option<RecordId>,
    pub holder: HolderDto,
    pub access_level: AccessLevel,
}

/// Read-optimised projection of an access control list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[ts(export)]
pub struct AccessControlListDto {
    pub id: AclId,
    pub subject: AssetId,
    pub records: Vec<AccessControlRecordDto>,
}
