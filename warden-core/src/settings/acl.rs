use serde::Deserialize;
use tracing::debug;
use warden_types::{AccessLevel, RoleId};

use crate::acl::RoleDefault;
use crate::model::Role;
use crate::retry::RetryConfig;

#[derive(Debug, Deserialize, Clone)]
#[allow(unused)]
#[readonly::make]
pub struct AclSettings {
    /// Granted to the editor role in new ACLs
    #[serde(default = "default_editor_access_level")]
    pub default_editor_access_level: AccessLevel,
    /// Granted to the restricted (reader) role in new ACLs
    #[serde(default = "default_reader_access_level")]
    pub default_reader_access_level: AccessLevel,
    #[serde(default = "default_editor_role")]
    pub editor_role: RoleId,
    #[serde(default = "default_reader_role")]
    pub reader_role: RoleId,
    #[serde(default = "default_admin_role")]
    pub admin_role: RoleId,
    #[serde(default = "default_max_update_attempts")]
    pub max_update_attempts: usize,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_editor_access_level() -> AccessLevel {
    AccessLevel::Write
}

fn default_reader_access_level() -> AccessLevel {
    AccessLevel::Read
}

fn default_editor_role() -> RoleId {
    RoleId::from("full-user")
}

fn default_reader_role() -> RoleId {
    RoleId::from("restricted-user")
}

fn default_admin_role() -> RoleId {
    RoleId::from("admin")
}

fn default_max_update_attempts() -> usize {
    3
}

fn default_retry_delay_ms() -> u64 {
    10
}

impl Default for AclSettings {
    fn default() -> Self {
        AclSettings {
            default_editor_access_level: default_editor_access_level(),
            default_reader_access_level: default_reader_access_level(),
            editor_role: default_editor_role(),
            reader_role: default_reader_role(),
            admin_role: default_admin_role(),
            max_update_attempts: default_max_update_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl AclSettings {
    pub fn with_default_access_levels(mut self, editor: AccessLevel, reader: AccessLevel) -> Self {
        self.default_editor_access_level = editor;
        self.default_reader_access_level = reader;
        self
    }

    pub fn with_retry(mut self, max_update_attempts: usize, retry_delay_ms: u64) -> Self {
        self.max_update_attempts = max_update_attempts;
        self.retry_delay_ms = retry_delay_ms;
        self
    }

    /// Configured default for a role, `None` for roles without one
    pub fn default_access_level_for(&self, role: &RoleId) -> Option<AccessLevel> {
        if *role == self.editor_role {
            Some(self.default_editor_access_level)
        } else if *role == self.reader_role {
            Some(self.default_reader_access_level)
        } else {
            None
        }
    }

    /// Role records for a new ACL, for those of `roles` that have a configured default
    pub fn role_defaults(&self, roles: &[Role]) -> Vec<RoleDefault> {
        roles
            .iter()
            .filter_map(|role| match self.default_access_level_for(&role.id) {
                Some(access_level) => Some(RoleDefault {
                    role: role.id.clone(),
                    access_level,
                }),
                None => {
                    debug!("Role '{}' has no default access level, skipping", role.id);
                    None
                }
            })
            .collect()
    }

    /// Whether the account may edit at all, i.e. holds the editor or admin role
    pub fn is_at_least_editor(&self, roles: &std::collections::BTreeSet<RoleId>) -> bool {
        roles.contains(&self.editor_role) || roles.contains(&self.admin_role)
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_update_attempts,
            initial_delay_ms: self.retry_delay_ms,
            ..RetryConfig::default()
        }
    }
}
