use std::collections::BTreeSet;
use warden_types::{AccessLevel, RoleId, UserId};

use super::record::AccessControlRecord;

/// Access level a role receives in newly created ACLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDefault {
    pub role: RoleId,
    pub access_level: AccessLevel,
}

/// Records of a default ACL.
///
/// The current actor (if any) and every author recovered from the subject's
/// change history get `SECURITY`, deduplicated by user. Each role default
/// adds one role record.
pub fn build_default_records(
    authors: &BTreeSet<UserId>,
    current_actor: Option<&UserId>,
    role_defaults: &[RoleDefault],
) -> Vec<AccessControlRecord> {
    let mut security_holders: Vec<&UserId> = Vec::with_capacity(authors.len() + 1);
    if let Some(actor) = current_actor {
        security_holders.push(actor);
    }
    for author in authors {
        if Some(author) != current_actor {
            security_holders.push(author);
        }
    }

    let mut records: Vec<AccessControlRecord> = security_holders
        .into_iter()
        .map(|user| AccessControlRecord::for_user(user.clone(), AccessLevel::Security))
        .collect();

    let mut seen_roles = BTreeSet::new();
    for default in role_defaults {
        if seen_roles.insert(&default.role) {
            records.push(AccessControlRecord::for_role(
                default.role.clone(),
                default.access_level,
            ));
        }
    }

    records
}
