//! YAML description of users, groups, roles, assets and explicit grants,
//! used to drive the engine from the command line.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use warden_core::model::{Role, UserAccount, Vocabulary};
use warden_types::{AccessLevel, AssetId, HolderKind, UserGroupId, UserId};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Fixture {
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub users: Vec<UserAccount>,
    #[serde(default)]
    pub groups: Vec<GroupFixture>,
    #[serde(default)]
    pub assets: Vec<AssetFixture>,
    #[serde(default)]
    pub grants: Vec<GrantFixture>,
    /// Editable assets; overrides the configured workspace when present
    #[serde(default)]
    pub workspace: Option<Vec<AssetId>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GroupFixture {
    pub id: UserGroupId,
    pub label: String,
    #[serde(default)]
    pub members: Vec<UserId>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssetFixture {
    pub id: AssetId,
    pub label: String,
    /// Users who created the asset
    #[serde(default)]
    pub authors: Vec<UserId>,
    /// Users who only changed it later
    #[serde(default)]
    pub editors: Vec<UserId>,
}

impl AssetFixture {
    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary::new(self.id.clone(), self.label.clone())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GrantFixture {
    pub asset: AssetId,
    pub holder: HolderKind,
    pub id: String,
    pub access_level: AccessLevel,
}

impl Fixture {
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse fixture {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_norway::from_str(content)?)
    }

    pub fn asset(&self, id: &AssetId) -> Option<&AssetFixture> {
        self.assets.iter().find(|a| a.id == *id)
    }

    pub fn vocabulary(&self, id: &AssetId) -> Result<Vocabulary> {
        self.asset(id)
            .map(AssetFixture::vocabulary)
            .with_context(|| format!("Asset {id} is not part of the fixture"))
    }

    pub fn user(&self, id: &UserId) -> Option<&UserAccount> {
        self.users.iter().find(|u| u.id == *id)
    }

    pub fn has_role(&self, id: &str) -> bool {
        self.roles.iter().any(|r| r.id.as_str() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_types::RoleId;

    const FIXTURE: &str = r#"
roles:
  - id: full-user
    label: Full user
  - id: restricted-user
users:
  - id: alice
    name: Alice
    roles: [full-user]
  - id: bob
    name: Bob
groups:
  - id: editors
    label: Editors
    members: [bob]
assets:
  - id: http://example.org/vocabularies/a
    label: Vocabulary A
    authors: [alice]
    editors: [bob]
grants:
  - asset: http://example.org/vocabularies/a
    holder: user_group
    id: editors
    access_level: WRITE
"#;

    #[test]
    fn test_parse_fixture() {
        let fixture = Fixture::parse(FIXTURE).unwrap();

        assert_eq!(fixture.roles.len(), 2);
        assert_eq!(fixture.roles[1].label, "");
        assert!(fixture.has_role("restricted-user"));
        let alice = fixture.user(&UserId::from("alice")).unwrap();
        assert!(alice.has_role(&RoleId::from("full-user")));
        assert!(fixture.user(&UserId::from("bob")).unwrap().roles.is_empty());
        assert_eq!(fixture.groups[0].members, vec![UserId::from("bob")]);

        let asset = AssetId::from("http://example.org/vocabularies/a");
        assert_eq!(fixture.vocabulary(&asset).unwrap().label, "Vocabulary A");
        assert_eq!(fixture.grants[0].holder, HolderKind::UserGroup);
        assert_eq!(fixture.grants[0].access_level, AccessLevel::Write);
        assert!(fixture.workspace.is_none());
    }

    #[test]
    fn test_unknown_asset() {
        let fixture = Fixture::parse(FIXTURE).unwrap();
        assert!(fixture
            .vocabulary(&AssetId::from("http://example.org/none"))
            .is_err());
    }

    #[test]
    fn test_invalid_access_level_is_rejected() {
        let broken = FIXTURE.replace("access_level: WRITE", "access_level: OWNER");
        assert!(Fixture::parse(&broken).is_err());
    }
}
