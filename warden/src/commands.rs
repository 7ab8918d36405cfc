use anyhow::{bail, Context, Result};
use std::fmt::Write;
use tracing::{debug, instrument};
use utoipa::OpenApi;
use warden_core::acl::{AccessControlRecord, Holder};
use warden_core::repository::{UserGroupRepository, UserRepository};
use warden_core::services::AssetAuthorizationService;
use warden_types::{
    AccessControlListDto, AccessControlRecordDto, AccessLevel, AssetId, HolderDto, HolderKind,
    UserId,
};

use crate::app_state::SharedAppState;
use crate::fixture::{Fixture, GrantFixture};
use crate::settings::config::Settings;

#[derive(OpenApi)]
#[openapi(components(schemas(
    AccessLevel,
    HolderKind,
    HolderDto,
    AccessControlRecordDto,
    AccessControlListDto
)))]
struct AclApiDoc;

pub fn show_config(settings: &Settings) -> String {
    format!("{settings:#?}")
}

pub fn schema() -> Result<String> {
    AclApiDoc::openapi()
        .to_pretty_json()
        .context("Failed to render OpenAPI schema")
}

/// Make sure every asset of the fixture has an ACL. One line per asset:
/// asset, ACL id and number of records.
#[instrument(skip_all)]
pub async fn init_acls(state: &SharedAppState, fixture: &Fixture) -> Result<String> {
    let mut output = String::new();
    for asset in &fixture.assets {
        let acl = state
            .acl_service
            .ensure_for(&asset.vocabulary())
            .await
            .with_context(|| format!("Failed to initialize ACL of {}", asset.id))?;
        writeln!(output, "{}\t{}\t{} records", asset.id, acl.id(), acl.len())?;
    }
    Ok(output)
}

async fn ensure_holder_exists(
    state: &SharedAppState,
    fixture: &Fixture,
    holder: &Holder,
) -> Result<()> {
    let known = match holder {
        Holder::User(id) => state.users.find(id).await?.is_some(),
        Holder::UserGroup(id) => state.groups.find(id).await?.is_some(),
        Holder::Role(id) => fixture.has_role(id.as_str()),
    };
    if !known {
        bail!("Grant refers to unknown {} {}", holder.kind(), holder.id_str());
    }
    Ok(())
}

/// Apply one explicit grant on top of the default ACL. An existing record
/// of the holder gets its level changed, otherwise a record is added.
async fn apply_grant(
    state: &SharedAppState,
    fixture: &Fixture,
    grant: &GrantFixture,
) -> Result<()> {
    let vocabulary = fixture.vocabulary(&grant.asset)?;
    let holder = Holder::from_parts(grant.holder, grant.id.clone());
    ensure_holder_exists(state, fixture, &holder).await?;

    let acl = state.acl_service.ensure_for(&vocabulary).await?;
    match acl.record_for(&holder).cloned() {
        Some(mut record) => {
            record.set_access_level(grant.access_level);
            state
                .acl_service
                .update_record_access_level(&acl, &record)
                .await?;
        }
        None => {
            state
                .acl_service
                .add_record(&acl, AccessControlRecord::new(holder, grant.access_level))
                .await?;
        }
    }
    Ok(())
}

/// Bootstrap all ACLs, then apply the fixture's grants
pub async fn prepare(state: &SharedAppState, fixture: &Fixture) -> Result<()> {
    init_acls(state, fixture).await?;
    for grant in &fixture.grants {
        apply_grant(state, fixture, grant)
            .await
            .with_context(|| format!("Failed to apply grant on {}", grant.asset))?;
    }
    debug!("Applied {} grants", fixture.grants.len());
    Ok(())
}

#[instrument(skip(state, fixture))]
pub async fn check(
    state: &SharedAppState,
    fixture: &Fixture,
    user: &UserId,
    asset: &AssetId,
) -> Result<String> {
    prepare(state, fixture).await?;

    let account = state
        .users
        .find(user)
        .await?
        .with_context(|| format!("Unknown user {user}"))?;
    let vocabulary = fixture.vocabulary(asset)?;
    let authorization = state.vocabulary_authorization.as_ref();

    let level = state
        .acl_authorization
        .effective_access_level(&account, &vocabulary)
        .await?;

    let mut output = String::new();
    writeln!(output, "user: {}", account.id)?;
    writeln!(output, "asset: {}", vocabulary.id)?;
    writeln!(output, "effective access level: {level}")?;
    let create = authorization.can_create(&account);
    let read = authorization.can_read(&account, &vocabulary).await?;
    let modify = authorization.can_modify(&account, &vocabulary).await?;
    let remove = authorization.can_remove(&account, &vocabulary).await?;
    writeln!(output, "create: {create}")?;
    writeln!(output, "read: {read}")?;
    writeln!(output, "modify: {modify}")?;
    writeln!(output, "remove: {remove}")?;
    Ok(output)
}

pub async fn show(state: &SharedAppState, fixture: &Fixture, asset: &AssetId) -> Result<String> {
    prepare(state, fixture).await?;

    let vocabulary = fixture.vocabulary(asset)?;
    let dto = state
        .acl_service
        .find_for_as_dto(&vocabulary)
        .await?
        .with_context(|| format!("Asset {asset} has no access control list"))?;
    Ok(serde_json::to_string_pretty(&dto)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::AppState;

    const FIXTURE: &str = r#"
roles:
  - id: full-user
  - id: restricted-user
users:
  - id: alice
    name: Alice
    roles: [full-user]
groups:
  - id: editors
    label: Editors
    members: [alice]
assets:
  - id: voc
    label: Vocabulary
grants:
  - asset: voc
    holder: role
    id: restricted-user
    access_level: none
  - asset: voc
    holder: group
    id: editors
    access_level: security
"#;

    #[tokio::test]
    async fn test_grants_update_and_add_records() {
        let fixture = Fixture::parse(FIXTURE).unwrap();
        let state = AppState::from_fixture(Settings::default(), &fixture, None)
            .await
            .unwrap();

        prepare(&state, &fixture).await.unwrap();

        let acl = state
            .acl_service
            .find_for(&AssetId::from("voc"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(acl.len(), 3);
        assert_eq!(
            acl.record_for(&Holder::Role("restricted-user".into()))
                .map(|r| r.access_level()),
            Some(AccessLevel::None)
        );
        assert_eq!(
            acl.record_for(&Holder::UserGroup("editors".into()))
                .map(|r| r.access_level()),
            Some(AccessLevel::Security)
        );
    }

    #[tokio::test]
    async fn test_grant_to_unknown_holder_fails() {
        let broken = FIXTURE.replace(
            "id: editors\n    access_level",
            "id: ghosts\n    access_level",
        );
        let fixture = Fixture::parse(&broken).unwrap();
        let state = AppState::from_fixture(Settings::default(), &fixture, None)
            .await
            .unwrap();

        let err = prepare(&state, &fixture).await.unwrap_err();
        assert!(format!("{err:#}").contains("unknown user_group ghosts"));
    }

    #[test]
    fn test_schema_lists_dtos() {
        let schema = schema().unwrap();
        assert!(schema.contains("AccessControlListDto"));
        assert!(schema.contains("AccessLevel"));
    }
}
