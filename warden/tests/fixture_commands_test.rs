use std::fs;
use tempfile::TempDir;
use warden::app_state::AppState;
use warden::commands;
use warden::fixture::Fixture;
use warden::settings::config::Settings;
use warden_core::acl::Holder;
use warden_types::{AccessControlListDto, AccessLevel, AssetId, UserId};

const FIXTURE: &str = r#"
roles:
  - id: full-user
    label: Full user
  - id: restricted-user
    label: Restricted user
  - id: admin
    label: Administrator
users:
  - id: alice
    name: Alice
    roles: [full-user]
  - id: bob
    name: Bob
    roles: [full-user]
  - id: carol
    name: Carol
    roles: [restricted-user]
  - id: root
    name: Root
    roles: [admin]
groups:
  - id: reviewers
    label: Reviewers
    members: [bob]
assets:
  - id: http://example.org/vocabularies/a
    label: Vocabulary A
    authors: [alice]
    editors: [bob]
  - id: http://example.org/vocabularies/b
    label: Vocabulary B
grants:
  - asset: http://example.org/vocabularies/a
    holder: group
    id: reviewers
    access_level: read
"#;

const VOC_A: &str = "http://example.org/vocabularies/a";
const VOC_B: &str = "http://example.org/vocabularies/b";

async fn load_fixture(content: &str) -> (Fixture, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("fixture.yaml");
    fs::write(&path, content).unwrap();
    let fixture = Fixture::load(&path).await.unwrap();
    (fixture, temp_dir)
}

#[tokio::test]
async fn test_init_acls_without_current_user() {
    let (fixture, _temp_dir) = load_fixture(FIXTURE).await;
    let state = AppState::from_fixture(Settings::default(), &fixture, None)
        .await
        .unwrap();

    let output = commands::init_acls(&state, &fixture).await.unwrap();

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    // author alice plus the editor and reader role defaults
    assert!(lines[0].starts_with(VOC_A));
    assert!(lines[0].ends_with("3 records"));
    // no author, no current user: role defaults only
    assert!(lines[1].starts_with(VOC_B));
    assert!(lines[1].ends_with("2 records"));

    // bob only edited vocabulary A, which does not make him an author
    let acl = state
        .acl_service
        .find_for(&AssetId::from(VOC_A))
        .await
        .unwrap()
        .unwrap();
    assert!(acl.record_for(&Holder::User("bob".into())).is_none());
    assert_eq!(
        acl.record_for(&Holder::User("alice".into()))
            .map(|r| r.access_level()),
        Some(AccessLevel::Security)
    );
    assert!(acl.record_for(&Holder::Role("admin".into())).is_none());
}

#[tokio::test]
async fn test_init_acls_is_idempotent() {
    let (fixture, _temp_dir) = load_fixture(FIXTURE).await;
    let state = AppState::from_fixture(Settings::default(), &fixture, None)
        .await
        .unwrap();

    let first = commands::init_acls(&state, &fixture).await.unwrap();
    let second = commands::init_acls(&state, &fixture).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(state.acls.write_count().await, 2);
}

#[tokio::test]
async fn test_init_acls_acting_as_user() {
    let (fixture, _temp_dir) = load_fixture(FIXTURE).await;
    let state = AppState::from_fixture(
        Settings::default(),
        &fixture,
        Some(&UserId::from("carol")),
    )
    .await
    .unwrap();

    commands::init_acls(&state, &fixture).await.unwrap();

    let acl = state
        .acl_service
        .find_for(&AssetId::from(VOC_B))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        acl.record_for(&Holder::User("carol".into()))
            .map(|r| r.access_level()),
        Some(AccessLevel::Security)
    );
}

#[tokio::test]
async fn test_acting_as_unknown_user_fails() {
    let (fixture, _temp_dir) = load_fixture(FIXTURE).await;
    let result =
        AppState::from_fixture(Settings::default(), &fixture, Some(&UserId::from("ghost"))).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_check_decisions() {
    let (fixture, _temp_dir) = load_fixture(FIXTURE).await;
    let state = AppState::from_fixture(Settings::default(), &fixture, None)
        .await
        .unwrap();

    let alice = commands::check(&state, &fixture, &UserId::from("alice"), &AssetId::from(VOC_A))
        .await
        .unwrap();
    assert!(alice.contains("effective access level: SECURITY"));
    assert!(alice.contains("create: true"));
    assert!(alice.contains("modify: true"));
    assert!(alice.contains("remove: true"));

    // bob holds the editor role (WRITE) and reads through his group
    let bob = commands::check(&state, &fixture, &UserId::from("bob"), &AssetId::from(VOC_A))
        .await
        .unwrap();
    assert!(bob.contains("effective access level: WRITE"));
    assert!(bob.contains("read: true"));
    assert!(bob.contains("modify: true"));
    assert!(bob.contains("remove: false"));

    let carol = commands::check(&state, &fixture, &UserId::from("carol"), &AssetId::from(VOC_A))
        .await
        .unwrap();
    assert!(carol.contains("effective access level: READ"));
    assert!(carol.contains("create: false"));
    assert!(carol.contains("read: true"));
    assert!(carol.contains("modify: false"));

    // the admin role has no default level and grants nothing by itself
    let root = commands::check(&state, &fixture, &UserId::from("root"), &AssetId::from(VOC_A))
        .await
        .unwrap();
    assert!(root.contains("effective access level: NONE"));
    assert!(root.contains("create: true"));
    assert!(root.contains("read: false"));
}

#[tokio::test]
async fn test_check_in_restricted_workspace() {
    let content = format!("{FIXTURE}workspace:\n  - {VOC_B}\n");
    let (fixture, _temp_dir) = load_fixture(&content).await;
    let state = AppState::from_fixture(Settings::default(), &fixture, None)
        .await
        .unwrap();

    let alice = commands::check(&state, &fixture, &UserId::from("alice"), &AssetId::from(VOC_A))
        .await
        .unwrap();

    assert!(alice.contains("effective access level: SECURITY"));
    assert!(alice.contains("read: true"));
    assert!(alice.contains("modify: false"));
    assert!(alice.contains("remove: false"));
}

#[tokio::test]
async fn test_show_prints_dto() {
    let (fixture, _temp_dir) = load_fixture(FIXTURE).await;
    let state = AppState::from_fixture(Settings::default(), &fixture, None)
        .await
        .unwrap();

    let json = commands::show(&state, &fixture, &AssetId::from(VOC_A))
        .await
        .unwrap();
    let dto: AccessControlListDto = serde_json::from_str(&json).unwrap();

    assert_eq!(dto.subject, AssetId::from(VOC_A));
    assert_eq!(dto.records.len(), 4);
    assert!(dto.records.iter().all(|r| r.id.is_some()));
}

#[tokio::test]
async fn test_unknown_asset_is_reported() {
    let (fixture, _temp_dir) = load_fixture(FIXTURE).await;
    let state = AppState::from_fixture(Settings::default(), &fixture, None)
        .await
        .unwrap();

    let err = commands::show(&state, &fixture, &AssetId::from("http://example.org/none"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not part of the fixture"));
}
