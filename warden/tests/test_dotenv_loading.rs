use config::Config;
use std::env;
use std::fs;
use tempfile::TempDir;
use warden::settings::config::Settings;
use warden_types::{AccessLevel, RoleId};

/// .env.local wins over .env, real environment variables win over both,
/// and the loaded variables reach the settings
#[test]
fn test_dotenv_values_reach_settings() {
    let temp_dir = TempDir::new().unwrap();

    env::remove_var("WARDEN__ACL__EDITOR_ROLE");
    env::remove_var("WARDEN__ACL__READER_ROLE");
    env::remove_var("WARDEN__ACL__DEFAULT_READER_ACCESS_LEVEL");

    let env_path = temp_dir.path().join(".env");
    fs::write(
        &env_path,
        "WARDEN__ACL__EDITOR_ROLE=from_env\nWARDEN__ACL__READER_ROLE=from_env\nWARDEN__ACL__DEFAULT_READER_ACCESS_LEVEL=write\n",
    )
    .unwrap();
    let env_local_path = temp_dir.path().join(".env.local");
    fs::write(&env_local_path, "WARDEN__ACL__READER_ROLE=from_env_local\n").unwrap();
    env::set_var("WARDEN__ACL__DEFAULT_READER_ACCESS_LEVEL", "none");

    dotenvy::from_path(&env_local_path).ok();
    dotenvy::from_path(&env_path).ok();

    let settings: Settings = Config::builder()
        .add_source(Settings::get_environment())
        .build()
        .unwrap()
        .try_deserialize()
        .unwrap();

    env::remove_var("WARDEN__ACL__EDITOR_ROLE");
    env::remove_var("WARDEN__ACL__READER_ROLE");
    env::remove_var("WARDEN__ACL__DEFAULT_READER_ACCESS_LEVEL");

    assert_eq!(settings.acl.editor_role, RoleId::from("from_env"));
    assert_eq!(settings.acl.reader_role, RoleId::from("from_env_local"));
    assert_eq!(settings.acl.default_reader_access_level, AccessLevel::None);
}

#[test]
fn test_missing_dotenv_files() {
    let temp_dir = TempDir::new().unwrap();

    assert!(dotenvy::from_path(temp_dir.path().join(".env")).is_err());
    assert!(dotenvy::from_path(temp_dir.path().join(".env.local")).is_err());
}
