use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use warden_core::settings::{AclSettings, WorkspaceSettings};

#[derive(Debug, Deserialize, Clone, Default)]
#[allow(unused)]
pub struct Settings {
    /// Fallback log filter when `RUST_LOG` is not set
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub acl: AclSettings,
    #[serde(default)]
    pub workspace: WorkspaceSettings,
}

impl Settings {
    pub fn get_environment() -> Environment {
        Environment::default()
            .prefix("WARDEN")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("WARDEN_RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Self::get_environment());

        let mut settings: Settings = builder.build()?.try_deserialize()?;
        settings.log_level = settings.check_if_optional(&settings.log_level);
        Ok(settings)
    }

    /// "no", "false", "0" or an empty string disable an optional setting, so
    /// environment variables can switch off values set in config files
    fn check_if_optional(&self, s: &Option<String>) -> Option<String> {
        match s {
            None => None,
            Some(s) => match s.trim().to_lowercase().as_str() {
                "" | "no" | "false" | "0" => None,
                _ => Some(s.to_string()),
            },
        }
    }
}
