use serde::Deserialize;
use std::collections::BTreeSet;
use warden_types::AssetId;

#[derive(Debug, Deserialize, Clone)]
#[allow(unused)]
#[readonly::make]
pub struct WorkspaceSettings {
    /// When set, every asset counts as editable and `editable_assets` is ignored
    #[serde(default = "default_all_assets_editable")]
    pub all_assets_editable: bool,
    #[serde(default)]
    pub editable_assets: BTreeSet<AssetId>,
}

fn default_all_assets_editable() -> bool {
    true
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        WorkspaceSettings {
            all_assets_editable: default_all_assets_editable(),
            editable_assets: BTreeSet::new(),
        }
    }
}

impl WorkspaceSettings {
    /// Workspace in which only the listed assets may be edited
    pub fn restricted_to(assets: impl IntoIterator<Item = AssetId>) -> Self {
        WorkspaceSettings {
            all_assets_editable: false,
            editable_assets: assets.into_iter().collect(),
        }
    }
}
