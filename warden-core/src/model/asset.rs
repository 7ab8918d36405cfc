use serde::{Deserialize, Serialize};
use warden_types::AssetId;

/// Anything that can be guarded by an access control list
pub trait Asset: Send + Sync {
    fn asset_id(&self) -> &AssetId;

    fn label(&self) -> &str;
}

impl Asset for AssetId {
    fn asset_id(&self) -> &AssetId {
        self
    }

    fn label(&self) -> &str {
        self.as_str()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub id: AssetId,
    pub label: String,
}

impl Vocabulary {
    pub fn new(id: impl Into<AssetId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

impl Asset for Vocabulary {
    fn asset_id(&self) -> &AssetId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }
}
