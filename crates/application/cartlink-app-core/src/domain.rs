use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cartlink_core::{default_bindings, BindingError, KeyBinding, KeyBindingTable};

pub type PendingId = uuid::Uuid;

/// Whether key/pointer releases reach the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchMode {
    /// Only the transition into the pressed state is forwarded.
    #[default]
    PressOnly,
    /// Both edges are forwarded as press/release pairs.
    PressAndRelease,
}

/// The upload currently tracked by the cartridge loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCartridge {
    pub id: PendingId,
    pub file_name: String,
}

/// Notice emitted once per successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLoaded {
    pub id: PendingId,
    pub file_name: String,
    pub size: usize,
    /// Header title when the image carries a readable one.
    pub title: Option<String>,
    pub loaded_at: DateTime<Utc>,
}

fn default_key_bindings() -> Vec<KeyBinding> {
    default_bindings()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_key_bindings")]
    pub key_bindings: Vec<KeyBinding>,
    #[serde(default)]
    pub dispatch_mode: DispatchMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            key_bindings: default_key_bindings(),
            dispatch_mode: DispatchMode::default(),
        }
    }
}

impl Settings {
    pub fn key_table(&self) -> Result<KeyBindingTable, BindingError> {
        KeyBindingTable::from_bindings(self.key_bindings.iter().cloned())
    }
}
