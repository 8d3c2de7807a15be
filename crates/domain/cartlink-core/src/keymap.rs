use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::button::ButtonInput;
use crate::input::KeyId;

/// One physical key bound to one console button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    pub key: KeyId,
    pub button: ButtonInput,
}

impl KeyBinding {
    pub fn new(key: impl Into<KeyId>, button: ButtonInput) -> Self {
        Self {
            key: key.into(),
            button,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("key '{key}' is bound to both {first} and {second}")]
    DuplicateKey {
        key: KeyId,
        first: ButtonInput,
        second: ButtonInput,
    },
}

/// Mapping from physical keys to console buttons.
///
/// Keys are unique; a button may have any number of keys (including none).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyBindingTable {
    map: BTreeMap<KeyId, ButtonInput>,
}

impl KeyBindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a binding list, refusing a key listed twice.
    pub fn from_bindings<I>(bindings: I) -> Result<Self, BindingError>
    where
        I: IntoIterator<Item = KeyBinding>,
    {
        let mut table = Self::new();
        for binding in bindings {
            if let Some(&first) = table.map.get(&binding.key) {
                return Err(BindingError::DuplicateKey {
                    key: binding.key,
                    first,
                    second: binding.button,
                });
            }
            table.map.insert(binding.key, binding.button);
        }
        Ok(table)
    }

    /// Bind a key, replacing whatever it was bound to before.
    /// Returns the previous button for that key.
    pub fn bind(&mut self, key: impl Into<KeyId>, button: ButtonInput) -> Option<ButtonInput> {
        self.map.insert(key.into(), button)
    }

    pub fn unbind(&mut self, key: &KeyId) -> Option<ButtonInput> {
        self.map.remove(key)
    }

    pub fn lookup(&self, key: &KeyId) -> Option<ButtonInput> {
        self.map.get(key).copied()
    }

    /// All keys currently bound to `button`, in key order.
    pub fn keys_for(&self, button: ButtonInput) -> Vec<&KeyId> {
        self.map
            .iter()
            .filter(|(_, b)| **b == button)
            .map(|(k, _)| k)
            .collect()
    }

    pub fn bindings(&self) -> Vec<KeyBinding> {
        self.map
            .iter()
            .map(|(key, button)| KeyBinding {
                key: key.clone(),
                button: *button,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Arrow keys and WASD for the d-pad, `j`/`k` for A/B, Shift and Enter
/// for Select and Start.
pub fn default_bindings() -> Vec<KeyBinding> {
    use ButtonInput::*;

    [
        ("ArrowUp", Up),
        ("w", Up),
        ("ArrowDown", Down),
        ("s", Down),
        ("ArrowLeft", Left),
        ("a", Left),
        ("ArrowRight", Right),
        ("d", Right),
        ("j", A),
        ("k", B),
        ("Shift", Select),
        ("Enter", Start),
    ]
    .into_iter()
    .map(|(key, button)| KeyBinding::new(key, button))
    .collect()
}

impl KeyBindingTable {
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        for binding in default_bindings() {
            table.bind(binding.key, binding.button);
        }
        table
    }
}
