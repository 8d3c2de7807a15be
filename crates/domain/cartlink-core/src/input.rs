//! Raw input events as they arrive from the page, before any mapping.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical key identifier (`"j"`, `"ArrowUp"`, `"Enter"`, ...).
///
/// Single-character identifiers are lowercased so that a shifted letter is
/// the same physical key as the unshifted one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct KeyId(String);

impl KeyId {
    pub fn new(raw: impl AsRef<str>) -> Self {
        let raw = raw.as_ref();
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self(c.to_lowercase().collect()),
            _ => Self(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for KeyId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for KeyId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<KeyId> for String {
    fn from(value: KeyId) -> Self {
        value.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an on-screen control.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WidgetId(pub String);

impl WidgetId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WidgetId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyPhase {
    Down,
    /// Auto-repeat while the key stays held.
    Repeat,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerPhase {
    Down,
    Up,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardEvent {
    pub key: KeyId,
    pub phase: KeyPhase,
}

impl KeyboardEvent {
    pub fn down(key: impl Into<KeyId>) -> Self {
        Self {
            key: key.into(),
            phase: KeyPhase::Down,
        }
    }

    pub fn repeat(key: impl Into<KeyId>) -> Self {
        Self {
            key: key.into(),
            phase: KeyPhase::Repeat,
        }
    }

    pub fn up(key: impl Into<KeyId>) -> Self {
        Self {
            key: key.into(),
            phase: KeyPhase::Up,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub widget: WidgetId,
    pub phase: PointerPhase,
}

impl PointerEvent {
    pub fn down(widget: impl Into<WidgetId>) -> Self {
        Self {
            widget: widget.into(),
            phase: PointerPhase::Down,
        }
    }

    pub fn up(widget: impl Into<WidgetId>) -> Self {
        Self {
            widget: widget.into(),
            phase: PointerPhase::Up,
        }
    }
}

/// Every raw event the dispatcher accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawInput {
    Key(KeyboardEvent),
    Pointer(PointerEvent),
}

impl From<KeyboardEvent> for RawInput {
    fn from(value: KeyboardEvent) -> Self {
        RawInput::Key(value)
    }
}

impl From<PointerEvent> for RawInput {
    fn from(value: PointerEvent) -> Self {
        RawInput::Pointer(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_characters_are_lowercased() {
        assert_eq!(KeyId::new("J"), KeyId::new("j"));
        assert_eq!(KeyId::new("ArrowUp").as_str(), "ArrowUp");
    }

    #[test]
    fn key_id_round_trips_through_json_as_plain_string() {
        let json = serde_json::to_string(&KeyId::new("Enter")).unwrap();
        assert_eq!(json, "\"Enter\"");
        let back: KeyId = serde_json::from_str("\"K\"").unwrap();
        assert_eq!(back.as_str(), "k");
    }
}
