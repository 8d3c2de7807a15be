use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The eight logical buttons of the console pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonInput {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    Select,
    Start,
}

impl ButtonInput {
    pub const ALL: [ButtonInput; 8] = [
        ButtonInput::Up,
        ButtonInput::Down,
        ButtonInput::Left,
        ButtonInput::Right,
        ButtonInput::A,
        ButtonInput::B,
        ButtonInput::Select,
        ButtonInput::Start,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ButtonInput::Up => "up",
            ButtonInput::Down => "down",
            ButtonInput::Left => "left",
            ButtonInput::Right => "right",
            ButtonInput::A => "a",
            ButtonInput::B => "b",
            ButtonInput::Select => "select",
            ButtonInput::Start => "start",
        }
    }

    /// Fixed mapping from an on-screen control id to its button.
    ///
    /// Control ids match the button names; the centre cell of the d-pad
    /// (`middle`) and any other widget have no button.
    pub fn for_widget(widget_id: &str) -> Option<ButtonInput> {
        ButtonInput::ALL
            .into_iter()
            .find(|b| b.name() == widget_id)
    }
}

impl fmt::Display for ButtonInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown button '{0}' (expected one of up, down, left, right, a, b, select, start)")]
pub struct UnknownButton(pub String);

impl FromStr for ButtonInput {
    type Err = UnknownButton;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        ButtonInput::ALL
            .into_iter()
            .find(|b| b.name() == lowered)
            .ok_or_else(|| UnknownButton(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonAction {
    Press,
    Release,
}

/// A normalized button event as delivered to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ButtonEvent {
    pub button: ButtonInput,
    pub action: ButtonAction,
}

impl ButtonEvent {
    pub fn press(button: ButtonInput) -> Self {
        Self {
            button,
            action: ButtonAction::Press,
        }
    }

    pub fn release(button: ButtonInput) -> Self {
        Self {
            button,
            action: ButtonAction::Release,
        }
    }
}

impl fmt::Display for ButtonEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            ButtonAction::Press => write!(f, "{} press", self.button),
            ButtonAction::Release => write!(f, "{} release", self.button),
        }
    }
}
