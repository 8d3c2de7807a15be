use crate::button::ButtonEvent;

/// A command accepted by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    /// Full cartridge image bytes.
    LoadCartridge(Vec<u8>),
    Button(ButtonEvent),
}

impl EngineCommand {
    pub fn label(&self) -> &'static str {
        match self {
            EngineCommand::LoadCartridge(_) => "load-cartridge",
            EngineCommand::Button(_) => "button",
        }
    }
}
