use crate::domain::GameLoaded;

#[derive(Debug, Clone)]
pub enum ShellEvent {
    // Engine lifecycle
    EngineReady,
    EngineFailed { message: String },

    // Cartridge upload
    GameLoaded(GameLoaded),
    CartridgeFailed { message: String },
}
