pub mod cartridge;
pub mod engine;

// Re-exports for convenience
pub use cartridge::{CartridgeOpenError, FsCartridgeFile};
pub use engine::{
    EngineProbe, JoypadState, LoadedCartridge, ProbeRecord, ReferenceEngine,
    ReferenceModuleLoader,
};
