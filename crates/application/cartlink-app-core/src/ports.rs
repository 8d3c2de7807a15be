use cartlink_core::ButtonEvent;

use crate::domain::GameLoaded;
use crate::error::EngineFault;

/// The loaded emulation engine. Only the lifecycle gate holds one.
pub trait EngineHandle: Send + 'static {
    fn load_cartridge(&mut self, image: &[u8]) -> Result<(), EngineFault>;
    fn button(&mut self, event: ButtonEvent) -> Result<(), EngineFault>;
}

/// Fetches and instantiates the engine module. Called once per process.
#[async_trait::async_trait]
pub trait EngineModuleLoader: Send + Sync {
    async fn load(&self) -> anyhow::Result<Box<dyn EngineHandle>>;
}

/// A user-selected file whose bytes can be read asynchronously.
#[async_trait::async_trait]
pub trait CartridgeFile: Send + Sync {
    fn name(&self) -> &str;
    async fn read_all(&self) -> std::io::Result<Vec<u8>>;
}

/// Receives the single "game loaded" signal per successful upload.
pub trait NotificationSink: Send + Sync + 'static {
    fn game_loaded(&self, loaded: &GameLoaded);
}

/// Sink that discards notifications.
pub struct NullSink;

impl NotificationSink for NullSink {
    fn game_loaded(&self, _loaded: &GameLoaded) {}
}

pub trait SettingsRepo: Send + Sync + 'static {
    fn load(&self) -> anyhow::Result<crate::domain::Settings>;
    fn save(&self, settings: &crate::domain::Settings) -> anyhow::Result<()>;
}
