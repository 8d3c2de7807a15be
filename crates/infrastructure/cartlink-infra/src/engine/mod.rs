//! In-process stand-in for the emulation engine module.
//!
//! [`ReferenceEngine`] validates cartridge headers and keeps a Game Boy
//! joypad register up to date; everything it accepts is visible through a
//! shared [`EngineProbe`].

mod joypad;
mod loader;

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};

use cartlink_app_core::{EngineFault, EngineHandle};
use cartlink_core::{ButtonAction, ButtonEvent, CartridgeHeader};

pub use joypad::JoypadState;
pub use loader::ReferenceModuleLoader;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedCartridge {
    pub title: String,
    pub size: usize,
    pub cgb: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeRecord {
    pub cartridges: Vec<LoadedCartridge>,
    pub buttons: Vec<ButtonEvent>,
    pub joypad: JoypadState,
}

/// Shared view of what the reference engine has accepted.
#[derive(Debug, Clone, Default)]
pub struct EngineProbe {
    inner: Arc<Mutex<ProbeRecord>>,
}

impl EngineProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ProbeRecord {
        self.lock().clone()
    }

    pub fn buttons(&self) -> Vec<ButtonEvent> {
        self.lock().buttons.clone()
    }

    pub fn current_cartridge(&self) -> Option<LoadedCartridge> {
        self.lock().cartridges.last().cloned()
    }

    pub fn joypad(&self) -> JoypadState {
        self.lock().joypad
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ProbeRecord> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct ReferenceEngine {
    probe: EngineProbe,
    cartridge_loaded: bool,
}

impl ReferenceEngine {
    pub fn new(probe: EngineProbe) -> Self {
        Self {
            probe,
            cartridge_loaded: false,
        }
    }
}

impl EngineHandle for ReferenceEngine {
    fn load_cartridge(&mut self, image: &[u8]) -> Result<(), EngineFault> {
        let header = CartridgeHeader::parse(image).map_err(|e| EngineFault::new(e.to_string()))?;
        info!(
            "reference engine running '{}' ({} bytes, type {:#04x})",
            header.title,
            image.len(),
            header.cartridge_type
        );

        let mut record = self.probe.lock();
        record.cartridges.push(LoadedCartridge {
            title: header.title.clone(),
            size: image.len(),
            cgb: header.is_cgb(),
        });
        // A new cartridge starts with nothing held.
        record.joypad = JoypadState::default();
        self.cartridge_loaded = true;
        Ok(())
    }

    fn button(&mut self, event: ButtonEvent) -> Result<(), EngineFault> {
        if !self.cartridge_loaded {
            return Err(EngineFault::new("no cartridge loaded"));
        }
        let mut record = self.probe.lock();
        match event.action {
            ButtonAction::Press => record.joypad.press(event.button),
            ButtonAction::Release => record.joypad.release(event.button),
        }
        record.buttons.push(event);
        debug!("reference engine got {event}");
        Ok(())
    }
}
