#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use cartlink_app_core::{
    CartridgeFile, EngineFault, EngineHandle, EngineModuleLoader, GameLoaded, NotificationSink,
};
use cartlink_core::ButtonEvent;
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Cartridge(usize),
    Button(ButtonEvent),
}

/// Engine double that records calls and rejects images whose first byte
/// is `0xFF`.
#[derive(Clone, Default)]
pub struct RecordingEngine {
    pub calls: Arc<Mutex<Vec<EngineCall>>>,
}

impl RecordingEngine {
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn buttons(&self) -> Vec<ButtonEvent> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                EngineCall::Button(ev) => Some(ev),
                EngineCall::Cartridge(_) => None,
            })
            .collect()
    }

    pub fn cartridges(&self) -> Vec<usize> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                EngineCall::Cartridge(n) => Some(n),
                EngineCall::Button(_) => None,
            })
            .collect()
    }
}

impl EngineHandle for RecordingEngine {
    fn load_cartridge(&mut self, image: &[u8]) -> Result<(), EngineFault> {
        if image.first() == Some(&0xFF) {
            return Err(EngineFault::new("not a cartridge image"));
        }
        self.calls
            .lock()
            .unwrap()
            .push(EngineCall::Cartridge(image.len()));
        Ok(())
    }

    fn button(&mut self, event: ButtonEvent) -> Result<(), EngineFault> {
        self.calls.lock().unwrap().push(EngineCall::Button(event));
        Ok(())
    }
}

/// Loader that finishes when the test says so.
pub struct ScriptedLoader {
    engine: RecordingEngine,
    release: Mutex<Option<oneshot::Receiver<Result<(), String>>>>,
}

pub struct LoadTrigger(oneshot::Sender<Result<(), String>>);

impl LoadTrigger {
    pub fn succeed(self) {
        let _ = self.0.send(Ok(()));
    }

    pub fn fail(self, message: &str) {
        let _ = self.0.send(Err(message.to_string()));
    }
}

impl ScriptedLoader {
    pub fn new(engine: RecordingEngine) -> (Self, LoadTrigger) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                engine,
                release: Mutex::new(Some(rx)),
            },
            LoadTrigger(tx),
        )
    }
}

#[async_trait::async_trait]
impl EngineModuleLoader for ScriptedLoader {
    async fn load(&self) -> anyhow::Result<Box<dyn EngineHandle>> {
        let rx = self.release.lock().unwrap().take();
        let rx = rx.ok_or_else(|| anyhow::anyhow!("loader used twice"))?;
        match rx.await {
            Ok(Ok(())) => Ok(Box::new(self.engine.clone())),
            Ok(Err(message)) => Err(anyhow::anyhow!(message)),
            Err(_) => Err(anyhow::anyhow!("trigger dropped")),
        }
    }
}

/// Loader that succeeds immediately.
pub struct InstantLoader(pub RecordingEngine);

#[async_trait::async_trait]
impl EngineModuleLoader for InstantLoader {
    async fn load(&self) -> anyhow::Result<Box<dyn EngineHandle>> {
        Ok(Box::new(self.0.clone()))
    }
}

pub struct MemoryFile {
    pub name: String,
    pub contents: Result<Vec<u8>, String>,
}

impl MemoryFile {
    pub fn new(name: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            contents: Ok(bytes),
        }
    }

    pub fn unreadable(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            contents: Err(message.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl CartridgeFile for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read_all(&self) -> std::io::Result<Vec<u8>> {
        tokio::task::yield_now().await;
        match &self.contents {
            Ok(bytes) => Ok(bytes.clone()),
            Err(message) => Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                message.clone(),
            )),
        }
    }
}

#[derive(Default)]
pub struct CountingSink {
    pub seen: Mutex<Vec<GameLoaded>>,
}

impl CountingSink {
    pub fn count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl NotificationSink for CountingSink {
    fn game_loaded(&self, loaded: &GameLoaded) {
        self.seen.lock().unwrap().push(loaded.clone());
    }
}

/// Yield until `cond` holds, giving spawned tasks a chance to run.
pub async fn settle(mut cond: impl FnMut() -> bool) {
    for _ in 0..100 {
        if cond() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition never became true");
}

pub fn cartridge_image(title: &str, len: usize) -> Vec<u8> {
    let mut image = vec![0u8; len];
    cartlink_core::write_header(&mut image, title).unwrap();
    image
}
