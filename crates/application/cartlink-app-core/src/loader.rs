use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};

use cartlink_core::{CartridgeHeader, EngineCommand};

use crate::domain::{GameLoaded, PendingCartridge};
use crate::error::BridgeError;
use crate::gate::EngineLifecycleGate;
use crate::ports::{CartridgeFile, NotificationSink};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderStatus {
    Idle,
    Reading(PendingCartridge),
    AwaitingEngine(PendingCartridge),
    Forwarding(PendingCartridge),
}

impl LoaderStatus {
    fn pending_id(&self) -> Option<crate::domain::PendingId> {
        match self {
            LoaderStatus::Idle => None,
            LoaderStatus::Reading(p)
            | LoaderStatus::AwaitingEngine(p)
            | LoaderStatus::Forwarding(p) => Some(p.id),
        }
    }
}

/// Reads an uploaded cartridge and hands it to the engine once it is ready.
pub struct CartridgeLoader {
    gate: Arc<EngineLifecycleGate>,
    sink: Arc<dyn NotificationSink>,
    status: Mutex<LoaderStatus>,
}

impl CartridgeLoader {
    pub fn new(gate: Arc<EngineLifecycleGate>, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            gate,
            sink,
            status: Mutex::new(LoaderStatus::Idle),
        }
    }

    pub fn status(&self) -> LoaderStatus {
        self.status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Read `file`, wait for the engine, and forward the bytes.
    ///
    /// An upload that races the engine load waits for readiness instead of
    /// failing. On success the notification sink hears about it exactly
    /// once; on any failure it hears nothing and the loader is idle again.
    pub async fn submit<F>(&self, file: &F) -> Result<GameLoaded, BridgeError>
    where
        F: CartridgeFile + ?Sized,
    {
        let pending = PendingCartridge {
            id: uuid::Uuid::new_v4(),
            file_name: file.name().to_string(),
        };
        self.set_status(LoaderStatus::Reading(pending.clone()));

        let result = self.run(&pending, file).await;

        self.finish(&pending);
        match &result {
            Ok(loaded) => {
                info!(
                    "cartridge {} loaded ({} bytes)",
                    loaded.file_name, loaded.size
                );
                self.sink.game_loaded(loaded);
            }
            Err(e) => warn!("cartridge {} not loaded: {e}", pending.file_name),
        }
        result
    }

    async fn run<F>(&self, pending: &PendingCartridge, file: &F) -> Result<GameLoaded, BridgeError>
    where
        F: CartridgeFile + ?Sized,
    {
        let image = file
            .read_all()
            .await
            .map_err(|e| BridgeError::FileReadError {
                name: pending.file_name.clone(),
                message: e.to_string(),
            })?;

        self.advance(pending, LoaderStatus::AwaitingEngine(pending.clone()));
        if !self.gate.is_ready() {
            info!("cartridge {} waiting for engine", pending.file_name);
        }
        self.gate.await_ready().await?;

        self.advance(pending, LoaderStatus::Forwarding(pending.clone()));
        let size = image.len();
        // Informational only; the engine decides what it accepts.
        let title = CartridgeHeader::parse(&image)
            .ok()
            .map(|h| h.title)
            .filter(|t| !t.is_empty());

        match self.gate.dispatch_command(EngineCommand::LoadCartridge(image)) {
            Ok(()) => Ok(GameLoaded {
                id: pending.id,
                file_name: pending.file_name.clone(),
                size,
                title,
                loaded_at: chrono::Utc::now(),
            }),
            Err(BridgeError::EngineRejected(reason)) => Err(BridgeError::CartridgeRejected(reason)),
            Err(e) => Err(e),
        }
    }

    fn set_status(&self, status: LoaderStatus) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = status;
    }

    /// Move the tracked upload forward, unless a newer submit replaced it.
    fn advance(&self, pending: &PendingCartridge, next: LoaderStatus) {
        let mut status = self.status.lock().unwrap_or_else(PoisonError::into_inner);
        if status.pending_id() == Some(pending.id) {
            *status = next;
        }
    }

    fn finish(&self, pending: &PendingCartridge) {
        self.advance(pending, LoaderStatus::Idle);
    }
}
