//! Engine lifecycle gate: the single owner of the engine handle.
//!
//! The gate moves through `Uninitialized -> Loading -> {Ready | Failed}`
//! exactly once per process. Every engine call goes through
//! [`EngineLifecycleGate::dispatch_command`], which refuses work until the
//! engine is ready. Waiting for readiness is done with
//! [`EngineLifecycleGate::await_ready`], backed by a `watch` channel so
//! waiters are woken rather than polling.

use std::future::Future;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use cartlink_core::EngineCommand;

use crate::error::BridgeError;
use crate::ports::{EngineHandle, EngineModuleLoader};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Loading,
    Ready,
    Failed(String),
}

impl LifecycleState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleState::Ready | LifecycleState::Failed(_))
    }

    fn outcome(&self) -> Result<(), BridgeError> {
        match self {
            LifecycleState::Ready => Ok(()),
            LifecycleState::Failed(reason) => Err(BridgeError::EngineUnavailable(reason.clone())),
            LifecycleState::Uninitialized | LifecycleState::Loading => Err(BridgeError::NotReady),
        }
    }
}

static SESSION_GATE: OnceLock<Arc<EngineLifecycleGate>> = OnceLock::new();

pub struct EngineLifecycleGate {
    state: watch::Sender<LifecycleState>,
    engine: Mutex<Option<Box<dyn EngineHandle>>>,
}

impl Default for EngineLifecycleGate {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineLifecycleGate {
    /// A fresh, uninitialized gate. Production code uses [`Self::global`];
    /// standalone gates exist for embedding and tests.
    pub fn new() -> Self {
        let (state, _) = watch::channel(LifecycleState::Uninitialized);
        Self {
            state,
            engine: Mutex::new(None),
        }
    }

    /// The process-wide gate, created on first use and never replaced.
    pub fn global() -> Arc<EngineLifecycleGate> {
        SESSION_GATE
            .get_or_init(|| Arc::new(EngineLifecycleGate::new()))
            .clone()
    }

    pub fn state(&self) -> LifecycleState {
        self.state.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        *self.state.borrow() == LifecycleState::Ready
    }

    /// Observe every lifecycle transition.
    pub fn watch_state(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// Load the engine module and settle into `Ready` or `Failed`.
    ///
    /// # Panics
    ///
    /// Panics immediately (before the returned future is polled) if the
    /// gate has already been initialized.
    pub fn initialize<'a, L>(
        &'a self,
        loader: L,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send + 'a
    where
        L: EngineModuleLoader + 'a,
    {
        self.begin_loading();
        self.finish_loading(loader)
    }

    /// Like [`Self::initialize`] but runs the load on a tokio task.
    pub fn spawn_initialize<L>(self: &Arc<Self>, loader: L) -> JoinHandle<Result<(), BridgeError>>
    where
        L: EngineModuleLoader + 'static,
    {
        self.begin_loading();
        let gate = Arc::clone(self);
        tokio::spawn(async move { gate.finish_loading(loader).await })
    }

    fn begin_loading(&self) {
        let claimed = self.state.send_if_modified(|state| {
            if *state == LifecycleState::Uninitialized {
                *state = LifecycleState::Loading;
                true
            } else {
                false
            }
        });
        assert!(
            claimed,
            "EngineLifecycleGate::initialize called more than once (state: {:?})",
            self.state()
        );
        info!("engine module loading");
    }

    async fn finish_loading<L>(&self, loader: L) -> Result<(), BridgeError>
    where
        L: EngineModuleLoader,
    {
        match loader.load().await {
            Ok(handle) => {
                *self.engine.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
                self.state.send_replace(LifecycleState::Ready);
                info!("engine ready");
                Ok(())
            }
            Err(e) => {
                let reason = format!("{e:#}");
                error!("engine module failed to load: {reason}");
                self.state.send_replace(LifecycleState::Failed(reason.clone()));
                Err(BridgeError::EngineUnavailable(reason))
            }
        }
    }

    /// Resolves once the gate reaches a terminal state: `Ok` for `Ready`,
    /// `EngineUnavailable` for `Failed`. Callable any number of times,
    /// before or after the outcome is known.
    pub fn await_ready(&self) -> impl Future<Output = Result<(), BridgeError>> + Send + 'static {
        let rx = self.state.subscribe();
        wait_terminal(rx)
    }

    /// Forward one command to the engine if it is ready.
    pub fn dispatch_command(&self, command: EngineCommand) -> Result<(), BridgeError> {
        let ready = self.state.borrow().outcome();
        if let Err(e) = ready {
            debug!("refusing {} command: {e}", command.label());
            return Err(e);
        }

        let mut guard = self.engine.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(engine) = guard.as_mut() else {
            return Err(BridgeError::NotReady);
        };

        let result = match &command {
            EngineCommand::LoadCartridge(image) => engine.load_cartridge(image),
            EngineCommand::Button(event) => engine.button(*event),
        };

        result.map_err(|fault| {
            warn!("engine rejected {} command: {fault}", command.label());
            BridgeError::EngineRejected(fault.0)
        })
    }
}

async fn wait_terminal(mut rx: watch::Receiver<LifecycleState>) -> Result<(), BridgeError> {
    let outcome = match rx.wait_for(LifecycleState::is_terminal).await {
        Ok(state) => state.outcome(),
        Err(_) => Err(BridgeError::EngineUnavailable(
            "engine gate was dropped".to_string(),
        )),
    };
    outcome
}
