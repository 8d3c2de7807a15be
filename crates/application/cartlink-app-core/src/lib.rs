//! The bridge between a page's controls and the emulation engine.
//!
//! [`EngineLifecycleGate`] owns the engine and its readiness,
//! [`CartridgeLoader`] hands an uploaded image over exactly once, and
//! [`InputDispatcher`] turns keyboard and pointer events into button
//! events for the engine.

pub mod dispatcher;
pub mod domain;
pub mod error;
pub mod gate;
pub mod loader;
pub mod persistence;
pub mod ports;
pub mod shell;
pub mod subscription;

pub use dispatcher::{DispatchOutcome, InputDispatcher};
pub use domain::{DispatchMode, GameLoaded, PendingCartridge, PendingId, Settings};
pub use error::{BridgeError, BridgeErrorKind, EngineFault};
pub use gate::{EngineLifecycleGate, LifecycleState};
pub use loader::{CartridgeLoader, LoaderStatus};
pub use persistence::FilePersistence;
pub use ports::*;
pub use subscription::{EventHub, Listener, RawEventSource, Subscription};
