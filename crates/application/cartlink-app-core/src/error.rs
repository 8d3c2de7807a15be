/// Failures surfaced by the gate, the cartridge loader and the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    #[error("engine is not ready yet")]
    NotReady,
    #[error("engine unavailable: {0}")]
    EngineUnavailable(String),
    #[error("failed to read {name}: {message}")]
    FileReadError { name: String, message: String },
    #[error("cartridge rejected: {0}")]
    CartridgeRejected(String),
    #[error("engine rejected command: {0}")]
    EngineRejected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeErrorKind {
    NotReady,
    EngineUnavailable,
    FileRead,
    CartridgeRejected,
    EngineRejected,
}

impl BridgeError {
    pub fn kind(&self) -> BridgeErrorKind {
        match self {
            BridgeError::NotReady => BridgeErrorKind::NotReady,
            BridgeError::EngineUnavailable(_) => BridgeErrorKind::EngineUnavailable,
            BridgeError::FileReadError { .. } => BridgeErrorKind::FileRead,
            BridgeError::CartridgeRejected(_) => BridgeErrorKind::CartridgeRejected,
            BridgeError::EngineRejected(_) => BridgeErrorKind::EngineRejected,
        }
    }

    /// Whether the user can recover by picking another file.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, BridgeError::EngineUnavailable(_))
    }
}

/// Rejection raised by the engine itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct EngineFault(pub String);

impl EngineFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
