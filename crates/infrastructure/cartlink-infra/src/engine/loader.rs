use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use cartlink_app_core::{EngineHandle, EngineModuleLoader};

use super::{EngineProbe, ReferenceEngine};

/// Simulates fetching and instantiating the engine module.
pub struct ReferenceModuleLoader {
    probe: EngineProbe,
    delay: Duration,
    failure: Option<String>,
}

impl ReferenceModuleLoader {
    pub fn new(probe: EngineProbe) -> Self {
        Self {
            probe,
            delay: Duration::from_millis(cartlink_config::DEFAULT_ENGINE_LOAD_DELAY_MS),
            failure: None,
        }
    }

    pub fn with_delay_ms(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(cartlink_config::clamp_load_delay_ms(ms));
        self
    }

    /// Make the load fail with `message` once the delay has elapsed.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }
}

#[async_trait]
impl EngineModuleLoader for ReferenceModuleLoader {
    async fn load(&self) -> anyhow::Result<Box<dyn EngineHandle>> {
        info!("fetching engine module ({} ms)", self.delay.as_millis());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some(message) = &self.failure {
            anyhow::bail!("{message}");
        }
        Ok(Box::new(ReferenceEngine::new(self.probe.clone())))
    }
}
