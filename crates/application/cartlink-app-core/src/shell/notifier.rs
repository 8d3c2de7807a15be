use tokio::sync::mpsc;

use crate::domain::GameLoaded;
use crate::ports::NotificationSink;

use super::events::ShellEvent;

/// Channel sized for shell events.
pub fn shell_channel() -> (mpsc::Sender<ShellEvent>, mpsc::Receiver<ShellEvent>) {
    mpsc::channel(cartlink_config::SHELL_EVENT_CAPACITY)
}

/// Forwards game-loaded notices into the shell's event channel.
pub struct ChannelNotifier {
    tx: mpsc::Sender<ShellEvent>,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::Sender<ShellEvent>) -> Self {
        Self { tx }
    }
}

impl NotificationSink for ChannelNotifier {
    fn game_loaded(&self, loaded: &GameLoaded) {
        if let Err(e) = self.tx.try_send(ShellEvent::GameLoaded(loaded.clone())) {
            tracing::warn!("shell did not receive game-loaded notice: {e}");
        }
    }
}
