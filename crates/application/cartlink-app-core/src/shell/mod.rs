pub mod events;
pub mod notifier;
pub mod reducer;
pub mod store;

pub use events::ShellEvent;
pub use notifier::{shell_channel, ChannelNotifier};
pub use reducer::{reduce, ShellState, View};
pub use store::ShellStore;
