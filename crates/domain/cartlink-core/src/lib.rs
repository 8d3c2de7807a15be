pub mod button;
pub mod command;
pub mod header;
pub mod input;
pub mod keymap;

pub use button::{ButtonAction, ButtonEvent, ButtonInput, UnknownButton};
pub use command::EngineCommand;
pub use header::{header_checksum, write_header, CartridgeHeader, HeaderError, HEADER_END, NINTENDO_LOGO};
pub use input::{KeyId, KeyPhase, KeyboardEvent, PointerEvent, PointerPhase, RawInput, WidgetId};
pub use keymap::{default_bindings, BindingError, KeyBinding, KeyBindingTable};
