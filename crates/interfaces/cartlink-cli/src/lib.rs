pub mod bindings;
pub mod commands;

use cartlink_app_core::DispatchMode;
use clap::ValueEnum;

#[derive(ValueEnum, Clone, Debug, Copy)]
pub enum CliDispatchMode {
    PressOnly,
    PressAndRelease,
}

impl From<CliDispatchMode> for DispatchMode {
    fn from(m: CliDispatchMode) -> Self {
        match m {
            CliDispatchMode::PressOnly => DispatchMode::PressOnly,
            CliDispatchMode::PressAndRelease => DispatchMode::PressAndRelease,
        }
    }
}
