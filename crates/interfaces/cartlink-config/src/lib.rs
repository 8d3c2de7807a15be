//! Central configuration constants for runtime limits and defaults.

/// File extension the upload control offers by default. Advisory only.
pub const CARTRIDGE_EXTENSION: &str = "gb";

/// Default simulated fetch time for the reference engine module.
pub const DEFAULT_ENGINE_LOAD_DELAY_MS: u64 = 250;

/// Upper bound accepted for `--load-delay-ms`.
pub const MAX_ENGINE_LOAD_DELAY_MS: u64 = 60_000;

/// Capacity of the channel carrying shell events.
pub const SHELL_EVENT_CAPACITY: usize = 64;

/// Whether `name` carries the advisory cartridge extension.
pub fn has_cartridge_extension(name: &str) -> bool {
    std::path::Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(CARTRIDGE_EXTENSION))
}

/// Convenience function to clamp a load delay into the allowed range.
pub fn clamp_load_delay_ms(v: u64) -> u64 {
    v.min(MAX_ENGINE_LOAD_DELAY_MS)
}
