//! Settings module for subclash
//!
//! Settings are loaded once by the binary and passed down explicitly.

pub mod settings_struct;

pub use settings_struct::{Settings, SettingsError};
