//! Configuration: project-level settings from `.lockbox.toml`.

pub mod settings;

pub use settings::Settings;
