//! Configuration loaded from `kryptos.toml` in the app directory.

pub mod settings;

pub use settings::Settings;
