//! Project configuration (`.fieldseal.toml`).

pub mod settings;

pub use settings::Settings;
