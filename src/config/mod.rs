//! Configuration module
//!
//! Handles loading and validating the application configuration (TOML files
//! and environment variables) and the admin manifest (TOML, JSON or JSONC).

pub mod loader;
pub mod types;

pub use loader::{
    load_config, load_config_from_str, load_manifest, load_manifest_from_str, manifest_format,
};
pub use types::*;
