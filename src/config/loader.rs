//! Configuration and manifest loaders
//!
//! Application configuration is loaded from multiple sources with the
//! following precedence (highest to lowest):
//! 1. `ROLEGATE_MANIFEST` (manifest path only)
//! 2. Environment variables (ROLEGATE__*)
//! 3. Configuration file (TOML)
//! 4. Default values
//!
//! The admin manifest is a single file whose format follows its extension.

use crate::config::types::{AdminTableManifest, AppConfig};
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "rolegate.toml",
    ".rolegate.toml",
    "~/.config/rolegate/config.toml",
    "/etc/rolegate/config.toml",
];

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // Defaults come from serde defaults on AppConfig

    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // First existing default path wins
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                debug!(path = %expanded, "Using configuration file");
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // e.g. ROLEGATE__LOGGING__LEVEL, ROLEGATE__MANIFEST__PATH
    builder = builder.add_source(
        Environment::with_prefix("ROLEGATE")
            .separator("__")
            .try_parsing(true),
    );

    if let Ok(path) = std::env::var("ROLEGATE_MANIFEST") {
        builder = builder
            .set_override("manifest.path", path)
            .map_err(|e| ConfigError::Load(e.to_string()))?;
    }

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate configuration values
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.manifest.path.trim().is_empty() {
        return Err(ConfigError::Missing {
            field: "manifest.path".to_string(),
        });
    }

    if let Err(e) = EnvFilter::try_new(&config.logging.level) {
        return Err(ConfigError::Invalid {
            message: format!("logging.level '{}': {}", config.logging.level, e),
        });
    }

    Ok(())
}

/// Pick the manifest format from the file extension
pub fn manifest_format(path: &Path) -> Result<FileFormat, ConfigError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match extension.as_str() {
        "toml" => Ok(FileFormat::Toml),
        "json" => Ok(FileFormat::Json),
        "jsonc" | "json5" => Ok(FileFormat::Json5),
        _ => Err(ConfigError::UnsupportedFormat { extension }),
    }
}

/// Load and validate the admin manifest from a file.
///
/// `~` is expanded. Any failure is fatal; nothing is partially loaded.
pub fn load_manifest(path: &str) -> Result<AdminTableManifest, ConfigError> {
    let expanded = shellexpand::tilde(path);
    let path = Path::new(expanded.as_ref());

    if !path.exists() {
        return Err(ConfigError::Load(format!(
            "Manifest file not found: {}",
            path.display()
        )));
    }

    let format = manifest_format(path)?;
    let contents = std::fs::read_to_string(path)?;

    debug!(path = %path.display(), ?format, "Loading manifest");
    load_manifest_from_str(&contents, format)
}

/// Parse and validate a manifest held in memory
pub fn load_manifest_from_str(
    contents: &str,
    format: FileFormat,
) -> Result<AdminTableManifest, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(contents, format))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let manifest: AdminTableManifest = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    manifest.validate()?;

    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_from_str_basic() {
        let toml = r#"
[manifest]
path = "configs/admin.jsonc"

[logging]
level = "debug"
format = "json"
"#;

        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.manifest.path, "configs/admin.jsonc");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, crate::config::LogFormat::Json);
    }

    #[test]
    fn test_empty_manifest_path_error() {
        let toml = r#"
[manifest]
path = ""
"#;

        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_invalid_log_level_error() {
        let toml = r#"
[logging]
level = "rolegate=loud"
"#;

        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_manifest_format_from_extension() {
        assert!(matches!(
            manifest_format(Path::new("admin.toml")),
            Ok(FileFormat::Toml)
        ));
        assert!(matches!(
            manifest_format(Path::new("admin.JSON")),
            Ok(FileFormat::Json)
        ));
        assert!(matches!(
            manifest_format(Path::new("configs/admin.jsonc")),
            Ok(FileFormat::Json5)
        ));
        assert!(matches!(
            manifest_format(Path::new("admin.yaml")),
            Err(ConfigError::UnsupportedFormat { .. })
        ));
        assert!(manifest_format(Path::new("admin")).is_err());
    }

    #[test]
    fn test_load_manifest_from_str_toml() {
        let toml = r#"
[permission_sets]
Admin = ["System:Kick", "System:Ban"]

[[roles]]
name = "Mod"
permissions = ["System:Kick"]

[[admins]]
name = "alice"
identity = 76561198000000001
immunity = 50
permissions = ["@Mod"]
"#;

        let manifest = load_manifest_from_str(toml, FileFormat::Toml).unwrap();
        assert_eq!(manifest.roles.len(), 1);
        assert_eq!(manifest.admins[0].identity, 76561198000000001);
        assert_eq!(manifest.admins[0].immunity, 50);
        assert_eq!(manifest.permission_sets.values().next().unwrap().len(), 2);
    }

    #[test]
    fn test_load_manifest_missing_identity_fails() {
        let toml = r#"
[[admins]]
name = "alice"
permissions = ["*"]
"#;

        let result = load_manifest_from_str(toml, FileFormat::Toml);
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_load_manifest_invalid_syntax_fails() {
        let result = load_manifest_from_str("[[admins]\nname = ", FileFormat::Toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_manifest_missing_file() {
        let result = load_manifest("/definitely/not/here/admin.toml");
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }
}
