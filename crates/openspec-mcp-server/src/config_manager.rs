/// Configuration management for the OpenSpec MCP server
///
/// Sources, lowest precedence first:
/// - Built-in defaults
/// - TOML file (`--config`, or `./openspec.toml` when present)
/// - Environment variables
use openspec_core::{OpenSpecError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "openspec.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OpenSpecConfig {
    pub server: ServerConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub name: String,
    pub log_level: String,
    /// Log file directory for the stdio transport.
    pub log_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Write spec files to disk on project creation.
    pub create_real_files: bool,
    pub root_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "openspec-forge".to_string(),
            log_level: "info".to_string(),
            log_dir: PathBuf::from(".openspec").join("logs"),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            create_real_files: false,
            root_dir: PathBuf::from("."),
        }
    }
}

pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from multiple sources (environment > file > defaults)
    pub fn load_config(config_file: Option<PathBuf>) -> Result<OpenSpecConfig> {
        let mut config = OpenSpecConfig::default();

        let config_file = config_file.or_else(|| {
            let candidate = PathBuf::from(DEFAULT_CONFIG_FILE);
            candidate.exists().then_some(candidate)
        });

        if let Some(config_path) = config_file {
            if config_path.exists() {
                config = Self::load_from_file(&config_path)?;
                info!("Configuration loaded from file: {:?}", config_path);
            } else {
                warn!(
                    "Configuration file not found: {:?}, using defaults",
                    config_path
                );
            }
        }

        config = Self::apply_environment_overrides(config);

        Self::validate_config(&config)?;

        debug!("Final configuration: {:#?}", config);
        Ok(config)
    }

    fn load_from_file(path: &Path) -> Result<OpenSpecConfig> {
        let content = std::fs::read_to_string(path)?;

        toml::from_str(&content)
            .map_err(|e| OpenSpecError::Configuration(format!("Invalid TOML config: {}", e)))
    }

    fn apply_environment_overrides(mut config: OpenSpecConfig) -> OpenSpecConfig {
        for key in ["CREATE_REAL_FILES", "OPENSPEC_CREATE_REAL_FILES"] {
            if let Ok(value) = env::var(key) {
                config.output.create_real_files = parse_flag(&value);
                debug!("Override create_real_files from {}", key);
            }
        }

        if let Ok(dir) = env::var("OPENSPEC_OUTPUT_DIR") {
            config.output.root_dir = PathBuf::from(dir);
            debug!("Override output directory from environment");
        }

        if let Ok(dir) = env::var("OPENSPEC_LOG_DIR") {
            config.server.log_dir = PathBuf::from(dir);
            debug!("Override log directory from environment");
        }

        if let Ok(log_level) = env::var("RUST_LOG") {
            config.server.log_level = log_level;
            debug!("Override log level from environment");
        }

        config
    }

    fn validate_config(config: &OpenSpecConfig) -> Result<()> {
        if config.server.name.trim().is_empty() {
            return Err(OpenSpecError::Configuration(
                "Empty server name".to_string(),
            ));
        }

        if config.output.root_dir.as_os_str().is_empty() {
            return Err(OpenSpecError::Configuration(
                "Empty output directory".to_string(),
            ));
        }

        if config.output.create_real_files && config.output.root_dir.is_relative() {
            warn!(
                "Spec files will be written relative to the working directory: {:?}",
                config.output.root_dir
            );
        }

        Ok(())
    }

    /// Generate example configuration file
    pub fn generate_example_config() -> String {
        let example = OpenSpecConfig::default();

        format!(
            "# OpenSpec MCP Server Configuration\n\
            # Environment variables override every value below.\n\n\
            [server]\n\
            name = \"{}\"\n\
            log_level = \"{}\"  # RUST_LOG\n\
            log_dir = \"{}\"  # OPENSPEC_LOG_DIR\n\n\
            [output]\n\
            create_real_files = {}  # CREATE_REAL_FILES / OPENSPEC_CREATE_REAL_FILES\n\
            root_dir = \"{}\"  # OPENSPEC_OUTPUT_DIR\n",
            example.server.name,
            example.server.log_level,
            example.server.log_dir.display(),
            example.output.create_real_files,
            example.output.root_dir.display(),
        )
    }

    pub fn get_config_summary(config: &OpenSpecConfig) -> String {
        format!(
            "OpenSpec MCP Configuration:\n\
            🌐 Server: {} (log level {}, logs in {})\n\
            📁 Output: {} under {}",
            config.server.name,
            config.server.log_level,
            config.server.log_dir.display(),
            if config.output.create_real_files {
                "writes spec files"
            } else {
                "report only"
            },
            config.output.root_dir.display(),
        )
    }
}

/// Only the exact string `true` enables a flag.
fn parse_flag(value: &str) -> bool {
    value == "true"
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    const ENV_KEYS: &[&str] = &[
        "CREATE_REAL_FILES",
        "OPENSPEC_CREATE_REAL_FILES",
        "OPENSPEC_OUTPUT_DIR",
        "OPENSPEC_LOG_DIR",
        "RUST_LOG",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn defaults_without_file_or_env() {
        clear_env();
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        let config = ConfigManager::load_config(Some(missing)).unwrap();
        assert_eq!(config, OpenSpecConfig::default());
        assert!(!config.output.create_real_files);
    }

    #[test]
    #[serial]
    fn file_values_are_loaded_and_env_wins() {
        clear_env();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("openspec.toml");
        std::fs::write(
            &path,
            "[server]\nname = \"custom\"\n\n[output]\nroot_dir = \"/srv/specs\"\n",
        )
        .unwrap();

        let config = ConfigManager::load_config(Some(path.clone())).unwrap();
        assert_eq!(config.server.name, "custom");
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.output.root_dir, PathBuf::from("/srv/specs"));

        env::set_var("CREATE_REAL_FILES", "true");
        env::set_var("OPENSPEC_OUTPUT_DIR", "/tmp/out");
        let config = ConfigManager::load_config(Some(path)).unwrap();
        assert!(config.output.create_real_files);
        assert_eq!(config.output.root_dir, PathBuf::from("/tmp/out"));
        clear_env();
    }

    #[test]
    #[serial]
    fn prefixed_flag_overrides_plain_flag() {
        clear_env();
        env::set_var("CREATE_REAL_FILES", "true");
        env::set_var("OPENSPEC_CREATE_REAL_FILES", "false");
        let dir = TempDir::new().unwrap();
        let config = ConfigManager::load_config(Some(dir.path().join("none.toml"))).unwrap();
        assert!(!config.output.create_real_files);
        clear_env();
    }

    #[test]
    #[serial]
    fn invalid_toml_is_a_configuration_error() {
        clear_env();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[server\nname = ").unwrap();
        let err = ConfigManager::load_config(Some(path)).unwrap_err();
        assert!(matches!(err, OpenSpecError::Configuration(_)));
    }

    #[test]
    #[serial]
    fn empty_server_name_is_rejected() {
        clear_env();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.toml");
        std::fs::write(&path, "[server]\nname = \"  \"\n").unwrap();
        assert!(ConfigManager::load_config(Some(path)).is_err());
    }

    #[test]
    fn example_config_parses_back_to_defaults() {
        let example = ConfigManager::generate_example_config();
        let parsed: OpenSpecConfig = toml::from_str(&example).unwrap();
        assert_eq!(parsed, OpenSpecConfig::default());
    }

    #[test]
    fn flags_accept_only_exact_true() {
        assert!(parse_flag("true"));
        assert!(!parse_flag("TRUE"));
        assert!(!parse_flag("1"));
        assert!(!parse_flag(" true"));
        assert!(!parse_flag("yes"));
    }

    #[test]
    #[serial]
    fn uppercase_env_flag_does_not_enable_writes() {
        clear_env();
        let dir = TempDir::new().unwrap();
        env::set_var("CREATE_REAL_FILES", "TRUE");
        let config = ConfigManager::load_config(Some(dir.path().join("none.toml"))).unwrap();
        assert!(!config.output.create_real_files);
        clear_env();
    }
}
