//! Configuration for the dispatch layer
//!
//! Sources, highest priority first:
//! 1. Environment variables
//! 2. Configuration files (.unblas.yaml, .unblas.json, .unblas.toml)
//! 3. Built-in defaults

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use unblas_abi::{
    AbiProfile, ComplexReturn, FloatReturn, HostLibraryOptions, Mangling, StrlenConvention,
};
use unblas_accelerate_api::DeviceId;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlasConfig {
    #[serde(default)]
    pub abi: AbiConfig,
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub accelerate: AccelerateConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Overrides of the build's ABI profile; unset fields keep the build value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AbiConfig {
    pub mangling: Option<Mangling>,
    pub strlen: Option<StrlenConvention>,
    pub complex_return: Option<ComplexReturn>,
    pub float_return: Option<FloatReturn>,
}

impl AbiConfig {
    /// The build default with these overrides applied.
    pub fn resolve(&self) -> AbiProfile {
        let base = AbiProfile::build_default();
        AbiProfile {
            mangling: self.mangling.unwrap_or(base.mangling),
            strlen: self.strlen.unwrap_or(base.strlen),
            complex_return: self.complex_return.unwrap_or(base.complex_return),
            float_return: self.float_return.unwrap_or(base.float_return),
            int_width: base.int_width,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == AbiConfig::default()
    }
}

/// Host Fortran BLAS search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Explicit library file; disables the search.
    pub path: Option<PathBuf>,
    /// Base names tried in order, e.g. `openblas` for `libopenblas.so`.
    #[serde(default)]
    pub candidates: Vec<String>,
}

impl LibraryConfig {
    pub fn to_options(&self) -> HostLibraryOptions {
        HostLibraryOptions {
            path: self.path.clone(),
            candidates: self.candidates.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccelerateConfig {
    /// Register the compiled-in device backend at initialization
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Device bound on the initializing thread
    #[serde(default)]
    pub default_device: DeviceId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Install the tracing subscriber at initialization
    #[serde(default)]
    pub install: bool,
    #[serde(default)]
    pub level: LogLevel,
    /// Forward span begin/end events to the trace hook
    #[serde(default)]
    pub traces: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

fn default_true() -> bool {
    true
}

impl Default for AccelerateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_device: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            install: false,
            level: LogLevel::default(),
            traces: false,
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<BlasConfig> {
        let mut config = Self::load_from_files()?;
        Self::apply_environment_variables(&mut config)?;
        Ok(config)
    }

    fn load_from_files() -> Result<BlasConfig> {
        for path in Self::find_config_files() {
            if path.exists() {
                info!("unblas: loading configuration from {}", path.display());
                return Self::load_from_file(&path);
            }
        }
        debug!("unblas: no configuration file found, using defaults");
        Ok(BlasConfig::default())
    }

    fn find_config_files() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(config_path) = env::var("UNBLAS_CONFIG") {
            paths.push(PathBuf::from(config_path));
        }

        if let Ok(current_dir) = env::current_dir() {
            for name in [".unblas.yaml", ".unblas.yml", ".unblas.json", ".unblas.toml"] {
                paths.push(current_dir.join(name));
            }
        }

        if let Some(home_dir) = dirs::home_dir() {
            for name in ["config.yaml", "config.yml", "config.json", "config.toml"] {
                paths.push(home_dir.join(".config/unblas").join(name));
            }
        }

        paths
    }

    pub fn load_from_file(path: &Path) -> Result<BlasConfig> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?,
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?,
            Some("toml") => toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?,
            _ => {
                if let Ok(config) = serde_yaml::from_str(&content) {
                    config
                } else if let Ok(config) = serde_json::from_str(&content) {
                    config
                } else {
                    return Err(anyhow::anyhow!(
                        "Could not parse config file {} (tried YAML, JSON)",
                        path.display()
                    ));
                }
            }
        };

        Ok(config)
    }

    fn apply_environment_variables(config: &mut BlasConfig) -> Result<()> {
        if let Ok(path) = env::var("UNBLAS_LIBRARY") {
            config.library.path = Some(PathBuf::from(path));
        }

        if let Ok(value) = env::var("UNBLAS_MANGLING") {
            config.abi.mangling = Some(
                value
                    .parse()
                    .map_err(anyhow::Error::msg)
                    .context("UNBLAS_MANGLING")?,
            );
        }
        if let Ok(value) = env::var("UNBLAS_STRLEN") {
            config.abi.strlen = Some(
                value
                    .parse()
                    .map_err(anyhow::Error::msg)
                    .context("UNBLAS_STRLEN")?,
            );
        }
        if let Ok(value) = env::var("UNBLAS_COMPLEX_RETURN") {
            config.abi.complex_return = Some(
                value
                    .parse()
                    .map_err(anyhow::Error::msg)
                    .context("UNBLAS_COMPLEX_RETURN")?,
            );
        }
        if let Ok(value) = env::var("UNBLAS_FLOAT_RETURN") {
            config.abi.float_return = Some(
                value
                    .parse()
                    .map_err(anyhow::Error::msg)
                    .context("UNBLAS_FLOAT_RETURN")?,
            );
        }

        if let Ok(enabled) = env::var("UNBLAS_ACCELERATE") {
            config.accelerate.enabled = parse_bool(&enabled).unwrap_or(true);
        }
        if let Ok(device) = env::var("UNBLAS_DEVICE") {
            if let Ok(device) = device.trim().parse() {
                config.accelerate.default_device = device;
            }
        }

        if let Ok(level) = env::var("UNBLAS_LOG_LEVEL") {
            config.logging.level = match level.to_lowercase().as_str() {
                "error" => LogLevel::Error,
                "warn" => LogLevel::Warn,
                "info" => LogLevel::Info,
                "debug" => LogLevel::Debug,
                "trace" => LogLevel::Trace,
                _ => config.logging.level,
            };
        }

        Ok(())
    }

    pub fn save_to_file(config: &BlasConfig, path: &Path) -> Result<()> {
        let content = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::to_string_pretty(config)
                .context("Failed to serialize config to JSON")?,
            Some("toml") => {
                toml::to_string_pretty(config).context("Failed to serialize config to TOML")?
            }
            _ => serde_yaml::to_string(config).context("Failed to serialize config to YAML")?,
        };

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        info!("unblas: configuration saved to {}", path.display());
        Ok(())
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "enable" | "enabled" => Some(true),
        "0" | "false" | "no" | "off" | "disable" | "disabled" => Some(false),
        "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use std::sync::Mutex;
    use tempfile::TempDir;

    static ENV_GUARD: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ENV_VARS: &[&str] = &[
        "UNBLAS_CONFIG",
        "UNBLAS_LIBRARY",
        "UNBLAS_MANGLING",
        "UNBLAS_STRLEN",
        "UNBLAS_COMPLEX_RETURN",
        "UNBLAS_FLOAT_RETURN",
        "UNBLAS_ACCELERATE",
        "UNBLAS_DEVICE",
        "UNBLAS_LOG_LEVEL",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = BlasConfig::default();
        assert!(config.abi.is_empty());
        assert_eq!(config.abi.resolve(), AbiProfile::build_default());
        assert!(config.accelerate.enabled);
        assert_eq!(config.accelerate.default_device, 0);
        assert!(!config.logging.install);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_abi_overrides() {
        let abi = AbiConfig {
            mangling: Some(Mangling::Upper),
            complex_return: Some(ComplexReturn::HiddenArgument),
            ..Default::default()
        };
        let profile = abi.resolve();
        assert_eq!(profile.mangling, Mangling::Upper);
        assert_eq!(profile.complex_return, ComplexReturn::HiddenArgument);
        assert_eq!(profile.strlen, AbiProfile::build_default().strlen);
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = "abi:\n  mangling: upper-underscore\naccelerate:\n  default_device: 1\n";
        let config: BlasConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.abi.mangling, Some(Mangling::UpperUnderscore));
        assert!(config.abi.strlen.is_none());
        assert!(config.accelerate.enabled);
        assert_eq!(config.accelerate.default_device, 1);
    }

    #[test]
    fn test_json_serialization() {
        let mut config = BlasConfig::default();
        config.library.candidates = vec!["openblas".to_string()];
        config.logging.level = LogLevel::Debug;
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: BlasConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.library.candidates, vec!["openblas".to_string()]);
        assert_eq!(parsed.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_file_loading() {
        let temp_dir = TempDir::new().unwrap();
        for name in [".unblas.yaml", ".unblas.json", ".unblas.toml"] {
            let config_path = temp_dir.path().join(name);
            let mut config = BlasConfig::default();
            config.abi.strlen = Some(StrlenConvention::None);
            config.library.path = Some(PathBuf::from("/opt/blas/libblas.so"));
            config.accelerate.enabled = false;

            ConfigLoader::save_to_file(&config, &config_path).unwrap();
            let loaded = ConfigLoader::load_from_file(&config_path).unwrap();

            assert_eq!(loaded.abi.strlen, Some(StrlenConvention::None), "{name}");
            assert_eq!(
                loaded.library.path.as_deref(),
                Some(Path::new("/opt/blas/libblas.so"))
            );
            assert!(!loaded.accelerate.enabled);
        }
    }

    #[test]
    fn test_environment_overrides() {
        let _guard = ENV_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("custom.yaml");
        let mut on_disk = BlasConfig::default();
        on_disk.accelerate.default_device = 3;
        ConfigLoader::save_to_file(&on_disk, &config_path).unwrap();

        env::set_var("UNBLAS_CONFIG", &config_path);
        env::set_var("UNBLAS_MANGLING", "lower");
        env::set_var("UNBLAS_FLOAT_RETURN", "double");
        env::set_var("UNBLAS_ACCELERATE", "off");
        env::set_var("UNBLAS_LOG_LEVEL", "TRACE");
        let loaded = ConfigLoader::load();
        clear_env();

        let loaded = loaded.unwrap();
        assert_eq!(loaded.accelerate.default_device, 3);
        assert_eq!(loaded.abi.mangling, Some(Mangling::Lower));
        assert_eq!(loaded.abi.float_return, Some(FloatReturn::Double));
        assert!(!loaded.accelerate.enabled);
        assert_eq!(loaded.logging.level, LogLevel::Trace);
    }

    #[test]
    fn test_invalid_abi_variable() {
        let _guard = ENV_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("empty.json");
        ConfigLoader::save_to_file(&BlasConfig::default(), &config_path).unwrap();
        env::set_var("UNBLAS_CONFIG", &config_path);
        env::set_var("UNBLAS_STRLEN", "sometimes");
        let loaded = ConfigLoader::load();
        clear_env();
        let err = loaded.unwrap_err();
        assert!(format!("{err:#}").contains("UNBLAS_STRLEN"));
    }

    #[test]
    fn test_bool_parsing() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("Enabled"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
