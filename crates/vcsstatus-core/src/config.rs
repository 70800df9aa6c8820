use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PartialConfig {
    pub socket_path: Option<PathBuf>,
    pub overwrite_socket: Option<bool>,
    pub inspect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub shutdown_grace_secs: Option<u64>,
    pub git_binary: Option<String>,
    pub hg_binary: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub socket_path: PathBuf,
    pub overwrite_socket: bool,
    pub inspect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub shutdown_grace_secs: u64,
    pub git_binary: String,
    pub hg_binary: String,
}

impl ResolvedConfig {
    pub fn defaults() -> Self {
        Self {
            socket_path: default_socket_path(),
            overwrite_socket: false,
            inspect_timeout_secs: 5,
            request_timeout_secs: 2,
            shutdown_grace_secs: 2,
            git_binary: "git".to_string(),
            hg_binary: "hg".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    MissingFile { path: PathBuf },
    #[error("config file read error: {path}: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("config file parse error: {path}: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("config path error: {0}")]
    Path(String),
    #[error("invalid env var {key}={value}")]
    InvalidEnv { key: String, value: String },
}

pub fn resolve_config(
    cli_path: Option<PathBuf>,
    overrides: PartialConfig,
) -> Result<ResolvedConfig, ConfigError> {
    let env_path = config_path_from_env();
    let required = cli_path.is_some() || env_path.is_some();
    let path = match cli_path.or(env_path) {
        Some(path) => path,
        None => default_config_path()?,
    };

    let file_config = load_config_file(&path, required)?;
    let env_config = load_env_config()?;

    let mut resolved = ResolvedConfig::defaults();
    // Precedence: defaults < config file < env vars < CLI overrides.
    file_config.apply_to(&mut resolved);
    env_config.apply_to(&mut resolved);
    overrides.apply_to(&mut resolved);

    Ok(resolved)
}

fn load_config_file(path: &Path, required: bool) -> Result<PartialConfig, ConfigError> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingFile {
                path: path.to_path_buf(),
            });
        }
        return Ok(PartialConfig::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    let config = toml::from_str(&contents).map_err(|source| ConfigError::ParseFile {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(config)
}

fn load_env_config() -> Result<PartialConfig, ConfigError> {
    let mut config = PartialConfig::default();

    if let Some(value) = env_os("VCSSTATUS_SOCKET_PATH") {
        config.socket_path = Some(PathBuf::from(value));
    }
    if let Some(value) = env("VCSSTATUS_OVERWRITE_SOCKET") {
        config.overwrite_socket = Some(parse_bool("VCSSTATUS_OVERWRITE_SOCKET", &value)?);
    }
    if let Some(value) = env("VCSSTATUS_INSPECT_TIMEOUT_SECS") {
        config.inspect_timeout_secs = Some(parse_u64("VCSSTATUS_INSPECT_TIMEOUT_SECS", &value)?);
    }
    if let Some(value) = env("VCSSTATUS_REQUEST_TIMEOUT_SECS") {
        config.request_timeout_secs = Some(parse_u64("VCSSTATUS_REQUEST_TIMEOUT_SECS", &value)?);
    }
    if let Some(value) = env("VCSSTATUS_SHUTDOWN_GRACE_SECS") {
        config.shutdown_grace_secs = Some(parse_u64("VCSSTATUS_SHUTDOWN_GRACE_SECS", &value)?);
    }
    if let Some(value) = env("VCSSTATUS_GIT") {
        config.git_binary = Some(value);
    }
    if let Some(value) = env("VCSSTATUS_HG") {
        config.hg_binary = Some(value);
    }

    Ok(config)
}

fn config_path_from_env() -> Option<PathBuf> {
    env_os("VCSSTATUS_CONFIG").map(PathBuf::from)
}

fn default_config_path() -> Result<PathBuf, ConfigError> {
    let base_dirs = directories::BaseDirs::new()
        .ok_or_else(|| ConfigError::Path("home directory not available".to_string()))?;

    if cfg!(target_os = "macos") {
        Ok(base_dirs
            .home_dir()
            .join("Library/Application Support/vcsstatus/config.toml"))
    } else {
        Ok(base_dirs.home_dir().join(".config/vcsstatus/config.toml"))
    }
}

/// `$HOME/.vcsstatus-sock`, or a file in the temp dir without a home.
pub fn default_socket_path() -> PathBuf {
    match directories::BaseDirs::new() {
        Some(base_dirs) => base_dirs.home_dir().join(".vcsstatus-sock"),
        None => std::env::temp_dir().join("vcsstatus.sock"),
    }
}

fn env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_os(key: &str) -> Option<OsString> {
    std::env::var_os(key)
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidEnv {
        key: key.to_string(),
        value: value.to_string(),
    })
}

impl PartialConfig {
    fn apply_to(self, resolved: &mut ResolvedConfig) {
        if let Some(value) = self.socket_path {
            resolved.socket_path = value;
        }
        if let Some(value) = self.overwrite_socket {
            resolved.overwrite_socket = value;
        }
        if let Some(value) = self.inspect_timeout_secs {
            resolved.inspect_timeout_secs = value;
        }
        if let Some(value) = self.request_timeout_secs {
            resolved.request_timeout_secs = value;
        }
        if let Some(value) = self.shutdown_grace_secs {
            resolved.shutdown_grace_secs = value;
        }
        if let Some(value) = self.git_binary {
            resolved.git_binary = value;
        }
        if let Some(value) = self.hg_binary {
            resolved.hg_binary = value;
        }
    }
}
