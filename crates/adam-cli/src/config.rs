use adam_core::catalog::{self, DEFAULT_MODEL};
use adam_core::Theme;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Client configuration.
///
/// Built from defaults, then the optional TOML file, then `ADAM_*`
/// environment variables; command-line flags are applied last by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Scoring service base URL (default: http://localhost:8000).
    pub api_url: String,
    /// Model used for single and quick analyses.
    pub model: String,
    /// Whole-request timeout; analyses routinely take tens of seconds.
    pub request_timeout_secs: u64,
    /// V4L2 device path (default: /dev/video0).
    pub camera_device: String,
    /// Number of warmup frames to discard after opening the camera (AGC/AE stabilization).
    pub warmup_frames: usize,
    /// Seconds counted down before the shutter fires.
    pub countdown_secs: u32,
    /// JPEG quality for camera shots, 1-100.
    pub jpeg_quality: u8,
    /// Dark frames tolerated per shot before giving up.
    pub max_capture_attempts: usize,
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: adam_client::DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout_secs: 120,
            camera_device: "/dev/video0".to_string(),
            warmup_frames: 4,
            countdown_secs: adam_capture::countdown::DEFAULT_COUNTDOWN_SECS,
            jpeg_quality: 90,
            max_capture_attempts: 10,
            theme: Theme::default(),
        }
    }
}

/// On-disk layer; every key optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    api_url: Option<String>,
    model: Option<String>,
    request_timeout_secs: Option<u64>,
    camera_device: Option<String>,
    warmup_frames: Option<usize>,
    countdown_secs: Option<u32>,
    jpeg_quality: Option<u8>,
    max_capture_attempts: Option<usize>,
    theme: Option<Theme>,
}

impl Config {
    /// Load from the config file (if any) and `ADAM_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let env = |key: &str| std::env::var(key).ok();
        let path = config_path(env);
        Self::load(path.as_deref(), env)
    }

    /// Layer `path` and the variables visible through `env` over the defaults.
    pub fn load(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = path {
            let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let file: FileConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
            tracing::debug!(path = %path.display(), "loaded config file");
            config.apply_file(file);
        }

        config.apply_env(&env);
        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(v) = file.api_url {
            self.api_url = v;
        }
        if let Some(v) = file.model {
            self.model = v;
        }
        if let Some(v) = file.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        if let Some(v) = file.camera_device {
            self.camera_device = v;
        }
        if let Some(v) = file.warmup_frames {
            self.warmup_frames = v;
        }
        if let Some(v) = file.countdown_secs {
            self.countdown_secs = v;
        }
        if let Some(v) = file.jpeg_quality {
            self.jpeg_quality = v;
        }
        if let Some(v) = file.max_capture_attempts {
            self.max_capture_attempts = v;
        }
        if let Some(v) = file.theme {
            self.theme = v;
        }
    }

    fn apply_env(&mut self, env: &impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("ADAM_API_URL") {
            self.api_url = v;
        }
        if let Some(v) = env("ADAM_MODEL") {
            self.model = v;
        }
        if let Some(v) = env("ADAM_CAMERA_DEVICE") {
            self.camera_device = v;
        }
        self.request_timeout_secs = env_parse(env, "ADAM_REQUEST_TIMEOUT_SECS", self.request_timeout_secs);
        self.warmup_frames = env_parse(env, "ADAM_WARMUP_FRAMES", self.warmup_frames);
        self.countdown_secs = env_parse(env, "ADAM_COUNTDOWN_SECS", self.countdown_secs);
        self.jpeg_quality = env_parse(env, "ADAM_JPEG_QUALITY", self.jpeg_quality);
        self.max_capture_attempts = env_parse(env, "ADAM_MAX_CAPTURE_ATTEMPTS", self.max_capture_attempts);
        self.theme = env_parse(env, "ADAM_THEME", self.theme);
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// The model to ask for: `requested` if given, else the configured one.
    ///
    /// Ids missing from the built-in catalog are passed through (the service
    /// may know newer models) but logged.
    pub fn model_or(&self, requested: Option<String>) -> String {
        let model = requested.unwrap_or_else(|| self.model.clone());
        if !catalog::is_known(&model) {
            tracing::warn!(model = %model, "model is not in the built-in catalog; the service may reject it");
        }
        model
    }
}

/// `ADAM_CONFIG` if set, else `$XDG_CONFIG_HOME/adam/config.toml` when it exists.
pub fn config_path(env: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    if let Some(explicit) = env("ADAM_CONFIG") {
        return Some(PathBuf::from(explicit));
    }
    let config_home = env("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    let path = config_home.join("adam").join("config.toml");
    path.exists().then_some(path)
}

/// Parse an environment value, keeping `default` when unset or malformed.
fn env_parse<T: std::str::FromStr>(
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match env(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "ignoring malformed environment value");
            default
        }),
        None => default,
    }
}
