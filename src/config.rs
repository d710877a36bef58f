//! Configuration management for the icon store
//!
//! Separates startup configuration (network, storage location) from the
//! upload limits enforced at the ingestion boundary.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "ICON_STORE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config";
const ENV_PREFIX: &str = "ICON_STORE";
/// Headers and boundary bytes allowed per multipart part on top of its body.
const MULTIPART_PART_OVERHEAD: u64 = 16 * 1024;

/// Complete server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(flatten)]
    pub startup: StartupConfig,

    #[serde(flatten)]
    pub limits: UploadLimits,
}

/// Configuration read once at startup
#[derive(Debug, Deserialize, Clone)]
pub struct StartupConfig {
    /// IP address the HTTP listener binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP port
    /// Environment: ICON_STORE_PORT
    #[serde(default = "default_port")]
    pub port: u16,

    /// Store root directory
    /// Environment: ICON_STORE_STORAGE_ROOT
    #[serde(default = "default_storage_root")]
    pub storage_root: String,

    /// Public path prefix the store root is served under
    #[serde(default = "default_public_mount")]
    pub public_mount: String,
}

/// Limits applied to every upload batch
#[derive(Debug, Deserialize, Clone)]
pub struct UploadLimits {
    /// Maximum size of a single uploaded file in MB
    /// Environment: ICON_STORE_MAX_FILE_SIZE_MB
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,

    /// Maximum number of files accepted per upload request
    /// Environment: ICON_STORE_MAX_FILES_PER_UPLOAD
    #[serde(default = "default_max_files_per_upload")]
    pub max_files_per_upload: usize,

    /// Accepted file extensions, lowercase, without the dot
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    /// Accepted declared MIME types
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_storage_root() -> String {
    "./uploads".to_string()
}

fn default_public_mount() -> String {
    "/uploads".to_string()
}

fn default_max_file_size_mb() -> u64 {
    25
}

fn default_max_files_per_upload() -> usize {
    200
}

fn default_allowed_extensions() -> Vec<String> {
    vec!["svg".to_string(), "png".to_string()]
}

fn default_allowed_mime_types() -> Vec<String> {
    vec!["image/svg+xml".to_string(), "image/png".to_string()]
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            storage_root: default_storage_root(),
            public_mount: default_public_mount(),
        }
    }
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_size_mb: default_max_file_size_mb(),
            max_files_per_upload: default_max_files_per_upload(),
            allowed_extensions: default_allowed_extensions(),
            allowed_mime_types: default_allowed_mime_types(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `config.toml` (or `$ICON_STORE_CONFIG`) with
    /// environment overrides. The file is optional.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load from a specific config file path, still applying env overrides.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Default configuration rooted at `storage_root`.
    pub fn with_storage_root(storage_root: impl Into<String>) -> Self {
        Self {
            startup: StartupConfig {
                storage_root: storage_root.into(),
                ..StartupConfig::default()
            },
            limits: UploadLimits::default(),
        }
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.startup.port == 0 {
            return Err(ConfigError::Message("port cannot be 0".into()));
        }

        if self.startup.storage_root.trim().is_empty() {
            return Err(ConfigError::Message("storage_root cannot be empty".into()));
        }

        let mount = self.startup.public_mount.trim_end_matches('/');
        if !self.startup.public_mount.starts_with('/') || mount.is_empty() {
            return Err(ConfigError::Message(
                "public_mount must be an absolute path below '/'".into(),
            ));
        }

        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::Message(
                "max_file_size_mb must be greater than 0".into(),
            ));
        }

        if self.limits.max_files_per_upload == 0 {
            return Err(ConfigError::Message(
                "max_files_per_upload must be greater than 0".into(),
            ));
        }

        if self.limits.allowed_extensions.is_empty() {
            return Err(ConfigError::Message(
                "allowed_extensions cannot be empty".into(),
            ));
        }

        if self.limits.allowed_mime_types.is_empty() {
            return Err(ConfigError::Message(
                "allowed_mime_types cannot be empty".into(),
            ));
        }

        Ok(())
    }
}

impl StartupConfig {
    /// Bind address and port as a socket address string
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn storage_root_path(&self) -> PathBuf {
        PathBuf::from(&self.storage_root)
    }
}

impl UploadLimits {
    /// Get maximum file size in bytes
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    /// Upper bound for a whole upload request body, including multipart
    /// framing.
    pub fn max_request_bytes(&self) -> usize {
        let per_file = self.max_file_size_bytes().saturating_add(MULTIPART_PART_OVERHEAD);
        let total = per_file.saturating_mul(self.max_files_per_upload as u64);
        usize::try_from(total).unwrap_or(usize::MAX)
    }

    pub fn is_extension_allowed(&self, ext: &str) -> bool {
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    }

    pub fn is_mime_allowed(&self, mime: &str) -> bool {
        self.allowed_mime_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(mime))
    }
}
