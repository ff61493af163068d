use std::path::{Path, PathBuf};

use secrecy::Secret;

/// File name searched for when no explicit key path is configured
pub const DEFAULT_KEY_FILE_NAME: &str = ".coinbase_cloud_api_key.json";
/// Environment variable holding the API key name
pub const DEFAULT_NAME_ENV_VAR: &str = "COINBASE_CLOUD_API_KEY_NAME";
/// Environment variable holding the API private key
pub const DEFAULT_PRIVATE_KEY_ENV_VAR: &str = "COINBASE_CLOUD_API_PRIVATE_KEY";

/// Which sources the key loader may consult
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SourceMode {
    /// Key file first, then direct values or the environment for missing fields
    #[default]
    FileThenEnv,
    /// Key file only; direct values and the environment are never read
    FileOnly,
    /// Direct values or the environment only; the filesystem is never touched
    EnvOnly,
}

/// Configuration for resolving an API key
///
/// Built once through [`KeyLoaderConfig::builder`] and immutable afterwards.
/// The defaults search for [`DEFAULT_KEY_FILE_NAME`] upward from the current
/// working directory and then read [`DEFAULT_NAME_ENV_VAR`] and
/// [`DEFAULT_PRIVATE_KEY_ENV_VAR`] for any field the file did not provide.
///
/// # Example
/// ```rust
/// use cdpcurl::config::{KeyLoaderConfig, SourceMode};
///
/// let config = KeyLoaderConfig::builder()
///     .path("/etc/cdp/api_key.json")
///     .file_only()
///     .build();
///
/// assert_eq!(config.mode(), SourceMode::FileOnly);
/// assert!(config.path().is_some());
/// ```
#[derive(Clone, Debug)]
pub struct KeyLoaderConfig {
    path: Option<PathBuf>,
    file_name: String,
    start_dir: Option<PathBuf>,
    name_env_var: String,
    private_key_env_var: String,
    mode: SourceMode,
    direct: Option<DirectKey>,
}

/// A key name and private key supplied directly by the caller
#[derive(Clone, Debug)]
pub struct DirectKey {
    pub name: String,
    pub private_key: Secret<String>,
}

impl Default for KeyLoaderConfig {
    fn default() -> Self {
        Self {
            path: None,
            file_name: DEFAULT_KEY_FILE_NAME.to_string(),
            start_dir: None,
            name_env_var: DEFAULT_NAME_ENV_VAR.to_string(),
            private_key_env_var: DEFAULT_PRIVATE_KEY_ENV_VAR.to_string(),
            mode: SourceMode::default(),
            direct: None,
        }
    }
}

impl KeyLoaderConfig {
    pub fn builder() -> KeyLoaderConfigBuilder {
        KeyLoaderConfigBuilder::default()
    }

    /// Explicit key file path; disables the upward directory search
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Directory the upward search starts from; `None` means the working directory
    pub fn start_dir(&self) -> Option<&Path> {
        self.start_dir.as_deref()
    }

    pub fn name_env_var(&self) -> &str {
        &self.name_env_var
    }

    pub fn private_key_env_var(&self) -> &str {
        &self.private_key_env_var
    }

    pub fn mode(&self) -> SourceMode {
        self.mode
    }

    pub fn direct(&self) -> Option<&DirectKey> {
        self.direct.as_ref()
    }
}

/// Builder for [`KeyLoaderConfig`]
#[derive(Debug, Default)]
pub struct KeyLoaderConfigBuilder {
    config: KeyLoaderConfig,
}

impl KeyLoaderConfigBuilder {
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = Some(path.into());
        self
    }

    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.config.file_name = file_name.into();
        self
    }

    pub fn start_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.start_dir = Some(dir.into());
        self
    }

    /// Override the names of the two environment variables read for the key
    pub fn env_var_names(mut self, name: impl Into<String>, private_key: impl Into<String>) -> Self {
        self.config.name_env_var = name.into();
        self.config.private_key_env_var = private_key.into();
        self
    }

    /// Read only the key file. Replaces an earlier [`Self::env_only`].
    pub fn file_only(mut self) -> Self {
        self.config.mode = SourceMode::FileOnly;
        self
    }

    /// Read only direct values or the environment. Replaces an earlier [`Self::file_only`].
    pub fn env_only(mut self) -> Self {
        self.config.mode = SourceMode::EnvOnly;
        self
    }

    /// Supply the key directly. Ignored unless both values are non-empty.
    ///
    /// When set, the environment is not consulted; the direct values fill
    /// whatever the key file left empty.
    pub fn direct(mut self, name: impl Into<String>, private_key: impl Into<String>) -> Self {
        let name = name.into();
        let private_key = private_key.into();
        self.config.direct = if name.is_empty() || private_key.is_empty() {
            None
        } else {
            Some(DirectKey {
                name,
                private_key: Secret::new(private_key),
            })
        };
        self
    }

    pub fn build(self) -> KeyLoaderConfig {
        self.config
    }
}
