use std::{
    env,
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use log::debug;
use secrecy::ExposeSecret;

use crate::{
    api_key::ApiKey,
    config::{KeyLoaderConfig, SourceMode},
    error::{AuthError, Result},
};

/// Resolve an API key according to `config`
///
/// Sources are consulted in a fixed order and each one only fills fields
/// that are still empty:
/// 1. The key file (skipped in [`SourceMode::EnvOnly`]): the explicit path if
///    one is configured, otherwise the first file named
///    [`KeyLoaderConfig::file_name`] found walking upward from the start
///    directory.
/// 2. Direct values if configured, else the two environment variables
///    (skipped in [`SourceMode::FileOnly`]).
///
/// # Errors
/// - `KeyLoad` when an explicit key file cannot be opened, any key file that
///   exists fails to parse, a directory on the search path fails with an
///   error other than "not found", or neither name nor private key ends up
///   non-empty.
///
/// # Example
/// ```rust
/// use cdpcurl::{config::KeyLoaderConfig, load_api_key};
///
/// let config = KeyLoaderConfig::builder()
///     .env_only()
///     .direct("organizations/o/apiKeys/k", "c2VjcmV0")
///     .build();
/// let key = load_api_key(&config).unwrap();
/// assert_eq!(key.name(), "organizations/o/apiKeys/k");
/// ```
pub fn load_api_key(config: &KeyLoaderConfig) -> Result<ApiKey> {
    let mut partial = PartialKey::default();

    if config.mode() != SourceMode::EnvOnly {
        if let Some(found) = load_from_file(config)? {
            partial.fill_from(found);
        }
    }

    if config.mode() != SourceMode::FileOnly {
        load_from_env(config, &mut partial);
    }

    if partial.name.is_empty() || partial.private_key.is_empty() {
        return Err(AuthError::KeyLoad("could not load api key".to_string()));
    }

    Ok(ApiKey::new(partial.name, partial.private_key))
}

#[derive(Default)]
struct PartialKey {
    name: String,
    private_key: String,
}

impl PartialKey {
    fn fill_from(&mut self, key: ApiKey) {
        self.fill(key.name(), key.private_key().expose_secret());
    }

    fn fill(&mut self, name: &str, private_key: &str) {
        if self.name.is_empty() {
            self.name = name.to_string();
        }
        if self.private_key.is_empty() {
            self.private_key = private_key.to_string();
        }
    }
}

fn load_from_file(config: &KeyLoaderConfig) -> Result<Option<ApiKey>> {
    if let Some(path) = config.path() {
        let file = File::open(path)
            .map_err(|e| AuthError::KeyLoad(format!("file load: {}: {}", path.display(), e)))?;
        return read_key_file(file, path).map(Some);
    }

    let start = start_dir(config)?;
    for dir in start.ancestors() {
        let candidate = dir.join(config.file_name());
        match File::open(&candidate) {
            Ok(file) => return read_key_file(file, &candidate).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => {
                return Err(AuthError::KeyLoad(format!(
                    "file load: {}: {}",
                    candidate.display(),
                    e
                )))
            }
        }
    }

    debug!("no {} found above {}", config.file_name(), start.display());
    Ok(None)
}

fn start_dir(config: &KeyLoaderConfig) -> Result<PathBuf> {
    let cwd = || {
        env::current_dir()
            .map_err(|e| AuthError::KeyLoad(format!("file load: working directory: {}", e)))
    };
    match config.start_dir() {
        Some(dir) if dir.is_absolute() => Ok(dir.to_path_buf()),
        Some(dir) => Ok(cwd()?.join(dir)),
        None => cwd(),
    }
}

fn read_key_file(file: File, path: &Path) -> Result<ApiKey> {
    let key: ApiKey = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AuthError::KeyLoad(format!("file load: {}: {}", path.display(), e)))?;
    debug!("loaded api key file {}", path.display());
    Ok(key)
}

fn load_from_env(config: &KeyLoaderConfig, partial: &mut PartialKey) {
    if let Some(direct) = config.direct() {
        debug!("filling api key from directly supplied values");
        partial.fill(&direct.name, direct.private_key.expose_secret());
        return;
    }

    // Unset and non-unicode variables both count as empty.
    let name = env::var(config.name_env_var()).unwrap_or_default();
    let private_key = env::var(config.private_key_env_var()).unwrap_or_default();
    debug!(
        "filling api key from environment variables {} and {}",
        config.name_env_var(),
        config.private_key_env_var()
    );
    partial.fill(&name, &private_key);
}
