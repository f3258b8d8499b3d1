//! Persistence for the TOTP secret.
//!
//! The secret is created lazily, exactly once: [`SecretStore::get_or_create`]
//! is an atomic "set if absent", so concurrent first requests agree on a
//! single secret.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::totp::OtpSecret;
use crate::error::SecretStoreError;

/// Named string secrets.
pub trait SecretStore: Send + Sync {
    /// Read a secret, `None` if it was never set.
    fn get(&self, name: &str) -> Result<Option<String>, SecretStoreError>;

    /// Write a secret, replacing any previous value.
    fn set(&self, name: &str, value: &str) -> Result<(), SecretStoreError>;

    /// Return the stored secret, storing `init()` first if there is none.
    ///
    /// When two callers race, the first writer wins and both observe its value.
    fn get_or_create(
        &self,
        name: &str,
        init: &dyn Fn() -> String,
    ) -> Result<String, SecretStoreError>;
}

/// Load the TOTP secret stored under `name`, generating it on first use.
pub fn load_or_create_secret(
    store: &dyn SecretStore,
    name: &str,
) -> Result<OtpSecret, SecretStoreError> {
    let encoded = store.get_or_create(name, &|| {
        tracing::info!(name, "Generating new TOTP secret");
        OtpSecret::generate().to_base32()
    })?;
    OtpSecret::from_base32(&encoded).ok_or_else(|| SecretStoreError::Corrupt(name.to_string()))
}

/// Process-local secret store, used in tests and for ephemeral servers.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: Mutex<HashMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretStore for MemorySecretStore {
    fn get(&self, name: &str) -> Result<Option<String>, SecretStoreError> {
        let secrets = self.secrets.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(secrets.get(name).cloned())
    }

    fn set(&self, name: &str, value: &str) -> Result<(), SecretStoreError> {
        let mut secrets = self.secrets.lock().unwrap_or_else(PoisonError::into_inner);
        secrets.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn get_or_create(
        &self,
        name: &str,
        init: &dyn Fn() -> String,
    ) -> Result<String, SecretStoreError> {
        let mut secrets = self.secrets.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(secrets.entry(name.to_string()).or_insert_with(init).clone())
    }
}

/// One file per secret inside a directory.
///
/// Files are written to a temporary name and then linked into place, so a
/// reader never observes a half-written secret and `get_or_create` cannot
/// overwrite an existing one.
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    dir: PathBuf,
}

impl FileSecretStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, SecretStoreError> {
        let valid = !name.is_empty()
            && !name.starts_with('.')
            && name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.'));
        if !valid {
            return Err(SecretStoreError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(name))
    }

    /// Write `value` to a fresh temporary file next to the target.
    fn write_temp(&self, name: &str, value: &str) -> Result<PathBuf, SecretStoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| SecretStoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let tmp = self
            .dir
            .join(format!(".{name}.{:016x}.tmp", rand::random::<u64>()));
        let io_err = |source| SecretStoreError::Io {
            path: tmp.clone(),
            source,
        };

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&tmp).map_err(io_err)?;
        file.write_all(value.as_bytes()).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        Ok(tmp)
    }
}

impl SecretStore for FileSecretStore {
    fn get(&self, name: &str) -> Result<Option<String>, SecretStoreError> {
        let path = self.path_for(name)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content.trim().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SecretStoreError::Io { path, source }),
        }
    }

    fn set(&self, name: &str, value: &str) -> Result<(), SecretStoreError> {
        let path = self.path_for(name)?;
        let tmp = self.write_temp(name, value)?;
        fs::rename(&tmp, &path).map_err(|source| {
            let _ = fs::remove_file(&tmp);
            SecretStoreError::Io { path, source }
        })
    }

    fn get_or_create(
        &self,
        name: &str,
        init: &dyn Fn() -> String,
    ) -> Result<String, SecretStoreError> {
        if let Some(existing) = self.get(name)? {
            return Ok(existing);
        }

        let path = self.path_for(name)?;
        let value = init();
        let tmp = self.write_temp(name, &value)?;
        // hard_link fails if the target exists: first writer wins.
        let linked = fs::hard_link(&tmp, &path);
        let _ = fs::remove_file(&tmp);

        match linked {
            Ok(()) => Ok(value),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::debug!(name, "Secret created concurrently, using stored value");
                self.get(name)?
                    .ok_or_else(|| SecretStoreError::Corrupt(name.to_string()))
            }
            Err(source) => Err(SecretStoreError::Io { path, source }),
        }
    }
}
