//! File-backed credential store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::{fs, io};

use artship_core::User;
use jiff::Timestamp;

use super::{CredentialStore, TRACING_TARGET, keys, parse_expiry, parse_user};
use crate::error::{Error, Result};

/// Credential store persisted as one JSON object of string values.
///
/// The on-disk shape matches the platform's storage keys, so the file is
/// interchangeable with a browser deployment's local storage export. Writes
/// go through a temp file and rename; a torn write therefore leaves the
/// previous file, not a half-written one. An unreadable or malformed file
/// reads as an empty record and is replaced on the next write.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: RwLock<HashMap<String, String>>,
    generation: AtomicU64,
}

impl FileStore {
    /// Opens the store at `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] when the parent directory cannot be
    /// created. A missing or malformed file is not an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                Error::storage(format!(
                    "cannot create credential directory {}: {err}",
                    parent.display()
                ))
            })?;
        }

        let values = load(&path);

        Ok(Self {
            path,
            values: RwLock::new(values),
            generation: AtomicU64::new(0),
        })
    }

    /// The file this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .expect("credential store lock poisoned")
            .get(key)
            .cloned()
    }

    fn put(&self, key: &str, value: Option<String>) {
        let mut values = self.values.write().expect("credential store lock poisoned");
        match value {
            Some(value) => {
                values.insert(key.to_owned(), value);
            }
            None => {
                values.remove(key);
            }
        }

        if let Err(err) = persist(&self.path, &values) {
            tracing::warn!(
                target: TRACING_TARGET,
                path = %self.path.display(),
                error = %err,
                "Failed to persist credential store"
            );
        }
        drop(values);

        self.generation.fetch_add(1, Ordering::Release);
    }
}

impl CredentialStore for FileStore {
    fn set_access_token(&self, token: Option<&str>) {
        self.put(keys::ACCESS_TOKEN, token.map(str::to_owned));
    }

    fn access_token(&self) -> Option<String> {
        self.get(keys::ACCESS_TOKEN)
    }

    fn set_refresh_token(&self, token: Option<&str>) {
        self.put(keys::REFRESH_TOKEN, token.map(str::to_owned));
    }

    fn refresh_token(&self) -> Option<String> {
        self.get(keys::REFRESH_TOKEN)
    }

    fn set_user(&self, user: Option<&User>) {
        let serialized = user.and_then(|user| match serde_json::to_string(user) {
            Ok(json) => Some(json),
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %err,
                    "Failed to serialize user record, removing stored user"
                );
                None
            }
        });
        self.put(keys::USER, serialized);
    }

    fn user(&self) -> Option<User> {
        self.get(keys::USER).as_deref().and_then(parse_user)
    }

    fn set_token_expiry(&self, expiry: Option<Timestamp>) {
        self.put(
            keys::TOKEN_EXPIRY,
            expiry.map(|expiry| expiry.as_millisecond().to_string()),
        );
    }

    fn token_expiry(&self) -> Option<Timestamp> {
        self.get(keys::TOKEN_EXPIRY).as_deref().and_then(parse_expiry)
    }

    fn clear(&self) {
        for key in keys::ALL {
            self.put(key, None);
        }
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

fn load(path: &Path) -> HashMap<String, String> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return HashMap::new(),
        Err(err) => {
            tracing::warn!(
                target: TRACING_TARGET,
                path = %path.display(),
                error = %err,
                "Cannot read credential file, starting empty"
            );
            return HashMap::new();
        }
    };

    match serde_json::from_str(&text) {
        Ok(values) => values,
        Err(err) => {
            tracing::warn!(
                target: TRACING_TARGET,
                path = %path.display(),
                error = %err,
                "Credential file is malformed, starting empty"
            );
            HashMap::new()
        }
    }
}

fn persist(path: &Path, values: &HashMap<String, String>) -> io::Result<()> {
    let serialized = serde_json::to_vec_pretty(values)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, serialized)?;
    fs::rename(&tmp, path)
}
