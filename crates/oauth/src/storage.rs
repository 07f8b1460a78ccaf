use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use {anyhow::Result, tempfile::NamedTempFile, tracing::warn};

use crate::{config_dir::sayvai_config_dir, types::Credential};

/// Persistence for the single credential record.
pub trait CredentialStore: Send + Sync {
    /// Returns `None` when the record is absent or unreadable.
    fn load(&self) -> Option<Credential>;

    /// Overwrite the record. A later `load` sees either the old or the new
    /// record, never a partial one.
    fn save(&self, credential: &Credential) -> Result<()>;

    /// Remove the record. Missing records are not an error.
    fn clear(&self) -> Result<()>;
}

/// File-based credential storage at `~/.config/sayvai/zoho_tokens.json`.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new() -> Self {
        let path = sayvai_config_dir().join("zoho_tokens.json");
        Self { path }
    }

    /// Create a store at a specific path (useful for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Default for FileCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<Credential> {
        let data = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&data) {
            Ok(credential) => Some(credential),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable credential file");
                None
            },
        }
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let data = serde_json::to_string_pretty(credential)?;

        // One temp file per save in the target directory; concurrent writers
        // never rename each other's partial output into place.
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(data.as_bytes())?;
        tmp.as_file().sync_all()?;

        // Set file permissions to 0600 on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }

        tmp.persist(&self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store, for tests and embedders that manage persistence
/// themselves.
#[derive(Default)]
pub struct MemoryCredentialStore {
    record: Mutex<Option<Credential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            record: Mutex::new(Some(credential)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Option<Credential> {
        self.record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
