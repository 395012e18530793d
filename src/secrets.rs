use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Error produced by a [`SecretResolver`] implementation. The connector
/// wraps it in [`crate::PgConnectorError::SecretResolution`], preserving the
/// underlying cause.
pub type SecretError = Box<dyn std::error::Error + Send + Sync>;

/// Passwords with this suffix are file paths to a credential file rather
/// than literal secrets or lookup references.
pub(crate) const FILE_REFERENCE_SUFFIX: &str = ".key";

pub(crate) fn is_file_reference(password: &str) -> bool {
    password.ends_with(FILE_REFERENCE_SUFFIX)
}

/// The secret-resolution collaborator seam.
///
/// The connector routes password values here based purely on the filename
/// suffix convention: `*.key` values go to [`resolve_from_file`] with the
/// value as a path, everything else to [`resolve_from_reference`] with the
/// value as an opaque token. Implementations backed by an encrypting store,
/// a vault client, etc. plug in through this trait.
///
/// [`resolve_from_file`]: SecretResolver::resolve_from_file
/// [`resolve_from_reference`]: SecretResolver::resolve_from_reference
pub trait SecretResolver {
    /// Resolve a file-backed secret reference; `path` is the password value.
    ///
    /// # Errors
    /// Returns the underlying lookup failure.
    fn resolve_from_file(&self, path: &Path) -> Result<String, SecretError>;

    /// Resolve a string-backed secret reference.
    ///
    /// # Errors
    /// Returns the underlying lookup failure.
    fn resolve_from_reference(&self, reference: &str) -> Result<String, SecretError>;
}

/// Configuration section for the built-in [`SecretStore`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SecretsConfig {
    /// Directory holding named secret files for reference-backed lookups.
    pub dir: PathBuf,
}

/// File-backed secret store built from a [`SecretsConfig`] section.
///
/// File references are read from the path given in the password value;
/// string references are read from `<dir>/<reference>`. Trailing whitespace
/// (editor-appended newlines in credential files) is stripped.
#[derive(Debug, Clone)]
pub struct SecretStore {
    dir: PathBuf,
}

impl SecretStore {
    #[must_use]
    pub fn from_config(config: &SecretsConfig) -> Self {
        Self {
            dir: config.dir.clone(),
        }
    }

    fn read_secret(path: &Path) -> Result<String, SecretError> {
        let raw = fs::read_to_string(path)?;
        Ok(raw.trim_end().to_string())
    }
}

impl SecretResolver for SecretStore {
    fn resolve_from_file(&self, path: &Path) -> Result<String, SecretError> {
        Self::read_secret(path)
    }

    fn resolve_from_reference(&self, reference: &str) -> Result<String, SecretError> {
        Self::read_secret(&self.dir.join(reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_reference_suffix_detection() {
        assert!(is_file_reference("/etc/secrets/db.key"));
        assert!(is_file_reference("relative/path.key"));
        assert!(!is_file_reference("plain123"));
        assert!(!is_file_reference("db.key.old"));
    }

    #[test]
    fn store_reads_and_trims_file_secret() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.key");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "s3cret").unwrap();

        let store = SecretStore::from_config(&SecretsConfig {
            dir: dir.path().to_path_buf(),
        });
        assert_eq!(store.resolve_from_file(&path).unwrap(), "s3cret");
    }

    #[test]
    fn store_resolves_reference_under_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("svc-password"), "hunter2\n").unwrap();

        let store = SecretStore::from_config(&SecretsConfig {
            dir: dir.path().to_path_buf(),
        });
        assert_eq!(
            store.resolve_from_reference("svc-password").unwrap(),
            "hunter2"
        );
    }

    #[test]
    fn missing_secret_surfaces_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = SecretStore::from_config(&SecretsConfig {
            dir: dir.path().to_path_buf(),
        });
        assert!(store.resolve_from_reference("absent").is_err());
    }
}
