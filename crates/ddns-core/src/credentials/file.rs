// # File Credentials
//
// Reads the access key and the secret key from two separate files, e.g.
// container secrets mounted at `/run/secrets/aws_access_key_id`.
//
// ## Format
//
// Each file's raw contents are the secret value, verbatim. Nothing is parsed
// or trimmed: a trailing newline in the file ends up in the key.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::Error;
use crate::traits::credential_source::{CredentialSource, Credentials};

/// Credential pair stored in two files
///
/// # Example
///
/// ```rust,no_run
/// use ddns_core::credentials::FileCredentials;
/// use ddns_core::traits::CredentialSource;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let source = FileCredentials::new(
///         "/run/secrets/aws_access_key_id",
///         "/run/secrets/aws_secret_access_key",
///     );
///     let creds = source.load().await?;
///     println!("{:?}", creds);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileCredentials {
    access_key_path: PathBuf,
    secret_key_path: PathBuf,
}

impl FileCredentials {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(access_key_path: P, secret_key_path: Q) -> Self {
        Self {
            access_key_path: access_key_path.as_ref().to_path_buf(),
            secret_key_path: secret_key_path.as_ref().to_path_buf(),
        }
    }

    async fn read_secret(path: &Path) -> Result<String, Error> {
        // Only the path goes into the error, never the contents
        fs::read_to_string(path).await.map_err(|e| {
            Error::credentials(format!(
                "Failed to read secret file {}: {}",
                path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl CredentialSource for FileCredentials {
    async fn load(&self) -> Result<Credentials, Error> {
        let access_key = Self::read_secret(&self.access_key_path).await?;
        let secret_key = Self::read_secret(&self.secret_key_path).await?;

        tracing::debug!(
            "Loaded credentials from {} and {}",
            self.access_key_path.display(),
            self.secret_key_path.display()
        );

        Ok(Credentials::new(access_key, secret_key))
    }

    fn source_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn secret_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_reads_contents_verbatim() {
        let key = secret_file("AKIAEXAMPLE");
        let secret = secret_file("secret with trailing newline\n");

        let creds = FileCredentials::new(key.path(), secret.path())
            .load()
            .await
            .unwrap();

        assert_eq!(creds.access_key, "AKIAEXAMPLE");
        assert_eq!(creds.secret_key, "secret with trailing newline\n");
        assert_eq!(creds.session_token, None);
    }

    #[tokio::test]
    async fn test_missing_file_is_credential_error() {
        let key = secret_file("AKIAEXAMPLE");
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");

        let err = FileCredentials::new(key.path(), &missing)
            .load()
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Credentials(_)));
        assert!(err.is_configuration());
        assert!(err.to_string().contains("does-not-exist"));
    }
}
