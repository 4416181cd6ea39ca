//! Local filesystem storage for uploaded images.
//!
//! Files are stored flat under the configured upload directory, keyed by
//! their original filename, and served statically under `/uploads`.

use std::fmt;
use std::path::PathBuf;
use tokio::fs;

#[derive(Debug)]
pub enum StorageError {
    FileTooLarge { max_bytes: usize },
    InvalidName(String),
    Io(std::io::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileTooLarge { max_bytes } => {
                write!(f, "File exceeds maximum size of {} bytes", max_bytes)
            }
            Self::InvalidName(msg) => write!(f, "Invalid file name: {}", msg),
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[derive(Clone)]
pub struct LocalUploadStore {
    base_dir: PathBuf,
    max_file_size: usize,
}

impl LocalUploadStore {
    pub fn new(base_dir: PathBuf, max_file_size: usize) -> Self {
        Self {
            base_dir,
            max_file_size,
        }
    }

    /// Uploads are keyed by client-supplied filenames, so names must not
    /// escape the upload directory.
    fn validate_name(name: &str) -> Result<(), StorageError> {
        if name.is_empty() || name.contains("..") || name.contains('/') || name.contains('\\') {
            return Err(StorageError::InvalidName(
                "name must not be empty, contain '..', or contain path separators".to_string(),
            ));
        }

        if !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
        {
            return Err(StorageError::InvalidName(
                "name contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }

    /// Write the file and return its public URL path.
    pub async fn save(&self, name: &str, content: &[u8]) -> Result<String, StorageError> {
        Self::validate_name(name)?;

        if content.len() > self.max_file_size {
            return Err(StorageError::FileTooLarge {
                max_bytes: self.max_file_size,
            });
        }

        fs::create_dir_all(&self.base_dir).await?;
        fs::write(self.base_dir.join(name), content).await?;

        Ok(format!("/uploads/{}", name))
    }
}
