use std::fmt;

/// Per-asset outcome recorded when a bulk owner deletion partially fails.
#[derive(Debug)]
pub struct BulkDeleteFailure {
    /// Metadata identifier of the asset that could not be cleaned up.
    pub id: i64,
    /// Its on-disk stored name.
    pub stored_name: String,
    /// What went wrong for this asset.
    pub reason: String,
}

/// Errors that can occur during asset storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// The storage root could not be created at startup.
    Config(String),
    /// The uploaded file name is empty or contains a path-escape sequence.
    InvalidFileName(String),
    /// A stored name would resolve outside the storage root.
    PathTraversal(String),
    /// An I/O error occurred while writing, reading or deleting a file.
    Io(std::io::Error),
    /// The requested file or metadata record was not found.
    NotFound(String),
    /// The metadata repository failed.
    Database(sea_orm::DbErr),
    /// One or more assets could not be cleaned up during a bulk owner
    /// deletion. Lists both the assets that were removed and the ones
    /// that were not.
    PartialBulkDelete {
        deleted: Vec<i64>,
        failed: Vec<BulkDeleteFailure>,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "storage configuration error: {msg}"),
            Self::InvalidFileName(name) => write!(f, "invalid file name: {name}"),
            Self::PathTraversal(name) => {
                write!(f, "stored name escapes the storage root: {name}")
            }
            Self::Io(err) => write!(f, "storage IO error: {err}"),
            Self::NotFound(name) => write!(f, "file not found: {name}"),
            Self::Database(err) => write!(f, "metadata repository error: {err}"),
            Self::PartialBulkDelete { deleted, failed } => {
                write!(
                    f,
                    "bulk delete partially failed: {} removed, {} failed (",
                    deleted.len(),
                    failed.len()
                )?;
                for (i, failure) in failed.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", failure.stored_name, failure.reason)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Database(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<sea_orm::DbErr> for StorageError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err)
    }
}
