use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::StorageError;
use crate::filename::contains_path_traversal;

/// Resolves logical stored names to absolute paths under the storage root.
///
/// Constructed once at startup and passed to whatever needs it; there is
/// no ambient global root.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl StoragePaths {
    /// Create the resolver, creating the root directory (and parents) if
    /// missing. The configured path is absolutized and lexically
    /// normalized first. Failure here means the process is misconfigured
    /// and cannot serve uploads at all.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref();
        let root = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|e| {
                    StorageError::Config(format!("cannot resolve working directory: {e}"))
                })?
                .join(root)
        };
        let root = normalize(root);

        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::Config(format!(
                "could not create storage root {}: {e}",
                root.display()
            ))
        })?;

        Ok(Self { root })
    }

    /// The absolute storage root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path for a stored name.
    ///
    /// Generated stored names never contain separators or `..`, but the
    /// name may come from an untrusted request path, so anything that
    /// could escape the root is rejected here as well.
    pub fn resolve(&self, stored_name: &str) -> Result<PathBuf, StorageError> {
        if stored_name.is_empty()
            || stored_name.contains('\0')
            || stored_name.contains('/')
            || stored_name.contains('\\')
            || contains_path_traversal(stored_name)
        {
            return Err(StorageError::PathTraversal(stored_name.to_string()));
        }

        Ok(self.root.join(stored_name))
    }
}

/// Lexically normalize an absolute path: drop `.` segments and resolve
/// `..` against the preceding component.
fn normalize(path: PathBuf) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}
