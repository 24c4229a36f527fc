use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::entity::stored_asset;
use crate::error::{BulkDeleteFailure, StorageError};
use crate::filename::{file_extension, sanitize_original_name};
use crate::paths::StoragePaths;
use crate::repository::{AssetRepository, NewStoredAsset, OwnerRef};

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// A loaded asset ready to be streamed back to the caller.
pub struct AssetFile {
    /// Display name: the original upload name when metadata exists,
    /// otherwise the stored name itself.
    pub file_name: String,
    pub content_type: String,
    /// Streams the file content without buffering it whole.
    pub reader: BoxReader,
}

/// Filesystem-backed asset store with a metadata side-table.
///
/// Files live flat under the storage root, keyed by a generated stored
/// name. Assets stored with an owner also get a metadata row through the
/// injected [`AssetRepository`]; owner-less assets are addressed by their
/// stored name alone.
pub struct AssetStore {
    paths: StoragePaths,
    repo: Arc<dyn AssetRepository>,
    fallback_content_type: String,
}

impl AssetStore {
    /// Create the store, ensuring the storage root exists.
    pub async fn new(
        config: &StorageConfig,
        repo: Arc<dyn AssetRepository>,
    ) -> Result<Self, StorageError> {
        let paths = StoragePaths::new(&config.upload_dir).await?;
        Ok(Self {
            paths,
            repo,
            fallback_content_type: config.fallback_content_type.clone(),
        })
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// Store an uploaded byte stream and return its generated stored name.
    ///
    /// The file is written before any metadata row is created, so a
    /// repository failure can only leave an orphaned file behind, never a
    /// row pointing at a missing file. When `content_type` is absent it is
    /// guessed from the file name, falling back to the configured default.
    #[instrument(skip(self, reader))]
    pub async fn store(
        &self,
        reader: BoxReader,
        original_name: &str,
        content_type: Option<&str>,
        owner: Option<OwnerRef>,
        is_media: bool,
    ) -> Result<String, StorageError> {
        let file_name = sanitize_original_name(original_name)?;
        let stored_name = generate_stored_name(&file_name);
        let target = self.paths.resolve(&stored_name)?;

        write_stream(&target, reader).await?;

        if let Some(owner) = owner {
            let content_type = match content_type {
                Some(ct) => ct.to_string(),
                None => mime_guess::from_path(&file_name)
                    .first()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| self.fallback_content_type.clone()),
            };

            self.repo
                .save(NewStoredAsset {
                    file_name,
                    stored_name: stored_name.clone(),
                    content_type,
                    owner,
                    is_media,
                })
                .await?;
        }

        Ok(stored_name)
    }

    /// Convenience wrapper over [`AssetStore::store`] for in-memory content.
    pub async fn store_bytes(
        &self,
        data: &[u8],
        original_name: &str,
        content_type: Option<&str>,
        owner: Option<OwnerRef>,
        is_media: bool,
    ) -> Result<String, StorageError> {
        let reader: BoxReader = Box::new(Cursor::new(data.to_vec()));
        self.store(reader, original_name, content_type, owner, is_media)
            .await
    }

    /// Load an asset for reading, merging filesystem state with metadata.
    ///
    /// Assets without a metadata row are served under their stored name
    /// with the configured fallback content type.
    #[instrument(skip(self))]
    pub async fn load(&self, stored_name: &str) -> Result<AssetFile, StorageError> {
        let path = self.paths.resolve(stored_name)?;

        // Opening instead of a separate existence check tolerates the file
        // disappearing under a concurrent delete.
        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(stored_name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let reader: BoxReader = Box::new(BufReader::new(file));

        match self.repo.find_by_stored_name(stored_name).await? {
            Some(asset) => Ok(AssetFile {
                file_name: asset.file_name,
                content_type: asset.content_type,
                reader,
            }),
            None => Ok(AssetFile {
                file_name: stored_name.to_string(),
                content_type: self.fallback_content_type.clone(),
                reader,
            }),
        }
    }

    /// Delete every asset attached to `owner`, file first and then the
    /// metadata row. Returns the number of assets removed.
    ///
    /// A file that is already gone counts as deleted (the end state matches
    /// intent). Any other per-asset failure does not abort the sweep; the
    /// full outcome is reported as [`StorageError::PartialBulkDelete`].
    #[instrument(skip(self))]
    pub async fn delete_by_owner(&self, owner: &OwnerRef) -> Result<u64, StorageError> {
        let assets = self.repo.find_all_by_owner(owner).await?;

        let mut deleted = Vec::new();
        let mut failed = Vec::new();

        for asset in assets {
            match self.remove_asset(&asset).await {
                Ok(()) => deleted.push(asset.id),
                Err(e) => failed.push(BulkDeleteFailure {
                    id: asset.id,
                    stored_name: asset.stored_name.clone(),
                    reason: e.to_string(),
                }),
            }
        }

        if failed.is_empty() {
            Ok(deleted.len() as u64)
        } else {
            Err(StorageError::PartialBulkDelete { deleted, failed })
        }
    }

    /// Delete a single asset by its metadata identifier, removing both the
    /// row and the on-disk file.
    #[instrument(skip(self))]
    pub async fn delete_by_id(&self, id: i64) -> Result<(), StorageError> {
        let asset = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("stored asset {id}")))?;

        self.remove_asset(&asset).await
    }

    /// Delete a file that has no metadata row, e.g. a replaced profile
    /// image. Fails with [`StorageError::NotFound`] when the file is
    /// already absent.
    #[instrument(skip(self))]
    pub async fn delete_file(&self, stored_name: &str) -> Result<(), StorageError> {
        let path = self.paths.resolve(stored_name)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(stored_name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove an asset's file and metadata row. Tolerates a file that is
    /// already missing; the row is removed either way.
    async fn remove_asset(&self, asset: &stored_asset::Model) -> Result<(), StorageError> {
        let path = self.paths.resolve(&asset.stored_name)?;

        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    stored_name = %asset.stored_name,
                    "file already missing, removing metadata only"
                );
            }
            Err(e) => return Err(e.into()),
        }

        self.repo.delete(asset.id).await
    }
}

/// Generate a stored name: `<YYYYMMDD>(<uuid-v4>)<extension>`.
///
/// Freshness of the UUID is the sole collision defense; no existence
/// probe or retry is made before the write.
fn generate_stored_name(file_name: &str) -> String {
    format!(
        "{}({}){}",
        Utc::now().format("%Y%m%d"),
        Uuid::new_v4(),
        file_extension(file_name)
    )
}

/// Stream `reader` to `path`, creating or replacing the file.
async fn write_stream(path: &Path, mut reader: BoxReader) -> Result<(), StorageError> {
    let mut file = fs::File::create(path).await?;
    let mut buf = vec![0u8; 64 * 1024]; // 64KB read buffer

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n]).await?;
    }

    file.flush().await?;
    Ok(())
}
