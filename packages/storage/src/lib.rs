pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod filename;
pub mod paths;
pub mod repository;
pub mod store;

pub use config::StorageConfig;
pub use error::{BulkDeleteFailure, StorageError};
pub use paths::StoragePaths;
pub use repository::{AssetRepository, NewStoredAsset, OwnerRef, SeaOrmAssetRepository};
pub use store::{AssetFile, AssetStore, BoxReader};
