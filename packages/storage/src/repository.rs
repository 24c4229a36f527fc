use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entity::stored_asset;
use crate::error::StorageError;

/// Reference to the domain record an asset is attached to.
///
/// This is a back-reference only: the owner does not contain the asset,
/// and an asset carrying an `OwnerRef` may outlive operations on the
/// owner until an explicit bulk deletion runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerRef {
    /// Owner entity type (e.g. "post").
    pub owner_type: String,
    /// Owner entity ID (canonical string form).
    pub owner_id: String,
}

impl OwnerRef {
    pub fn new(owner_type: impl Into<String>, owner_id: impl ToString) -> Self {
        Self {
            owner_type: owner_type.into(),
            owner_id: owner_id.to_string(),
        }
    }
}

/// Insert payload for a stored-asset metadata row.
#[derive(Debug, Clone)]
pub struct NewStoredAsset {
    pub file_name: String,
    pub stored_name: String,
    pub content_type: String,
    pub owner: OwnerRef,
    pub is_media: bool,
}

/// Metadata repository capability used by the asset store.
#[async_trait]
pub trait AssetRepository: Send + Sync {
    /// Persist a new metadata row and return it with its generated id.
    async fn save(&self, asset: NewStoredAsset) -> Result<stored_asset::Model, StorageError>;

    /// Look up a row by its unique stored name.
    async fn find_by_stored_name(
        &self,
        stored_name: &str,
    ) -> Result<Option<stored_asset::Model>, StorageError>;

    /// All rows attached to an owner, oldest first.
    async fn find_all_by_owner(
        &self,
        owner: &OwnerRef,
    ) -> Result<Vec<stored_asset::Model>, StorageError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<stored_asset::Model>, StorageError>;

    /// Delete a row by id. Deleting an absent row is a no-op.
    async fn delete(&self, id: i64) -> Result<(), StorageError>;
}

/// sea-orm implementation over a live database connection.
pub struct SeaOrmAssetRepository {
    db: DatabaseConnection,
}

impl SeaOrmAssetRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AssetRepository for SeaOrmAssetRepository {
    async fn save(&self, asset: NewStoredAsset) -> Result<stored_asset::Model, StorageError> {
        let model = stored_asset::ActiveModel {
            file_name: Set(asset.file_name),
            stored_name: Set(asset.stored_name),
            content_type: Set(asset.content_type),
            owner_type: Set(asset.owner.owner_type),
            owner_id: Set(asset.owner.owner_id),
            is_media: Set(asset.is_media),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        Ok(model.insert(&self.db).await?)
    }

    async fn find_by_stored_name(
        &self,
        stored_name: &str,
    ) -> Result<Option<stored_asset::Model>, StorageError> {
        Ok(stored_asset::Entity::find()
            .filter(stored_asset::Column::StoredName.eq(stored_name))
            .one(&self.db)
            .await?)
    }

    async fn find_all_by_owner(
        &self,
        owner: &OwnerRef,
    ) -> Result<Vec<stored_asset::Model>, StorageError> {
        Ok(stored_asset::Entity::find()
            .filter(stored_asset::Column::OwnerType.eq(&owner.owner_type))
            .filter(stored_asset::Column::OwnerId.eq(&owner.owner_id))
            .order_by_asc(stored_asset::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<stored_asset::Model>, StorageError> {
        Ok(stored_asset::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn delete(&self, id: i64) -> Result<(), StorageError> {
        stored_asset::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
