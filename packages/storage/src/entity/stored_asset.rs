use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Metadata side-table row for an uploaded asset.
///
/// A row exists only for assets stored with an owner; owner-less uploads
/// (e.g. profile images) live solely on disk under their stored name.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stored_asset")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Original upload filename, sanitized.
    pub file_name: String,

    /// System-generated filesystem key, `<date>(<uuid>)<extension>`.
    #[sea_orm(unique)]
    pub stored_name: String,

    /// MIME content type.
    pub content_type: String,

    /// Owner entity type (e.g. "post").
    pub owner_type: String,

    /// Owner entity ID (canonical string form).
    pub owner_id: String,

    /// Whether the asset is display media for its owner, as opposed to a
    /// plain attachment.
    pub is_media: bool,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
