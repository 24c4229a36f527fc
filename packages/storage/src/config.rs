use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Storage subsystem configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Root directory for uploaded files. Created at startup if missing.
    pub upload_dir: String,
    /// Content type reported for assets that have no metadata row. The
    /// file behind such an entry need not be an image; deployments that
    /// store other kinds of owner-less assets should override this.
    pub fallback_content_type: String,
}

impl StorageConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("upload_dir", "./uploads")?
            .set_default("fallback_content_type", "image/jpeg")?
            // Load from config/storage.toml
            .add_source(File::with_name("config/storage").required(false))
            // Override from environment (e.g., STORAGE__UPLOAD_DIR)
            .add_source(Environment::with_prefix("STORAGE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: "./uploads".into(),
            fallback_content_type: "image/jpeg".into(),
        }
    }
}
