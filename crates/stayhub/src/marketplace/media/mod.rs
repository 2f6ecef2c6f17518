//! Photo storage behind a gateway trait: accept a named blob, hand back a
//! publicly resolvable URL.

pub mod drive;

use async_trait::async_trait;
use std::fmt::Debug;

pub use drive::GoogleDriveMediaStore;

/// A photo as received from the intake form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

/// A stored photo: backend identifier plus the URL clients embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPhoto {
    pub asset_id: String,
    pub public_url: String,
}

/// Media backend failures are infrastructure errors; callers may retry the
/// whole operation.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("media backend failed: {0}")]
    Backend(String),
}

/// Object-storage seam for listing photos.
#[async_trait]
pub trait MediaGateway: Debug + Send + Sync {
    async fn store_photo(&self, upload: PhotoUpload) -> Result<StoredPhoto, MediaError>;
}
