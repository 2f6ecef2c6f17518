use std::io::Cursor;

use async_trait::async_trait;
use chrono::Utc;
use google_drive3::{api::File, api::Permission, api::Scope, DriveHub};

use super::{MediaError, MediaGateway, PhotoUpload, StoredPhoto};

/// Drive-backed photo storage. Uploads the blob, grants anyone-with-link
/// read access, and returns the direct-content URL.
pub struct GoogleDriveMediaStore<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    hub: DriveHub<C>,
    folder_id: Option<String>,
}

impl<C> GoogleDriveMediaStore<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    pub fn new(hub: DriveHub<C>, folder_id: Option<String>) -> Self {
        Self { hub, folder_id }
    }

    fn map_error<E: std::fmt::Display>(err: E) -> MediaError {
        MediaError::Backend(err.to_string())
    }
}

impl<C> std::fmt::Debug for GoogleDriveMediaStore<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleDriveMediaStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl<C> MediaGateway for GoogleDriveMediaStore<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    async fn store_photo(&self, upload: PhotoUpload) -> Result<StoredPhoto, MediaError> {
        // Prefix with an upload stamp so repeated file names stay distinct.
        let stored_name = format!("{}-{}", Utc::now().timestamp_millis(), upload.file_name);
        let metadata = File {
            name: Some(stored_name),
            mime_type: Some(upload.content_type.clone()),
            parents: self.folder_id.as_ref().map(|parent| vec![parent.clone()]),
            ..File::default()
        };

        let mime_type = upload
            .content_type
            .parse::<mime::Mime>()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM);
        let cursor = Cursor::new(upload.content);

        let (_, file) = self
            .hub
            .files()
            .create(metadata)
            .param("fields", "id")
            .supports_all_drives(true)
            .add_scope(Scope::File)
            .upload(cursor, mime_type)
            .await
            .map_err(Self::map_error)?;

        let asset_id = file
            .id
            .ok_or_else(|| MediaError::Backend("upload returned no file id".to_string()))?;

        let permission = Permission {
            role: Some("reader".to_string()),
            type_: Some("anyone".to_string()),
            ..Permission::default()
        };
        self.hub
            .permissions()
            .create(permission, &asset_id)
            .supports_all_drives(true)
            .add_scope(Scope::File)
            .doit()
            .await
            .map_err(Self::map_error)?;

        let public_url = format!("https://drive.google.com/uc?id={asset_id}");
        Ok(StoredPhoto {
            asset_id,
            public_url,
        })
    }
}
