//! File storage endpoints and retrieval URL derivation.

use reqwest::Method;
use reqwest::multipart::{Form, Part};

use crate::error::Error;
use crate::models::{Asset, StoredFile};

use super::{Client, percent_encode};

/// Transform applied when deriving an image preview URL.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub width: u32,
    pub height: u32,
    /// Crop anchor when the source does not fit the box.
    pub gravity: &'static str,
    /// Output quality, 0-100.
    pub quality: u8,
}

impl Client {
    /// Upload a local asset as one multipart request. The file is read from
    /// disk in full; the service does not offer chunked uploads.
    pub async fn create_file(&self, file_id: &str, asset: &Asset) -> Result<StoredFile, Error> {
        let bytes = tokio::fs::read(&asset.path).await.map_err(|err| {
            Error::invalid_input(format!("cannot read {}: {err}", asset.path.display()))
        })?;
        let part = Part::bytes(bytes)
            .file_name(asset.file_name.clone())
            .mime_str(&asset.mime_type)
            .map_err(|err| {
                Error::invalid_input(format!("invalid mime type {}: {err}", asset.mime_type))
            })?;
        let form = Form::new()
            .text("fileId", file_id.to_string())
            .part("file", part);

        let path = format!("/storage/buckets/{}/files", self.config.storage_bucket_id);
        let response = self
            .request(Method::POST, &path)
            .multipart(form)
            .send()
            .await?;
        super::handle_json(response).await
    }

    /// Direct download URL for a stored file.
    pub fn file_view_url(&self, file_id: &str) -> String {
        format!(
            "{}/storage/buckets/{}/files/{}/view?project={}",
            self.config.endpoint,
            self.config.storage_bucket_id,
            file_id,
            percent_encode(&self.config.project_id),
        )
    }

    /// Preview URL applying the given transform to a stored image.
    pub fn file_preview_url(&self, file_id: &str, preview: &Preview) -> String {
        format!(
            "{}/storage/buckets/{}/files/{}/preview?width={}&height={}&gravity={}&quality={}&project={}",
            self.config.endpoint,
            self.config.storage_bucket_id,
            file_id,
            preview.width,
            preview.height,
            preview.gravity,
            preview.quality,
            percent_encode(&self.config.project_id),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_client;
    use super::*;

    #[test]
    fn view_urls_point_at_the_file() {
        let client = test_client();
        assert_eq!(
            client.file_view_url("file-1"),
            "https://backend.example.com/v1/storage/buckets/media/files/file-1/view?project=proj%2D1"
        );
    }

    #[test]
    fn preview_urls_carry_the_transform() {
        let client = test_client();
        let url = client.file_preview_url(
            "file-1",
            &Preview {
                width: 2000,
                height: 2000,
                gravity: "top",
                quality: 100,
            },
        );
        assert_eq!(
            url,
            "https://backend.example.com/v1/storage/buckets/media/files/file-1/preview?width=2000&height=2000&gravity=top&quality=100&project=proj%2D1"
        );
    }
}
