//! Shared data models used across modules.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, RemoteFailure};

/// A media file on the local device, not yet uploaded.
///
/// Produced by whatever picks the file (here: a CLI path argument) and
/// consumed only by the upload operation.
#[derive(Debug, Clone)]
pub struct Asset {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: String,
    pub size: u64,
}

impl Asset {
    /// Build an asset reference from a local path. The MIME type is derived
    /// from the file extension; unknown extensions are rejected up front.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::invalid_input("asset path has no file name"))?
            .to_string();
        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
        let mime_type = mime_for_extension(extension)
            .ok_or_else(|| Error::invalid_input(format!("unsupported media file: {file_name}")))?
            .to_string();
        let size = std::fs::metadata(&path)
            .map_err(|err| Error::invalid_input(format!("cannot read {}: {err}", path.display())))?
            .len();

        Ok(Self {
            path,
            file_name,
            mime_type,
            size,
        })
    }
}

/// MIME type for a media file extension. Mirrors the set the service
/// accepts for uploads.
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "mp4" => Some("video/mp4"),
        "webm" => Some("video/webm"),
        "mov" => Some("video/quicktime"),
        _ => None,
    }
}

/// Auth principal owned by the remote service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "$id")]
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Server-tracked authentication context, established by sign-in and
/// terminated by sign-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Token sent on authenticated requests. Only returned at creation.
    pub secret: String,
    #[serde(rename = "expire")]
    pub expires_at: DateTime<Utc>,
}

/// Profile document created once at registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "accountId")]
    pub account_id: String,
    pub email: String,
    pub username: String,
    pub avatar: String,
}

/// A published post document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub prompt: String,
    /// Preview URL of the uploaded thumbnail image.
    pub thumbnail: String,
    /// View URL of the uploaded video file.
    pub video: String,
    /// Profile document id of the publishing user.
    pub creator: String,
}

/// Envelope returned by document list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentList {
    pub total: u64,
    pub documents: Vec<Value>,
}

/// Metadata returned by the storage upload endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredFile {
    #[serde(rename = "$id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(rename = "sizeOriginal")]
    pub size: u64,
}

/// Decode a raw document into a typed model.
pub fn decode_document<T: DeserializeOwned>(document: Value) -> Result<T, Error> {
    serde_json::from_value(document)
        .map_err(|err| Error::Remote(RemoteFailure::Decode(err.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn mime_types_cover_the_accepted_media_set() {
        assert_eq!(mime_for_extension("mp4"), Some("video/mp4"));
        assert_eq!(mime_for_extension("MOV"), Some("video/quicktime"));
        assert_eq!(mime_for_extension("jpeg"), Some("image/jpeg"));
        assert_eq!(mime_for_extension("png"), Some("image/png"));
        assert_eq!(mime_for_extension("txt"), None);
        assert_eq!(mime_for_extension(""), None);
    }

    #[test]
    fn asset_from_path_fills_in_metadata() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("clip.mp4");
        let mut file = std::fs::File::create(&path).expect("create file");
        file.write_all(b"not really a video").expect("write");

        let asset = Asset::from_path(&path).expect("asset");
        assert_eq!(asset.file_name, "clip.mp4");
        assert_eq!(asset.mime_type, "video/mp4");
        assert_eq!(asset.size, 18);
    }

    #[test]
    fn asset_from_path_rejects_unknown_extensions() {
        let err = Asset::from_path("/tmp/notes.txt").expect_err("should reject");
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn documents_decode_with_service_assigned_fields() {
        let post: Post = decode_document(json!({
            "$id": "post-1",
            "$createdAt": "2026-01-15T10:30:00.000Z",
            "title": "Sunrise",
            "prompt": "a timelapse of sunrise over mountains",
            "thumbnail": "https://backend.example.com/v1/preview",
            "video": "https://backend.example.com/v1/view",
            "creator": "user-1",
        }))
        .expect("decode");

        assert_eq!(post.id, "post-1");
        assert_eq!(post.creator, "user-1");
    }

    #[test]
    fn malformed_documents_surface_as_decode_failures() {
        let result: Result<Post, Error> = decode_document(json!({"title": "missing the rest"}));
        assert!(matches!(
            result,
            Err(Error::Remote(RemoteFailure::Decode(_)))
        ));
    }
}
