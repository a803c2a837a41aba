//! Post queries and the publish workflow.

use serde_json::json;

use crate::error::Error;
use crate::models::{Asset, Post, decode_document};
use crate::remote::{Backend, Preview, Query, unique_id};

/// Document attribute holding the creation timestamp, assigned by the service.
const CREATED_AT: &str = "$createdAt";

/// Number of posts shown in the latest-posts rail.
const LATEST_POSTS_LIMIT: u32 = 7;

/// Transform for post thumbnails: fit into a 2000x2000 box, crop from the
/// top, keep full quality.
const THUMBNAIL_PREVIEW: Preview = Preview {
    width: 2000,
    height: 2000,
    gravity: "top",
    quality: 100,
};

/// The single validation message shown for an incomplete form. Which
/// fields are missing is deliberately not enumerated.
pub const MISSING_FIELDS: &str = "Please fill in all the fields";

/// Completed create-form contents handed to [`publish`].
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub prompt: String,
    pub video: Option<Asset>,
    pub thumbnail: Option<Asset>,
    /// Profile document id of the publishing user.
    pub creator_id: String,
}

/// Every post, newest first.
pub async fn all_posts(backend: &impl Backend) -> Result<Vec<Post>, Error> {
    list_posts(backend, vec![Query::OrderDesc(CREATED_AT)]).await
}

/// The most recent posts for the home rail.
pub async fn latest_posts(backend: &impl Backend) -> Result<Vec<Post>, Error> {
    list_posts(
        backend,
        vec![
            Query::OrderDesc(CREATED_AT),
            Query::Limit(LATEST_POSTS_LIMIT),
        ],
    )
    .await
}

/// Full-text search on post titles.
pub async fn search_posts(backend: &impl Backend, term: &str) -> Result<Vec<Post>, Error> {
    list_posts(backend, vec![Query::Search("title", term.to_string())]).await
}

/// Posts published by one creator, newest first.
pub async fn user_posts(backend: &impl Backend, creator_id: &str) -> Result<Vec<Post>, Error> {
    list_posts(
        backend,
        vec![
            Query::Equal("creator", creator_id.to_string()),
            Query::OrderDesc(CREATED_AT),
        ],
    )
    .await
}

async fn list_posts(backend: &impl Backend, queries: Vec<Query>) -> Result<Vec<Post>, Error> {
    let collection = &backend.config().post_collection_id;
    let list = backend.list_documents(collection, &queries).await?;
    list.documents.into_iter().map(decode_document).collect()
}

/// Publish a new post: validate, upload both media files concurrently,
/// then create the post document.
///
/// Uploads are never rolled back. When one sibling fails after the other
/// already landed, no document is created and the landed file stays behind
/// in storage; it is logged so it can be reconciled later.
pub async fn publish(backend: &impl Backend, new_post: &NewPost) -> Result<Post, Error> {
    if new_post.title.trim().is_empty()
        || new_post.prompt.trim().is_empty()
        || new_post.video.is_none()
        || new_post.thumbnail.is_none()
    {
        return Err(Error::invalid_input(MISSING_FIELDS));
    }

    let (video, thumbnail) = tokio::join!(
        upload_media(backend, new_post.video.as_ref()),
        upload_media(backend, new_post.thumbnail.as_ref()),
    );
    let (video_url, thumbnail_url) = match (video, thumbnail) {
        (Ok(video_url), Ok(thumbnail_url)) => (video_url, thumbnail_url),
        (Err(err), Ok(thumbnail_url)) => {
            tracing::warn!(orphan = %thumbnail_url, "thumbnail landed but video upload failed");
            return Err(err);
        }
        (Ok(video_url), Err(err)) => {
            tracing::warn!(orphan = %video_url, "video landed but thumbnail upload failed");
            return Err(err);
        }
        (Err(err), Err(_)) => return Err(err),
    };

    let fields = json!({
        "title": new_post.title,
        "prompt": new_post.prompt,
        "video": video_url,
        "thumbnail": thumbnail_url,
        "creator": new_post.creator_id,
    });
    let collection = &backend.config().post_collection_id;
    let document = backend
        .create_document(collection, &unique_id(), fields)
        .await?;
    decode_document(document)
}

enum MediaKind {
    Video,
    Image,
}

/// Classify an asset by its MIME type. Anything that is neither video nor
/// image is rejected rather than silently defaulted.
fn media_kind(mime_type: &str) -> Result<MediaKind, Error> {
    if mime_type.starts_with("video/") {
        Ok(MediaKind::Video)
    } else if mime_type.starts_with("image/") {
        Ok(MediaKind::Image)
    } else {
        Err(Error::invalid_input(format!(
            "unsupported media type: {mime_type}"
        )))
    }
}

/// Upload one media asset and derive its retrieval URL: videos resolve to
/// the direct view URL, images to the fixed-transform preview. The kind is
/// checked before any remote call is made.
async fn upload_media(backend: &impl Backend, asset: Option<&Asset>) -> Result<String, Error> {
    let asset = asset.ok_or_else(|| Error::invalid_input("no media file selected"))?;
    let kind = media_kind(&asset.mime_type)?;

    let stored = backend.create_file(&unique_id(), asset).await?;
    Ok(match kind {
        MediaKind::Video => backend.file_view_url(&stored.id),
        MediaKind::Image => backend.file_preview_url(&stored.id, &THUMBNAIL_PREVIEW),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{Call, FakeBackend, asset, post_document};

    fn complete_post() -> NewPost {
        NewPost {
            title: "Sunrise".to_string(),
            prompt: "a timelapse of sunrise over mountains".to_string(),
            video: Some(asset("clip.mp4", "video/mp4")),
            thumbnail: Some(asset("cover.png", "image/png")),
            creator_id: "user-1".to_string(),
        }
    }

    #[tokio::test]
    async fn incomplete_forms_never_reach_the_remote_service() {
        let backend = FakeBackend::new();

        let variants = [
            NewPost {
                title: String::new(),
                ..complete_post()
            },
            NewPost {
                prompt: "   ".to_string(),
                ..complete_post()
            },
            NewPost {
                video: None,
                ..complete_post()
            },
            NewPost {
                thumbnail: None,
                ..complete_post()
            },
        ];
        for new_post in &variants {
            let err = publish(&backend, new_post).await.expect_err("must fail");
            assert!(matches!(&err, Error::InvalidInput(msg) if msg == MISSING_FIELDS));
        }
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn publishing_uploads_both_files_then_creates_the_document() {
        let backend = FakeBackend::new();

        let post = publish(&backend, &complete_post()).await.expect("publish");

        let calls = backend.calls();
        assert_eq!(calls.len(), 3);
        let uploaded: Vec<&str> = calls[..2]
            .iter()
            .map(|call| match call {
                Call::CreateFile { file_name } => file_name.as_str(),
                other => panic!("expected uploads first, got {other:?}"),
            })
            .collect();
        assert!(uploaded.contains(&"clip.mp4"));
        assert!(uploaded.contains(&"cover.png"));

        let Call::CreateDocument {
            collection_id,
            fields,
        } = &calls[2]
        else {
            panic!("expected document creation last, got {:?}", calls[2]);
        };
        assert_eq!(collection_id, "posts");
        assert_eq!(fields["title"], "Sunrise");
        assert_eq!(fields["prompt"], "a timelapse of sunrise over mountains");
        assert_eq!(fields["creator"], "user-1");

        let video_url = fields["video"].as_str().expect("video url");
        let thumbnail_url = fields["thumbnail"].as_str().expect("thumbnail url");
        assert!(video_url.ends_with("/view"));
        assert!(thumbnail_url.contains("width=2000&height=2000&gravity=top&quality=100"));

        assert_eq!(post.title, "Sunrise");
        assert_eq!(post.creator, "user-1");
        assert_eq!(post.video, video_url);
        assert_eq!(post.thumbnail, thumbnail_url);
    }

    #[tokio::test]
    async fn a_failed_upload_prevents_document_creation() {
        let backend = FakeBackend {
            failing_uploads: vec!["clip.mp4".to_string()],
            ..FakeBackend::new()
        };

        let err = publish(&backend, &complete_post())
            .await
            .expect_err("must fail");
        assert!(matches!(err, Error::Remote(_)));

        // The thumbnail upload still ran (and its file is now an orphan),
        // but no document was created.
        let calls = backend.calls();
        assert_eq!(calls.len(), 2);
        assert!(
            calls
                .iter()
                .all(|call| matches!(call, Call::CreateFile { .. }))
        );
    }

    #[tokio::test]
    async fn unrecognized_media_types_fail_before_any_upload() {
        let backend = FakeBackend::new();
        let new_post = NewPost {
            video: Some(asset("notes.pdf", "application/pdf")),
            ..complete_post()
        };

        let err = publish(&backend, &new_post).await.expect_err("must fail");
        assert!(matches!(&err, Error::InvalidInput(msg) if msg.contains("application/pdf")));
        // The well-formed thumbnail upload may have run; the bad asset
        // itself must not have been sent.
        assert!(!backend.calls().iter().any(
            |call| matches!(call, Call::CreateFile { file_name } if file_name == "notes.pdf"),
        ));
    }

    #[tokio::test]
    async fn latest_posts_order_and_limit_the_query() {
        let backend = FakeBackend::with_documents(vec![vec![
            post_document("post-2", "Second"),
            post_document("post-1", "First"),
        ]]);

        let posts = latest_posts(&backend).await.expect("latest");

        assert_eq!(
            backend.calls(),
            vec![Call::ListDocuments {
                collection_id: "posts".to_string(),
                queries: vec![
                    r#"orderDesc("$createdAt")"#.to_string(),
                    "limit(7)".to_string(),
                ],
            }]
        );
        // Document order is the service's order; decoding preserves it.
        let ids: Vec<&str> = posts.iter().map(|post| post.id.as_str()).collect();
        assert_eq!(ids, ["post-2", "post-1"]);
    }

    #[tokio::test]
    async fn all_posts_order_by_creation_time_descending() {
        let backend = FakeBackend::with_documents(vec![vec![]]);

        all_posts(&backend).await.expect("all");

        assert_eq!(
            backend.calls(),
            vec![Call::ListDocuments {
                collection_id: "posts".to_string(),
                queries: vec![r#"orderDesc("$createdAt")"#.to_string()],
            }]
        );
    }

    #[tokio::test]
    async fn search_queries_the_title_attribute() {
        let backend = FakeBackend::with_documents(vec![vec![]]);

        search_posts(&backend, "sunrise").await.expect("search");

        assert_eq!(
            backend.calls(),
            vec![Call::ListDocuments {
                collection_id: "posts".to_string(),
                queries: vec![r#"search("title", "sunrise")"#.to_string()],
            }]
        );
    }

    #[tokio::test]
    async fn user_posts_filter_by_creator_newest_first() {
        let backend = FakeBackend::with_documents(vec![vec![]]);

        user_posts(&backend, "user-7").await.expect("user posts");

        assert_eq!(
            backend.calls(),
            vec![Call::ListDocuments {
                collection_id: "posts".to_string(),
                queries: vec![
                    r#"equal("creator", ["user-7"])"#.to_string(),
                    r#"orderDesc("$createdAt")"#.to_string(),
                ],
            }]
        );
    }
}
