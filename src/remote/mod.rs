//! Typed client for the hosted backend service.
//!
//! The service exposes accounts/sessions, a document database, file
//! storage, and generated avatars over HTTP. Everything here is a one-shot
//! request/response wrapper: no retries, no caching, and no local state
//! beyond the adopted session secret.

mod accounts;
mod avatars;
mod databases;
mod storage;

use std::sync::{Mutex, MutexGuard};

use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Config;
use crate::error::Error;
use crate::models::{Account, Asset, DocumentList, Session, StoredFile};

pub use databases::Query;
pub use storage::Preview;

/// Header naming the project a request belongs to.
const PROJECT_HEADER: &str = "X-Project";
/// Header carrying the session secret on authenticated requests.
const SESSION_HEADER: &str = "X-Session";

/// Operations the data-access layer needs from the remote service.
///
/// [`Client`] is the real implementation; tests substitute an in-memory
/// fake that records calls.
#[allow(async_fn_in_trait)]
pub trait Backend {
    /// Configuration of the service this backend talks to.
    fn config(&self) -> &Config;

    async fn create_account(
        &self,
        account_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Account, Error>;

    async fn create_email_session(&self, email: &str, password: &str) -> Result<Session, Error>;

    async fn current_account(&self) -> Result<Account, Error>;

    async fn delete_current_session(&self) -> Result<(), Error>;

    async fn create_document(
        &self,
        collection_id: &str,
        document_id: &str,
        fields: Value,
    ) -> Result<Value, Error>;

    async fn list_documents(
        &self,
        collection_id: &str,
        queries: &[Query],
    ) -> Result<DocumentList, Error>;

    async fn create_file(&self, file_id: &str, asset: &Asset) -> Result<StoredFile, Error>;

    fn file_view_url(&self, file_id: &str) -> String;

    fn file_preview_url(&self, file_id: &str, preview: &Preview) -> String;

    fn initials_avatar_url(&self, name: &str) -> String;
}

/// HTTP client for the hosted service. Constructed once at startup and
/// passed by reference to every operation.
pub struct Client {
    config: Config,
    http: reqwest::Client,
    session: Mutex<Option<String>>,
}

impl Client {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            session: Mutex::new(None),
        }
    }

    /// Install a previously persisted session secret.
    pub fn set_session(&self, secret: impl Into<String>) {
        *self.lock_session() = Some(secret.into());
    }

    /// Drop the adopted session secret.
    pub fn clear_session(&self) {
        *self.lock_session() = None;
    }

    /// Currently adopted session secret, if any.
    pub fn session_secret(&self) -> Option<String> {
        self.lock_session().clone()
    }

    fn lock_session(&self) -> MutexGuard<'_, Option<String>> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .http
            .request(method, format!("{}{}", self.config.endpoint, path))
            .header(PROJECT_HEADER, &self.config.project_id);
        if let Some(secret) = self.session_secret() {
            request = request.header(SESSION_HEADER, secret);
        }
        request
    }
}

impl Backend for Client {
    fn config(&self) -> &Config {
        &self.config
    }

    async fn create_account(
        &self,
        account_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Account, Error> {
        Client::create_account(self, account_id, email, password, name).await
    }

    async fn create_email_session(&self, email: &str, password: &str) -> Result<Session, Error> {
        Client::create_email_session(self, email, password).await
    }

    async fn current_account(&self) -> Result<Account, Error> {
        Client::current_account(self).await
    }

    async fn delete_current_session(&self) -> Result<(), Error> {
        Client::delete_current_session(self).await
    }

    async fn create_document(
        &self,
        collection_id: &str,
        document_id: &str,
        fields: Value,
    ) -> Result<Value, Error> {
        Client::create_document(self, collection_id, document_id, fields).await
    }

    async fn list_documents(
        &self,
        collection_id: &str,
        queries: &[Query],
    ) -> Result<DocumentList, Error> {
        Client::list_documents(self, collection_id, queries).await
    }

    async fn create_file(&self, file_id: &str, asset: &Asset) -> Result<StoredFile, Error> {
        Client::create_file(self, file_id, asset).await
    }

    fn file_view_url(&self, file_id: &str) -> String {
        Client::file_view_url(self, file_id)
    }

    fn file_preview_url(&self, file_id: &str, preview: &Preview) -> String {
        Client::file_preview_url(self, file_id, preview)
    }

    fn initials_avatar_url(&self, name: &str) -> String {
        Client::initials_avatar_url(self, name)
    }
}

/// Decode a success body, or turn a non-success response into an [`Error`].
async fn handle_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, Error> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(error_from_response(status, body));
    }
    response.json().await.map_err(Error::from)
}

/// The service reports failures as `{"message": …}`; fall back to the raw
/// body when the shape differs.
fn error_from_response(status: StatusCode, body: String) -> Error {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|body| body.message)
        .unwrap_or(body);
    if status == StatusCode::NOT_FOUND {
        Error::not_found(message)
    } else {
        Error::service(status, message)
    }
}

pub(crate) fn percent_encode(s: &str) -> String {
    percent_encoding::utf8_percent_encode(s, percent_encoding::NON_ALPHANUMERIC).to_string()
}

/// Client-chosen unique id for new documents and files: 20 hex chars.
pub fn unique_id() -> String {
    use rand::Rng;

    let bytes: [u8; 10] = rand::rng().random();
    hex::encode(&bytes)
}

// Minimal hex encoding for generated ids.
mod hex {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

    pub fn encode(bytes: &[u8]) -> String {
        let mut result = String::with_capacity(bytes.len() * 2);
        for byte in bytes {
            result.push(HEX_CHARS[(byte >> 4) as usize] as char);
            result.push(HEX_CHARS[(byte & 0x0f) as usize] as char);
        }
        result
    }
}

#[cfg(test)]
pub(crate) fn test_client() -> Client {
    Client::new(Config {
        endpoint: "https://backend.example.com/v1".to_string(),
        project_id: "proj-1".to_string(),
        database_id: "db-1".to_string(),
        user_collection_id: "users".to_string(),
        post_collection_id: "posts".to_string(),
        storage_bucket_id: "media".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_ids_are_hex_and_distinct() {
        let first = unique_id();
        let second = unique_id();

        assert_eq!(first.len(), 20);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }

    #[test]
    fn error_bodies_decode_the_service_message() {
        let err = error_from_response(
            StatusCode::BAD_REQUEST,
            r#"{"message":"Invalid credentials","code":400}"#.to_string(),
        );
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert!(err.to_string().contains("Invalid credentials"));
    }

    #[test]
    fn unparsable_error_bodies_fall_back_to_raw_text() {
        let err = error_from_response(StatusCode::BAD_GATEWAY, "upstream timeout".to_string());
        assert!(err.to_string().contains("upstream timeout"));
    }

    #[test]
    fn missing_resources_map_to_not_found() {
        let err = error_from_response(
            StatusCode::NOT_FOUND,
            r#"{"message":"Document not found"}"#.to_string(),
        );
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn session_secret_can_be_installed_and_cleared() {
        let client = test_client();
        assert_eq!(client.session_secret(), None);

        client.set_session("secret-1");
        assert_eq!(client.session_secret(), Some("secret-1".to_string()));

        client.clear_session();
        assert_eq!(client.session_secret(), None);
    }
}
