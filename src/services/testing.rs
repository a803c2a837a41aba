//! In-memory fake of the remote contract for workflow tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::Utc;
use reqwest::StatusCode;
use serde_json::{Value, json};

use crate::config::Config;
use crate::error::Error;
use crate::models::{Account, Asset, DocumentList, Session, StoredFile};
use crate::remote::{Backend, Preview, Query};

/// One remote call observed by the fake, in issue order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateAccount { email: String },
    CreateSession { email: String },
    CurrentAccount,
    DeleteSession,
    CreateDocument { collection_id: String, fields: Value },
    ListDocuments { collection_id: String, queries: Vec<String> },
    CreateFile { file_name: String },
}

pub struct FakeBackend {
    pub(crate) config: Config,
    pub(crate) calls: Mutex<Vec<Call>>,
    /// File names whose upload the fake store rejects.
    pub failing_uploads: Vec<String>,
    pub fail_create_account: bool,
    pub fail_create_session: bool,
    pub fail_create_document: bool,
    /// Answer `current_account` with 401, as the service does without a session.
    pub unauthorized: bool,
    /// Scripted document batches for successive `list_documents` calls.
    pub(crate) document_lists: Mutex<VecDeque<Vec<Value>>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            config: test_config(),
            calls: Mutex::new(Vec::new()),
            failing_uploads: Vec::new(),
            fail_create_account: false,
            fail_create_session: false,
            fail_create_document: false,
            unauthorized: false,
            document_lists: Mutex::new(VecDeque::new()),
        }
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(batches: Vec<Vec<Value>>) -> Self {
        Self {
            document_lists: Mutex::new(batches.into()),
            ..Self::default()
        }
    }

    /// Every call observed so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn rejected(what: &str) -> Error {
        Error::service(StatusCode::BAD_REQUEST, format!("{what} rejected"))
    }
}

impl Backend for FakeBackend {
    fn config(&self) -> &Config {
        &self.config
    }

    async fn create_account(
        &self,
        account_id: &str,
        email: &str,
        _password: &str,
        name: &str,
    ) -> Result<Account, Error> {
        self.record(Call::CreateAccount {
            email: email.to_string(),
        });
        if self.fail_create_account {
            return Err(Self::rejected("account"));
        }
        Ok(Account {
            id: account_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
        })
    }

    async fn create_email_session(&self, email: &str, _password: &str) -> Result<Session, Error> {
        self.record(Call::CreateSession {
            email: email.to_string(),
        });
        if self.fail_create_session {
            return Err(Self::rejected("session"));
        }
        Ok(Session {
            id: "session-1".to_string(),
            user_id: "account-1".to_string(),
            secret: "secret-1".to_string(),
            expires_at: Utc::now(),
        })
    }

    async fn current_account(&self) -> Result<Account, Error> {
        self.record(Call::CurrentAccount);
        if self.unauthorized {
            return Err(Error::service(
                StatusCode::UNAUTHORIZED,
                "missing scope: account",
            ));
        }
        Ok(Account {
            id: "account-1".to_string(),
            email: "user@example.com".to_string(),
            name: "user".to_string(),
        })
    }

    async fn delete_current_session(&self) -> Result<(), Error> {
        self.record(Call::DeleteSession);
        Ok(())
    }

    async fn create_document(
        &self,
        collection_id: &str,
        document_id: &str,
        fields: Value,
    ) -> Result<Value, Error> {
        self.record(Call::CreateDocument {
            collection_id: collection_id.to_string(),
            fields: fields.clone(),
        });
        if self.fail_create_document {
            return Err(Self::rejected("document"));
        }
        // Echo the stored document with service-assigned metadata.
        let mut document = fields;
        document["$id"] = json!(document_id);
        document["$createdAt"] = json!(Utc::now().to_rfc3339());
        Ok(document)
    }

    async fn list_documents(
        &self,
        collection_id: &str,
        queries: &[Query],
    ) -> Result<DocumentList, Error> {
        self.record(Call::ListDocuments {
            collection_id: collection_id.to_string(),
            queries: queries.iter().map(Query::render).collect(),
        });
        let documents = self
            .document_lists
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default();
        Ok(DocumentList {
            total: documents.len() as u64,
            documents,
        })
    }

    async fn create_file(&self, file_id: &str, asset: &Asset) -> Result<StoredFile, Error> {
        self.record(Call::CreateFile {
            file_name: asset.file_name.clone(),
        });
        if self.failing_uploads.contains(&asset.file_name) {
            return Err(Self::rejected("file"));
        }
        Ok(StoredFile {
            id: file_id.to_string(),
            name: asset.file_name.clone(),
            mime_type: asset.mime_type.clone(),
            size: asset.size,
        })
    }

    fn file_view_url(&self, file_id: &str) -> String {
        format!("https://fake.test/files/{file_id}/view")
    }

    fn file_preview_url(&self, file_id: &str, preview: &Preview) -> String {
        format!(
            "https://fake.test/files/{file_id}/preview?width={}&height={}&gravity={}&quality={}",
            preview.width, preview.height, preview.gravity, preview.quality,
        )
    }

    fn initials_avatar_url(&self, name: &str) -> String {
        format!("https://fake.test/avatars/initials?name={name}")
    }
}

pub fn test_config() -> Config {
    Config {
        endpoint: "https://fake.test/v1".to_string(),
        project_id: "proj".to_string(),
        database_id: "db".to_string(),
        user_collection_id: "users".to_string(),
        post_collection_id: "posts".to_string(),
        storage_bucket_id: "media".to_string(),
    }
}

/// Local asset stub; the fake never touches the path.
pub fn asset(file_name: &str, mime_type: &str) -> Asset {
    Asset {
        path: file_name.into(),
        file_name: file_name.to_string(),
        mime_type: mime_type.to_string(),
        size: 4,
    }
}

/// A post document the fake database would return.
pub fn post_document(id: &str, title: &str) -> Value {
    json!({
        "$id": id,
        "$createdAt": "2026-02-01T12:00:00.000Z",
        "title": title,
        "prompt": "a prompt",
        "thumbnail": "https://fake.test/files/t/preview",
        "video": "https://fake.test/files/v/view",
        "creator": "user-1",
    })
}
