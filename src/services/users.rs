//! Registration, sign-in, and current-user resolution.

use reqwest::StatusCode;
use serde_json::json;

use crate::error::Error;
use crate::models::{Session, UserProfile, decode_document};
use crate::remote::{Backend, Query, unique_id};

/// Create an account, establish its first session, then store the profile
/// document.
///
/// There is no compensating rollback: a failure after the account exists
/// reports the error to the caller and leaves the account (and session, if
/// it got that far) in place. Orphans are logged so they can be reconciled
/// later.
pub async fn register(
    backend: &impl Backend,
    email: &str,
    password: &str,
    username: &str,
) -> Result<UserProfile, Error> {
    let account = backend
        .create_account(&unique_id(), email, password, username)
        .await?;
    let avatar = backend.initials_avatar_url(username);

    if let Err(err) = sign_in(backend, email, password).await {
        tracing::warn!(account_id = %account.id, "account created but first sign-in failed");
        return Err(err);
    }

    let fields = json!({
        "accountId": account.id,
        "email": email,
        "username": username,
        "avatar": avatar,
    });
    let collection = &backend.config().user_collection_id;
    let document = match backend
        .create_document(collection, &unique_id(), fields)
        .await
    {
        Ok(document) => document,
        Err(err) => {
            tracing::warn!(
                account_id = %account.id,
                "account and session exist but profile creation failed"
            );
            return Err(err);
        }
    };
    decode_document(document)
}

/// Sign in with email and password, establishing a session.
pub async fn sign_in(backend: &impl Backend, email: &str, password: &str) -> Result<Session, Error> {
    backend.create_email_session(email, password).await
}

/// Delete the current session.
pub async fn sign_out(backend: &impl Backend) -> Result<(), Error> {
    backend.delete_current_session().await
}

/// Profile of the signed-in user, or `None` when no session is active.
///
/// Not being signed in is a normal state, not an error: an unauthorized
/// answer from the service maps to `Ok(None)`. A live session whose
/// profile document is missing is a data inconsistency and is reported as
/// [`Error::NotFound`].
pub async fn current_user(backend: &impl Backend) -> Result<Option<UserProfile>, Error> {
    let account = match backend.current_account().await {
        Ok(account) => account,
        Err(err) if err.status() == Some(StatusCode::UNAUTHORIZED) => return Ok(None),
        Err(err) => return Err(err),
    };

    let queries = [Query::Equal("accountId", account.id.clone())];
    let collection = &backend.config().user_collection_id;
    let list = backend.list_documents(collection, &queries).await?;
    let document = list.documents.into_iter().next().ok_or_else(|| {
        Error::not_found(format!("no profile document for account {}", account.id))
    })?;
    decode_document(document).map(Some)
}
