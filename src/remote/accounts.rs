//! Account and session endpoints.

use reqwest::Method;
use serde_json::json;

use crate::error::Error;
use crate::models::{Account, Session};

use super::Client;

impl Client {
    /// Create a new account. Does not establish a session.
    pub async fn create_account(
        &self,
        account_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Account, Error> {
        let response = self
            .request(Method::POST, "/account")
            .json(&json!({
                "userId": account_id,
                "email": email,
                "password": password,
                "name": name,
            }))
            .send()
            .await?;
        super::handle_json(response).await
    }

    /// Sign in with email and password. On success the client adopts the
    /// returned session secret for subsequent requests.
    pub async fn create_email_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, Error> {
        let response = self
            .request(Method::POST, "/account/sessions/email")
            .json(&json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await?;
        let session: Session = super::handle_json(response).await?;
        self.set_session(&session.secret);
        Ok(session)
    }

    /// Resolve the active session to its account.
    pub async fn current_account(&self) -> Result<Account, Error> {
        let response = self.request(Method::GET, "/account").send().await?;
        super::handle_json(response).await
    }

    /// Delete the active session and drop the adopted secret.
    pub async fn delete_current_session(&self) -> Result<(), Error> {
        let response = self
            .request(Method::DELETE, "/account/sessions/current")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(super::error_from_response(status, body));
        }
        self.clear_session();
        Ok(())
    }
}
