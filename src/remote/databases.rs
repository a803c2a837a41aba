//! Document database endpoints and query operators.

use reqwest::Method;
use serde_json::{Value, json};

use crate::error::Error;
use crate::models::DocumentList;

use super::Client;

/// Query operator accepted by document list endpoints.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Attribute equals one of the given values.
    Equal(&'static str, String),
    /// Full-text search on an attribute.
    Search(&'static str, String),
    /// Order results by an attribute, newest first.
    OrderDesc(&'static str),
    /// Cap the number of returned documents.
    Limit(u32),
}

impl Query {
    /// Render the operator in the service's query syntax.
    pub fn render(&self) -> String {
        match self {
            Query::Equal(attribute, value) => {
                format!("equal(\"{attribute}\", [{}])", quoted(value))
            }
            Query::Search(attribute, term) => {
                format!("search(\"{attribute}\", {})", quoted(term))
            }
            Query::OrderDesc(attribute) => format!("orderDesc(\"{attribute}\")"),
            Query::Limit(count) => format!("limit({count})"),
        }
    }
}

// JSON-quote user-supplied strings so embedded quotes cannot break the
// query syntax.
fn quoted(value: &str) -> String {
    Value::from(value).to_string()
}

impl Client {
    /// Create a document in a collection.
    pub async fn create_document(
        &self,
        collection_id: &str,
        document_id: &str,
        fields: Value,
    ) -> Result<Value, Error> {
        let path = format!(
            "/databases/{}/collections/{}/documents",
            self.config.database_id, collection_id
        );
        let response = self
            .request(Method::POST, &path)
            .json(&json!({
                "documentId": document_id,
                "data": fields,
            }))
            .send()
            .await?;
        super::handle_json(response).await
    }

    /// List documents in a collection, filtered and ordered by the given
    /// queries. Returns whatever a single request yields; no pagination.
    pub async fn list_documents(
        &self,
        collection_id: &str,
        queries: &[Query],
    ) -> Result<DocumentList, Error> {
        let path = format!(
            "/databases/{}/collections/{}/documents",
            self.config.database_id, collection_id
        );
        let params: Vec<(&str, String)> = queries
            .iter()
            .map(|query| ("queries[]", query.render()))
            .collect();
        let response = self
            .request(Method::GET, &path)
            .query(&params)
            .send()
            .await?;
        super::handle_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operators_render_in_the_service_syntax() {
        assert_eq!(
            Query::Equal("accountId", "account-1".to_string()).render(),
            r#"equal("accountId", ["account-1"])"#
        );
        assert_eq!(
            Query::Search("title", "sunrise timelapse".to_string()).render(),
            r#"search("title", "sunrise timelapse")"#
        );
        assert_eq!(
            Query::OrderDesc("$createdAt").render(),
            r#"orderDesc("$createdAt")"#
        );
        assert_eq!(Query::Limit(7).render(), "limit(7)");
    }

    #[test]
    fn embedded_quotes_cannot_break_the_query() {
        assert_eq!(
            Query::Search("title", r#"say "cheese""#.to_string()).render(),
            r#"search("title", "say \"cheese\"")"#
        );
    }
}
