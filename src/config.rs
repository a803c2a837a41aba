//! Service configuration.
//!
//! Identifiers for the project, database, collections, and storage bucket
//! are fixed per deployment and read from the environment once at startup.
//! The resulting [`Config`] travels inside the client handle; nothing here
//! is a process-wide global.

use std::env;

use anyhow::{Context, Result};

const ENDPOINT_ENV: &str = "VIREO_ENDPOINT";
const DEFAULT_ENDPOINT: &str = "https://cloud.vireo.app/v1";

/// Connection settings and resource identifiers for the hosted service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the service API, without a trailing slash.
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    /// Collection holding one profile document per registered user.
    pub user_collection_id: String,
    /// Collection holding published posts.
    pub post_collection_id: String,
    /// Bucket holding uploaded video and thumbnail files.
    pub storage_bucket_id: String,
}

impl Config {
    /// Read the configuration from the environment. The endpoint falls back
    /// to the hosted default; every identifier is required.
    pub fn from_env() -> Result<Self> {
        let config = Self {
            endpoint: env::var(ENDPOINT_ENV).unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            project_id: require("VIREO_PROJECT_ID")?,
            database_id: require("VIREO_DATABASE_ID")?,
            user_collection_id: require("VIREO_USER_COLLECTION_ID")?,
            post_collection_id: require("VIREO_POST_COLLECTION_ID")?,
            storage_bucket_id: require("VIREO_STORAGE_BUCKET_ID")?,
        };
        Ok(config.normalized())
    }

    pub(crate) fn normalized(mut self) -> Self {
        self.endpoint = self.endpoint.trim_end_matches('/').to_string();
        self
    }
}

fn require(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("{name} is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizing_trims_the_trailing_slash() {
        let config = Config {
            endpoint: "https://backend.example.com/v1/".to_string(),
            project_id: "proj".to_string(),
            database_id: "db".to_string(),
            user_collection_id: "users".to_string(),
            post_collection_id: "posts".to_string(),
            storage_bucket_id: "media".to_string(),
        }
        .normalized();

        assert_eq!(config.endpoint, "https://backend.example.com/v1");
    }
}
