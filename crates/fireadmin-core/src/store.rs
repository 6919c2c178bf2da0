//! Cloud Firestore (REST v1) document deletion.

use std::sync::Arc;

use reqwest::{Client, Url};
use tracing::{debug, info};

use crate::error::{FireadminError, Result};
use crate::http;
use crate::outcome::StepOutcome;
use crate::token::TokenSource;

pub const FIRESTORE_URL: &str = "https://firestore.googleapis.com";

/// Deletion of application-data documents.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    async fn delete_document(&self, collection: &str, key: &str) -> StepOutcome<()>;
}

pub struct FirestoreClient {
    http: Client,
    tokens: Arc<TokenSource>,
    base: Url,
    project_id: String,
    database_id: String,
}

impl FirestoreClient {
    pub fn new(
        http: Client,
        tokens: Arc<TokenSource>,
        base: Url,
        project_id: String,
        database_id: String,
    ) -> Self {
        Self {
            http,
            tokens,
            base,
            project_id,
            database_id,
        }
    }

    /// Base URL for the Firestore emulator at `host` (`host:port`).
    pub fn emulator_base(host: &str) -> Result<Url> {
        Url::parse(&format!("http://{}", host)).map_err(|e| {
            FireadminError::Config(format!("Invalid Firestore emulator host {}: {}", host, e))
        })
    }

    /// `{base}/v1/projects/{project}/databases/{database}/documents/{collection}/{key}`
    ///
    /// Each part is a single path segment, so a `/` inside `key` is escaped
    /// rather than addressing a subcollection.
    pub fn document_url(&self, collection: &str, key: &str) -> Result<Url> {
        if collection.is_empty() || key.is_empty() {
            return Err(FireadminError::InvalidInput(
                "Document path needs a collection and a key".to_string(),
            ));
        }

        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| FireadminError::Config(format!("Invalid Firestore base URL: {}", self.base)))?
            .pop_if_empty()
            .extend([
                "v1",
                "projects",
                self.project_id.as_str(),
                "databases",
                self.database_id.as_str(),
                "documents",
                collection,
                key,
            ]);
        Ok(url)
    }

    /// Delete `collection/key`. Deleting a document that does not exist
    /// succeeds; a missing database is an error, never `NotFound`.
    pub async fn delete(&self, collection: &str, key: &str) -> Result<()> {
        let url = self.document_url(collection, key)?;
        let token = self.tokens.access_token().await?;

        debug!(collection, key, "deleting document");
        let response = self.http.delete(url).bearer_auth(token).send().await?;
        http::check(response).await.map_err(|e| match e {
            // An absent document is deleted with 200; a 404 means the
            // database or project itself is missing.
            FireadminError::NotFound(message) => FireadminError::Api {
                status: 404,
                code: Some("NOT_FOUND".to_string()),
                message,
            },
            other => other,
        })?;

        info!(collection, key, "document deleted");
        Ok(())
    }
}

impl DocumentStore for FirestoreClient {
    async fn delete_document(&self, collection: &str, key: &str) -> StepOutcome<()> {
        self.delete(collection, key).await.into()
    }
}
