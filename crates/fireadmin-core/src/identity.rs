//! Firebase Authentication (Identity Toolkit v1) client.

use std::sync::Arc;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{FireadminError, Result};
use crate::http;
use crate::outcome::StepOutcome;
use crate::token::TokenSource;

pub const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com";

/// A user account as stored by Firebase Authentication.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(rename = "localId")]
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub email_verified: bool,
}

/// Lookup and deletion of identity records.
#[allow(async_fn_in_trait)]
pub trait IdentityService {
    async fn get_user_by_email(&self, email: &str) -> StepOutcome<UserRecord>;

    async fn delete_user(&self, uid: &str) -> StepOutcome<()>;
}

#[derive(Serialize)]
struct LookupRequest<'a> {
    email: [&'a str; 1],
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<UserRecord>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteRequest<'a> {
    local_id: &'a str,
}

/// REST client for the Identity Toolkit admin endpoints of one project.
pub struct AuthClient {
    http: Client,
    tokens: Arc<TokenSource>,
    base: Url,
    project_id: String,
}

impl AuthClient {
    pub fn new(http: Client, tokens: Arc<TokenSource>, base: Url, project_id: String) -> Self {
        Self {
            http,
            tokens,
            base,
            project_id,
        }
    }

    /// Base URL for the Authentication emulator at `host` (`host:port`).
    pub fn emulator_base(host: &str) -> Result<Url> {
        Url::parse(&format!("http://{}/identitytoolkit.googleapis.com", host))
            .map_err(|e| FireadminError::Config(format!("Invalid auth emulator host {}: {}", host, e)))
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// `{base}/v1/projects/{project}/{method}`
    pub fn endpoint(&self, method: &str) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| FireadminError::Config(format!("Invalid identity base URL: {}", self.base)))?
            .pop_if_empty()
            .extend(["v1", "projects", self.project_id.as_str(), method]);
        Ok(url)
    }

    async fn post<B: Serialize>(&self, method: &str, body: &B) -> Result<reqwest::Response> {
        let url = self.endpoint(method)?;
        let token = self.tokens.access_token().await?;

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;

        http::check(response).await
    }

    /// Find the account registered under `email`.
    ///
    /// # Errors
    ///
    /// Returns `FireadminError::NotFound` when no account uses the address.
    pub async fn lookup_by_email(&self, email: &str) -> Result<UserRecord> {
        debug!(project = %self.project_id, "looking up user by email");
        let response = self
            .post("accounts:lookup", &LookupRequest { email: [email] })
            .await?;

        let parsed: LookupResponse = response.json().await?;
        parsed
            .users
            .into_iter()
            .next()
            .ok_or_else(|| FireadminError::NotFound(format!("No user record for {}", email)))
    }

    /// Delete the account with the given UID.
    pub async fn delete_account(&self, uid: &str) -> Result<()> {
        self.post("accounts:delete", &DeleteRequest { local_id: uid })
            .await?;
        info!(uid, "identity record deleted");
        Ok(())
    }
}

impl IdentityService for AuthClient {
    async fn get_user_by_email(&self, email: &str) -> StepOutcome<UserRecord> {
        self.lookup_by_email(email).await.into()
    }

    async fn delete_user(&self, uid: &str) -> StepOutcome<()> {
        self.delete_account(uid).await.into()
    }
}
