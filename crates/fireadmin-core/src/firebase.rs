//! Explicitly constructed Firebase session.
//!
//! A `FirebaseApp` owns the HTTP client and token source for one project and
//! hands out the service clients that share them.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Url};
use tracing::{debug, info};

use crate::config::{Config, FirebaseConfig};
use crate::credential::ServiceAccountKey;
use crate::error::{FireadminError, Result};
use crate::identity::{AuthClient, IDENTITY_TOOLKIT_URL};
use crate::store::{FirestoreClient, FIRESTORE_URL};
use crate::token::TokenSource;

/// Where each service is reached.
#[derive(Debug, Clone, Default)]
pub struct Endpoints {
    pub auth_emulator_host: Option<String>,
    pub firestore_emulator_host: Option<String>,
}

impl Endpoints {
    /// Read the emulator hosts from the environment.
    pub fn from_env() -> Self {
        Self {
            auth_emulator_host: Config::auth_emulator_host(),
            firestore_emulator_host: Config::firestore_emulator_host(),
        }
    }
}

pub struct FirebaseApp {
    http: Client,
    tokens: Arc<TokenSource>,
    emulator_tokens: Arc<TokenSource>,
    project_id: String,
    database_id: String,
    endpoints: Endpoints,
}

impl FirebaseApp {
    /// Build a session for the project named by `config` or, failing that,
    /// by the key itself.
    ///
    /// # Errors
    ///
    /// Returns `FireadminError::Config` if the HTTP client cannot be built,
    /// the configured timeout is zero or the resolved project id is empty.
    pub fn new(key: ServiceAccountKey, config: &FirebaseConfig, endpoints: Endpoints) -> Result<Self> {
        let project_id = config
            .project_id
            .clone()
            .unwrap_or_else(|| key.project_id.clone());
        if project_id.trim().is_empty() {
            return Err(FireadminError::Config("Firebase project id is empty".to_string()));
        }

        let mut builder = Client::builder();
        match config.timeout_secs {
            Some(0) => {
                return Err(FireadminError::Config(
                    "HTTP timeout must be greater than zero".to_string(),
                ));
            }
            Some(secs) => builder = builder.timeout(Duration::from_secs(secs)),
            None => {}
        }
        let http = builder
            .build()
            .map_err(|e| FireadminError::Config(format!("Failed to build HTTP client: {}", e)))?;

        if endpoints.auth_emulator_host.is_some() || endpoints.firestore_emulator_host.is_some() {
            debug!(?endpoints, "using emulator endpoints");
        }
        info!(project = %project_id, "firebase session ready");

        Ok(Self {
            tokens: Arc::new(TokenSource::new(http.clone(), key)),
            emulator_tokens: Arc::new(TokenSource::emulator()),
            http,
            project_id,
            database_id: config.database_id.clone(),
            endpoints,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn auth(&self) -> Result<AuthClient> {
        let (base, tokens) = match &self.endpoints.auth_emulator_host {
            Some(host) => (AuthClient::emulator_base(host)?, self.emulator_tokens.clone()),
            None => (production_url(IDENTITY_TOOLKIT_URL)?, self.tokens.clone()),
        };
        Ok(AuthClient::new(
            self.http.clone(),
            tokens,
            base,
            self.project_id.clone(),
        ))
    }

    pub fn firestore(&self) -> Result<FirestoreClient> {
        let (base, tokens) = match &self.endpoints.firestore_emulator_host {
            Some(host) => (FirestoreClient::emulator_base(host)?, self.emulator_tokens.clone()),
            None => (production_url(FIRESTORE_URL)?, self.tokens.clone()),
        };
        Ok(FirestoreClient::new(
            self.http.clone(),
            tokens,
            base,
            self.project_id.clone(),
            self.database_id.clone(),
        ))
    }
}

fn production_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| FireadminError::Config(format!("Invalid service URL {}: {}", url, e)))
}
