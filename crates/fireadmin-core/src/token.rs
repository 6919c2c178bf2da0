//! OAuth2 access tokens for Google APIs, minted from a service-account key
//! with the JWT-bearer grant.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;
use zeroize::ZeroizeOnDrop;

use crate::credential::ServiceAccountKey;
use crate::error::{FireadminError, Result};

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Scopes requested for the admin operations.
pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/cloud-platform",
    "https://www.googleapis.com/auth/datastore",
    "https://www.googleapis.com/auth/firebase",
    "https://www.googleapis.com/auth/identitytoolkit",
    "https://www.googleapis.com/auth/userinfo.email",
];

const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Tokens this close to expiry are refreshed before use.
const REFRESH_MARGIN_SECS: i64 = 60;

/// Bearer token accepted by the local emulators.
pub const EMULATOR_TOKEN: &str = "owner";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

/// `{"error": "invalid_grant", "error_description": "..."}`
#[derive(Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(ZeroizeOnDrop)]
struct AccessToken {
    value: String,
    #[zeroize(skip)]
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - Duration::seconds(REFRESH_MARGIN_SECS) > now
    }
}

enum Grant {
    ServiceAccount {
        http: Client,
        key: ServiceAccountKey,
    },
    Emulator,
}

/// Source of bearer tokens for the REST clients.
pub struct TokenSource {
    grant: Grant,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenSource {
    pub fn new(http: Client, key: ServiceAccountKey) -> Self {
        Self {
            grant: Grant::ServiceAccount { http, key },
            cached: Mutex::new(None),
        }
    }

    /// A source that always yields the emulator bearer token.
    pub fn emulator() -> Self {
        Self {
            grant: Grant::Emulator,
            cached: Mutex::new(None),
        }
    }

    pub fn is_emulator(&self) -> bool {
        matches!(self.grant, Grant::Emulator)
    }

    /// Return a valid access token, exchanging a fresh assertion when the
    /// cached one is missing or about to expire.
    ///
    /// # Errors
    ///
    /// Returns `FireadminError::Auth` if the assertion cannot be signed or the
    /// token endpoint rejects it.
    pub async fn access_token(&self) -> Result<String> {
        let (http, key) = match &self.grant {
            Grant::Emulator => return Ok(EMULATOR_TOKEN.to_string()),
            Grant::ServiceAccount { http, key } => (http, key),
        };

        let mut cached = self.cached.lock().await;
        let now = Utc::now();
        if let Some(token) = &*cached {
            if token.is_fresh(now) {
                return Ok(token.value.clone());
            }
        }

        debug!(client_email = %key.client_email, "requesting access token");
        let assertion = build_assertion(key, now)?;
        let response = http
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| FireadminError::Auth(format!("Failed to reach token endpoint: {}", e)))?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FireadminError::Auth(describe_token_error(status.as_u16(), &body)));
        }

        let parsed: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            FireadminError::Auth(format!("Unexpected token endpoint response: {}", e))
        })?;

        let value = parsed.access_token.clone();
        *cached = Some(AccessToken {
            value: parsed.access_token,
            expires_at: now + Duration::seconds(parsed.expires_in),
        });
        debug!(expires_in = parsed.expires_in, "access token cached");

        Ok(value)
    }
}

/// Sign the RS256 assertion exchanged for an access token.
pub fn build_assertion(key: &ServiceAccountKey, now: DateTime<Utc>) -> Result<String> {
    let iat = now.timestamp();
    let claims = Claims {
        iss: key.client_email.clone(),
        scope: SCOPES.join(" "),
        aud: key.token_uri.clone(),
        iat,
        exp: iat + ASSERTION_LIFETIME_SECS,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| FireadminError::Auth(format!("Invalid service account private key: {}", e)))?;

    jsonwebtoken::encode(&header, &claims, &encoding_key)
        .map_err(|e| FireadminError::Auth(format!("Failed to sign token assertion: {}", e)))
}

fn describe_token_error(status: u16, body: &str) -> String {
    match serde_json::from_str::<TokenErrorResponse>(body) {
        Ok(TokenErrorResponse {
            error,
            error_description: Some(description),
        }) => format!("Token endpoint rejected the credential ({}): {}", error, description),
        Ok(TokenErrorResponse { error, .. }) => {
            format!("Token endpoint rejected the credential ({})", error)
        }
        Err(_) => format!("Token endpoint returned HTTP {}: {}", status, body.trim()),
    }
}
