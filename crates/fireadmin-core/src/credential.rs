//! Service-account credential loading.
//!
//! The key file is the JSON document downloaded from the Firebase console
//! ("Project settings > Service accounts > Generate new private key").

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use zeroize::ZeroizeOnDrop;

use crate::error::{FireadminError, Result};

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// A Google service-account key.
///
/// The private key is zeroed when the struct is dropped and is never
/// included in `Debug` output.
#[derive(Clone, Deserialize, ZeroizeOnDrop)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    #[zeroize(skip)]
    pub key_type: String,
    #[zeroize(skip)]
    pub project_id: String,
    #[serde(default)]
    #[zeroize(skip)]
    pub private_key_id: Option<String>,
    pub private_key: String,
    #[zeroize(skip)]
    pub client_email: String,
    #[serde(default)]
    #[zeroize(skip)]
    pub client_id: Option<String>,
    #[serde(default = "default_token_uri")]
    #[zeroize(skip)]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    /// Read and validate a key file.
    ///
    /// # Errors
    ///
    /// Returns `FireadminError::Credential` if the file cannot be read, is not
    /// valid JSON, or is not a complete service-account key.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| FireadminError::Credential {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::parse(&content).map_err(|message| FireadminError::Credential {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse and validate a key from its JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::parse(json).map_err(|message| FireadminError::Credential {
            path: "<inline>".into(),
            message,
        })
    }

    fn parse(json: &str) -> std::result::Result<Self, String> {
        let key: ServiceAccountKey = serde_json::from_str(json)
            .map_err(|e| format!("Invalid service account JSON: {}", e))?;
        key.validate()?;
        Ok(key)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.key_type != "service_account" {
            return Err(format!(
                "Expected a key of type \"service_account\", found \"{}\"",
                self.key_type
            ));
        }

        let required = [
            ("project_id", &self.project_id),
            ("client_email", &self.client_email),
            ("private_key", &self.private_key),
            ("token_uri", &self.token_uri),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(format!("Service account key is missing \"{}\"", field));
            }
        }

        Ok(())
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"<redacted>")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}
