//! Construction of the service clients the command talks to.

use fireadmin_core::{
    AuthClient, DocumentStore, Endpoints, FirebaseApp, FirebaseConfig, FirestoreClient,
    IdentityService, Result, ServiceAccountKey,
};
use tracing::debug;

/// Builds the identity and document-store clients for one invocation.
pub trait Connector {
    type Identity: IdentityService;
    type Store: DocumentStore;

    fn connect(&self, config: &FirebaseConfig) -> Result<(Self::Identity, Self::Store)>;
}

/// Connects to Firebase with the service-account key named in the config.
#[derive(Debug, Clone, Default)]
pub struct FirebaseConnector {
    endpoints: Endpoints,
}

impl FirebaseConnector {
    pub fn new(endpoints: Endpoints) -> Self {
        Self { endpoints }
    }

    /// Honour `FIREBASE_AUTH_EMULATOR_HOST` / `FIRESTORE_EMULATOR_HOST`.
    pub fn from_env() -> Self {
        Self::new(Endpoints::from_env())
    }
}

impl Connector for FirebaseConnector {
    type Identity = AuthClient;
    type Store = FirestoreClient;

    fn connect(&self, config: &FirebaseConfig) -> Result<(AuthClient, FirestoreClient)> {
        debug!(path = %config.credentials_path.display(), "loading service account key");
        let key = ServiceAccountKey::from_file(&config.credentials_path)?;

        let app = FirebaseApp::new(key, config, self.endpoints.clone())?;
        Ok((app.auth()?, app.firestore()?))
    }
}
