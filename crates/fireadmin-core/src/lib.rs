pub mod config;
pub mod credential;
pub mod error;
pub mod firebase;
mod http;
pub mod identity;
pub mod outcome;
pub mod store;
pub mod token;

pub use config::{Config, FirebaseConfig, LoggingConfig};
pub use credential::ServiceAccountKey;
pub use error::{FireadminError, Result};
pub use firebase::{Endpoints, FirebaseApp};
pub use identity::{AuthClient, IdentityService, UserRecord};
pub use outcome::StepOutcome;
pub use store::{DocumentStore, FirestoreClient};
pub use token::TokenSource;
