pub mod cli;
pub mod commands;
pub mod connector;
pub mod console;
pub mod logging;

pub use commands::delete_user::{Deletion, run};
pub use connector::{Connector, FirebaseConnector};
