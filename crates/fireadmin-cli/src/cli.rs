use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fireadmin_core::Config;

pub const USAGE: &str = "Usage: delete-user <email>";

/// delete-user - remove a Firebase user account and its data document
#[derive(Parser, Debug)]
#[command(name = "delete-user")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Email address of the account to delete
    #[arg(allow_hyphen_values = true)]
    pub email: Option<String>,

    /// Service-account key file (default: service-account-key.json)
    #[arg(long, value_name = "PATH")]
    pub credentials: Option<PathBuf>,

    /// Firebase project id (default: the key's project)
    #[arg(long, value_name = "ID")]
    pub project: Option<String>,

    /// Collection holding per-user documents (default: users)
    #[arg(long, value_name = "NAME")]
    pub collection: Option<String>,

    /// Configuration file (default: ~/.config/fireadmin/config.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// The target email, or `None` when it is missing or blank.
    pub fn email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }

    /// Load the configuration file and apply command-line overrides.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load().context("Failed to load configuration")?,
        };

        if let Some(path) = &self.credentials {
            config.firebase.credentials_path = path.clone();
        }
        if let Some(project) = &self.project {
            config.firebase.project_id = Some(project.clone());
        }
        if let Some(collection) = &self.collection {
            if collection.trim().is_empty() {
                anyhow::bail!("--collection must not be empty");
            }
            config.firebase.users_collection = collection.clone();
        }

        Ok(config)
    }
}
