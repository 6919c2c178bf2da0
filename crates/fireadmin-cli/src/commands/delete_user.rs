//! Remove a user's data document and identity record, in that order.
//!
//! The data document is best-effort: a failed delete is reported and the
//! identity record is deleted anyway. Every other failure ends the command.

use std::ffi::OsString;
use std::io::Write;

use clap::Parser;
use clap::error::ErrorKind;
use fireadmin_core::{DocumentStore, FireadminError, IdentityService, StepOutcome};
use tracing::{info, warn};

use crate::cli::{Args, USAGE};
use crate::connector::Connector;
use crate::console::Console;
use crate::logging;

/// How a command that reached the identity service ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deletion {
    Completed { uid: String },
    UserNotFound,
}

/// Run the command for `argv` (program name first) and return the process
/// exit code.
pub async fn run<I, T, C, W>(argv: I, connector: &C, out: &mut W) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    C: Connector,
    W: Write,
{
    let mut console = Console::new(out);
    let code = run_with_console(argv, connector, &mut console).await;
    console.flush();
    code
}

async fn run_with_console<I, T, C, W>(argv: I, connector: &C, console: &mut Console<'_, W>) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    C: Connector,
    W: Write,
{
    let args = match Args::try_parse_from(argv) {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            console.say(e.to_string().trim_end());
            return 0;
        }
        Err(e) => {
            console.say(e.to_string().trim_end());
            return 1;
        }
    };

    let Some(email) = args.email() else {
        console.say(USAGE);
        return 1;
    };

    console.say(format_args!("Attempting to delete user with email: {}", email));

    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            console.fatal(format_args!("{:#}", e));
            return 1;
        }
    };
    logging::init(&config.logging.level);

    let (identity, store) = match connector.connect(&config.firebase) {
        Ok(clients) => clients,
        Err(e) => {
            console.fatal(e);
            return 1;
        }
    };

    match delete_user(
        &identity,
        &store,
        &config.firebase.users_collection,
        email,
        console,
    )
    .await
    {
        Ok(Deletion::Completed { .. }) => 0,
        Ok(Deletion::UserNotFound) => 1,
        Err(e) => {
            console.fatal(e);
            1
        }
    }
}

/// Resolve `email`, delete its document from `collection`, then delete the
/// identity record.
///
/// # Errors
///
/// Returns the error of a failed lookup or identity deletion. A failed
/// document deletion is reported on the console and does not stop the
/// identity deletion.
pub async fn delete_user<I, S, W>(
    identity: &I,
    store: &S,
    collection: &str,
    email: &str,
    console: &mut Console<'_, W>,
) -> Result<Deletion, FireadminError>
where
    I: IdentityService,
    S: DocumentStore,
    W: Write,
{
    let user = match identity.get_user_by_email(email).await {
        StepOutcome::Ok(user) => user,
        StepOutcome::NotFound => {
            console.say(format_args!("User not found with email: {}", email));
            return Ok(Deletion::UserNotFound);
        }
        StepOutcome::Error(e) => return Err(e),
    };
    let uid = user.uid;
    console.say(format_args!("Found user with UID: {}", uid));

    match store.delete_document(collection, &uid).await {
        StepOutcome::Ok(()) => {
            console.say(format_args!("Deleted user data from Firestore for UID: {}", uid));
        }
        StepOutcome::NotFound => {
            let e = FireadminError::NotFound(format!("{}/{}", collection, uid));
            report_store_failure(collection, &uid, &e, console);
        }
        StepOutcome::Error(e) => report_store_failure(collection, &uid, &e, console),
    }

    identity
        .delete_user(&uid)
        .await
        .into_result(format!("user {}", uid))?;

    info!(uid = %uid, "user deleted");
    console.say(format_args!("Successfully deleted user with email: {}", email));
    Ok(Deletion::Completed { uid })
}

/// A failed data-document delete is logged and the command carries on.
fn report_store_failure<W: Write>(
    collection: &str,
    uid: &str,
    error: &FireadminError,
    console: &mut Console<'_, W>,
) {
    warn!(collection, uid, error = %error, "data document deletion failed");
    console.say(format_args!("Error deleting user data from Firestore: {}", error));
    console.say("Continuing with account deletion...");
}
