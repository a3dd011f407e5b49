//! Authentication command.
//!
//! # Usage
//!
//! ```bash
//! narxbot auth --init-data "query_id=...&user=...&hash=..."
//! ```
//!
//! # Environment Variables
//!
//! - `NARXBOT_INIT_DATA` - Init data used when `--init-data` is not given

use narxbot_client::AppContext;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Errors that can occur during authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Neither `--init-data` nor `NARXBOT_INIT_DATA` was provided.
    #[error("No init data: pass --init-data or set NARXBOT_INIT_DATA")]
    MissingInitData,

    /// The server did not accept the init data.
    #[error("Authentication failed")]
    Rejected,
}

/// Authenticate and print the signed-in user.
///
/// # Errors
///
/// Returns `AuthError::Rejected` if the store is not authenticated afterwards.
pub async fn run(ctx: &AppContext, init_data: &SecretString) -> Result<(), AuthError> {
    sign_in(ctx, init_data).await?;

    if let Some(user) = ctx.auth().user() {
        #[allow(clippy::print_stdout)]
        {
            println!("Signed in as {} (id {})", user.display_name(), user.id);
        }
    }
    Ok(())
}

/// Authenticate without printing anything.
///
/// # Errors
///
/// Returns `AuthError::Rejected` if the store is not authenticated afterwards.
pub async fn sign_in(ctx: &AppContext, init_data: &SecretString) -> Result<(), AuthError> {
    ctx.auth().authenticate(init_data.expose_secret()).await;
    if ctx.auth().is_authenticated() {
        Ok(())
    } else {
        Err(AuthError::Rejected)
    }
}
