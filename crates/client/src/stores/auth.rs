//! Authentication store.
//!
//! Exchanges the opaque Telegram init data for a bearer token and the user
//! profile. The token is persisted to session storage, where the API client
//! picks it up on every request.

use std::sync::Arc;

use narxbot_core::User;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{error, info, instrument, warn};

use crate::api::{ApiClient, ApiError};
use crate::storage::{KeyValueStorage, TOKEN_KEY};

/// Telegram authentication endpoint.
const AUTH_PATH: &str = "/auth/telegram";

/// Authentication state.
///
/// The token and the user only exist together, so "authenticated" can never
/// disagree with the presence of either.
#[derive(Debug, Clone, Default)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticated {
        user: User,
        token: SecretString,
    },
}

impl AuthState {
    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// The signed-in user.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated { user, .. } => Some(user),
            Self::Unauthenticated => None,
        }
    }

    /// The session token.
    #[must_use]
    pub const fn token(&self) -> Option<&SecretString> {
        match self {
            Self::Authenticated { token, .. } => Some(token),
            Self::Unauthenticated => None,
        }
    }
}

/// Request body for the authentication endpoint.
#[derive(Serialize)]
struct AuthRequest<'a> {
    init_data: &'a str,
}

/// `{ "data": ... }` wrapper used by the authentication endpoint.
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Successful authentication payload.
#[derive(Deserialize)]
struct AuthPayload {
    access_token: String,
    user: User,
}

/// Store holding the authenticated user and session token.
#[derive(Clone)]
pub struct AuthStore {
    inner: Arc<AuthStoreInner>,
}

struct AuthStoreInner {
    api: ApiClient,
    session: Arc<dyn KeyValueStorage>,
    state: watch::Sender<AuthState>,
}

impl std::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStore")
            .field("state", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

impl AuthStore {
    /// Create an unauthenticated store.
    ///
    /// `session` must be the same storage the API client reads its token from.
    #[must_use]
    pub fn new(api: ApiClient, session: Arc<dyn KeyValueStorage>) -> Self {
        let (state, _) = watch::channel(AuthState::Unauthenticated);
        Self {
            inner: Arc::new(AuthStoreInner {
                api,
                session,
                state,
            }),
        }
    }

    /// Authenticate with Telegram init data.
    ///
    /// On success the store becomes authenticated and the token is written to
    /// session storage. On any failure the store ends up unauthenticated, the
    /// persisted token is removed, and the error is only logged: callers check
    /// [`is_authenticated`](Self::is_authenticated) afterwards.
    #[instrument(skip_all, fields(init_data_len = init_data.len()))]
    pub async fn authenticate(&self, init_data: &str) {
        let body = AuthRequest { init_data };
        let result: Result<Envelope<AuthPayload>, ApiError> =
            self.inner.api.post(AUTH_PATH, Some(&body)).await;

        match result {
            Ok(Envelope {
                data: AuthPayload { access_token, user },
            }) => {
                if let Err(e) = self.inner.session.set_item(TOKEN_KEY, &access_token) {
                    error!(error = %e, "Failed to persist session token");
                }
                info!(user_id = %user.id, telegram_id = %user.telegram_id, "Authenticated");
                self.inner.state.send_replace(AuthState::Authenticated {
                    user,
                    token: SecretString::from(access_token),
                });
            }
            Err(e) => {
                warn!(error = %e, status = ?e.status(), "Authentication failed");
                self.clear();
            }
        }
    }

    /// Sign out. Always succeeds.
    pub fn logout(&self) {
        self.clear();
        info!("Logged out");
    }

    fn clear(&self) {
        self.inner.state.send_replace(AuthState::Unauthenticated);
        if let Err(e) = self.inner.session.remove_item(TOKEN_KEY) {
            error!(error = %e, "Failed to remove session token");
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    /// Whether a user is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    /// The signed-in user.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user().cloned()
    }

    /// The session token.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.inner.state.borrow().token().cloned()
    }

    /// Receive every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }
}
