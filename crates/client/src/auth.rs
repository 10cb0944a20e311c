//! Authentication strategies and session management.
//!
//! Invariants:
//! - API tokens are sent as `Authorization: Bearer <token>`.
//! - Session keys obtained from `/services/auth/login` are sent as
//!   `Authorization: Splunk <sessionKey>`.
//! - Secrets never appear in `Debug` output.

use secrecy::{ExposeSecret, SecretString};
use splunk_export_config::constants::DEFAULT_EXPIRY_BUFFER_SECS;
use std::time::{Duration, Instant};

/// Strategy for authenticating with Splunk.
#[derive(Debug, Clone)]
pub enum AuthStrategy {
    /// Username and password authentication.
    /// The client will automatically manage session tokens.
    SessionToken {
        username: String,
        password: SecretString,
    },
    /// API token (bearer token authentication).
    /// This is preferred for automation as it doesn't require session management.
    ApiToken { token: SecretString },
}

impl From<&splunk_export_config::AuthStrategy> for AuthStrategy {
    fn from(strategy: &splunk_export_config::AuthStrategy) -> Self {
        match strategy {
            splunk_export_config::AuthStrategy::SessionToken { username, password } => {
                Self::SessionToken {
                    username: username.clone(),
                    password: password.clone(),
                }
            }
            splunk_export_config::AuthStrategy::ApiToken { token } => Self::ApiToken {
                token: token.clone(),
            },
        }
    }
}

/// Manages Splunk session tokens with automatic renewal.
#[derive(Debug)]
pub struct SessionManager {
    auth_strategy: AuthStrategy,
    session_token: Option<SessionToken>,
}

/// Session token with expiry information.
#[derive(Debug, Clone)]
struct SessionToken {
    value: SecretString,
    expires_at: Option<Instant>,
    expiry_buffer_seconds: u64,
}

impl SessionToken {
    fn new(
        value: SecretString,
        ttl_seconds: Option<u64>,
        expiry_buffer_seconds: Option<u64>,
    ) -> Self {
        let expires_at = ttl_seconds.map(|ttl| Instant::now() + Duration::from_secs(ttl));
        Self {
            value,
            expires_at,
            expiry_buffer_seconds: expiry_buffer_seconds.unwrap_or(DEFAULT_EXPIRY_BUFFER_SECS),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at
            .map(|exp| exp.saturating_duration_since(Instant::now()).is_zero())
            .unwrap_or(false)
    }

    /// True when the remaining lifetime is inside the refresh buffer.
    fn will_expire_soon(&self) -> bool {
        self.expires_at
            .map(|exp| {
                let buffer = Duration::from_secs(self.expiry_buffer_seconds);
                exp.saturating_duration_since(Instant::now()) < buffer
            })
            .unwrap_or(false)
    }
}

impl SessionManager {
    /// Create a new session manager with the given auth strategy.
    pub fn new(strategy: AuthStrategy) -> Self {
        Self {
            auth_strategy: strategy,
            session_token: None,
        }
    }

    /// Get the current auth strategy.
    pub fn strategy(&self) -> &AuthStrategy {
        &self.auth_strategy
    }

    /// Check if we're using API token auth (no session management needed).
    pub fn is_api_token(&self) -> bool {
        matches!(self.auth_strategy, AuthStrategy::ApiToken { .. })
    }

    /// Value for the `Authorization` header, if a credential is available.
    ///
    /// Returns `None` for session auth before the first login.
    pub fn authorization_header(&self) -> Option<String> {
        match &self.auth_strategy {
            AuthStrategy::ApiToken { token } => Some(format!("Bearer {}", token.expose_secret())),
            AuthStrategy::SessionToken { .. } => self
                .session_token
                .as_ref()
                .map(|t| format!("Splunk {}", t.value.expose_secret())),
        }
    }

    /// Set the session token (received from login response).
    ///
    /// # Arguments
    /// * `token` - The session token string
    /// * `ttl_seconds` - Time-to-live in seconds (None means no expiry)
    /// * `expiry_buffer_seconds` - Buffer before expiry to trigger proactive refresh
    ///   (None uses the default of 60 seconds)
    pub fn set_session_token(
        &mut self,
        token: String,
        ttl_seconds: Option<u64>,
        expiry_buffer_seconds: Option<u64>,
    ) {
        self.session_token = Some(SessionToken::new(
            SecretString::new(token.into()),
            ttl_seconds,
            expiry_buffer_seconds,
        ));
    }

    /// Returns false for API token auth, true if no session token exists.
    fn check_session<F>(&self, check: F) -> bool
    where
        F: FnOnce(&SessionToken) -> bool,
    {
        if self.is_api_token() {
            return false;
        }
        self.session_token.as_ref().map(check).unwrap_or(true)
    }

    /// Check if the current session token is expired.
    pub fn is_session_expired(&self) -> bool {
        self.check_session(|t| t.is_expired())
    }

    /// Check if the current session token will expire soon (within buffer).
    pub fn session_expires_soon(&self) -> bool {
        self.check_session(|t| t.will_expire_soon())
    }

    /// Clear the current session token (force re-authentication).
    pub fn clear_session(&mut self) {
        self.session_token = None;
    }
}
