//! Authentication types for splunk-export configuration.
//!
//! Responsibilities:
//! - Hold the credentials section of the config file (token or username/password).
//! - Resolve them into a single [`AuthStrategy`].
//!
//! Does NOT handle:
//! - Actual authentication flow or token exchange (see client crate).
//!
//! Invariants:
//! - All secret values use `secrecy::SecretString` to prevent accidental logging.
//! - An API token takes precedence over username/password when both are present.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::opt_secret_string;

/// Strategy for authenticating with Splunk.
#[derive(Debug, Clone)]
pub enum AuthStrategy {
    /// Username and password authentication (creates session token)
    SessionToken {
        username: String,
        password: SecretString,
    },
    /// API token (bearer token authentication)
    ApiToken { token: SecretString },
}

/// Credentials section of the configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Username for session authentication.
    pub username: Option<String>,
    /// Password for session authentication.
    #[serde(with = "opt_secret_string")]
    pub password: Option<SecretString>,
    /// API token (preferred).
    #[serde(with = "opt_secret_string")]
    pub token: Option<SecretString>,
}

impl AuthConfig {
    /// Resolve the configured credentials into an [`AuthStrategy`].
    ///
    /// Returns `None` when neither a token nor a complete username/password
    /// pair is present.
    pub fn strategy(&self) -> Option<AuthStrategy> {
        if let Some(token) = &self.token {
            return Some(AuthStrategy::ApiToken {
                token: token.clone(),
            });
        }
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some(AuthStrategy::SessionToken {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }
}
