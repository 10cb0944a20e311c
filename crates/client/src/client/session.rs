//! Client-level session management helpers.
//!
//! This module contains methods on [`SplunkClient`] that interact with the
//! [`SessionManager`] to handle authentication token retrieval and validation.
//!
//! # What this module does NOT handle:
//! - Low-level session token storage and expiry tracking (handled by [`SessionManager`] in `auth.rs`)
//! - Authentication strategy selection (handled during client construction in `builder.rs`)
//! - Direct HTTP authentication calls (handled by endpoint functions in `endpoints/`)
//!
//! # Invariants
//! - `get_auth_token()` requires `&mut self` because it may trigger a login call
//! - The value returned is a complete `Authorization` header value
//! - API token authentication never triggers login
//! - Session authentication proactively refreshes tokens before they expire

use crate::auth::AuthStrategy;
use crate::client::SplunkClient;
use crate::endpoints;
use crate::error::{ClientError, Result};
use secrecy::ExposeSecret;

impl SplunkClient {
    /// Get the `Authorization` header value, logging in if necessary.
    ///
    /// - For API token auth: returns `Bearer <token>` directly
    /// - For session auth: logs in when the session is missing, expired, or
    ///   will expire within the buffer window, then returns `Splunk <key>`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AuthFailed`] or [`ClientError::ApiError`] if login fails.
    /// Returns [`ClientError::SessionExpired`] if no valid token is available.
    pub(crate) async fn get_auth_token(&mut self) -> Result<String> {
        if self.session_manager.is_api_token()
            && let Some(header) = self.session_manager.authorization_header()
        {
            return Ok(header);
        }

        if self.session_manager.is_session_expired() || self.session_manager.session_expires_soon()
        {
            self.login().await?;
        }

        self.session_manager.authorization_header().ok_or_else(|| {
            let username = match self.session_manager.strategy() {
                AuthStrategy::SessionToken { username, .. } => username.clone(),
                AuthStrategy::ApiToken { .. } => "api-token".to_string(),
            };
            ClientError::SessionExpired { username }
        })
    }

    /// Check if the client is using API token authentication.
    ///
    /// API tokens do not expire and do not require session management.
    pub fn is_api_token_auth(&self) -> bool {
        self.session_manager.is_api_token()
    }

    /// Login with username/password to get a session token.
    ///
    /// This method is only valid for [`AuthStrategy::SessionToken`] authentication.
    /// The obtained session token is stored in the `SessionManager` for subsequent
    /// API calls.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AuthFailed`] if the auth strategy is not session-based.
    /// Returns [`ClientError::ApiError`] if the login request fails.
    pub async fn login(&mut self) -> Result<String> {
        if let AuthStrategy::SessionToken { username, password } = self.session_manager.strategy() {
            let token = endpoints::login(
                &self.http,
                &self.base_url,
                username,
                password.expose_secret(),
                self.max_retries,
                self.metrics.as_ref(),
            )
            .await?;

            self.session_manager.set_session_token(
                token.clone(),
                Some(self.session_ttl_seconds),
                Some(self.session_expiry_buffer_seconds),
            );

            Ok(token)
        } else {
            Err(ClientError::AuthFailed(
                "Cannot login with API token auth strategy".to_string(),
            ))
        }
    }
}
