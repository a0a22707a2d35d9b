//! Authentication module for Firebase
//!
//! Both Firebase APIs the relay talks to accept OAuth2 access tokens minted
//! for the project's service account. [`ServiceAccountTokenSource`] wraps a
//! `yup-oauth2` authenticator built once from the JSON key held in
//! `FIREBASE_SERVICE_ACCOUNT`; the authenticator caches tokens and refreshes
//! them before expiry.

use async_trait::async_trait;
use yup_oauth2::{
    authenticator::DefaultAuthenticator, parse_service_account_key, ServiceAccountAuthenticator,
};

use crate::client::FirebaseError;

/// Scope required by the FCM HTTP v1 API
pub const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

/// Scopes required by the Realtime Database REST API
pub const DATABASE_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/firebase.database",
    "https://www.googleapis.com/auth/userinfo.email",
];

/// Something that can hand out OAuth2 access tokens for a set of scopes.
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn access_token(&self, scopes: &[&str]) -> Result<String, FirebaseError>;
}

/// Access tokens minted for a Google service account.
pub struct ServiceAccountTokenSource {
    authenticator: DefaultAuthenticator,
}

impl ServiceAccountTokenSource {
    /// Builds the authenticator from a JSON-encoded service account key.
    ///
    /// # Errors
    ///
    /// * `ConfigError` if the key is not a valid service account JSON document
    /// * `AuthError` if the authenticator cannot be constructed
    pub async fn from_json(service_account: &str) -> Result<Self, FirebaseError> {
        let sa_key = parse_service_account_key(service_account).map_err(|e| {
            FirebaseError::ConfigError(format!("Invalid service account key: {}", e))
        })?;

        let authenticator = ServiceAccountAuthenticator::builder(sa_key)
            .build()
            .await
            .map_err(|e| FirebaseError::AuthError(e.to_string()))?;

        Ok(Self { authenticator })
    }
}

#[async_trait]
impl AccessTokenSource for ServiceAccountTokenSource {
    async fn access_token(&self, scopes: &[&str]) -> Result<String, FirebaseError> {
        let auth_token = self
            .authenticator
            .token(scopes)
            .await
            .map_err(|e| FirebaseError::AuthError(e.to_string()))?;

        match auth_token.token() {
            Some(token) => Ok(token.to_string()),
            None => Err(FirebaseError::AuthError("No token available".to_string())),
        }
    }
}

/// A fixed token, for emulators and tests.
#[derive(Debug, Clone)]
pub struct StaticTokenSource {
    token: String,
}

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl AccessTokenSource for StaticTokenSource {
    async fn access_token(&self, _scopes: &[&str]) -> Result<String, FirebaseError> {
        Ok(self.token.clone())
    }
}
