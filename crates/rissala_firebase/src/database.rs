//! Realtime Database access for the user directory
//!
//! User records live under `users/{user_id}` and are written by the mobile
//! app. The relay only reads the `fcmToken` field and writes it on token
//! registration; every other field is ignored.

use async_trait::async_trait;
use reqwest::{Client, Url};
use rissala_config::FirebaseConfig;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::auth::{AccessTokenSource, DATABASE_SCOPES};
use crate::client::FirebaseError;

/// Root node of the user directory
pub const USERS_NODE: &str = "users";

/// Field holding a user's device token
pub const TOKEN_FIELD: &str = "fcmToken";

/// The part of a user record the relay cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserRecord {
    pub fcm_token: Option<String>,
}

impl UserRecord {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            fcm_token: Some(token.into()),
        }
    }

    /// Extracts the record from a raw directory value.
    ///
    /// Non-object values and non-string tokens yield a record without token.
    pub fn from_value(value: &Value) -> Self {
        Self {
            fcm_token: value
                .get(TOKEN_FIELD)
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }

    /// The device token, if present and non-empty.
    pub fn token(&self) -> Option<&str> {
        self.fcm_token.as_deref().filter(|token| !token.is_empty())
    }
}

/// Read/write access to the user directory.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Reads `users/{user_id}`; `None` when the node does not exist.
    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>, FirebaseError>;

    /// Reads the whole `users` tree.
    async fn list_users(&self) -> Result<Vec<(String, UserRecord)>, FirebaseError>;

    /// Overwrites `users/{user_id}/fcmToken`.
    async fn set_device_token(&self, user_id: &str, token: &str) -> Result<(), FirebaseError>;
}

/// Client for the Realtime Database REST API
pub struct RealtimeDatabaseClient {
    client: Client,
    database_url: Url,
    tokens: Arc<dyn AccessTokenSource>,
}

impl RealtimeDatabaseClient {
    /// # Errors
    ///
    /// `ConfigError` if `database_url` is not an absolute http(s) URL.
    pub fn new(
        config: &FirebaseConfig,
        tokens: Arc<dyn AccessTokenSource>,
    ) -> Result<Self, FirebaseError> {
        let database_url = Url::parse(&config.database_url).map_err(|e| {
            FirebaseError::ConfigError(format!(
                "Invalid database_url {}: {}",
                config.database_url, e
            ))
        })?;
        if database_url.cannot_be_a_base() {
            return Err(FirebaseError::ConfigError(format!(
                "Invalid database_url {}",
                config.database_url
            )));
        }

        Ok(Self {
            client: Client::new(),
            database_url,
            tokens,
        })
    }

    /// `{database_url}/{segments...}.json`, each segment percent-encoded.
    ///
    /// The access token travels in the `Authorization` header, never in the
    /// URL, so transport errors that render the URL cannot carry it.
    fn node_url(&self, segments: &[&str]) -> Result<Url, FirebaseError> {
        let mut url = self.database_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                FirebaseError::ConfigError("database_url cannot be a base".to_string())
            })?;
            path.pop_if_empty();
            if let Some((last, parents)) = segments.split_last() {
                path.extend(parents);
                path.push(&format!("{}.json", last));
            }
        }
        Ok(url)
    }

    async fn read(&self, segments: &[&str]) -> Result<Value, FirebaseError> {
        let url = self.node_url(segments)?;
        let token = self.tokens.access_token(&DATABASE_SCOPES).await?;
        debug!("Reading directory node /{}", segments.join("/"));

        let response = self
            .client
            .get(url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(FirebaseError::DatabaseError(format!(
                "{}: {}",
                status, error_text
            )));
        }

        Ok(response.json().await?)
    }

    async fn write(&self, segments: &[&str], value: &Value) -> Result<(), FirebaseError> {
        let url = self.node_url(segments)?;
        let token = self.tokens.access_token(&DATABASE_SCOPES).await?;
        debug!("Writing directory node /{}", segments.join("/"));

        let response = self
            .client
            .put(url)
            .bearer_auth(&token)
            .json(value)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(FirebaseError::DatabaseError(format!(
                "{}: {}",
                status, error_text
            )));
        }

        Ok(())
    }
}

/// Flattens the raw `users` tree into `(user_id, record)` pairs.
///
/// The database returns an array instead of an object when all keys are
/// small integers; array holes come back as `null` and are skipped.
pub fn users_from_value(value: Value) -> Vec<(String, UserRecord)> {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(user_id, record)| (user_id.clone(), UserRecord::from_value(record)))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .filter(|(_, record)| !record.is_null())
            .map(|(index, record)| (index.to_string(), UserRecord::from_value(record)))
            .collect(),
        _ => Vec::new(),
    }
}

#[async_trait]
impl UserDirectory for RealtimeDatabaseClient {
    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>, FirebaseError> {
        let value = self.read(&[USERS_NODE, user_id]).await?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(UserRecord::from_value(&value)))
    }

    async fn list_users(&self) -> Result<Vec<(String, UserRecord)>, FirebaseError> {
        let value = self.read(&[USERS_NODE]).await?;
        Ok(users_from_value(value))
    }

    async fn set_device_token(&self, user_id: &str, token: &str) -> Result<(), FirebaseError> {
        self.write(
            &[USERS_NODE, user_id, TOKEN_FIELD],
            &Value::String(token.to_string()),
        )
        .await
    }
}
