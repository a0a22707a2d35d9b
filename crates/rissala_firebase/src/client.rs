//! Firebase Cloud Messaging client module
//!
//! This module provides a client for the FCM HTTP v1 API, used to deliver a
//! notification to a single device token. Every message carries delivery
//! hints for both platform families: an Android notification channel with
//! the default sound, and the default APNs sound.

use async_trait::async_trait;
use reqwest::{header, Client};
use rissala_config::FirebaseConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::auth::{AccessTokenSource, FCM_SCOPE};

/// Sound name that selects the platform's default notification sound
pub const DEFAULT_SOUND: &str = "default";

/// Errors that can occur when interacting with the Firebase APIs
#[derive(Error, Debug)]
pub enum FirebaseError {
    /// Error during authentication with Firebase
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Error during HTTP request to a Firebase API
    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Missing required configuration
    #[error("Missing configuration: {0}")]
    ConfigError(String),

    /// Error returned by the FCM API
    #[error("Firebase API error: {0}")]
    ApiError(String),

    /// Error returned by the Realtime Database
    #[error("Realtime Database error: {0}")]
    DatabaseError(String),
}

/// A message to be sent via Firebase Cloud Messaging
///
/// Top-level wrapper required by the FCM HTTP v1 `messages:send` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FcmMessage {
    pub message: Message,
}

/// The message payload for Firebase Cloud Messaging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Message {
    /// Registration token of the target device
    pub token: String,

    /// The notification to be displayed on the user's device
    pub notification: Notification,

    /// Custom key-value data handed to the receiving app
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub data: HashMap<String, String>,

    pub android: AndroidConfig,

    pub apns: ApnsConfig,
}

/// The notification to be displayed on the user's device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Notification {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AndroidConfig {
    pub notification: AndroidNotification,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AndroidNotification {
    pub channel_id: String,
    pub sound: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApnsConfig {
    pub payload: ApnsPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApnsPayload {
    pub aps: Aps,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Aps {
    pub sound: String,
}

impl FcmMessage {
    /// Builds a device-targeted message with the default platform hints.
    pub fn for_device(
        token: impl Into<String>,
        notification: Notification,
        data: HashMap<String, String>,
        channel_id: impl Into<String>,
    ) -> Self {
        Self {
            message: Message {
                token: token.into(),
                notification,
                data,
                android: AndroidConfig {
                    notification: AndroidNotification {
                        channel_id: channel_id.into(),
                        sound: DEFAULT_SOUND.to_string(),
                    },
                },
                apns: ApnsConfig {
                    payload: ApnsPayload {
                        aps: Aps {
                            sound: DEFAULT_SOUND.to_string(),
                        },
                    },
                },
            },
        }
    }
}

/// Response from the Firebase Cloud Messaging API
#[derive(Debug, Deserialize)]
pub struct FcmResponse {
    /// "projects/{project_id}/messages/{message_id}"
    pub name: String,
}

/// The push-delivery seam used by the notification handlers.
#[async_trait]
pub trait PushSender: Send + Sync {
    /// Delivers one message and returns the delivery receipt (the FCM message name).
    async fn send(&self, message: &FcmMessage) -> Result<String, FirebaseError>;
}

/// Client for the Firebase Cloud Messaging HTTP v1 API
pub struct FirebaseClient {
    client: Client,
    base_url: String,
    project_id: Option<String>,
    tokens: Arc<dyn AccessTokenSource>,
}

impl FirebaseClient {
    /// Creates a new Firebase client from the Firebase configuration.
    pub fn new(config: &FirebaseConfig, tokens: Arc<dyn AccessTokenSource>) -> Self {
        Self {
            client: Client::new(),
            base_url: config.fcm_base_url.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            tokens,
        }
    }

    /// Sends a push notification message via Firebase Cloud Messaging
    ///
    /// # Errors
    ///
    /// * `ConfigError` if no project id is configured
    /// * `AuthError` if no access token can be obtained
    /// * `RequestError` if the HTTP request fails
    /// * `ApiError` if FCM answers with a non-success status
    pub async fn send_message(&self, message: &FcmMessage) -> Result<String, FirebaseError> {
        let project_id = self.project_id.as_deref().ok_or_else(|| {
            FirebaseError::ConfigError("Missing project_id in FirebaseConfig".to_string())
        })?;

        let url = format!(
            "{}/v1/projects/{}/messages:send",
            self.base_url, project_id
        );

        let token = self.tokens.access_token(&[FCM_SCOPE]).await?;

        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .json(message)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(FirebaseError::ApiError(format!("{}: {}", status, error_text)));
        }

        let fcm_response: FcmResponse = response.json().await?;
        Ok(fcm_response.name)
    }
}

#[async_trait]
impl PushSender for FirebaseClient {
    async fn send(&self, message: &FcmMessage) -> Result<String, FirebaseError> {
        self.send_message(message).await
    }
}
