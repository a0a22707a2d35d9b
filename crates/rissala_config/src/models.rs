// --- File: crates/rissala_config/src/models.rs ---

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE_URL: &str = "https://liptako-commerce-default-rtdb.firebaseio.com";
pub const DEFAULT_FCM_BASE_URL: &str = "https://fcm.googleapis.com";
pub const DEFAULT_ANDROID_CHANNEL_ID: &str = "rissala_channel";

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// --- Firebase Config ---
// Holds non-secret Firebase settings. The service account is loaded from
// FIREBASE_SERVICE_ACCOUNT and is never serialized.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Deserialize, Serialize, Clone, PartialEq)]
pub struct FirebaseConfig {
    /// Falls back to the `project_id` of the service account key.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Root URL of the Realtime Database holding the `users` tree.
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_fcm_base_url")]
    pub fcm_base_url: String,
    /// Android notification channel the app registers for relayed pushes.
    #[serde(default = "default_android_channel_id")]
    pub android_channel_id: String,
    /// JSON-encoded service account key.
    #[serde(default, skip_serializing)]
    pub service_account: Option<String>,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            database_url: default_database_url(),
            fcm_base_url: default_fcm_base_url(),
            android_channel_id: default_android_channel_id(),
            service_account: None,
        }
    }
}

impl fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("project_id", &self.project_id)
            .field("database_url", &self.database_url)
            .field("fcm_base_url", &self.fcm_base_url)
            .field("android_channel_id", &self.android_channel_id)
            .field(
                "service_account",
                &self.service_account.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub firebase: FirebaseConfig,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

fn default_fcm_base_url() -> String {
    DEFAULT_FCM_BASE_URL.to_string()
}

fn default_android_channel_id() -> String {
    DEFAULT_ANDROID_CHANNEL_ID.to_string()
}
