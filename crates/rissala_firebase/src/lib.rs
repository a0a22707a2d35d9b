//! Firebase integration for the Rissala relay
//!
//! This crate wraps the two managed Firebase services the relay depends on:
//!
//! - Firebase Cloud Messaging HTTP v1 API, behind the [`PushSender`] trait
//! - the Realtime Database REST API holding the user directory, behind the
//!   [`UserDirectory`] trait
//!
//! Both clients authenticate with OAuth2 access tokens for the project's
//! service account (see [`auth`]).
//!
//! # Example
//!
//! ```rust,no_run
//! use rissala_config::FirebaseConfig;
//! use rissala_firebase::{FirebaseClient, RealtimeDatabaseClient, ServiceAccountTokenSource};
//! use std::sync::Arc;
//!
//! async fn build(config: FirebaseConfig, key_json: &str) -> Result<(), rissala_firebase::FirebaseError> {
//!     let tokens = Arc::new(ServiceAccountTokenSource::from_json(key_json).await?);
//!     let _push = FirebaseClient::new(&config, tokens.clone());
//!     let _directory = RealtimeDatabaseClient::new(&config, tokens)?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod database;

pub use auth::{AccessTokenSource, ServiceAccountTokenSource, StaticTokenSource};
pub use client::{FcmMessage, FirebaseClient, FirebaseError, Notification, PushSender};
pub use database::{RealtimeDatabaseClient, UserDirectory, UserRecord};
