//! HTTP handlers for the notification relay
//!
//! Each handler validates the fields it needs, performs its directory and
//! push calls, and answers with a `{success, ...}` JSON body. Only a
//! missing field (400) or a failed token write (500) produces an error
//! response; push delivery never changes the outcome.

use axum::{body::Bytes, extract::State, response::Response};
use rissala_common::{handle_status_result, validation_error, StatusBody};
use rissala_config::AppConfig;
use rissala_firebase::{
    FirebaseClient, FirebaseError, PushSender, RealtimeDatabaseClient, ServiceAccountTokenSource,
    UserDirectory,
};
use std::sync::Arc;
use tracing::{debug, info};

use crate::logic::{
    broadcast_new_product, notify_user, register_device_token, PushNotification,
};
use crate::models::{
    parse_body, required, CreateDemandRequest, PublishProductRequest, RegisterTokenRequest,
    SendMessageRequest,
};

pub const MISSING_TOKEN_FIELDS: &str = "Token ou user_id manquant";
pub const MISSING_PRODUCT_FIELDS: &str = "Titre ou vendeur manquant";
pub const MISSING_DEMAND_FIELDS: &str = "Données manquantes";
pub const MISSING_MESSAGE_FIELDS: &str = "Destinataire ou message manquant";
pub const PRODUCT_PUBLISHED: &str = "Produit publié";

/// Shared state for the notification handlers
#[derive(Clone)]
pub struct NotificationState {
    /// The user directory holding device tokens
    pub directory: Arc<dyn UserDirectory>,

    /// The push-delivery service
    pub push: Arc<dyn PushSender>,

    /// Android notification channel set on every push
    pub android_channel_id: String,
}

impl NotificationState {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        push: Arc<dyn PushSender>,
        android_channel_id: impl Into<String>,
    ) -> Self {
        Self {
            directory,
            push,
            android_channel_id: android_channel_id.into(),
        }
    }

    /// Builds the Firebase clients from the application configuration.
    ///
    /// # Errors
    ///
    /// `ConfigError` when `FIREBASE_SERVICE_ACCOUNT` is missing or invalid,
    /// or the database URL cannot be parsed.
    pub async fn from_config(config: &AppConfig) -> Result<Self, FirebaseError> {
        let firebase = &config.firebase;
        let service_account = firebase.service_account.as_deref().ok_or_else(|| {
            FirebaseError::ConfigError("FIREBASE_SERVICE_ACCOUNT is not set".to_string())
        })?;

        let tokens = Arc::new(ServiceAccountTokenSource::from_json(service_account).await?);
        let directory = RealtimeDatabaseClient::new(firebase, tokens.clone())?;
        let push = FirebaseClient::new(firebase, tokens);

        Ok(Self::new(
            Arc::new(directory),
            Arc::new(push),
            firebase.android_channel_id.clone(),
        ))
    }
}

/// Handler for saving a device token sent by the mobile app
///
/// # Responses
///
/// - 200 OK: token written to `users/{user_id}/fcmToken`
/// - 400 Bad Request: `token` or `user_id` missing
/// - 500 Internal Server Error: the directory write failed
#[axum::debug_handler]
pub async fn register_token_handler(
    State(state): State<Arc<NotificationState>>,
    body: Bytes,
) -> Response {
    let payload: RegisterTokenRequest = parse_body(&body);

    let (Some(token), Some(user_id)) = (required(&payload.token), required(&payload.user_id))
    else {
        return handle_status_result(Err(validation_error(MISSING_TOKEN_FIELDS)));
    };

    debug!("Registering device token for user: {}", user_id);
    let result = register_device_token(state.directory.as_ref(), user_id, token)
        .await
        .map(|()| StatusBody::ok());
    handle_status_result(result)
}

/// Handler for a newly published product: notifies every other user
///
/// # Responses
///
/// - 200 OK: broadcast finished (whatever the delivery outcome)
/// - 400 Bad Request: `title` or `sellerId` missing
#[axum::debug_handler]
pub async fn publish_product_handler(
    State(state): State<Arc<NotificationState>>,
    body: Bytes,
) -> Response {
    let payload: PublishProductRequest = parse_body(&body);

    let (Some(title), Some(seller_id)) = (required(&payload.title), required(&payload.seller_id))
    else {
        return handle_status_result(Err(validation_error(MISSING_PRODUCT_FIELDS)));
    };

    info!("Product published by {}: {}", seller_id, title);
    broadcast_new_product(
        state.directory.as_ref(),
        state.push.as_ref(),
        &state.android_channel_id,
        title,
        seller_id,
    )
    .await;

    handle_status_result(Ok(StatusBody::ok_with_message(PRODUCT_PUBLISHED)))
}

/// Handler for a new purchase demand: notifies the seller
///
/// # Responses
///
/// - 200 OK: handled (the seller may have no token)
/// - 400 Bad Request: `productId` or `sellerId` missing
#[axum::debug_handler]
pub async fn create_demand_handler(
    State(state): State<Arc<NotificationState>>,
    body: Bytes,
) -> Response {
    let payload: CreateDemandRequest = parse_body(&body);

    let (Some(product_id), Some(seller_id)) =
        (required(&payload.product_id), required(&payload.seller_id))
    else {
        return handle_status_result(Err(validation_error(MISSING_DEMAND_FIELDS)));
    };

    let buyer_name = payload.buyer_name.as_deref().unwrap_or_default();
    let notification = PushNotification::new_demand(buyer_name, product_id);
    notify_user(
        state.directory.as_ref(),
        state.push.as_ref(),
        &state.android_channel_id,
        seller_id,
        &notification,
    )
    .await;

    handle_status_result(Ok(StatusBody::ok()))
}

/// Handler for a new chat message: notifies the receiver
///
/// # Responses
///
/// - 200 OK: handled (the receiver may have no token)
/// - 400 Bad Request: `receiverId` or `content` missing
#[axum::debug_handler]
pub async fn send_message_handler(
    State(state): State<Arc<NotificationState>>,
    body: Bytes,
) -> Response {
    let payload: SendMessageRequest = parse_body(&body);

    let (Some(receiver_id), Some(content)) =
        (required(&payload.receiver_id), required(&payload.content))
    else {
        return handle_status_result(Err(validation_error(MISSING_MESSAGE_FIELDS)));
    };

    let sender_name = payload.sender_name.as_deref().unwrap_or_default();
    let notification = PushNotification::new_message(sender_name, content, receiver_id);
    notify_user(
        state.directory.as_ref(),
        state.push.as_ref(),
        &state.android_channel_id,
        receiver_id,
        &notification,
    )
    .await;

    handle_status_result(Ok(StatusBody::ok()))
}
