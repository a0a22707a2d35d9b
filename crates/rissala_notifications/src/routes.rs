use axum::{routing::post, Router};
use std::sync::Arc;
use tracing::info;

use crate::handlers::{
    create_demand_handler, publish_product_handler, register_token_handler,
    send_message_handler, NotificationState,
};

/// Create the notification relay routes
///
/// Paths are relative; the backend nests them under `/api`.
pub fn routes(state: Arc<NotificationState>) -> Router {
    info!("Notification routes initialized");

    Router::new()
        .route("/notifications/fcm-token", post(register_token_handler))
        .route("/products", post(publish_product_handler))
        .route("/demands", post(create_demand_handler))
        .route("/messages", post(send_message_handler))
        .with_state(state)
}
