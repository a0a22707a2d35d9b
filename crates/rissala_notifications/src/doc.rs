#![allow(dead_code)]
use utoipa::OpenApi;

use crate::models::{
    CreateDemandRequest, PublishProductRequest, RegisterTokenRequest, SendMessageRequest,
};

#[utoipa::path(
    post,
    path = "/notifications/fcm-token",
    request_body(content = RegisterTokenRequest, example = json!({
        "token": "fcm-registration-token-example",
        "user_id": "user123"
    })),
    responses(
        (status = 200, description = "Token saved", example = json!({"success": true})),
        (status = 400, description = "Missing token or user_id",
         example = json!({"success": false, "error": "Token ou user_id manquant"})),
        (status = 500, description = "Directory write failed",
         example = json!({"success": false, "error": "Erreur serveur"}))
    ),
    tag = "Notifications"
)]
fn doc_register_token_handler() {}

#[utoipa::path(
    post,
    path = "/products",
    request_body(content = PublishProductRequest, example = json!({
        "title": "Vélo tout terrain",
        "sellerId": "seller42"
    })),
    responses(
        (status = 200, description = "Product broadcast to all other users",
         example = json!({"success": true, "message": "Produit publié"})),
        (status = 400, description = "Missing title or sellerId",
         example = json!({"success": false, "error": "Titre ou vendeur manquant"}))
    ),
    tag = "Notifications"
)]
fn doc_publish_product_handler() {}

#[utoipa::path(
    post,
    path = "/demands",
    request_body(content = CreateDemandRequest, example = json!({
        "productId": "p42",
        "sellerId": "seller42",
        "buyerName": "Awa"
    })),
    responses(
        (status = 200, description = "Seller notified if they have a device token",
         example = json!({"success": true})),
        (status = 400, description = "Missing productId or sellerId",
         example = json!({"success": false, "error": "Données manquantes"}))
    ),
    tag = "Notifications"
)]
fn doc_create_demand_handler() {}

#[utoipa::path(
    post,
    path = "/messages",
    request_body(content = SendMessageRequest, example = json!({
        "senderName": "Ali",
        "receiverId": "u1",
        "content": "Hello there, is the item still available today?"
    })),
    responses(
        (status = 200, description = "Receiver notified if they have a device token",
         example = json!({"success": true})),
        (status = 400, description = "Missing receiverId or content",
         example = json!({"success": false, "error": "Destinataire ou message manquant"}))
    ),
    tag = "Notifications"
)]
fn doc_send_message_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_register_token_handler,
        doc_publish_product_handler,
        doc_create_demand_handler,
        doc_send_message_handler,
    ),
    components(
        schemas(
            RegisterTokenRequest,
            PublishProductRequest,
            CreateDemandRequest,
            SendMessageRequest,
        )
    ),
    tags(
        (name = "Notifications", description = "Push notification relay")
    ),
    servers(
        (url = "/api", description = "Rissala relay API")
    )
)]
pub struct NotificationsApiDoc;
