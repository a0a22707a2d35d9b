// --- File: crates/rissala_notifications/src/logic.rs ---
//! Notification dispatch.
//!
//! Delivery is fire-and-forget: the business event that triggered a push
//! (a product listed, a demand created, a message sent) has already
//! happened, so a failed push is logged and dropped. Only the token
//! registration path reports store failures to the caller.

use chrono::Utc;
use rissala_common::{database_error, RelayError};
use rissala_firebase::{FcmMessage, Notification, PushSender, UserDirectory};
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

/// Tells the Flutter client to route the tap through its notification handler
pub const CLICK_ACTION: &str = "FLUTTER_NOTIFICATION_CLICK";

/// Longest message excerpt shown in a chat notification, in UTF-16 code units
/// (the unit the mobile clients measure text in)
pub const MESSAGE_PREVIEW_UNITS: usize = 30;

pub const NEW_PRODUCT_TITLE: &str = "📦 Nouveau produit disponible !";
pub const NEW_DEMAND_TITLE: &str = "📥 Nouvelle demande de produit";
pub const NEW_MESSAGE_TITLE: &str = "💬 Nouveau message";

pub const TYPE_NEW_PRODUCT: &str = "nouveau_produit";
pub const TYPE_NEW_DEMAND: &str = "nouvelle_demande";
pub const TYPE_NEW_MESSAGE: &str = "nouveau_message";

/// Title, body and routing data of one push, before it is addressed to a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushNotification {
    pub title: String,
    pub body: String,
    pub data: HashMap<String, String>,
}

impl PushNotification {
    fn new(title: &str, body: String, kind: &str, related_id: String) -> Self {
        let mut data = HashMap::new();
        data.insert("type".to_string(), kind.to_string());
        data.insert("relatedId".to_string(), related_id);
        Self {
            title: title.to_string(),
            body,
            data,
        }
    }

    /// Broadcast for a newly listed product.
    ///
    /// `relatedId` is the dispatch timestamp in milliseconds, not the product id.
    pub fn new_product(product_title: &str, timestamp_millis: i64) -> Self {
        Self::new(
            NEW_PRODUCT_TITLE,
            format!("Découvrez : {}", product_title),
            TYPE_NEW_PRODUCT,
            timestamp_millis.to_string(),
        )
    }

    /// Sent to the seller when a buyer asks for a product.
    pub fn new_demand(buyer_name: &str, product_id: &str) -> Self {
        Self::new(
            NEW_DEMAND_TITLE,
            format!("{} souhaite acheter votre produit.", buyer_name),
            TYPE_NEW_DEMAND,
            product_id.to_string(),
        )
    }

    /// Sent to the receiver of a chat message.
    pub fn new_message(sender_name: &str, content: &str, receiver_id: &str) -> Self {
        Self::new(
            NEW_MESSAGE_TITLE,
            format!("De {}: {}", sender_name, message_preview(content)),
            TYPE_NEW_MESSAGE,
            receiver_id.to_string(),
        )
    }
}

/// The first 30 UTF-16 code units of `content`, with `...` appended when cut.
///
/// A character whose surrogate pair would straddle the limit is dropped
/// whole, so the preview may be one unit short.
pub fn message_preview(content: &str) -> String {
    if content.encode_utf16().count() <= MESSAGE_PREVIEW_UNITS {
        return content.to_string();
    }

    let mut units = 0;
    let mut cut = 0;
    for (index, ch) in content.char_indices() {
        if units + ch.len_utf16() > MESSAGE_PREVIEW_UNITS {
            break;
        }
        units += ch.len_utf16();
        cut = index + ch.len_utf8();
    }
    format!("{}...", &content[..cut])
}

/// Sends one notification to one device token.
///
/// Returns whether FCM accepted the message. Failures are logged, never
/// returned; an empty token is skipped without calling FCM.
pub async fn send_push_notification(
    push: &dyn PushSender,
    channel_id: &str,
    token: &str,
    notification: &PushNotification,
) -> bool {
    if token.is_empty() {
        warn!("Skipping push notification without device token");
        return false;
    }

    let mut data = notification.data.clone();
    data.insert("click_action".to_string(), CLICK_ACTION.to_string());

    let message = FcmMessage::for_device(
        token,
        Notification {
            title: notification.title.clone(),
            body: notification.body.clone(),
        },
        data,
        channel_id,
    );

    match push.send(&message).await {
        Ok(receipt) => {
            info!("Notification sent: {}", receipt);
            true
        }
        Err(err) => {
            error!("Failed to send notification: {}", err);
            false
        }
    }
}

/// Writes a device token into the user's record.
pub async fn register_device_token(
    directory: &dyn UserDirectory,
    user_id: &str,
    token: &str,
) -> Result<(), RelayError> {
    directory
        .set_device_token(user_id, token)
        .await
        .map_err(|err| database_error(format!("saving token for user {}: {}", user_id, err)))?;

    info!("Saved FCM token for user {}", user_id);
    Ok(())
}

/// Outcome of a product broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastSummary {
    pub attempted: usize,
    pub delivered: usize,
}

/// Notifies every user except the seller that a product was listed.
///
/// Recipients are served one after the other; a failed delivery does not
/// stop the loop. A directory read failure is logged and yields an empty
/// broadcast.
pub async fn broadcast_new_product(
    directory: &dyn UserDirectory,
    push: &dyn PushSender,
    channel_id: &str,
    product_title: &str,
    seller_id: &str,
) -> BroadcastSummary {
    let users = match directory.list_users().await {
        Ok(users) => users,
        Err(err) => {
            error!("Failed to read user directory for product broadcast: {}", err);
            return BroadcastSummary::default();
        }
    };

    let mut summary = BroadcastSummary::default();
    for (user_id, record) in users {
        if user_id == seller_id {
            continue;
        }
        let Some(token) = record.token() else {
            continue;
        };

        let notification =
            PushNotification::new_product(product_title, Utc::now().timestamp_millis());
        summary.attempted += 1;
        if send_push_notification(push, channel_id, token, &notification).await {
            summary.delivered += 1;
        }
    }

    info!(
        "Product broadcast for seller {}: {}/{} delivered",
        seller_id, summary.delivered, summary.attempted
    );
    summary
}

/// Sends `notification` to a single user if they have a device token.
///
/// Returns `None` when no delivery was attempted (unknown user, no token,
/// or directory failure), otherwise whether FCM accepted it.
pub async fn notify_user(
    directory: &dyn UserDirectory,
    push: &dyn PushSender,
    channel_id: &str,
    user_id: &str,
    notification: &PushNotification,
) -> Option<bool> {
    let record = match directory.get_user(user_id).await {
        Ok(record) => record?,
        Err(err) => {
            error!("Failed to read user {} from directory: {}", user_id, err);
            return None;
        }
    };

    match record.token() {
        Some(token) => Some(send_push_notification(push, channel_id, token, notification).await),
        None => {
            debug!("User {} has no device token, nothing sent", user_id);
            None
        }
    }
}
