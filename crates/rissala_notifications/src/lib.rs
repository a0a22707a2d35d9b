//! Push-notification relay endpoints for Rissala
//!
//! The mobile app backend reports three business events and the app itself
//! registers device tokens:
//!
//! - `POST /notifications/fcm-token` - save a device token for a user
//! - `POST /products` - notify every user but the seller of a new product
//! - `POST /demands` - notify a seller of a purchase demand
//! - `POST /messages` - notify the receiver of a chat message
//!
//! Recipients' tokens come from the user directory; notifications go out
//! through FCM. See [`logic`] for the delivery policy.

#[cfg(feature = "openapi")]
pub mod doc;
pub mod handlers;
pub mod logic;
pub mod models;
pub mod routes;

pub use handlers::NotificationState;
pub use routes::routes;

#[cfg(feature = "openapi")]
pub mod openapi {
    pub use crate::doc::NotificationsApiDoc;
}
