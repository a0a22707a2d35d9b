//! Request bodies accepted by the notification endpoints.
//!
//! Every field is optional at the type level: presence is checked by the
//! handlers so that a missing field yields the endpoint's own 400 message
//! instead of a generic extractor rejection. Field values may be JSON
//! strings or numbers (ids are sometimes sent as numbers by the app).

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// `POST /notifications/fcm-token`
#[derive(Debug, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RegisterTokenRequest {
    /// The device's FCM registration token
    #[serde(default, deserialize_with = "loose_string")]
    pub token: Option<String>,

    #[serde(default, deserialize_with = "loose_string")]
    pub user_id: Option<String>,
}

/// `POST /products`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PublishProductRequest {
    #[serde(default, deserialize_with = "loose_string")]
    pub title: Option<String>,

    /// The seller is excluded from the broadcast
    #[serde(default, deserialize_with = "loose_string")]
    pub seller_id: Option<String>,
}

/// `POST /demands`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateDemandRequest {
    #[serde(default, deserialize_with = "loose_string")]
    pub product_id: Option<String>,

    #[serde(default, deserialize_with = "loose_string")]
    pub seller_id: Option<String>,

    #[serde(default, deserialize_with = "loose_string")]
    pub buyer_name: Option<String>,
}

/// `POST /messages`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SendMessageRequest {
    #[serde(default, deserialize_with = "loose_string")]
    pub sender_name: Option<String>,

    #[serde(default, deserialize_with = "loose_string")]
    pub receiver_id: Option<String>,

    #[serde(default, deserialize_with = "loose_string")]
    pub content: Option<String>,
}

/// Parses a request body, falling back to an empty request.
///
/// Bodies that are not a JSON object of the expected shape behave like `{}`,
/// which makes every required field missing.
pub fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> T {
    serde_json::from_slice(body).unwrap_or_default()
}

/// The value of a required field, if present and non-empty.
pub fn required(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

/// Accepts strings, non-zero numbers and `true`; everything else counts as absent.
fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) if number.as_f64() == Some(0.0) => None,
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(true)) => Some("true".to_string()),
        _ => None,
    })
}
