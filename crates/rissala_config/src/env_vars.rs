//! Environment variable handling for the Rissala relay.
//!
//! Besides the prefixed `RISSALA__SECTION__KEY` overrides handled by the
//! `config` crate, the relay honours two plain variables that hosting
//! platforms set directly: `PORT` and `FIREBASE_SERVICE_ACCOUNT`.

use std::env;

/// The prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "RISSALA";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// Listen port set by the hosting platform
pub const PORT_VAR: &str = "PORT";

/// JSON-encoded Firebase service account key
pub const SERVICE_ACCOUNT_VAR: &str = "FIREBASE_SERVICE_ACCOUNT";

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Convert a configuration path to an environment variable name
///
/// # Arguments
///
/// * `path` - The configuration path (e.g., "server.host")
///
/// # Returns
///
/// The environment variable name (e.g., "RISSALA__SERVER__HOST")
pub fn config_path_to_env_var(path: &str) -> String {
    let prefix = get_config_prefix();
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", prefix, CONFIG_SEPARATOR, path).to_uppercase()
}

/// Parse a listen port, rejecting empty or out-of-range values.
pub fn parse_port(raw: &str) -> Option<u16> {
    raw.trim().parse::<u16>().ok().filter(|port| *port != 0)
}

/// Read the non-empty value of an environment variable.
pub fn non_empty_env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Extract `project_id` from a JSON-encoded service account key.
pub fn project_id_from_service_account(service_account: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(service_account).ok()?;
    value
        .get("project_id")
        .and_then(|id| id.as_str())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
