//! Configuration for the Rissala notification relay.
//!
//! Layers, lowest precedence first:
//!
//! 1. serde defaults in [`models`]
//! 2. `config/default.toml`
//! 3. `config/{RUN_ENV}.toml` (`RUN_ENV` defaults to `debug`)
//! 4. `RISSALA__SECTION__KEY` environment variables
//! 5. the plain `PORT` and `FIREBASE_SERVICE_ACCOUNT` variables

use config::{Config, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::PathBuf;
use tracing::warn;

pub mod env_vars;
pub mod models;

pub use config::ConfigError;
pub use models::*;

use env_vars::{
    get_config_prefix, non_empty_env_var, parse_port, project_id_from_service_account,
    CONFIG_SEPARATOR, PORT_VAR, SERVICE_ACCOUNT_VAR,
};

/// Loads the application configuration from files and the environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let config_dir = env::var("CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(&get_config_prefix())
                .separator(CONFIG_SEPARATOR)
                .try_parsing(true),
        );

    let config: AppConfig = builder.build()?.try_deserialize()?;
    Ok(apply_env_overrides(
        config,
        env::var(PORT_VAR).ok(),
        non_empty_env_var(SERVICE_ACCOUNT_VAR),
    ))
}

/// Applies the plain `PORT` / `FIREBASE_SERVICE_ACCOUNT` overrides.
///
/// An unparsable `PORT` is ignored with a warning and the configured port
/// (3000 unless changed) is kept.
pub fn apply_env_overrides(
    mut config: AppConfig,
    port: Option<String>,
    service_account: Option<String>,
) -> AppConfig {
    if let Some(raw) = port {
        match parse_port(&raw) {
            Some(port) => config.server.port = port,
            None => warn!(
                "Ignoring invalid {} value {:?}, using port {}",
                PORT_VAR, raw, config.server.port
            ),
        }
    }

    if let Some(service_account) = service_account {
        config.firebase.service_account = Some(service_account);
    }

    if config.firebase.project_id.is_none() {
        config.firebase.project_id = config
            .firebase
            .service_account
            .as_deref()
            .and_then(project_id_from_service_account);
    }

    config
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The file is `DOTENV_OVERRIDE` when set, otherwise `.env`. Loading happens
/// at most once per process; a missing file is not an error.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = std::env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
