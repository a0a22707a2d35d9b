// File: services/rissala_backend/src/main.rs
use axum::{routing::get, Router};
use rissala_config::load_config;
use rissala_firebase::FirebaseError;
use rissala_notifications::{routes as notification_routes, NotificationState};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[derive(Error, Debug)]
enum StartupError {
    #[error("Failed to load config: {0}")]
    Config(#[from] rissala_config::ConfigError),

    #[error("Failed to initialise Firebase: {0}")]
    Firebase(#[from] FirebaseError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    rissala_common::logging::init();

    let config = Arc::new(load_config()?);
    info!("Loaded configuration: {:?}", config);

    let state = Arc::new(NotificationState::from_config(&config).await?);

    let api_router = Router::new().nest("/api", notification_routes(state));

    #[allow(unused_mut)] // mutated only with the openapi feature
    let mut app = Router::new()
        .route("/", get(|| async { "Rissala notification relay" }))
        .merge(api_router);

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use rissala_notifications::openapi::NotificationsApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        info!("Adding Swagger UI at /api/docs");
        let swagger_ui = SwaggerUi::new("/api/docs")
            .url("/api/docs/openapi.json", NotificationsApiDoc::openapi());
        app = app.merge(swagger_ui);
    }

    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Rissala relay listening on http://{}", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
