//! HTTP server for the game storefront.
//!
//! Serves fixture lookups, the questionnaire, sign-in/out and the home view.
//! The home view is assembled by [`HomeOrchestrator`] from the fixture store
//! and the external recommendation service.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod routes;
pub mod session;
pub mod state;

pub use config::ServerConfig;
pub use error::AppError;
pub use orchestrator::{EntryPath, HomeOrchestrator, HomeView};
pub use session::{CookieIdentity, IdentityResolver, Session};
pub use state::AppState;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    routing::{get, post},
};
use data_loader::FixtureStore;
use questionnaire::ImageResolver;
use rec_client::RecommendationClient;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};

use routes::{
    cold_start_handler, games_handler, health_handler, home_handler, missing_username_handler,
    preferences_handler, questionnaire_handler, sign_in_handler, sign_out_handler,
    sign_up_handler, user_handler,
};

/// All routes, with `/pics` served from `pics_dir`
pub fn build_router(state: AppState, pics_dir: impl AsRef<std::path::Path>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/games", post(games_handler))
        .route("/api/user", get(missing_username_handler))
        .route("/api/user/", get(missing_username_handler))
        .route("/api/user/:username", get(user_handler))
        .route("/api/preferences", post(preferences_handler))
        .route("/api/session", post(sign_in_handler).delete(sign_out_handler))
        .route("/api/session/signup", post(sign_up_handler))
        .route("/api/home", get(home_handler))
        .route("/api/home/coldstart", post(cold_start_handler))
        .route("/api/questionnaire", get(questionnaire_handler))
        .nest_service("/pics", ServeDir::new(pics_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Load fixtures, connect the recommender and serve until shutdown
pub async fn run(config: ServerConfig) -> Result<()> {
    let data_dir = config.data_dir.clone();
    let store = tokio::task::spawn_blocking(move || FixtureStore::load_from_dir(&data_dir))
        .await
        .context("Fixture loading task panicked")?
        .context("Failed to load fixtures")?;

    let recommender = RecommendationClient::new(config.recommender_url.as_str())
        .context("Failed to create recommendation client")?;
    info!("Recommendation service at {}", recommender.service_address());

    if !config.pics_dir.is_dir() {
        warn!(
            "Image directory {} does not exist, questionnaire will use placeholders",
            config.pics_dir.display()
        );
    }

    let state = AppState::new(
        Arc::new(store),
        Arc::new(recommender),
        ImageResolver::new(&config.pics_dir),
    );
    let app = build_router(state, &config.pics_dir);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Storefront listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install terminate handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
