//! PhishGuard Prediction Server
//!
//! Classifies submitted URLs as safe or phishing.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  PHISHGUARD PREDICT SERVER                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  POST /predict                                              │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌───────────────┐   ┌──────────────┐   ┌───────────────┐  │
//! │  │  Feature      │──▶│  30 signals  │──▶│  Boosted      │  │
//! │  │  Extractor    │   │  (layout)    │   │  Trees        │  │
//! │  └───────────────┘   └──────────────┘   └───────┬───────┘  │
//! │                                                 ▼           │
//! │                                   {"isSafe", "confidence"}  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod models;
mod handlers;
mod error;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use phishguard_core::{
    logic::features::{LayoutMismatchError, FEATURE_COUNT},
    Classifier, ModelArtifact, ModelError, UrlFeatureExtractor,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use models::ModelInfo;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("cannot load model: {0}")]
    Model(#[from] ModelError),

    #[error("model expects {found} features but the extractor produces {expected}")]
    WidthMismatch { found: usize, expected: usize },

    #[error("model was trained on other columns: {0}")]
    Layout(#[from] LayoutMismatchError),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "phishguard_server=debug,phishguard_core=info,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env();

    tracing::info!("PhishGuard server starting ({})...", config.environment);
    tracing::info!("Model: {}", config.model_path);

    let state = match build_state(config.clone()) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Startup failed: {:#}", e);
            return Err(e);
        }
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn Classifier + Send + Sync>,
    pub model_info: Arc<ModelInfo>,
    pub extractor: Arc<UrlFeatureExtractor>,
    pub config: config::Config,
}

/// Load the artifact once and check it against the extractor layout
fn load_model(path: &str) -> Result<ModelArtifact, StartupError> {
    let artifact = ModelArtifact::load(path)?;

    if artifact.n_features() != FEATURE_COUNT {
        return Err(StartupError::WidthMismatch {
            found: artifact.n_features(),
            expected: FEATURE_COUNT,
        });
    }
    artifact.layout.validate()?;

    tracing::info!(
        "Feature layout v{} (hash {:08x}) matches the extractor",
        artifact.layout.version,
        artifact.layout.hash
    );
    Ok(artifact)
}

fn build_state(config: config::Config) -> anyhow::Result<AppState> {
    let artifact = load_model(&config.model_path)?;
    let extractor = UrlFeatureExtractor::new(config.extractor_config())?;

    if config.is_production() && !(config.fetch_page && config.resolve_dns) {
        tracing::warn!("Network signals disabled in production; page and DNS features will read as phishing");
    }

    let model_info = ModelInfo::from_artifact(&artifact);
    Ok(AppState {
        model: Arc::new(artifact.model),
        model_info: Arc::new(model_info),
        extractor: Arc::new(extractor),
        config,
    })
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/model", get(handlers::model::info))
        .route("/predict", post(handlers::predict::predict))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any)
                ),
        )
        .with_state(state)
}
