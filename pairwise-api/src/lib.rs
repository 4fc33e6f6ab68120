//! pairwise-api library - PairWise wizard HTTP service
//!
//! Owns the session state machine, the file registry, and the
//! matching/download progression engines, and exposes them over the
//! original PairWise wire contract under `/pairwise`.

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use pairwise_common::Result;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod error;
pub mod progress;
pub mod provider;
pub mod registry;
pub mod session;
pub mod validate;
pub mod workflow;

use config::Config;
use progress::{DownloadEngine, MatchingEngine};
use provider::{SimulatedDownloadProvider, SimulatedMatchProvider};
use registry::FileRegistry;
use session::{Identity, SessionManager};
use validate::{ContentValidator, CsvColumnValidator};

/// Application state shared across HTTP handlers.
///
/// Everything is explicitly injected; there are no module-level
/// singletons. The two mutexes are the process-wide locks serializing
/// session and registry mutations.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<SessionManager>>,
    pub registry: Arc<Mutex<FileRegistry>>,
    pub matching: Arc<MatchingEngine>,
    pub download: Arc<DownloadEngine>,
    pub validator: Arc<dyn ContentValidator>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Build state from configuration, opening the registry backing file
    pub fn new(config: Config) -> Result<Self> {
        let registry = FileRegistry::open(&config.data_file)?;

        let session = SessionManager::new(
            Identity {
                username: config.username.clone(),
                one_time_password: config.one_time_password.clone(),
                access_code: config.access_code.clone(),
            },
            config.token_ttl(),
        );

        let matching = MatchingEngine::new(
            Arc::new(SimulatedMatchProvider {
                delay: config.provider_delay(),
            }),
            config.provider_timeout(),
        );
        let download = DownloadEngine::new(
            Arc::new(SimulatedDownloadProvider {
                delay: config.provider_delay(),
            }),
            config.provider_timeout(),
        );

        let validator = CsvColumnValidator::new(config.required_csv_columns.clone());

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            registry: Arc::new(Mutex::new(registry)),
            matching: Arc::new(matching),
            download: Arc::new(download),
            validator: Arc::new(validator),
            config: Arc::new(config),
        })
    }
}

/// Build application router.
///
/// Protected routes require a bearer token; login, access-code
/// verification, logout (idempotent teardown), and /health are public.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    let protected = Router::new()
        .route("/pairwise/auth-check", get(api::auth::auth_check))
        .route("/pairwise/file", post(api::files::upload_file))
        .route("/pairwise/files", get(api::files::list_files))
        .route("/pairwise/match", post(api::progress::begin_match))
        .route("/pairwise/download", post(api::progress::begin_download))
        .route("/pairwise/workflow", get(api::workflow::workflow_state))
        .route(
            "/pairwise/confirm-completion",
            post(api::workflow::confirm_completion),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth::auth_middleware,
        ));

    let public = Router::new()
        .route("/pairwise/login", post(api::auth::login))
        .route(
            "/pairwise/verify-access-code",
            post(api::auth::verify_access_code),
        )
        .route("/pairwise/logout", post(api::auth::logout))
        .merge(api::health::health_routes());

    let allowed_origin = state
        .config
        .allowed_origin
        .parse::<HeaderValue>()
        .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:3000"));
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
