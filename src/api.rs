use std::sync::Arc;

use anyhow::{Error, Result};
use axum::{
    Router,
    body::Bytes,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde_json::{Map, Value};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{info, info_span};
use uuid::Uuid;

use crate::{
    clients::{health::HealthChecker, loader::TemplateLoader, template::TemplateEngine},
    config::Config,
    error::ServiceError,
    handlers::{default_registry, registry::ActionRegistry},
    models::{
        action::SemanticAction, health::HealthStatus, request::NormalizedRequest,
        response::RenderResponse,
    },
};

pub const API_KEY_HEADER: &str = "x-api-key";

pub struct AppState {
    registry: ActionRegistry,
    health_checker: HealthChecker,
    api_key: Option<String>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let engine = TemplateEngine::new();
        let loader = TemplateLoader::new(config)?;

        Ok(Self::with_registry(
            default_registry(loader, engine),
            engine,
            config.api_key().map(str::to_string),
        ))
    }

    pub fn with_registry(
        registry: ActionRegistry,
        engine: TemplateEngine,
        api_key: Option<String>,
    ) -> Self {
        Self {
            registry,
            health_checker: HealthChecker::new(engine),
            api_key,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let render_routes = Router::new()
        .route("/render", post(render))
        .route("/semantic/action", post(semantic_action))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .nest("/v1/api", render_routes)
        .route("/health", get(health_check))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                info_span!(
                    "http_request",
                    request_id = %Uuid::new_v4(),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .with_state(state)
}

pub async fn run_api_server(config: Config) -> Result<(), Error> {
    let state = Arc::new(AppState::new(&config)?);
    let kinds: Vec<&str> = state.registry.kinds().collect();
    info!(action_types = ?kinds, auth_enabled = state.api_key.is_some(), "Action registry ready");

    let app = router(state.clone());

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = TcpListener::bind(&addr).await?;

    info!(address = %addr, "Template service started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Template service stopped");

    Ok(())
}

/// POST /v1/api/render: flat body, converted to a `ReplaceAction`.
async fn render(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<RenderResponse>, ServiceError> {
    let body = serde_json::from_slice::<Map<String, Value>>(&body)?;

    let request = NormalizedRequest::from_body(&body)?;
    request.validate()?;

    let envelope = serde_json::to_value(request.into_action())
        .map_err(|e| ServiceError::Internal(e.to_string()))?;

    let action = state.registry.dispatch(envelope).await?;

    let result = action
        .render_result()
        .ok_or_else(|| ServiceError::Internal("action completed without a result".to_string()))?;

    Ok(Json(RenderResponse::from(result)))
}

/// POST /v1/api/semantic/action: JSON-LD envelope.
async fn semantic_action(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<SemanticAction>, ServiceError> {
    let envelope = serde_json::from_slice::<Value>(&body)?;

    let action = state.registry.dispatch(envelope).await?;

    Ok(Json(action))
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_checker.check_all();

    let status_code = match health.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    if let Some(expected) = state.api_key.as_deref() {
        let provided = request
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok());

        if provided != Some(expected) {
            return Err(ServiceError::Unauthorized);
        }
    }

    Ok(next.run(request).await)
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received");
}
