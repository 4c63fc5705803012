use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use crate::{
    clients::health::HealthChecker,
    config::ConfigSource,
    error::DispatchError,
    models::{health::HealthStatus, request::NotificationRequest, response::ErrorResponse},
    utils::process_send_request,
};

pub struct AppState {
    config_source: ConfigSource,
    health_checker: HealthChecker,
}

impl AppState {
    pub fn new(config_source: ConfigSource) -> Self {
        Self {
            health_checker: HealthChecker::new(config_source.clone()),
            config_source,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(send_push))
        .route("/send_push", post(send_push))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_api_server(
    port: u16,
    config_source: ConfigSource,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(Arc::new(AppState::new(config_source)));

    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;

    info!(address = %addr, "Push dispatcher listening");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn send_push(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!("send_push", %request_id);

    let result = async {
        let config = state.config_source.resolve()?;
        let request = NotificationRequest::parse(&body)?;
        process_send_request(&config, &request).await
    }
    .instrument(span.clone())
    .await;

    match result {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            span.in_scope(|| error!(kind = e.kind(), error = %e, "send_push failed"));
            failure_response(e)
        }
    }
}

fn failure_response(e: DispatchError) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_checker.check_all().await;

    let status_code = match health.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}
