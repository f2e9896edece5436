use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{OriginalUri, Path, State},
    http::{self, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::get,
};
use platform_api::{ApiError, ApiResult, HttpError};
use platform_db::DbPool;
use products_hr::{Employee, EmployeeInput, EmployeeService, HrError, SeaOrmEmployeeStore};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub employees: EmployeeService,
}

impl AppState {
    pub fn new(pool: DbPool) -> Self {
        let store = SeaOrmEmployeeStore::new(pool.clone());
        Self {
            pool,
            employees: EmployeeService::new(Arc::new(store)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(
    config: ServeConfig,
    state: AppState,
    cors_origins: &[String],
) -> anyhow::Result<()> {
    let router = build_router(state, cors_origins);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "employee manager listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route("/employee", get(list_employees).post(create_employee))
        .route(
            "/employee/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), MakeRequestUuid))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors_origins)),
        )
        .with_state(state)
}

/// Map a service failure onto the HTTP error reported for `uri`.
pub fn translate(err: HrError, uri: &Uri) -> HttpError {
    let error = match err {
        HrError::NotFound(_) => ApiError::NotFound(err.to_string()),
        HrError::Conflict(_) => ApiError::Conflict(err.to_string()),
        HrError::Database(_) => ApiError::internal(err.into()),
    };
    error.at(uri.path())
}

async fn list_employees(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<Vec<Employee>>> {
    let employees = state
        .employees
        .get_all_employees()
        .await
        .map_err(|err| translate(err, &uri))?;
    Ok(Json(employees))
}

async fn get_employee(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> ApiResult<Json<Employee>> {
    let employee = state
        .employees
        .get_employee_by_id(id)
        .await
        .map_err(|err| translate(err, &uri))?;
    Ok(Json(employee))
}

async fn create_employee(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Json(input): Json<EmployeeInput>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    let employee = state
        .employees
        .create_employee(input)
        .await
        .map_err(|err| translate(err, &uri))?;
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn update_employee(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
    Json(input): Json<EmployeeInput>,
) -> ApiResult<Json<Employee>> {
    let employee = state
        .employees
        .update_employee(id, input)
        .await
        .map_err(|err| translate(err, &uri))?;
    Ok(Json(employee))
}

async fn delete_employee(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state
        .employees
        .delete_employee(id)
        .await
        .map_err(|err| translate(err, &uri))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = state.pool.ping().await.is_ok();
    Json(HealthResponse {
        ok: db_ok,
        db_ok,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    db_ok: bool,
    version: &'static str,
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
}
