use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{self, HeaderName, HeaderValue, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use platform_api::FieldMessages;
use platform_db::DbPool;
use products_hr::{EmployeeForm, EmployeeService, EmployeeView, HrError, Page, PageRequest};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::{config::AppConfig, graphql::SchemaType};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub service: EmployeeService,
    pub schema: SchemaType,
    pub config: Arc<AppConfig>,
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

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "employee records server listening");
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
    let layer = CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE]);
    // Credentials cannot be combined with a wildcard origin.
    if allowed.is_empty() {
        layer.allow_origin(AllowOrigin::any())
    } else {
        layer
            .allow_credentials(true)
            .allow_origin(AllowOrigin::list(allowed))
    }
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/{id}",
            get(show_employee)
                .put(update_employee)
                .delete(delete_employee),
        )
        .route("/graphql", get(graphiql_handler).post(graphql_handler))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    search: Option<String>,
    page: Option<String>,
}

#[derive(Serialize)]
struct ListResponse {
    #[serde(flatten)]
    page: Page<EmployeeView>,
    search: Option<String>,
}

async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> HttpResult<Json<ListResponse>> {
    let search = query
        .search
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty());
    let page = PageRequest::parse_page(query.page.as_deref());
    let page = state.service.list(search.as_deref(), page).await?;
    Ok(Json(ListResponse { page, search }))
}

async fn create_employee(
    State(state): State<AppState>,
    body: Result<Json<EmployeeForm>, JsonRejection>,
) -> HttpResult<(StatusCode, Json<EmployeeView>)> {
    let Json(form) = body.map_err(HttpError::from_rejection)?;
    let employee = state.service.create(&form).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn show_employee(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> HttpResult<Json<EmployeeView>> {
    let id = employee_id(id)?;
    Ok(Json(state.service.get(id).await?))
}

async fn update_employee(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<EmployeeForm>, JsonRejection>,
) -> HttpResult<Json<EmployeeView>> {
    let id = employee_id(id)?;
    let Json(form) = body.map_err(HttpError::from_rejection)?;
    Ok(Json(state.service.update(id, &form).await?))
}

async fn delete_employee(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> HttpResult<StatusCode> {
    let id = employee_id(id)?;
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Ids that are not integers cannot name a record.
fn employee_id(path: Result<Path<i32>, PathRejection>) -> HttpResult<i32> {
    path.map(|Path(id)| id).map_err(|_| HttpError::not_found())
}

async fn graphql_handler(
    State(state): State<AppState>,
    request: GraphQLRequest,
) -> GraphQLResponse {
    state.schema.execute(request.into_inner()).await.into()
}

async fn graphiql_handler() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
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

type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug)]
struct HttpError {
    status: StatusCode,
    message: String,
    errors: Option<FieldMessages>,
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<FieldMessages>,
}

impl HttpError {
    fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
            errors: None,
        }
    }

    fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "employee not found")
    }

    fn internal(err: anyhow::Error) -> Self {
        error!(error = %err, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }

    fn from_rejection(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<HrError> for HttpError {
    fn from(err: HrError) -> Self {
        match err {
            HrError::Validation(errors) => {
                let message = errors
                    .fields()
                    .next()
                    .and_then(|field| errors.get(field).first().cloned())
                    .unwrap_or_else(|| "validation failed".to_string());
                Self {
                    status: StatusCode::UNPROCESSABLE_ENTITY,
                    message,
                    errors: Some(errors.to_map()),
                }
            }
            HrError::NotFound(_) => Self::not_found(),
            HrError::System(err) => Self::internal(err.into()),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            message: self.message,
            errors: self.errors,
        };
        (self.status, Json(body)).into_response()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
    info!("shutdown signal received");
}
