//! # API REST
//!
//! REST API for the PDF store.
//!
//! Handles:
//! - HTTP endpoints with axum (`GET /*path` retrieve, `POST /` store)
//! - Upload ingestion for multipart and raw-binary bodies
//! - Error translation, CORS, request tracing and body limits
//! - OpenAPI document at `/api-docs/openapi.json`
//!
//! Storage semantics live in `pdfstore_files`; this crate only maps HTTP onto them.

#![warn(rust_2018_idioms)]

mod error;
mod upload;

use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, DefaultBodyLimit, Path as AxumPath, State},
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use pdfstore_core::{AllowedOrigins, CoreConfig, CorsPolicy};
use pdfstore_files::{FileStore, PDF_MEDIA_TYPE};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::{OpenApi, ToSchema};

pub use error::{ApiError, INTERNAL_ERROR_BODY, NOT_FOUND_BODY};
pub use upload::StoreUpload;

pub const STORED_MESSAGE: &str = "File stored successfully";

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    store: FileStore,
    cfg: Arc<CoreConfig>,
}

impl AppState {
    pub fn new(store: FileStore, cfg: Arc<CoreConfig>) -> Self {
        Self { store, cfg }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Body of a successful store.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StoreRes {
    pub message: String,
    pub location: String,
}

/// Body of a rejected request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, retrieve_file, store_file),
    components(schemas(HealthRes, StoreRes, MessageRes))
)]
pub struct ApiDoc;

/// Builds the application router.
///
/// # Errors
/// Returns an error if the CORS policy contains a method, header or origin that is not a
/// valid HTTP token.
pub fn router(state: AppState) -> anyhow::Result<Router> {
    let cors = cors_layer(state.cfg.cors())?;
    let body_limit = state.cfg.max_upload_bytes();

    Ok(Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi))
        .route("/", get(retrieve_root).post(store_file))
        .route("/*path", get(retrieve_file))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            TraceLayer::new_for_http().on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state))
}

/// Converts a [`CorsPolicy`] into a `tower-http` layer.
pub fn cors_layer(policy: &CorsPolicy) -> anyhow::Result<CorsLayer> {
    let origin = match &policy.allowed_origins {
        AllowedOrigins::Any => AllowOrigin::any(),
        AllowedOrigins::List(origins) => AllowOrigin::list(
            origins
                .iter()
                .map(|o| HeaderValue::from_str(o))
                .collect::<Result<Vec<_>, _>>()?,
        ),
    };

    let methods = policy
        .allowed_methods
        .iter()
        .map(|m| Method::from_bytes(m.as_bytes()))
        .collect::<Result<Vec<_>, _>>()?;

    let headers = policy
        .allowed_headers
        .iter()
        .map(|h| HeaderName::from_bytes(h.as_bytes()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::list(methods))
        .allow_headers(AllowHeaders::list(headers)))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "PDF store is alive".into(),
    })
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[utoipa::path(
    get,
    path = "/{path}",
    params(
        ("path" = String, Path, description = "Location returned by a store, e.g. acct123/2024/invoices/inv-001.pdf")
    ),
    responses(
        (status = 200, description = "Raw PDF bytes (application/pdf)"),
        (status = 400, description = "Invalid path", body = MessageRes),
        (status = 404, description = "File Not Found"),
        (status = 500, description = "Internal Server Error")
    )
)]
/// Serve a stored PDF by path
///
/// The path is percent-decoded by the router and resolved against the storage root. The whole
/// file is read into memory on the blocking pool.
///
/// # Errors
/// - `400 Bad Request` if a path component is `.`/`..` or otherwise unsafe, or the path does
///   not decode to UTF-8
/// - `404 Not Found` if nothing is stored at the path
/// - `500 Internal Server Error` for any other read failure
#[axum::debug_handler]
async fn retrieve_file(
    State(state): State<AppState>,
    path: Result<AxumPath<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let AxumPath(path) = path?;
    let store = state.store.clone();
    let bytes = tokio::task::spawn_blocking(move || store.retrieve(&path)).await??;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, PDF_MEDIA_TYPE)],
        bytes,
    )
        .into_response())
}

/// `GET /` names the storage root itself, never a file.
async fn retrieve_root() -> ApiError {
    ApiError::NotFound
}

#[utoipa::path(
    post,
    path = "/",
    request_body(
        content = String,
        content_type = "multipart/form-data",
        description = "Part `file` (declared application/pdf) plus text parts folder1, folder2, folder3, fileName. \
                       Alternatively a raw application/pdf body with the same fields in the query string."
    ),
    responses(
        (status = 201, description = "File stored", body = StoreRes),
        (status = 400, description = "Missing fields, non-PDF media type or invalid path", body = MessageRes),
        (status = 413, description = "Body exceeds the upload limit", body = MessageRes),
        (status = 500, description = "Internal Server Error")
    )
)]
/// Store an uploaded PDF
///
/// Both body shapes are normalised by [`StoreUpload`] before reaching the store.
///
/// # Returns
/// * `201 Created` with `{message, location}`; `location` can be passed to `GET` verbatim
///
/// # Errors
/// - `400 Bad Request` with `{message}` on validation failure
/// - `500 Internal Server Error` if the file cannot be written
#[axum::debug_handler]
async fn store_file(
    State(state): State<AppState>,
    StoreUpload(request): StoreUpload,
) -> Result<(StatusCode, Json<StoreRes>), ApiError> {
    let store = state.store.clone();
    let stored = tokio::task::spawn_blocking(move || store.store(request)).await??;

    Ok((
        StatusCode::CREATED,
        Json(StoreRes {
            message: STORED_MESSAGE.into(),
            location: stored.location,
        }),
    ))
}
