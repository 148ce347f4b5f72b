//! HTTP handlers and routing

pub mod authors;
pub mod books;
pub mod health;
pub mod openapi;

use axum::{
    extract::FromRequest,
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{IntoParams, ToSchema};

use crate::{error::AppError, AppState};

/// JSON request body; deserialization failures answer with the usual error body
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Outcome of a mutation: the status flag and message a form shows after redirecting back
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
    /// ID of the affected record
    pub id: i64,
}

impl ActionResponse {
    pub fn ok(message: &str, id: i64) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            id,
        }
    }
}

/// Query parameters shared by list and show endpoints
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Include soft-deleted records (default: false)
    pub include_deleted: Option<bool>,
}

impl ListQuery {
    pub fn include_deleted(&self) -> bool {
        self.include_deleted.unwrap_or(false)
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Home
        .route("/", get(books::list_books))
        // Books
        .route("/books", get(books::list_books))
        .route("/books", post(books::create_book))
        .route("/books/:id", get(books::show_book))
        .route("/books/:id", put(books::update_book))
        .route("/books/:id", patch(books::update_book))
        .route("/books/:id", delete(books::delete_book))
        // Authors
        .route("/authors", get(authors::list_authors))
        .route("/authors", post(authors::create_author))
        .route("/authors/:id", get(authors::get_author))
        .route("/authors/:id", put(authors::update_author))
        .route("/authors/:id", patch(authors::update_author))
        .route("/authors/:id", delete(authors::delete_author))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
