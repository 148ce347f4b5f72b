//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog Admin API",
        version = "0.1.0",
        description = "Library catalog administration: authors, books and their associations"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Authors
        authors::list_authors,
        authors::create_author,
        authors::get_author,
        authors::update_author,
        authors::delete_author,
        // Books
        books::list_books,
        books::create_book,
        books::show_book,
        books::update_book,
        books::delete_book,
    ),
    components(
        schemas(
            // Authors
            crate::models::author::Author,
            crate::models::author::AuthorSummary,
            crate::models::author::AuthoredBook,
            crate::models::author::AuthorDetail,
            crate::models::author::AuthorIndex,
            crate::models::author::AuthorInput,
            // Books
            crate::models::book::Book,
            crate::models::book::BookWithAuthors,
            crate::models::book::BookIndex,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Shared
            crate::api::ActionResponse,
            crate::api::ListQuery,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "authors", description = "Author management"),
        (name = "books", description = "Book management and author links")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
