//! Author endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::author::{AuthorDetail, AuthorIndex, AuthorInput},
};

use super::{ActionResponse, JsonBody, ListQuery};

/// List authors, newest first
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(ListQuery),
    responses(
        (status = 200, description = "Authors with derived display fields", body = AuthorIndex)
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AuthorIndex>> {
    let authors = state.services.authors.list(query.include_deleted()).await?;
    Ok(Json(AuthorIndex { authors }))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = AuthorInput,
    responses(
        (status = 201, description = "Author created", body = ActionResponse),
        (status = 422, description = "Invalid fields", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    JsonBody(input): JsonBody<AuthorInput>,
) -> AppResult<(StatusCode, Json<ActionResponse>)> {
    let author = state.services.authors.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ActionResponse::ok("Author created successfully", author.id)),
    ))
}

/// Get an author with its books
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID"), ListQuery),
    responses(
        (status = 200, description = "Author details", body = AuthorDetail),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AuthorDetail>> {
    let author = state.services.authors.get(id, query.include_deleted()).await?;
    Ok(Json(author))
}

/// Update an author (also served on PATCH)
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    request_body = AuthorInput,
    responses(
        (status = 200, description = "Author updated", body = ActionResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid fields", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    JsonBody(input): JsonBody<AuthorInput>,
) -> AppResult<Json<ActionResponse>> {
    let author = state.services.authors.update(id, input).await?;
    Ok(Json(ActionResponse::ok("Author updated successfully", author.id)))
}

/// Soft delete an author
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author deleted", body = ActionResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ActionResponse>> {
    state.services.authors.delete(id).await?;
    Ok(Json(ActionResponse::ok("Author deleted successfully", id)))
}
