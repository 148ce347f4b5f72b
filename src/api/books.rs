//! Book endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Redirect,
    Json,
};

use crate::{
    error::AppResult,
    models::book::{BookIndex, BookWithAuthors, CreateBook, UpdateBook},
};

use super::{ActionResponse, JsonBody, ListQuery};

/// List books with their authors (also served on `/`)
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(ListQuery),
    responses(
        (status = 200, description = "Books, authors and creation-form data", body = BookIndex)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<BookIndex>> {
    let index = state.services.books.list(query.include_deleted()).await?;
    Ok(Json(index))
}

/// Create a book and attach its authors
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = ActionResponse),
        (status = 422, description = "Invalid fields or unknown authors", body = crate::error::ErrorResponse),
        (status = 500, description = "Creation rolled back", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    JsonBody(input): JsonBody<CreateBook>,
) -> AppResult<(StatusCode, Json<ActionResponse>)> {
    let book = state.services.books.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ActionResponse::ok("Book created successfully", book.id)),
    ))
}

/// Get a book with its authors
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookWithAuthors),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn show_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<BookWithAuthors>> {
    let book = state.services.books.show(id).await?;
    Ok(Json(book))
}

/// Update a book and replace its author set (also served on PATCH)
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = ActionResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid fields or unknown authors", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    JsonBody(input): JsonBody<UpdateBook>,
) -> AppResult<Json<ActionResponse>> {
    let book = state.services.books.update(id, input).await?;
    Ok(Json(ActionResponse::ok("Book updated successfully", book.id)))
}

/// Soft delete a book, then send the client back to the list
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 303, description = "Book deleted, redirect to /books"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Redirect> {
    state.services.books.delete(id).await?;
    Ok(Redirect::to("/books"))
}
