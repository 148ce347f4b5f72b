//! Book model and related types

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{
    author_book::BookAuthorRow, blank_as_none, parse_date, required, validate_date, Author,
};
use crate::error::{AppError, AppResult};

/// Full book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub published_at: NaiveDate,
    pub edition: Option<String>,
    pub cover_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Book together with the authors linked to it
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookWithAuthors {
    #[serde(flatten)]
    pub book: Book,
    pub authors: Vec<Author>,
}

impl BookWithAuthors {
    /// Pair each book with its junction rows, keeping the order of `books`
    pub fn group(books: Vec<Book>, rows: Vec<BookAuthorRow>) -> Vec<Self> {
        let mut by_book: HashMap<i64, Vec<Author>> = HashMap::new();
        for row in rows {
            by_book.entry(row.book_id).or_default().push(row.author);
        }

        books
            .into_iter()
            .map(|book| Self {
                authors: by_book.remove(&book.id).unwrap_or_default(),
                book,
            })
            .collect()
    }
}

/// Books listing payload, with what the creation form needs
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookIndex {
    pub books: Vec<BookWithAuthors>,
    /// Whether any author row exists, soft-deleted ones included
    pub authors_exists: bool,
    /// Active authors that can be attached to a new book
    pub available_authors: Vec<Author>,
}

/// Create book request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required, length(max = 255))]
    pub title: Option<String>,
    #[serde(default, alias = "published_at", deserialize_with = "blank_as_none")]
    #[validate(required, custom(function = "validate_date"))]
    #[schema(example = "1967-05-30")]
    pub published_at: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 255))]
    pub edition: Option<String>,
    #[serde(default, alias = "cover_url", deserialize_with = "blank_as_none")]
    #[validate(url)]
    pub cover_url: Option<String>,
    /// Authors to attach; at least one
    #[serde(default, alias = "authors_id")]
    #[validate(required, length(min = 1))]
    pub authors_id: Option<Vec<i64>>,
}

/// Update book request; `authors` replaces the whole author set
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required, length(max = 255))]
    pub title: Option<String>,
    #[serde(default, alias = "published_at", deserialize_with = "blank_as_none")]
    #[validate(required, custom(function = "validate_date"))]
    #[schema(example = "1967-05-30")]
    pub published_at: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 255))]
    pub edition: Option<String>,
    #[serde(default, alias = "cover_url", deserialize_with = "blank_as_none")]
    #[validate(url)]
    pub cover_url: Option<String>,
    #[serde(default)]
    #[validate(required, length(min = 1))]
    pub authors: Option<Vec<i64>>,
}

/// Validated scalar book fields, ready to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFields {
    pub title: String,
    pub published_at: NaiveDate,
    pub edition: Option<String>,
    pub cover_url: Option<String>,
}

impl BookFields {
    fn build(
        title: Option<String>,
        published_at: Option<String>,
        edition: Option<String>,
        cover_url: Option<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            title: required(title, "title", "title")?,
            published_at: required(
                published_at.as_deref().and_then(parse_date),
                "publishedAt",
                "published at",
            )?,
            edition,
            cover_url,
        })
    }
}

impl CreateBook {
    /// Validate and split into book fields and the author ids, in request order
    pub fn into_parts(self) -> AppResult<(BookFields, Vec<i64>)> {
        self.validate()?;
        let fields = BookFields::build(self.title, self.published_at, self.edition, self.cover_url)?;
        let authors = required(self.authors_id, "authorsId", "authors id")?;
        Ok((fields, authors))
    }
}

impl UpdateBook {
    /// Validate and split into book fields and the author ids, in request order
    pub fn into_parts(self) -> AppResult<(BookFields, Vec<i64>)> {
        self.validate()?;
        let fields = BookFields::build(self.title, self.published_at, self.edition, self.cover_url)?;
        let authors = required(self.authors, "authors", "authors")?;
        Ok((fields, authors))
    }
}
