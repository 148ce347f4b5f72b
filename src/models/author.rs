//! Author model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{blank_as_none, parse_date, required, validate_date, DISPLAY_DATE_FORMAT, ISO_DATE_FORMAT};
use crate::error::{AppError, AppResult};

/// Full author model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: i64,
    pub name: String,
    #[sqlx(rename = "lastName")]
    pub last_name: String,
    pub country: String,
    #[sqlx(rename = "birthDate")]
    pub birth_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set when the author has been soft-deleted
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Author {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.last_name)
    }
}

/// Author row joined with the number of linked books
#[derive(Debug, Clone, FromRow)]
pub struct AuthorWithCount {
    #[sqlx(flatten)]
    pub author: Author,
    pub books_count: i64,
}

/// Author as shown in listings
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: i64,
    pub name: String,
    pub last_name: String,
    /// `name` and `lastName` joined by a space
    pub full_name: String,
    pub country: String,
    /// ISO date (YYYY-MM-DD)
    pub birth_date: String,
    /// Display date (DD/MM/YYYY)
    pub formatted_birth_date: String,
    /// Creation date (DD/MM/YYYY)
    pub registration_date: String,
    pub updated_at: DateTime<Utc>,
    /// Linked books, soft-deleted books included
    pub books_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl AuthorSummary {
    pub fn new(author: &Author, books_count: i64) -> Self {
        Self {
            id: author.id,
            name: author.name.clone(),
            last_name: author.last_name.clone(),
            full_name: author.full_name(),
            country: author.country.clone(),
            birth_date: author.birth_date.format(ISO_DATE_FORMAT).to_string(),
            formatted_birth_date: author.birth_date.format(DISPLAY_DATE_FORMAT).to_string(),
            registration_date: author.created_at.format(DISPLAY_DATE_FORMAT).to_string(),
            updated_at: author.updated_at,
            books_count,
            deleted_at: author.deleted_at,
        }
    }
}

impl From<AuthorWithCount> for AuthorSummary {
    fn from(row: AuthorWithCount) -> Self {
        Self::new(&row.author, row.books_count)
    }
}

/// Book as listed on an author page
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthoredBook {
    pub book_id: i64,
    pub title: String,
    pub published_at: NaiveDate,
    pub edition: Option<String>,
}

/// Author page payload
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorDetail {
    #[serde(flatten)]
    pub author: AuthorSummary,
    pub books: Vec<AuthoredBook>,
}

impl AuthorDetail {
    pub fn new(author: &Author, books: Vec<AuthoredBook>) -> Self {
        let count = books.len() as i64;
        Self {
            author: AuthorSummary::new(author, count),
            books,
        }
    }
}

/// Authors listing payload
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorIndex {
    pub authors: Vec<AuthorSummary>,
}

/// Create / update author request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorInput {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required, length(max = 255))]
    pub name: Option<String>,
    #[serde(default, alias = "last_name", deserialize_with = "blank_as_none")]
    #[validate(required, length(max = 255))]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required, length(max = 255))]
    pub country: Option<String>,
    #[serde(default, alias = "birth_date", deserialize_with = "blank_as_none")]
    #[validate(required, custom(function = "validate_date"))]
    #[schema(example = "1927-03-06")]
    pub birth_date: Option<String>,
}

/// Validated author fields, ready to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorFields {
    pub name: String,
    pub last_name: String,
    pub country: String,
    pub birth_date: NaiveDate,
}

impl TryFrom<AuthorInput> for AuthorFields {
    type Error = AppError;

    fn try_from(input: AuthorInput) -> AppResult<Self> {
        input.validate()?;

        Ok(Self {
            name: required(input.name, "name", "name")?,
            last_name: required(input.last_name, "lastName", "last name")?,
            country: required(input.country, "country", "country")?,
            birth_date: required(
                input.birth_date.as_deref().and_then(parse_date),
                "birthDate",
                "birth date",
            )?,
        })
    }
}
