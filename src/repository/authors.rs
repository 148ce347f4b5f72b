//! Authors repository

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AuthorFields, AuthorWithCount, AuthoredBook},
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List authors with their book counts, newest first
    pub async fn list(&self, include_deleted: bool) -> AppResult<Vec<AuthorWithCount>> {
        let rows = sqlx::query_as::<_, AuthorWithCount>(
            r#"
            SELECT a.*,
                   (SELECT COUNT(*) FROM author_book ab WHERE ab.author_id = a.id) AS books_count
            FROM authors a
            WHERE ($1::boolean OR a.deleted_at IS NULL)
            ORDER BY a.created_at DESC, a.id DESC
            "#,
        )
        .bind(include_deleted)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Authors that can still be attached to books
    pub async fn list_active(&self) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>(
            r#"SELECT * FROM authors WHERE deleted_at IS NULL ORDER BY "lastName", name"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Whether any author row exists, soft-deleted ones included
    pub async fn any_exists(&self) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM authors)")
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Get author by ID
    pub async fn get_by_id(&self, id: i64, include_deleted: bool) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(
            "SELECT * FROM authors WHERE id = $1 AND ($2::boolean OR deleted_at IS NULL)",
        )
        .bind(id)
        .bind(include_deleted)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    /// Books linked to an author, whatever their deletion state
    pub async fn books_of(&self, author_id: i64) -> AppResult<Vec<AuthoredBook>> {
        let rows = sqlx::query_as::<_, AuthoredBook>(
            r#"
            SELECT b.id AS book_id, b.title, b.published_at, b.edition
            FROM author_book ab
            JOIN books b ON b.id = ab.book_id
            WHERE ab.author_id = $1
            ORDER BY b.published_at, b.id
            "#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Create author
    pub async fn create(&self, data: &AuthorFields) -> AppResult<Author> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (name, "lastName", country, "birthDate", created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.last_name)
        .bind(&data.country)
        .bind(data.birth_date)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Replace the editable fields of an active author
    pub async fn update(&self, id: i64, data: &AuthorFields) -> AppResult<Author> {
        let now = Utc::now();
        sqlx::query_as::<_, Author>(
            r#"
            UPDATE authors SET
                name = $1,
                "lastName" = $2,
                country = $3,
                "birthDate" = $4,
                updated_at = $5
            WHERE id = $6 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.last_name)
        .bind(&data.country)
        .bind(data.birth_date)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    /// Soft delete (sets deleted_at); links to books are kept
    pub async fn soft_delete(&self, id: i64) -> AppResult<()> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE authors SET deleted_at = $1, updated_at = $1 WHERE id = $2 AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Author {} not found", id)));
        }
        Ok(())
    }
}
