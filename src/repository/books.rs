//! Books repository, including the author_book junction

use chrono::Utc;
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        author_book::{unknown_authors, BookAuthorRow, SyncPlan},
        book::{Book, BookFields},
        unique_ids,
    },
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// List books, newest first
    pub async fn list(&self, include_deleted: bool) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            r#"
            SELECT * FROM books
            WHERE ($1::boolean OR deleted_at IS NULL)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(include_deleted)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get an active book by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Load the authors of several books via the author_book junction table
    pub async fn authors_for(
        &self,
        book_ids: &[i64],
        include_deleted_authors: bool,
    ) -> AppResult<Vec<BookAuthorRow>> {
        if book_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, BookAuthorRow>(
            r#"
            SELECT ab.book_id, a.*
            FROM author_book ab
            JOIN authors a ON a.id = ab.author_id
            WHERE ab.book_id = ANY($1)
              AND ($2::boolean OR a.deleted_at IS NULL)
            ORDER BY a."lastName", a.name, a.id
            "#,
        )
        .bind(book_ids)
        .bind(include_deleted_authors)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // =========================================================================
    // CREATE
    // =========================================================================

    /// Insert a book and attach its authors in one transaction.
    /// Unknown author ids roll everything back; `author_ids` is in request order,
    /// repeats included, so errors point at the offending position.
    pub async fn create(&self, data: &BookFields, author_ids: &[i64]) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let result = insert_with_authors(&mut tx, data, author_ids).await;
        match result {
            Ok(book) => {
                tx.commit().await?;
                Ok(book)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::error!("Rollback of book creation failed: {:?}", rollback);
                }
                Err(e)
            }
        }
    }

    // =========================================================================
    // UPDATE
    // =========================================================================

    /// Replace the scalar fields of an active book and sync its authors to exactly `author_ids`
    pub async fn update(
        &self,
        id: i64,
        data: &BookFields,
        author_ids: &[i64],
    ) -> AppResult<(Book, SyncPlan)> {
        let mut tx = self.pool.begin().await?;

        let result = update_with_authors(&mut tx, id, data, author_ids).await;
        match result {
            Ok(updated) => {
                tx.commit().await?;
                Ok(updated)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::error!("Rollback of book {} update failed: {:?}", id, rollback);
                }
                Err(e)
            }
        }
    }

    // =========================================================================
    // DELETE (soft)
    // =========================================================================

    /// Soft delete (sets deleted_at); author_book rows are left in place
    pub async fn soft_delete(&self, id: i64) -> AppResult<()> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE books SET deleted_at = $1, updated_at = $1 WHERE id = $2 AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        Ok(())
    }
}

async fn insert_with_authors(
    conn: &mut PgConnection,
    data: &BookFields,
    author_ids: &[i64],
) -> AppResult<Book> {
    ensure_authors_exist(conn, "authorsId", author_ids).await?;

    let now = Utc::now();
    let book = sqlx::query_as::<_, Book>(
        r#"
        INSERT INTO books (title, published_at, edition, cover_url, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING *
        "#,
    )
    .bind(&data.title)
    .bind(data.published_at)
    .bind(&data.edition)
    .bind(&data.cover_url)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    attach(conn, book.id, &unique_ids(author_ids.to_vec())).await?;

    Ok(book)
}

async fn update_with_authors(
    conn: &mut PgConnection,
    id: i64,
    data: &BookFields,
    author_ids: &[i64],
) -> AppResult<(Book, SyncPlan)> {
    ensure_authors_exist(conn, "authors", author_ids).await?;

    let now = Utc::now();
    let book = sqlx::query_as::<_, Book>(
        r#"
        UPDATE books SET
            title = $1,
            published_at = $2,
            edition = $3,
            cover_url = $4,
            updated_at = $5
        WHERE id = $6 AND deleted_at IS NULL
        RETURNING *
        "#,
    )
    .bind(&data.title)
    .bind(data.published_at)
    .bind(&data.edition)
    .bind(&data.cover_url)
    .bind(now)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;

    let current: Vec<i64> = sqlx::query_scalar(
        "SELECT author_id FROM author_book WHERE book_id = $1 ORDER BY author_id FOR UPDATE",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    let plan = SyncPlan::between(&current, author_ids);
    if !plan.detach.is_empty() {
        detach(conn, id, &plan.detach).await?;
    }
    if !plan.attach.is_empty() {
        attach(conn, id, &plan.attach).await?;
    }

    Ok((book, plan))
}

/// Every id must match an author row, soft-deleted or not
async fn ensure_authors_exist(
    conn: &mut PgConnection,
    field: &str,
    author_ids: &[i64],
) -> AppResult<()> {
    let existing: Vec<i64> = sqlx::query_scalar("SELECT id FROM authors WHERE id = ANY($1)")
        .bind(author_ids)
        .fetch_all(&mut *conn)
        .await?;

    match unknown_authors(field, author_ids, &existing) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Insert-if-absent links
async fn attach(conn: &mut PgConnection, book_id: i64, author_ids: &[i64]) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO author_book (author_id, book_id)
        SELECT author_id, $2::bigint FROM UNNEST($1::bigint[]) AS author_id
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(author_ids)
    .bind(book_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn detach(conn: &mut PgConnection, book_id: i64, author_ids: &[i64]) -> AppResult<()> {
    sqlx::query("DELETE FROM author_book WHERE book_id = $1 AND author_id = ANY($2)")
        .bind(book_id)
        .bind(author_ids)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
