//! Books service

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookIndex, BookWithAuthors, CreateBook, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List books with every linked author (soft-deleted authors included),
    /// plus the data the creation form needs.
    pub async fn list(&self, include_deleted: bool) -> AppResult<BookIndex> {
        let books = self.repository.books.list(include_deleted).await?;
        let books = self.with_authors(books, true).await?;

        Ok(BookIndex {
            books,
            authors_exists: self.repository.authors.any_exists().await?,
            available_authors: self.repository.authors.list_active().await?,
        })
    }

    /// Get an active book with its active authors
    pub async fn show(&self, id: i64) -> AppResult<BookWithAuthors> {
        let book = self.repository.books.get_by_id(id).await?;
        let mut found = self.with_authors(vec![book], false).await?;
        found
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Create a book and attach its authors atomically
    pub async fn create(&self, input: CreateBook) -> AppResult<Book> {
        let (fields, author_ids) = input.into_parts()?;

        match self.repository.books.create(&fields, &author_ids).await {
            Ok(book) => {
                tracing::info!(book_id = book.id, authors = ?author_ids, "Book created");
                Ok(book)
            }
            // The database error itself is logged once, when it becomes the response
            Err(e @ AppError::Database(_)) => {
                tracing::error!(
                    title = %fields.title,
                    authors = ?author_ids,
                    "Book creation rolled back"
                );
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Replace a book's fields and sync its authors to exactly the given set
    pub async fn update(&self, id: i64, input: UpdateBook) -> AppResult<Book> {
        // Unknown ids are reported before payload problems
        self.repository.books.get_by_id(id).await?;

        let (fields, author_ids) = input.into_parts()?;
        let (book, plan) = self.repository.books.update(id, &fields, &author_ids).await?;
        tracing::info!(
            book_id = book.id,
            attached = ?plan.attach,
            detached = ?plan.detach,
            "Book updated"
        );
        Ok(book)
    }

    /// Soft delete a book; its author links stay in place
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.books.soft_delete(id).await?;
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }

    async fn with_authors(
        &self,
        books: Vec<Book>,
        include_deleted_authors: bool,
    ) -> AppResult<Vec<BookWithAuthors>> {
        let ids: Vec<i64> = books.iter().map(|b| b.id).collect();
        let rows = self
            .repository
            .books
            .authors_for(&ids, include_deleted_authors)
            .await?;

        Ok(BookWithAuthors::group(books, rows))
    }
}
