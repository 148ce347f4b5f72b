//! Authors service

use crate::{
    error::AppResult,
    models::author::{Author, AuthorDetail, AuthorFields, AuthorInput, AuthorSummary},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List authors (newest first) with derived display fields
    pub async fn list(&self, include_deleted: bool) -> AppResult<Vec<AuthorSummary>> {
        let rows = self.repository.authors.list(include_deleted).await?;
        Ok(rows.into_iter().map(AuthorSummary::from).collect())
    }

    /// Get an author together with the books linked to it
    pub async fn get(&self, id: i64, include_deleted: bool) -> AppResult<AuthorDetail> {
        let author = self.repository.authors.get_by_id(id, include_deleted).await?;
        let books = self.repository.authors.books_of(author.id).await?;
        Ok(AuthorDetail::new(&author, books))
    }

    /// Create an author
    pub async fn create(&self, input: AuthorInput) -> AppResult<Author> {
        let fields = AuthorFields::try_from(input)?;
        let author = self.repository.authors.create(&fields).await?;
        tracing::info!(author_id = author.id, name = %author.full_name(), "Author created");
        Ok(author)
    }

    /// Replace an author's editable fields
    pub async fn update(&self, id: i64, input: AuthorInput) -> AppResult<Author> {
        // Unknown ids are reported before payload problems
        self.repository.authors.get_by_id(id, false).await?;

        let fields = AuthorFields::try_from(input)?;
        let author = self.repository.authors.update(id, &fields).await?;
        tracing::info!(author_id = author.id, "Author updated");
        Ok(author)
    }

    /// Soft delete an author
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.authors.soft_delete(id).await?;
        tracing::info!(author_id = id, "Author deleted");
        Ok(())
    }
}
