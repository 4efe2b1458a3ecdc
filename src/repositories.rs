use crate::models::{Author, AuthorFilter, AuthorId};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Record violates a uniqueness constraint")]
    UniqueViolation,
    #[error("Record is still referenced by another record")]
    ForeignKeyViolation,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait AuthorRepository: Send + Sync + 'static {
    async fn find_author_by_id(&self, id: AuthorId) -> Result<Option<Author>, RepositoryError>;

    async fn find_all_authors(&self) -> Result<Vec<Author>, RepositoryError>;

    async fn find_authors(&self, filter: &AuthorFilter) -> Result<Vec<Author>, RepositoryError>;

    /// Inserts the author when it has no id yet, assigning one. Replaces the stored record otherwise.
    async fn save_author(&self, author: &Author) -> Result<Author, RepositoryError>;

    async fn delete_author(&self, id: AuthorId) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait BookRepository: Send + Sync + 'static {
    async fn exists_by_author(&self, author_id: AuthorId) -> Result<bool, RepositoryError>;
}
