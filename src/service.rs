use crate::models::{
    Author, AuthorFilter, AuthorId, DeleteAuthorError, DuplicateRecordError, FindAuthorError,
    InvalidArgumentError, OperationNotAllowedError, SaveAuthorError, SearchAuthorsError,
    UpdateAuthorError,
};
use crate::repositories::{AuthorRepository, BookRepository, RepositoryError};
use crate::validator::{AuthorValidator, ValidateAuthorError};
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait AuthorService: Clone + Send + Sync + 'static {
    /// Validates and persists a new author, returning it with its assigned id.
    async fn save(&self, candidate: &Author) -> Result<Author, SaveAuthorError>;

    /// Replaces a stored author. The candidate must carry the id of the record it replaces.
    async fn update(&self, candidate: &Author) -> Result<(), UpdateAuthorError>;

    async fn get_by_id(&self, id: AuthorId) -> Result<Option<Author>, FindAuthorError>;

    /// Removes an author, refusing while any book references it.
    async fn delete(&self, author: &Author) -> Result<(), DeleteAuthorError>;

    /// Exact-match search. Absent filters are ignored; no filters returns every author.
    async fn search(
        &self,
        name: Option<&str>,
        nationality: Option<&str>,
    ) -> Result<Vec<Author>, SearchAuthorsError>;
}

#[derive(Debug)]
pub struct Service<AR: AuthorRepository, BR: BookRepository> {
    author_repo: Arc<AR>,
    book_repo: Arc<BR>,
    validator: AuthorValidator<AR>,
}

impl<AR: AuthorRepository, BR: BookRepository> Clone for Service<AR, BR> {
    fn clone(&self) -> Self {
        Self {
            author_repo: Arc::clone(&self.author_repo),
            book_repo: Arc::clone(&self.book_repo),
            validator: self.validator.clone(),
        }
    }
}

impl<AR: AuthorRepository, BR: BookRepository> Service<AR, BR> {
    pub const fn new(
        author_repo: Arc<AR>,
        book_repo: Arc<BR>,
        validator: AuthorValidator<AR>,
    ) -> Self {
        Self {
            author_repo,
            book_repo,
            validator,
        }
    }

    async fn persist(&self, candidate: &Author) -> Result<Author, PersistError> {
        self.validator.validate(candidate).await.map_err(|err| match err {
            ValidateAuthorError::Duplicate(dup) => PersistError::Duplicate(dup),
            ValidateAuthorError::Other(cause) => PersistError::Other(cause),
        })?;

        self.author_repo
            .save_author(candidate)
            .await
            .map_err(|err| match err {
                RepositoryError::UniqueViolation => PersistError::Duplicate(DuplicateRecordError),
                other => PersistError::Other(anyhow!(other).context(format!(
                    r#"Failed to save author with name "{}""#,
                    candidate.name()
                ))),
            })
    }
}

enum PersistError {
    Duplicate(DuplicateRecordError),
    Other(anyhow::Error),
}

impl From<PersistError> for SaveAuthorError {
    fn from(err: PersistError) -> Self {
        match err {
            PersistError::Duplicate(dup) => Self::Duplicate(dup),
            PersistError::Other(cause) => Self::Other(cause),
        }
    }
}

impl From<PersistError> for UpdateAuthorError {
    fn from(err: PersistError) -> Self {
        match err {
            PersistError::Duplicate(dup) => Self::Duplicate(dup),
            PersistError::Other(cause) => Self::Other(cause),
        }
    }
}

#[async_trait]
impl<AR: AuthorRepository, BR: BookRepository> AuthorService for Service<AR, BR> {
    async fn save(&self, candidate: &Author) -> Result<Author, SaveAuthorError> {
        let stored = self.persist(candidate).await?;
        if let Some(id) = stored.id() {
            tracing::info!(%id, name = %stored.name(), "author created");
        }
        Ok(stored)
    }

    async fn update(&self, candidate: &Author) -> Result<(), UpdateAuthorError> {
        let id = candidate.id().ok_or(InvalidArgumentError)?;
        self.persist(candidate).await?;
        tracing::info!(%id, "author updated");
        Ok(())
    }

    async fn get_by_id(&self, id: AuthorId) -> Result<Option<Author>, FindAuthorError> {
        let author = self
            .author_repo
            .find_author_by_id(id)
            .await
            .with_context(|| format!(r#"Failed to retrieve author with id "{id}""#))?;
        Ok(author)
    }

    async fn delete(&self, author: &Author) -> Result<(), DeleteAuthorError> {
        let id = author.id().ok_or(InvalidArgumentError)?;

        let has_books = self
            .book_repo
            .exists_by_author(id)
            .await
            .with_context(|| format!(r#"Failed to check books of author with id "{id}""#))?;
        if has_books {
            tracing::warn!(%id, "refused to delete author with registered books");
            return Err(OperationNotAllowedError.into());
        }

        self.author_repo
            .delete_author(id)
            .await
            .map_err(|err| match err {
                RepositoryError::ForeignKeyViolation => {
                    DeleteAuthorError::NotAllowed(OperationNotAllowedError)
                }
                other => DeleteAuthorError::Other(
                    anyhow!(other).context(format!(r#"Failed to delete author with id "{id}""#)),
                ),
            })?;

        tracing::info!(%id, "author deleted");
        Ok(())
    }

    async fn search(
        &self,
        name: Option<&str>,
        nationality: Option<&str>,
    ) -> Result<Vec<Author>, SearchAuthorsError> {
        let filter = match (name, nationality) {
            (Some(name), Some(nationality)) => {
                AuthorFilter::by_name_and_nationality(name, nationality)
            }
            (Some(name), None) => AuthorFilter::by_name(name),
            (None, Some(nationality)) => AuthorFilter::by_nationality(nationality),
            (None, None) => {
                let authors = self
                    .author_repo
                    .find_all_authors()
                    .await
                    .context("Failed to retrieve all authors")?;
                return Ok(authors);
            }
        };

        let authors = self
            .author_repo
            .find_authors(&filter)
            .await
            .with_context(|| format!("Failed to search authors with {filter:?}"))?;
        Ok(authors)
    }
}
