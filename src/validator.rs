use crate::models::{Author, AuthorFilter, DuplicateRecordError};
use crate::repositories::AuthorRepository;
use anyhow::Context;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidateAuthorError {
    #[error(transparent)]
    Duplicate(#[from] DuplicateRecordError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Rejects authors whose (name, birth date, nationality) triple already belongs to another record.
///
/// The check is a plain read; nothing prevents a concurrent writer from inserting the same triple
/// between validation and persist. The SQLite schema backs this up with a unique index.
#[derive(Debug)]
pub struct AuthorValidator<AR: AuthorRepository> {
    author_repo: Arc<AR>,
}

impl<AR: AuthorRepository> Clone for AuthorValidator<AR> {
    fn clone(&self) -> Self {
        Self {
            author_repo: Arc::clone(&self.author_repo),
        }
    }
}

impl<AR: AuthorRepository> AuthorValidator<AR> {
    pub const fn new(author_repo: Arc<AR>) -> Self {
        Self { author_repo }
    }

    pub async fn validate(&self, candidate: &Author) -> Result<(), ValidateAuthorError> {
        if self.is_duplicate(candidate).await? {
            tracing::debug!(name = %candidate.name(), "duplicate author rejected");
            return Err(DuplicateRecordError.into());
        }

        Ok(())
    }

    async fn is_duplicate(&self, candidate: &Author) -> anyhow::Result<bool> {
        let matches = self
            .author_repo
            .find_authors(&AuthorFilter::by_identity(candidate))
            .await
            .with_context(|| {
                format!(
                    r#"Failed to look up authors matching "{}""#,
                    candidate.name()
                )
            })?;

        let duplicate = match candidate.id() {
            None => !matches.is_empty(),
            Some(id) => matches.iter().any(|found| found.id() != Some(id)),
        };

        Ok(duplicate)
    }
}
