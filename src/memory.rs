//! In-memory adapters for the repository ports.
//!
//! Records are kept in insertion order. Neither adapter enforces the constraints the SQLite schema
//! carries, so duplicate detection relies entirely on the validator.

use crate::models::{Author, AuthorFilter, AuthorId};
use crate::repositories::{AuthorRepository, BookRepository, RepositoryError};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct InMemoryAuthorRepository {
    authors: RwLock<Vec<Author>>,
}

impl InMemoryAuthorRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.authors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.read().is_empty()
    }
}

#[async_trait]
impl AuthorRepository for InMemoryAuthorRepository {
    async fn find_author_by_id(&self, id: AuthorId) -> Result<Option<Author>, RepositoryError> {
        let authors = self.authors.read();
        Ok(authors.iter().find(|a| a.id() == Some(id)).cloned())
    }

    async fn find_all_authors(&self) -> Result<Vec<Author>, RepositoryError> {
        Ok(self.authors.read().clone())
    }

    async fn find_authors(&self, filter: &AuthorFilter) -> Result<Vec<Author>, RepositoryError> {
        let authors = self.authors.read();
        Ok(authors.iter().filter(|a| filter.matches(a)).cloned().collect())
    }

    async fn save_author(&self, author: &Author) -> Result<Author, RepositoryError> {
        let mut authors = self.authors.write();

        let Some(id) = author.id() else {
            let stored = Author::with_id(
                AuthorId::generate(),
                author.name().clone(),
                author.birth_date(),
                author.nationality().clone(),
            );
            authors.push(stored.clone());
            return Ok(stored);
        };

        match authors.iter_mut().find(|a| a.id() == Some(id)) {
            Some(existing) => *existing = author.clone(),
            None => authors.push(author.clone()),
        }

        Ok(author.clone())
    }

    async fn delete_author(&self, id: AuthorId) -> Result<(), RepositoryError> {
        self.authors.write().retain(|a| a.id() != Some(id));
        Ok(())
    }
}

/// Tracks how many books reference each author.
#[derive(Debug, Default)]
pub struct InMemoryBookRepository {
    books_by_author: RwLock<HashMap<AuthorId, usize>>,
}

impl InMemoryBookRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_book(&self, author_id: AuthorId) {
        *self.books_by_author.write().entry(author_id).or_default() += 1;
    }

    pub fn remove_books(&self, author_id: AuthorId) {
        self.books_by_author.write().remove(&author_id);
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn exists_by_author(&self, author_id: AuthorId) -> Result<bool, RepositoryError> {
        let books = self.books_by_author.read();
        Ok(books.get(&author_id).is_some_and(|count| *count > 0))
    }
}
