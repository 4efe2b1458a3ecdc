use crate::models::{Author, AuthorFilter, AuthorId, AuthorName, Nationality};
use crate::repositories::{AuthorRepository, BookRepository, RepositoryError};
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteRow};
use sqlx::{FromRow, Row, SqlitePool};
use std::str::FromStr;

// SQLite reports RESTRICT foreign key actions as trigger constraint failures.
const CONSTRAINT_TRIGGER_CODE: &str = "1811";

static MIGRATOR: Migrator = sqlx::migrate!();

pub async fn establish_pool(path: &str) -> anyhow::Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(path)
        .with_context(|| format!("Invalid database path {path}"))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal);
    let pool = SqlitePool::connect_with(opts)
        .await
        .with_context(|| format!("Failed to open database at {path}"))?;

    MIGRATOR
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!(path, "database ready");

    Ok(pool)
}

#[derive(Debug)]
pub struct DefaultAuthorRepository {
    pool: SqlitePool,
}

impl DefaultAuthorRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl<'r> FromRow<'r, SqliteRow> for Author {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let name = row.try_get("name")?;
        let birth_date: NaiveDate = row.try_get("birth_date")?;
        let nationality = row.try_get("nationality")?;

        let id = AuthorId::from_str(&id).map_err(|err| sqlx::Error::ColumnDecode {
            index: "id".into(),
            source: Box::new(err),
        })?;
        let name = AuthorName::new_unchecked(name);
        let nationality = Nationality::new_unchecked(nationality);
        Ok(Self::with_id(id, name, birth_date, nationality))
    }
}

#[async_trait]
impl AuthorRepository for DefaultAuthorRepository {
    async fn find_author_by_id(&self, id: AuthorId) -> Result<Option<Author>, RepositoryError> {
        let author = sqlx::query_as(
            "SELECT id, name, birth_date, nationality FROM author WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| {
            anyhow!(err).context(format!(r#"Failed to retrieve author with id "{id}""#))
        })?;

        Ok(author)
    }

    async fn find_all_authors(&self) -> Result<Vec<Author>, RepositoryError> {
        let authors = sqlx::query_as("SELECT id, name, birth_date, nationality FROM author")
            .fetch_all(&self.pool)
            .await
            .map_err(|err| anyhow!(err).context("Failed to retrieve all authors"))?;

        Ok(authors)
    }

    async fn find_authors(&self, filter: &AuthorFilter) -> Result<Vec<Author>, RepositoryError> {
        let mut parts = Vec::new();
        let mut binds = Vec::new();

        if let Some(name) = filter.name() {
            parts.push("name = ?");
            binds.push(name.to_string());
        }
        if let Some(birth_date) = filter.birth_date() {
            parts.push("birth_date = ?");
            binds.push(birth_date.to_string());
        }
        if let Some(nationality) = filter.nationality() {
            parts.push("nationality = ?");
            binds.push(nationality.to_string());
        }

        let mut sql = String::from("SELECT id, name, birth_date, nationality FROM author");
        if !parts.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&parts.join(" AND "));
        }

        let mut query = sqlx::query_as::<_, Author>(&sql);
        for bind in binds {
            query = query.bind(bind);
        }

        let authors = query
            .fetch_all(&self.pool)
            .await
            .map_err(|err| anyhow!(err).context("Failed to search authors"))?;

        Ok(authors)
    }

    async fn save_author(&self, author: &Author) -> Result<Author, RepositoryError> {
        let id = author.id().unwrap_or_else(AuthorId::generate);

        let stored = sqlx::query_as(
            "INSERT INTO author (id, name, birth_date, nationality) VALUES (?, ?, ?, ?) \
             ON CONFLICT (id) DO UPDATE SET \
                 name = excluded.name, \
                 birth_date = excluded.birth_date, \
                 nationality = excluded.nationality, \
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') \
             RETURNING id, name, birth_date, nationality",
        )
        .bind(id.to_string())
        .bind(author.name().to_string())
        .bind(author.birth_date())
        .bind(author.nationality().to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                RepositoryError::UniqueViolation
            } else {
                let err = anyhow!(err).context(format!(
                    r#"Failed to save author with name "{}""#,
                    author.name()
                ));
                RepositoryError::Other(err)
            }
        })?;

        Ok(stored)
    }

    async fn delete_author(&self, id: AuthorId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM author WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    RepositoryError::ForeignKeyViolation
                } else {
                    let err = anyhow!(err)
                        .context(format!(r#"Failed to delete author with id "{id}""#));
                    RepositoryError::Other(err)
                }
            })?;

        Ok(())
    }
}

#[derive(Debug)]
pub struct DefaultBookRepository {
    pool: SqlitePool,
}

impl DefaultBookRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for DefaultBookRepository {
    async fn exists_by_author(&self, author_id: AuthorId) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM book WHERE author_id = ?)")
            .bind(author_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                anyhow!(err).context(format!(
                    r#"Failed to check books of author with id "{author_id}""#
                ))
            })?;

        Ok(exists)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.is_unique_violation();
    }

    false
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.is_foreign_key_violation()
            || db_err.code().as_deref() == Some(CONSTRAINT_TRIGGER_CODE);
    }

    false
}
