use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AuthorId(Uuid);

impl AuthorId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for AuthorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for AuthorId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorName(String);

impl AuthorName {
    pub fn new(raw: &str) -> Result<Self, AuthorNameEmptyError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Err(AuthorNameEmptyError)
        } else {
            Ok(Self(trimmed.into()))
        }
    }

    pub fn new_unchecked(raw: &str) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AuthorName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug)]
#[error("Author name cannot be empty")]
pub struct AuthorNameEmptyError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nationality(String);

impl Nationality {
    pub fn new(raw: &str) -> Result<Self, NationalityEmptyError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Err(NationalityEmptyError)
        } else {
            Ok(Self(trimmed.into()))
        }
    }

    pub fn new_unchecked(raw: &str) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Nationality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug)]
#[error("Nationality cannot be empty")]
pub struct NationalityEmptyError;

/// An author record. `id` is `None` until the store persists it for the first time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    id: Option<AuthorId>,
    name: AuthorName,
    birth_date: NaiveDate,
    nationality: Nationality,
}

impl Author {
    pub const fn new(name: AuthorName, birth_date: NaiveDate, nationality: Nationality) -> Self {
        Self {
            id: None,
            name,
            birth_date,
            nationality,
        }
    }

    pub const fn with_id(
        id: AuthorId,
        name: AuthorName,
        birth_date: NaiveDate,
        nationality: Nationality,
    ) -> Self {
        Self {
            id: Some(id),
            name,
            birth_date,
            nationality,
        }
    }

    pub const fn id(&self) -> Option<AuthorId> {
        self.id
    }

    pub const fn name(&self) -> &AuthorName {
        &self.name
    }

    pub const fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub const fn nationality(&self) -> &Nationality {
        &self.nationality
    }

    pub fn set_name(&mut self, name: AuthorName) {
        self.name = name;
    }

    pub fn set_birth_date(&mut self, birth_date: NaiveDate) {
        self.birth_date = birth_date;
    }

    pub fn set_nationality(&mut self, nationality: Nationality) {
        self.nationality = nationality;
    }
}

/// Exact-match predicates over author fields. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorFilter {
    name: Option<String>,
    birth_date: Option<NaiveDate>,
    nationality: Option<String>,
}

impl AuthorFilter {
    pub fn by_identity(author: &Author) -> Self {
        Self {
            name: Some(author.name().to_string()),
            birth_date: Some(author.birth_date()),
            nationality: Some(author.nationality().to_string()),
        }
    }

    pub fn by_name(name: &str) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn by_nationality(nationality: &str) -> Self {
        Self {
            nationality: Some(nationality.into()),
            ..Self::default()
        }
    }

    pub fn by_name_and_nationality(name: &str, nationality: &str) -> Self {
        Self {
            name: Some(name.into()),
            nationality: Some(nationality.into()),
            ..Self::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub const fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    pub fn nationality(&self) -> Option<&str> {
        self.nationality.as_deref()
    }

    pub fn matches(&self, author: &Author) -> bool {
        self.name.as_deref().is_none_or(|n| author.name().as_str() == n)
            && self.birth_date.is_none_or(|d| author.birth_date() == d)
            && self
                .nationality
                .as_deref()
                .is_none_or(|n| author.nationality().as_str() == n)
    }
}

#[derive(Error, Debug)]
#[error("Author already registered")]
pub struct DuplicateRecordError;

#[derive(Error, Debug)]
#[error("Cannot delete an author with registered books")]
pub struct OperationNotAllowedError;

#[derive(Error, Debug)]
#[error("Author id is required for this operation")]
pub struct InvalidArgumentError;

#[derive(Error, Debug)]
pub enum SaveAuthorError {
    #[error(transparent)]
    Duplicate(#[from] DuplicateRecordError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum UpdateAuthorError {
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgumentError),
    #[error(transparent)]
    Duplicate(#[from] DuplicateRecordError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum DeleteAuthorError {
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgumentError),
    #[error(transparent)]
    NotAllowed(#[from] OperationNotAllowedError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct FindAuthorError(#[from] pub anyhow::Error);

#[derive(Error, Debug)]
#[error(transparent)]
pub struct SearchAuthorsError(#[from] pub anyhow::Error);
