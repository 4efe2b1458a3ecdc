use crate::http::response::{ApiError, ApiSuccess, Created, FieldError};
use crate::http::{API_PREFIX, AppState};
use crate::models::{Author, AuthorId, AuthorName, Nationality};
use crate::service::AuthorService;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorHttpRequest {
    name: Option<String>,
    birth_date: Option<String>,
    nationality: Option<String>,
}

#[derive(Error, Debug)]
#[error("Invalid author payload")]
pub struct ParseAuthorHttpRequestError(Vec<FieldError>);

impl From<ParseAuthorHttpRequestError> for ApiError {
    fn from(err: ParseAuthorHttpRequestError) -> Self {
        Self::UnprocessableEntity(err.0)
    }
}

#[derive(Debug)]
struct AuthorFields {
    name: AuthorName,
    birth_date: NaiveDate,
    nationality: Nationality,
}

impl AuthorHttpRequest {
    /// Checks every field and reports all failures together.
    fn parse(&self) -> Result<AuthorFields, ParseAuthorHttpRequestError> {
        let mut errors = Vec::new();

        let name = AuthorName::new(self.name.as_deref().unwrap_or_default())
            .map_err(|err| errors.push(FieldError::new("name", err.to_string())))
            .ok();

        let birth_date = match self.birth_date.as_deref().map(str::trim) {
            None | Some("") => {
                errors.push(FieldError::new("birthDate", "Birth date is required"));
                None
            }
            Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .map_err(|_| {
                    errors.push(FieldError::new(
                        "birthDate",
                        "Birth date must be a date in YYYY-MM-DD format",
                    ));
                })
                .ok(),
        };

        let nationality = Nationality::new(self.nationality.as_deref().unwrap_or_default())
            .map_err(|err| errors.push(FieldError::new("nationality", err.to_string())))
            .ok();

        match (name, birth_date, nationality) {
            (Some(name), Some(birth_date), Some(nationality)) if errors.is_empty() => {
                Ok(AuthorFields {
                    name,
                    birth_date,
                    nationality,
                })
            }
            _ => Err(ParseAuthorHttpRequestError(errors)),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorHttpResponse {
    id: Uuid,
    name: String,
    birth_date: NaiveDate,
    nationality: String,
}

impl TryFrom<&Author> for AuthorHttpResponse {
    type Error = ApiError;

    fn try_from(author: &Author) -> Result<Self, Self::Error> {
        let Some(id) = author.id() else {
            tracing::error!(name = %author.name(), "stored author has no id");
            return Err(ApiError::InternalServerError(
                "Internal server error".to_string(),
            ));
        };

        Ok(Self {
            id: *id.as_uuid(),
            name: author.name().to_string(),
            birth_date: author.birth_date(),
            nationality: author.nationality().to_string(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchAuthorsHttpQuery {
    name: Option<String>,
    nationality: Option<String>,
}

fn parse_author_id(raw: &str) -> Result<AuthorId, ApiError> {
    AuthorId::from_str(raw)
        .map_err(|_| ApiError::BadRequest(format!(r#"Invalid author id "{raw}""#)))
}

fn author_not_found(id: AuthorId) -> ApiError {
    ApiError::NotFound(format!(r#"Author with id "{id}" does not exist"#))
}

pub async fn create_author<AS: AuthorService>(
    State(state): State<AppState<AS>>,
    payload: Result<Json<AuthorHttpRequest>, JsonRejection>,
) -> Result<Created<AuthorHttpResponse>, ApiError> {
    let Json(body) = payload?;
    let fields = body.parse()?;
    let candidate = Author::new(fields.name, fields.birth_date, fields.nationality);

    let author = state.author_service.save(&candidate).await?;
    let response = AuthorHttpResponse::try_from(&author)?;
    let location = format!("{API_PREFIX}/authors/{}", response.id);
    Ok(Created::new(location, response))
}

pub async fn get_author<AS: AuthorService>(
    State(state): State<AppState<AS>>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<AuthorHttpResponse>, ApiError> {
    let id = parse_author_id(&id)?;
    let author = state
        .author_service
        .get_by_id(id)
        .await?
        .ok_or_else(|| author_not_found(id))?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        AuthorHttpResponse::try_from(&author)?,
    ))
}

pub async fn update_author<AS: AuthorService>(
    State(state): State<AppState<AS>>,
    Path(id): Path<String>,
    payload: Result<Json<AuthorHttpRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let id = parse_author_id(&id)?;
    let mut author = state
        .author_service
        .get_by_id(id)
        .await?
        .ok_or_else(|| author_not_found(id))?;

    let Json(body) = payload?;
    let fields = body.parse()?;
    author.set_name(fields.name);
    author.set_birth_date(fields.birth_date);
    author.set_nationality(fields.nationality);

    state.author_service.update(&author).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_author<AS: AuthorService>(
    State(state): State<AppState<AS>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_author_id(&id)?;
    let author = state
        .author_service
        .get_by_id(id)
        .await?
        .ok_or_else(|| author_not_found(id))?;

    state.author_service.delete(&author).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn search_authors<AS: AuthorService>(
    State(state): State<AppState<AS>>,
    Query(query): Query<SearchAuthorsHttpQuery>,
) -> Result<ApiSuccess<Vec<AuthorHttpResponse>>, ApiError> {
    let authors = state
        .author_service
        .search(query.name.as_deref(), query.nationality.as_deref())
        .await?;

    let response = authors
        .iter()
        .map(AuthorHttpResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ApiSuccess::new(StatusCode::OK, response))
}
