use crate::models::{
    DeleteAuthorError, FindAuthorError, SaveAuthorError, SearchAuthorsError, UpdateAuthorError,
};
use axum::extract::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<T>);

impl<T: Serialize> ApiSuccess<T> {
    pub const fn new(status: StatusCode, data: T) -> Self {
        Self(status, Json(data))
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// `201 Created` pointing at the new resource.
#[derive(Debug)]
pub struct Created<T: Serialize> {
    location: String,
    data: T,
}

impl<T: Serialize> Created<T> {
    pub const fn new(location: String, data: T) -> Self {
        Self { location, data }
    }
}

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        (
            StatusCode::CREATED,
            [(header::LOCATION, self.location)],
            Json(self.data),
        )
            .into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    field: String,
    message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    status: u16,
    message: String,
    field_errors: Vec<FieldError>,
}

impl ErrorResponse {
    fn new(status: StatusCode, message: String, field_errors: Vec<FieldError>) -> Self {
        Self {
            status: status.as_u16(),
            message,
            field_errors,
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    UnprocessableEntity(Vec<FieldError>),
}

impl ApiError {
    fn internal(cause: &anyhow::Error) -> Self {
        tracing::error!(error = ?cause, "request failed");
        Self::InternalServerError("Internal server error".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, field_errors) = match self {
            Self::InternalServerError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg, Vec::new())
            }
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, Vec::new()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg, Vec::new()),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg, Vec::new()),
            Self::UnprocessableEntity(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation error".to_string(),
                errors,
            ),
        };

        let body = ErrorResponse::new(status, message, field_errors);
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<SaveAuthorError> for ApiError {
    fn from(err: SaveAuthorError) -> Self {
        match err {
            SaveAuthorError::Duplicate(dup) => Self::Conflict(dup.to_string()),
            SaveAuthorError::Other(cause) => Self::internal(&cause),
        }
    }
}

impl From<UpdateAuthorError> for ApiError {
    fn from(err: UpdateAuthorError) -> Self {
        match err {
            UpdateAuthorError::Duplicate(dup) => Self::Conflict(dup.to_string()),
            UpdateAuthorError::InvalidArgument(invalid) => {
                Self::internal(&anyhow::Error::new(invalid))
            }
            UpdateAuthorError::Other(cause) => Self::internal(&cause),
        }
    }
}

impl From<DeleteAuthorError> for ApiError {
    fn from(err: DeleteAuthorError) -> Self {
        match err {
            DeleteAuthorError::NotAllowed(refused) => Self::BadRequest(refused.to_string()),
            DeleteAuthorError::InvalidArgument(invalid) => {
                Self::internal(&anyhow::Error::new(invalid))
            }
            DeleteAuthorError::Other(cause) => Self::internal(&cause),
        }
    }
}

impl From<FindAuthorError> for ApiError {
    fn from(err: FindAuthorError) -> Self {
        Self::internal(&err.0)
    }
}

impl From<SearchAuthorsError> for ApiError {
    fn from(err: SearchAuthorsError) -> Self {
        Self::internal(&err.0)
    }
}
