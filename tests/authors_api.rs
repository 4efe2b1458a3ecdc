#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Drives the axum router end to end over the in-memory repositories.

use author_catalog::http::{AppState, router};
use author_catalog::memory::{InMemoryAuthorRepository, InMemoryBookRepository};
use author_catalog::models::AuthorId;
use author_catalog::service::Service;
use author_catalog::validator::AuthorValidator;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    authors: Arc<InMemoryAuthorRepository>,
    books: Arc<InMemoryBookRepository>,
}

impl TestApp {
    fn new() -> Self {
        let authors = Arc::new(InMemoryAuthorRepository::new());
        let books = Arc::new(InMemoryBookRepository::new());
        let validator = AuthorValidator::new(Arc::clone(&authors));
        let service = Service::new(Arc::clone(&authors), Arc::clone(&books), validator);
        Self {
            router: router(AppState::new(service)),
            authors,
            books,
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_owned());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            location,
            json,
        }
    }

    async fn create(&self, body: Value) -> TestResponse {
        self.send(Method::POST, "/api/v1/authors", Some(body)).await
    }
}

struct TestResponse {
    status: StatusCode,
    location: Option<String>,
    json: Value,
}

fn maria_clara() -> Value {
    json!({
        "name": "Maria Clara",
        "birthDate": "1990-05-10",
        "nationality": "Brasileira",
    })
}

#[tokio::test]
async fn create_returns_created_with_location() {
    let app = TestApp::new();

    let res = app.create(maria_clara()).await;

    assert_eq!(res.status, StatusCode::CREATED);
    let id = res.json["id"].as_str().unwrap();
    assert_eq!(res.location.as_deref(), Some(format!("/api/v1/authors/{id}").as_str()));
    assert_eq!(res.json["name"], "Maria Clara");
    assert_eq!(res.json["birthDate"], "1990-05-10");
}

#[tokio::test]
async fn create_with_invalid_fields_is_unprocessable() {
    let app = TestApp::new();

    let res = app
        .create(json!({ "name": "  ", "birthDate": "1990-05-10" }))
        .await;

    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res.json["status"], 422);
    let fields: Vec<&str> = res.json["fieldErrors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["name", "nationality"]);
    assert!(app.authors.is_empty());
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/authors")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_unknown_author_is_not_found() {
    let app = TestApp::new();

    let uri = format!("/api/v1/authors/{}", AuthorId::generate());
    let res = app.send(Method::GET, &uri, None).await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json["status"], 404);
}

#[tokio::test]
async fn get_with_malformed_id_is_bad_request() {
    let app = TestApp::new();

    let res = app.send(Method::GET, "/api/v1/authors/42", None).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_author_without_books() {
    let app = TestApp::new();
    let created = app.create(maria_clara()).await;
    let location = created.location.unwrap();

    let res = app.send(Method::DELETE, &location, None).await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);

    let res = app.send(Method::GET, &location, None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_author_with_books_is_refused() {
    let app = TestApp::new();
    let created = app.create(maria_clara()).await;
    let location = created.location.unwrap();
    let id = AuthorId::from_str(created.json["id"].as_str().unwrap()).unwrap();
    app.books.register_book(id);

    let res = app.send(Method::DELETE, &location, None).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json["message"], "Cannot delete an author with registered books");
    let res = app.send(Method::GET, &location, None).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn delete_unknown_author_is_not_found() {
    let app = TestApp::new();

    let uri = format!("/api/v1/authors/{}", AuthorId::generate());
    let res = app.send(Method::DELETE, &uri, None).await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_unknown_author_is_not_found() {
    let app = TestApp::new();

    let uri = format!("/api/v1/authors/{}", AuthorId::generate());
    let res = app.send(Method::PUT, &uri, Some(maria_clara())).await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_unknown_author_with_invalid_body_is_not_found() {
    let app = TestApp::new();

    let uri = format!("/api/v1/authors/{}", AuthorId::generate());
    let res = app
        .send(Method::PUT, &uri, Some(json!({ "name": "" })))
        .await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_existing_author_with_invalid_body_is_unprocessable() {
    let app = TestApp::new();
    let created = app.create(maria_clara()).await;

    let res = app
        .send(
            Method::PUT,
            &created.location.unwrap(),
            Some(json!({ "name": "", "birthDate": "1990-05-10", "nationality": "Brasileira" })),
        )
        .await;

    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res.json["fieldErrors"][0]["field"], "name");
}

#[tokio::test]
async fn delete_author_after_books_are_removed() {
    let app = TestApp::new();
    let created = app.create(maria_clara()).await;
    let location = created.location.unwrap();
    let id = AuthorId::from_str(created.json["id"].as_str().unwrap()).unwrap();
    app.books.register_book(id);

    let res = app.send(Method::DELETE, &location, None).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    app.books.remove_books(id);
    let res = app.send(Method::DELETE, &location, None).await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert!(app.authors.is_empty());
}

#[tokio::test]
async fn update_onto_another_authors_identity_conflicts() {
    let app = TestApp::new();
    app.create(maria_clara()).await;
    let other = app
        .create(json!({
            "name": "Jane",
            "birthDate": "1960-01-02",
            "nationality": "Inglesa",
        }))
        .await;

    let res = app
        .send(Method::PUT, &other.location.unwrap(), Some(maria_clara()))
        .await;

    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.json["status"], 409);
}

#[tokio::test]
async fn search_without_filters_lists_everything() {
    let app = TestApp::new();
    app.create(maria_clara()).await;
    app.create(json!({
        "name": "Jane",
        "birthDate": "1960-01-02",
        "nationality": "Inglesa",
    }))
    .await;

    let res = app.send(Method::GET, "/api/v1/authors", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json.as_array().unwrap().len(), 2);

    let res = app.send(Method::GET, "/api/v1/authors?name=Jan", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.json.as_array().unwrap().is_empty());

    let res = app.send(Method::GET, "/api/v1/authors?name=Jane", None).await;
    assert_eq!(res.json.as_array().unwrap().len(), 1);
    assert_eq!(res.json[0]["name"], "Jane");
}

#[tokio::test]
async fn duplicate_then_update_scenario() {
    let app = TestApp::new();

    let created = app.create(maria_clara()).await;
    assert_eq!(created.status, StatusCode::CREATED);
    let location = created.location.unwrap();

    let duplicate = app.create(maria_clara()).await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(duplicate.json["message"], "Author already registered");
    assert_eq!(app.authors.len(), 1);

    let res = app
        .send(
            Method::PUT,
            &location,
            Some(json!({
                "name": "Maria Clara",
                "birthDate": "1990-05-10",
                "nationality": "Portuguesa",
            })),
        )
        .await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);

    let res = app
        .send(Method::GET, "/api/v1/authors?nationality=Brasileira", None)
        .await;
    assert!(res.json.as_array().unwrap().is_empty());

    let res = app
        .send(Method::GET, "/api/v1/authors?nationality=Portuguesa", None)
        .await;
    let found = res.json.as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["id"], created.json["id"]);
}
