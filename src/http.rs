pub mod handler;
pub mod response;

use crate::service::AuthorService;
use anyhow::Context;
use axum::Router;
use axum::extract::Request;
use axum::routing::get;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub const API_PREFIX: &str = "/api/v1";

#[derive(Debug, Clone)]
pub struct AppState<AS: AuthorService> {
    author_service: Arc<AS>,
}

impl<AS: AuthorService> AppState<AS> {
    pub fn new(author_service: AS) -> Self {
        Self {
            author_service: Arc::new(author_service),
        }
    }
}

#[derive(Debug)]
pub struct HttpServerConfig {
    port: u16,
}

impl HttpServerConfig {
    pub const fn new(port: u16) -> Self {
        Self { port }
    }
}

pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    pub async fn new<AS: AuthorService>(
        state: AppState<AS>,
        config: HttpServerConfig,
    ) -> anyhow::Result<Self> {
        let router = router(state);

        let listener = TcpListener::bind(format!("0.0.0.0:{}", config.port))
            .await
            .with_context(|| format!("Failed to bind to port {}", config.port))?;

        Ok(Self { router, listener })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!(addr = ?self.listener.local_addr().ok(), "listening");
        axum::serve(self.listener, self.router)
            .await
            .context("Received error from running server")?;
        Ok(())
    }
}

/// Builds the application router with request tracing.
pub fn router<AS: AuthorService>(state: AppState<AS>) -> Router {
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        let uri = request.uri().to_string();
        tracing::info_span!("http_request", method = ?request.method(), uri)
    });

    Router::new()
        .nest(API_PREFIX, api_routes())
        .layer(trace_layer)
        .with_state(state)
}

fn api_routes<AS: AuthorService>() -> Router<AppState<AS>> {
    Router::new()
        .route(
            "/authors",
            get(handler::search_authors::<AS>).post(handler::create_author::<AS>),
        )
        .route(
            "/authors/{id}",
            get(handler::get_author::<AS>)
                .put(handler::update_author::<AS>)
                .delete(handler::delete_author::<AS>),
        )
}
