use author_catalog::config::Config;
use author_catalog::database::{DefaultAuthorRepository, DefaultBookRepository, establish_pool};
use author_catalog::http::{AppState, HttpServer, HttpServerConfig};
use author_catalog::service::Service;
use author_catalog::telemetry;
use author_catalog::validator::AuthorValidator;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init()?;
    let config = Config::from_env()?;

    let pool = establish_pool(config.database_url()).await?;
    let author_repo = Arc::new(DefaultAuthorRepository::new(pool.clone()));
    let book_repo = Arc::new(DefaultBookRepository::new(pool));
    let validator = AuthorValidator::new(Arc::clone(&author_repo));
    let author_service = Service::new(author_repo, book_repo, validator);

    let state = AppState::new(author_service);
    let server_config = HttpServerConfig::new(config.server_port());
    let http_server = HttpServer::new(state, server_config).await?;
    http_server.run().await
}
