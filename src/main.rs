use eggledger::{api, config::Config, db::init_db, Repository};
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(LevelFilter::INFO.into()))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let pool = match init_db(&config.database_path).await {
        Ok(pool) => pool,
        Err(err) => {
            eprintln!("database initialization failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let repo = Arc::new(Repository::new(pool));
    let app = api::create_router(api::AppState::new(repo, config));

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            eprintln!("cannot bind {addr}: {err}");
            return ExitCode::FAILURE;
        }
    };

    info!("listening on {}", addr);

    if let Err(err) = axum::serve(listener, app).await {
        eprintln!("server error: {err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
