use anyhow::Result;
use clap::Parser;
use cuttle::{create_router, AppState, IndexSettings, SearchEngine, SearchMetrics, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "cuttle")]
#[command(about = "Keyword document index & search engine", long_about = None)]
struct Args {
    /// Data directory for document storage
    #[arg(long, env = "CUTTLE_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// HTTP API port
    #[arg(long, env = "CUTTLE_HTTP_PORT", default_value = "8080")]
    http_port: u16,

    /// Read cache capacity (documents)
    #[arg(long, env = "CUTTLE_CACHE_CAPACITY", default_value = "1024")]
    cache_capacity: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    info!("Starting Cuttle v{}", cuttle::VERSION);
    info!("  Data directory: {:?}", args.data_dir);
    info!("  Cache capacity: {}", args.cache_capacity);

    let config = ServerConfig::new(args.http_port, args.data_dir.clone());
    let settings = IndexSettings {
        cache_capacity: args.cache_capacity,
        ..IndexSettings::default()
    };

    // The index is rebuilt inside open(); the listener below only binds
    // once that has finished, so no request races the rebuild.
    let engine = Arc::new(SearchEngine::open(settings, config.data_dir.clone())?);
    info!(
        "Search engine initialized ({} documents)",
        engine.total_documents()
    );

    let metrics = Arc::new(SearchMetrics::new()?);

    let app = create_router(AppState { engine, metrics });
    let http_addr = config.http_addr();
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    info!("HTTP API server listening on {}", http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install CTRL+C signal handler");
            info!("Received shutdown signal, gracefully shutting down");
        })
        .await?;

    Ok(())
}
