use anyhow::Result;
use axum::Router;
use clap::Parser;
use search_server::{build_app, AppConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// JSONL documents to load at startup
    #[arg(long)]
    documents: Option<PathBuf>,
    /// Space separated stop words
    #[arg(long, default_value = "")]
    stop_words: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = AppConfig {
        documents: args.documents,
        stop_words: args.stop_words,
        admin_token: std::env::var("ADMIN_TOKEN").ok(),
    };
    let app: Router = build_app(config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
