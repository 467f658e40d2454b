use clap::Parser;
use docqa_retriever::{AppConfig, config::ConfigArgs};
use docqa_server::{ServerConfig, run_server};
use std::net::SocketAddr;
use std::process;
use tracing_subscriber::EnvFilter;

/// HTTP question-answering server over a docqa index.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the HTTP server to (host:port)
    #[arg(long, env = "DOCQA_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    #[command(flatten)]
    config: ConfigArgs,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = ServerConfig::new(args.bind, AppConfig::from(args.config));
    if let Err(e) = run_server(config).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
