use clap::{Parser, Subcommand, ValueEnum};
use docqa_context::Document;
use docqa_embed::{OpenAiCompletionProvider, OpenAiEmbeddingProvider};
use docqa_retriever::{
    AnswerEngine, AppConfig, GzipJsonStore, IndexStore, config::ConfigArgs,
    retrieval::IndexingEngine,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

/// Index HTML document records and answer questions about them.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the index from document paths read from stdin, one per line
    Index,
    /// Answer a question using the persisted index
    Query {
        /// The question to answer
        question: String,
    },
    /// Show index statistics
    Stats {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
        format: OutputFormat,
    },
    /// Print the chunks of one document file
    Chunks {
        /// Path of the document record
        document: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum OutputFormat {
    Summary,
    Json,
}

#[derive(Serialize)]
struct ChunkOutput<'a> {
    sequence: usize,
    text: &'a str,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = AppConfig::from(args.config);
    let store = GzipJsonStore::new();

    match args.command {
        Commands::Index => {
            let provider = OpenAiEmbeddingProvider::new(config.provider_config()?)?;
            let engine = IndexingEngine::new(Arc::new(provider), config.failure_policy);
            let stdin = BufReader::new(tokio::io::stdin());
            engine.rebuild(stdin, &store, &config.index_path).await?;
            Ok(())
        }
        Commands::Query { question } => {
            let provider = config.provider_config()?;
            let index = store.load(&config.index_path).await?;
            let engine = AnswerEngine::new(
                Arc::new(index),
                Arc::new(OpenAiEmbeddingProvider::new(provider.clone())?),
                Arc::new(OpenAiCompletionProvider::new(provider)?),
                config.retrieval,
            );
            let answer = engine.answer(&question).await?;
            println!("Answer: {answer}");
            Ok(())
        }
        Commands::Stats { format } => {
            let index = store.load(&config.index_path).await?;
            let stats = index.stats();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                OutputFormat::Summary => {
                    println!("Index: {}", config.index_path.display());
                    println!("Documents: {}", stats.documents);
                    println!("Embeddings: {}", stats.embeddings);
                    println!("Dimension: {}", stats.dimension);
                }
            }
            Ok(())
        }
        Commands::Chunks { document } => {
            let document = Document::read(&document)?;
            let chunks = document.chunks();
            let output: Vec<ChunkOutput> = chunks
                .iter()
                .enumerate()
                .map(|(sequence, text)| ChunkOutput { sequence, text })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
    }
}
