//! Embeds a few sentences and prints their pairwise squared distances.
//!
//! Run with `OPENAI_API_KEY` set:
//! `cargo run -p docqa-embed --example simple_embedding`

use docqa_embed::{EmbeddingProvider, OpenAiEmbeddingProvider, ProviderConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
    let provider = OpenAiEmbeddingProvider::new(ProviderConfig::new(api_key))?;

    let texts = vec![
        "Rust is a systems programming language.".to_string(),
        "Cargo is the Rust package manager.".to_string(),
        "Paris is the capital of France.".to_string(),
    ];

    let result = provider.embed_texts(&texts).await?;
    println!(
        "Generated {} embeddings of dimension {}",
        result.len(),
        result.dimension
    );

    for (i, a) in result.embeddings.iter().enumerate() {
        for (j, b) in result.embeddings.iter().enumerate().skip(i + 1) {
            let distance: f64 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
            println!("  d({i}, {j}) = {distance:.4}");
        }
    }

    Ok(())
}
