use clap::Parser;
use docqa_context::{Document, chunk_html};
use serde::Serialize;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

/// A CLI tool to chunk a document file into JSON output using docqa-context.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input document (JSON with title, link and html).
    /// If not provided, reads raw HTML from stdin.
    #[arg(short, long)]
    input: Option<PathBuf>,
}

#[derive(Serialize)]
struct SerializableChunk<'a> {
    sequence: usize,
    text: &'a str,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let chunks = if let Some(input_path) = args.input {
        Document::read(&input_path)?.chunks()
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        chunk_html(&buffer)
    };

    let serializable_chunks: Vec<SerializableChunk> = chunks
        .iter()
        .enumerate()
        .map(|(sequence, text)| SerializableChunk { sequence, text })
        .collect();

    let json_output = serde_json::to_string_pretty(&serializable_chunks)?;
    println!("{json_output}");

    Ok(())
}
