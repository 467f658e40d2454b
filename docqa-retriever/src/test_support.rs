//! In-process providers and fixtures for unit tests.

use async_trait::async_trait;
use docqa_embed::{
    EmbeddingProvider, EmbeddingResult, GenerationProvider, GenerationSettings, ProviderError,
};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

type EmbedFn = dyn Fn(&str) -> Option<Vec<f64>> + Send + Sync;

/// Embeds each text with a closure; a `None` fails the whole batch.
pub struct StubEmbedder {
    embed: Box<EmbedFn>,
    pub batches: Mutex<Vec<Vec<String>>>,
}

impl StubEmbedder {
    pub fn new(embed: impl Fn(&str) -> Option<Vec<f64>> + Send + Sync + 'static) -> Self {
        Self {
            embed: Box::new(embed),
            batches: Mutex::new(Vec::new()),
        }
    }

    /// `[0, 1]` for "no headings here", `[1, 0]` for anything else.
    pub fn two_documents() -> Self {
        Self::new(|text| {
            if text == "no headings here" {
                Some(vec![0.0, 1.0])
            } else {
                Some(vec![1.0, 0.0])
            }
        })
    }

    pub fn batch_count(&self) -> usize {
        self.batches.lock().unwrap().len()
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed_texts(&self, texts: &[String]) -> docqa_embed::Result<EmbeddingResult> {
        self.batches.lock().unwrap().push(texts.to_vec());
        let embeddings = texts
            .iter()
            .map(|text| (self.embed)(text))
            .collect::<Option<Vec<_>>>()
            .ok_or(ProviderError::EmptyResponse)?;
        Ok(EmbeddingResult::new(embeddings))
    }

    fn provider_name(&self) -> &str {
        "stub"
    }
}

/// Records prompts and answers with a fixed string.
pub struct StubGenerator {
    pub answer: String,
    pub prompts: Mutex<Vec<String>>,
    pub fail: bool,
}

impl StubGenerator {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            prompts: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new("")
        }
    }
}

#[async_trait]
impl GenerationProvider for StubGenerator {
    async fn complete(
        &self,
        prompt: &str,
        _settings: &GenerationSettings,
    ) -> docqa_embed::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(self.answer.clone())
    }

    fn provider_name(&self) -> &str {
        "stub"
    }
}

/// Writes a document record into `dir` and returns its path.
pub fn write_document(dir: &Path, name: &str, html: &str) -> PathBuf {
    let path = dir.join(name);
    let document = docqa_context::Document {
        title: name.to_string(),
        link: format!("https://example.com/{name}"),
        html: html.to_string(),
    };
    std::fs::write(&path, serde_json::to_vec(&document).unwrap()).unwrap();
    path
}

pub fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
