//! Process-wide configuration.
//!
//! [`AppConfig`] is built exactly once at process entry, from command-line
//! flags with environment fallbacks, and then handed to the components that
//! need it. Nothing below the binaries reads the environment.

use crate::error::{Result, RetrieverError};
use clap::{Args, ValueEnum};
use docqa_embed::ProviderConfig;
use docqa_embed::config::{DEFAULT_BASE_URL, DEFAULT_COMPLETION_MODEL, DEFAULT_EMBEDDING_MODEL};
use std::path::PathBuf;
use std::time::Duration;

/// Default location of the persisted index.
pub const DEFAULT_INDEX_PATH: &str = "index.json.gz";

/// Default context budget in bytes.
pub const DEFAULT_MAX_CONTEXT_BYTES: usize = 4000;

/// What an indexing run does when a single document cannot be indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FailurePolicy {
    /// Abort the run; the previously persisted index is left untouched
    FailFast,
    /// Log a warning, leave the document out and continue
    #[default]
    #[value(name = "skip")]
    SkipAndWarn,
}

/// Settings for ranking and context packing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrievalConfig {
    /// Upper bound on the summed byte length of returned chunk texts
    pub max_context_bytes: usize,
    /// Reject documents whose content fingerprint changed since indexing
    pub verify_fingerprints: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_context_bytes: DEFAULT_MAX_CONTEXT_BYTES,
            verify_fingerprints: true,
        }
    }
}

impl RetrievalConfig {
    pub fn with_max_context_bytes(mut self, max_context_bytes: usize) -> Self {
        self.max_context_bytes = max_context_bytes;
        self
    }

    pub fn with_verify_fingerprints(mut self, verify: bool) -> Self {
        self.verify_fingerprints = verify;
        self
    }
}

/// Resolved configuration shared by the CLI and the server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub index_path: PathBuf,
    pub failure_policy: FailurePolicy,
    pub retrieval: RetrievalConfig,
    api_key: Option<String>,
    base_url: String,
    embedding_model: String,
    completion_model: String,
    timeout: Duration,
    max_retries: usize,
}

impl AppConfig {
    /// Configuration with defaults everywhere and no credential.
    pub fn new(index_path: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
            failure_policy: FailurePolicy::default(),
            retrieval: RetrievalConfig::default(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            completion_model: DEFAULT_COMPLETION_MODEL.to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 3,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_retrieval(mut self, retrieval: RetrievalConfig) -> Self {
        self.retrieval = retrieval;
        self
    }

    /// Provider settings, or `ConfigMissing` when no usable credential was given.
    pub fn provider_config(&self) -> Result<ProviderConfig> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| RetrieverError::ConfigMissing("OPENAI_API_KEY is not set".to_string()))?;

        Ok(ProviderConfig {
            api_key: api_key.to_string(),
            base_url: self.base_url.clone(),
            embedding_model: self.embedding_model.clone(),
            completion_model: self.completion_model.clone(),
            timeout: self.timeout,
            max_retries: self.max_retries,
        })
    }
}

/// Command-line flags shared by every docqa binary.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Path of the gzip-compressed index file
    #[arg(long, env = "DOCQA_INDEX", default_value = DEFAULT_INDEX_PATH, global = true)]
    pub index: PathBuf,

    /// Provider credential
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Base URL for OpenAI-compatible endpoints
    #[arg(long, env = "DOCQA_OPENAI_BASE", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// Embedding model identifier
    #[arg(long, env = "DOCQA_EMBEDDING_MODEL", default_value = DEFAULT_EMBEDDING_MODEL, global = true)]
    pub embedding_model: String,

    /// Completion model identifier
    #[arg(long, env = "DOCQA_COMPLETION_MODEL", default_value = DEFAULT_COMPLETION_MODEL, global = true)]
    pub completion_model: String,

    /// Request timeout for provider calls, in seconds
    #[arg(long, env = "DOCQA_TIMEOUT_SECS", default_value_t = 60, global = true)]
    pub timeout_secs: u64,

    /// Attempts per provider call for retryable failures
    #[arg(long, env = "DOCQA_MAX_RETRIES", default_value_t = 3, global = true)]
    pub max_retries: usize,

    /// Maximum bytes of retrieved context handed to the generator
    #[arg(long, env = "DOCQA_MAX_CONTEXT_BYTES", default_value_t = DEFAULT_MAX_CONTEXT_BYTES, global = true)]
    pub max_context_bytes: usize,

    /// What to do with a document that cannot be indexed
    #[arg(long, env = "DOCQA_ON_ERROR", value_enum, default_value_t = FailurePolicy::SkipAndWarn, global = true)]
    pub on_error: FailurePolicy,

    /// Do not compare document fingerprints at query time
    #[arg(long, global = true)]
    pub no_verify: bool,
}

impl From<ConfigArgs> for AppConfig {
    fn from(args: ConfigArgs) -> Self {
        Self {
            index_path: args.index,
            failure_policy: args.on_error,
            retrieval: RetrievalConfig {
                max_context_bytes: args.max_context_bytes,
                verify_fingerprints: !args.no_verify,
            },
            api_key: args.api_key,
            base_url: args.base_url,
            embedding_model: args.embedding_model,
            completion_model: args.completion_model,
            timeout: Duration::from_secs(args.timeout_secs),
            max_retries: args.max_retries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        config: ConfigArgs,
    }

    #[test]
    fn test_missing_credential() {
        let config = AppConfig::new("index.json.gz");
        assert!(matches!(
            config.provider_config(),
            Err(RetrieverError::ConfigMissing(_))
        ));

        let blank = AppConfig::new("index.json.gz").with_api_key("  ");
        assert!(matches!(
            blank.provider_config(),
            Err(RetrieverError::ConfigMissing(_))
        ));
    }

    #[test]
    fn test_provider_config_from_app_config() {
        let config = AppConfig::new("idx.gz")
            .with_api_key("sk-test")
            .with_base_url("http://localhost:1234/v1");
        let provider = config.provider_config().unwrap();

        assert_eq!(provider.api_key, "sk-test");
        assert_eq!(provider.base_url, "http://localhost:1234/v1");
        assert_eq!(provider.embedding_model, DEFAULT_EMBEDDING_MODEL);
    }

    #[test]
    fn test_args_conversion() {
        let cli = TestCli::try_parse_from([
            "docqa",
            "--index",
            "/tmp/custom.json.gz",
            "--api-key",
            "sk-flag",
            "--max-context-bytes",
            "128",
            "--on-error",
            "fail-fast",
            "--no-verify",
        ])
        .unwrap();
        let config = AppConfig::from(cli.config);

        assert_eq!(config.index_path, PathBuf::from("/tmp/custom.json.gz"));
        assert_eq!(config.failure_policy, FailurePolicy::FailFast);
        assert_eq!(config.retrieval.max_context_bytes, 128);
        assert!(!config.retrieval.verify_fingerprints);
        assert_eq!(config.provider_config().unwrap().api_key, "sk-flag");
    }

    #[test]
    fn test_policy_names() {
        let cli = TestCli::try_parse_from(["docqa", "--on-error", "skip"]).unwrap();
        assert_eq!(cli.config.on_error, FailurePolicy::SkipAndWarn);
        assert!(TestCli::try_parse_from(["docqa", "--on-error", "explode"]).is_err());
    }
}
