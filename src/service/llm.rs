//! Shared LLM client used by the analysis executor

use rig::providers::openai;

const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Missing required environment variable: {0}")]
    MissingApiKey(&'static str),

    #[error("Failed to create OpenAI client: {0}")]
    Client(String),
}

/// Cheap to clone; one instance is shared by every run
#[derive(Clone)]
pub struct LlmClient {
    client: openai::Client,
}

impl LlmClient {
    pub fn new(api_key: &str) -> Result<Self, LlmError> {
        let client = openai::Client::new(api_key);

        Ok(Self { client })
    }

    /// Build a client from OPENAI_API_KEY
    pub fn from_env() -> Result<Self, LlmError> {
        let api_key = std::env::var(ENV_OPENAI_API_KEY)
            .map_err(|_| LlmError::MissingApiKey(ENV_OPENAI_API_KEY))?;
        Self::new(&api_key)
    }

    pub fn openai_client(&self) -> &openai::Client {
        &self.client
    }
}
