/// Credentials and model selection for the text service.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    /// API base, e.g. `https://api.openai.com/v1`. No trailing slash.
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
}

impl OpenAiConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env var              | Default                     |
    /// |----------------------|-----------------------------|
    /// | `OPENAI_API_KEY`     | **required**                |
    /// | `OPENAI_BASE_URL`    | `https://api.openai.com/v1` |
    /// | `OPENAI_MODEL`       | `gpt-4o-mini`               |
    /// | `OPENAI_TEMPERATURE` | `0.8`                       |
    ///
    /// # Panics
    ///
    /// Panics if `OPENAI_API_KEY` is not set.
    pub fn from_env() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY")
            .expect("OPENAI_API_KEY must be set in the environment");
        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".into())
            .trim_end_matches('/')
            .to_string();
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
        let temperature: f32 = std::env::var("OPENAI_TEMPERATURE")
            .unwrap_or_else(|_| "0.8".into())
            .parse()
            .expect("OPENAI_TEMPERATURE must be a valid f32");

        Self {
            api_key,
            base_url,
            model,
            temperature,
        }
    }
}
