use donut_canva::CanvaApiError;
use donut_core::error::CoreError;
use donut_openai::OpenAiError;

/// Errors raised by the generation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The user has no usable design-API credentials. Shown to the user
    /// as-is; retrying will not help.
    #[error("Canva account not connected. Please connect to Canva and try again.")]
    NotConnected,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Canva request failed: {0}")]
    Canva(#[from] CanvaApiError),

    #[error("OpenAI request failed: {0}")]
    OpenAi(#[from] OpenAiError),

    /// The text model answered, but not with the expected structure.
    #[error("Generated content was malformed: {0}")]
    MalformedContent(String),

    /// Every attempted platform failed; nothing was persisted.
    #[error("No designs could be created: {0}")]
    AllPlatformsFailed(String),

    #[error("Generation scheduler is not running")]
    SchedulerClosed,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl PipelineError {
    /// Whether this failure came from an external service rather than from
    /// the request or local state.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            PipelineError::Canva(_)
                | PipelineError::OpenAi(_)
                | PipelineError::MalformedContent(_)
                | PipelineError::AllPlatformsFailed(_)
        )
    }
}
