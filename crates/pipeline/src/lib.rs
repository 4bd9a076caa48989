//! Campaign generation pipeline.
//!
//! - [`token::TokenManager`] hands out valid design-API access tokens.
//! - [`content::ContentGenerator`] turns customer and brand data into copy.
//! - [`orchestrator::CampaignOrchestrator`] schedules and runs per-customer
//!   generation, creating one autofill job per platform.
//! - [`poller::JobPoller`] sweeps in-progress jobs and records results.
//!
//! External systems sit behind the traits in [`ports`] so the pipeline can
//! be exercised without a database or network. [`store::PgStore`] and
//! [`adapters`] provide the production implementations.

pub mod adapters;
pub mod content;
pub mod error;
pub mod orchestrator;
pub mod poller;
pub mod ports;
pub mod scheduler;
pub mod store;
pub mod token;

pub use error::PipelineError;
