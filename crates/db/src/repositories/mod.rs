//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Most take `&PgPool`; methods that participate in the campaign
//! persistence transaction take any [`sqlx::PgExecutor`] so they can run on
//! a pool or inside a transaction.

pub mod activity_repo;
pub mod campaign_repo;
pub mod customer_repo;
pub mod design_repo;
pub mod generation_run_repo;
pub mod oauth_state_repo;
pub mod organization_repo;
pub mod template_settings_repo;
pub mod user_repo;

pub use activity_repo::ActivityRepo;
pub use campaign_repo::CampaignRepo;
pub use customer_repo::CustomerRepo;
pub use design_repo::DesignRepo;
pub use generation_run_repo::GenerationRunRepo;
pub use oauth_state_repo::OauthStateRepo;
pub use organization_repo::OrganizationRepo;
pub use template_settings_repo::TemplateSettingsRepo;
pub use user_repo::UserRepo;
