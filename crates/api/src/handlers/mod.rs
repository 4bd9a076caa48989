pub mod activities;
pub mod campaigns;
pub mod canva;
pub mod customers;
pub mod generation_runs;
pub mod organizations;
pub mod template_settings;
pub mod users;
