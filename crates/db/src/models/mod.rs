//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod activity;
pub mod campaign;
pub mod customer;
pub mod design;
pub mod generation_run;
pub mod oauth_state;
pub mod organization;
pub mod template_settings;
pub mod user;
