//! Domain types and pure business rules shared by every donut crate.
//!
//! Nothing in here touches the network or the database, so the rules for
//! templates, payload shapes, titles, statuses and batching can be tested
//! in isolation and reused by the API, the pipeline and future tooling.

pub mod audit;
pub mod campaign;
pub mod customers;
pub mod error;
pub mod naming;
pub mod payload;
pub mod pkce;
pub mod platform;
pub mod roles;
pub mod scheduling;
pub mod status;
pub mod templates;
pub mod types;
