//! Authentication and authorization extractors.
//!
//! - [`auth::AuthIdentity`] -- the verified identity from a Bearer token.
//! - [`auth::CurrentUser`] -- the stored user for that identity.
//! - [`rbac::OrgMember`] -- a user who belongs to an organization.
//! - [`rbac::RequireEditor`] -- an organization member allowed to mutate data.

pub mod auth;
pub mod rbac;
