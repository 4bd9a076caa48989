//! Organization role name constants.
//!
//! These must match the `CHECK` constraint on `users.role` in
//! `20260301000002_create_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EDITOR: &str = "editor";
pub const ROLE_VIEWER: &str = "viewer";

/// Whether the role may create, edit or delete tenant data.
pub fn can_mutate(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_EDITOR
}
