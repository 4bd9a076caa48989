//! Design template resolution.
//!
//! Every `(content type, platform)` pair has a built-in brand template in the
//! design API. Users may override any of them from their template settings;
//! an override only applies when it is a non-empty string.

use serde::{Deserialize, Serialize};

use crate::platform::{ContentType, Platform};

// ---------------------------------------------------------------------------
// Built-in templates
// ---------------------------------------------------------------------------

/// Built-in template ids for one content type, one per platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultTemplates {
    pub email: &'static str,
    pub instagram: &'static str,
    pub twitter: &'static str,
    pub tiktok: &'static str,
}

impl DefaultTemplates {
    pub fn get(&self, platform: Platform) -> &'static str {
        match platform {
            Platform::Email => self.email,
            Platform::Instagram => self.instagram,
            Platform::Twitter => self.twitter,
            Platform::Tiktok => self.tiktok,
        }
    }
}

pub const QUIZ_TEMPLATES: DefaultTemplates = DefaultTemplates {
    email: "DAGa5Yq1JvE",
    instagram: "DAGa5c7xH2s",
    twitter: "DAGa5eQm0Nk",
    tiktok: "DAGa5gLw3Ro",
};

pub const MYTH_TEMPLATES: DefaultTemplates = DefaultTemplates {
    email: "DAGb1Pz8UfA",
    instagram: "DAGb1R4kTqw",
    twitter: "DAGb1ThVx9c",
    tiktok: "DAGb1Vq2Lmg",
};

/// Built-in templates for a content type.
///
/// Only quiz and myth have dedicated layouts; the reserved types share the
/// quiz layouts so resolution never fails.
pub fn default_templates(content_type: ContentType) -> &'static DefaultTemplates {
    match content_type {
        ContentType::Myth => &MYTH_TEMPLATES,
        _ => &QUIZ_TEMPLATES,
    }
}

// ---------------------------------------------------------------------------
// User overrides
// ---------------------------------------------------------------------------

/// Per-platform template overrides stored in a user's template settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateOverrides {
    pub email_template_id: Option<String>,
    pub instagram_template_id: Option<String>,
    pub twitter_template_id: Option<String>,
    pub tiktok_template_id: Option<String>,
}

impl TemplateOverrides {
    /// The override for `platform`, if one is set and non-empty.
    pub fn get(&self, platform: Platform) -> Option<&str> {
        let value = match platform {
            Platform::Email => &self.email_template_id,
            Platform::Instagram => &self.instagram_template_id,
            Platform::Twitter => &self.twitter_template_id,
            Platform::Tiktok => &self.tiktok_template_id,
        };
        value.as_deref().filter(|id| !id.trim().is_empty())
    }
}

/// Resolve the template id to use for `platform`.
pub fn resolve(
    content_type: ContentType,
    platform: Platform,
    overrides: Option<&TemplateOverrides>,
) -> String {
    overrides
        .and_then(|o| o.get(platform))
        .unwrap_or_else(|| default_templates(content_type).get(platform))
        .to_string()
}
