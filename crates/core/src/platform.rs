//! Target platforms and marketing content types.
//!
//! Both enums serialize as lowercase strings (`"instagram"`, `"quiz"`) which
//! is also how they are stored in `TEXT` columns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// A channel a design is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Email,
    Instagram,
    Twitter,
    Tiktok,
}

impl Platform {
    /// Every platform in generation order. Email always comes first.
    pub const ALL: [Platform; 4] = [
        Platform::Email,
        Platform::Instagram,
        Platform::Twitter,
        Platform::Tiktok,
    ];

    /// Storage / wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Email => "email",
            Platform::Instagram => "instagram",
            Platform::Twitter => "twitter",
            Platform::Tiktok => "tiktok",
        }
    }

    /// Name with the first letter capitalised, used in design titles.
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Email => "Email",
            Platform::Instagram => "Instagram",
            Platform::Twitter => "Twitter",
            Platform::Tiktok => "Tiktok",
        }
    }

    /// Social platforms need a handle on file; email is always attempted.
    pub fn is_social(self) -> bool {
        !matches!(self, Platform::Email)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" => Ok(Platform::Email),
            "instagram" => Ok(Platform::Instagram),
            "twitter" => Ok(Platform::Twitter),
            "tiktok" => Ok(Platform::Tiktok),
            other => Err(CoreError::Validation(format!("Unknown platform: {other}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// ContentType
// ---------------------------------------------------------------------------

/// Kind of marketing copy placed into a design.
///
/// `Fact`, `General` and `Custom` are reserved names without a generator;
/// requesting them fails with an "unsupported content type" error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Quiz,
    Myth,
    Fact,
    General,
    Custom,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Quiz => "quiz",
            ContentType::Myth => "myth",
            ContentType::Fact => "fact",
            ContentType::General => "general",
            ContentType::Custom => "custom",
        }
    }

    /// Whether a generator and payload mapping exist for this type.
    pub fn is_supported(self) -> bool {
        matches!(self, ContentType::Quiz | ContentType::Myth)
    }

    /// Return `self` if supported, otherwise an explicit validation error.
    pub fn require_supported(self) -> Result<Self, CoreError> {
        if self.is_supported() {
            Ok(self)
        } else {
            Err(unsupported_content_type(self.as_str()))
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiz" => Ok(ContentType::Quiz),
            "myth" => Ok(ContentType::Myth),
            "fact" => Ok(ContentType::Fact),
            "general" => Ok(ContentType::General),
            "custom" => Ok(ContentType::Custom),
            other => Err(unsupported_content_type(other)),
        }
    }
}

/// Error returned whenever a content type has no implementation.
pub fn unsupported_content_type(name: &str) -> CoreError {
    CoreError::Validation(format!("Unsupported content type: {name}"))
}
