//! Customer profiles, generated copy and the autofill field payload.
//!
//! The design API fills a brand template from a map of
//! `{ field_name: { "type": "text", "text": ... } }`. This module owns the
//! mapping from a customer plus generated copy to that map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::platform::{unsupported_content_type, ContentType, Platform};

/// Brand name used when neither the customer nor the organization has one.
pub const DEFAULT_BRAND_NAME: &str = "Your Local Donut Shop";

/// Number of answer options a quiz must have.
pub const QUIZ_OPTION_COUNT: usize = 3;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The customer fields generation is allowed to see.
///
/// Built from a stored customer with internal and administrative columns
/// (ids, organization, timestamps, campaign list) stripped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub instagram_handle: Option<String>,
    pub twitter_handle: Option<String>,
    pub tiktok_handle: Option<String>,
    pub preferences: Vec<String>,
    /// Brand name shown on myth designs, overriding the organization's.
    pub brand_name: Option<String>,
}

impl CustomerProfile {
    /// Contact handle for `platform`, or `""` when none is on file.
    pub fn handle_for(&self, platform: Platform) -> &str {
        let handle = match platform {
            Platform::Email => return &self.email,
            Platform::Instagram => &self.instagram_handle,
            Platform::Twitter => &self.twitter_handle,
            Platform::Tiktok => &self.tiktok_handle,
        };
        handle.as_deref().unwrap_or("")
    }

    /// Whether a design can be generated for this customer on `platform`.
    ///
    /// Email is always eligible; social platforms need a non-empty handle.
    pub fn supports(&self, platform: Platform) -> bool {
        !platform.is_social() || !self.handle_for(platform).trim().is_empty()
    }

    pub fn first_preference(&self) -> &str {
        self.preferences.first().map(String::as_str).unwrap_or("")
    }
}

/// Organization brand metadata fed into copy generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandProfile {
    pub name: String,
    pub description: String,
    pub products: Vec<String>,
}

/// Brand name for a customer's designs: the customer's own brand, then the
/// organization's, then [`DEFAULT_BRAND_NAME`].
pub fn brand_name<'a>(customer: &'a CustomerProfile, brand: &'a BrandProfile) -> &'a str {
    customer
        .brand_name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .or(Some(brand.name.as_str()).filter(|n| !n.trim().is_empty()))
        .unwrap_or(DEFAULT_BRAND_NAME)
}

// ---------------------------------------------------------------------------
// Generated copy
// ---------------------------------------------------------------------------

/// Quiz copy as returned by the text model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizContent {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
    pub reward: String,
}

impl QuizContent {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.options.len() != QUIZ_OPTION_COUNT {
            return Err(CoreError::Validation(format!(
                "Quiz must have exactly {QUIZ_OPTION_COUNT} options, got {}",
                self.options.len()
            )));
        }
        if self.question.trim().is_empty() {
            return Err(CoreError::Validation("Quiz question is empty".into()));
        }
        Ok(())
    }
}

/// Myth-busting copy as returned by the text model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MythContent {
    pub myth_one: String,
    pub myth_two: String,
    pub fact_one: String,
    pub fact_two: String,
    pub deal: String,
}

/// Structured copy for one design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GeneratedContent {
    Quiz(QuizContent),
    Myth(MythContent),
}

impl GeneratedContent {
    pub fn content_type(&self) -> ContentType {
        match self {
            GeneratedContent::Quiz(_) => ContentType::Quiz,
            GeneratedContent::Myth(_) => ContentType::Myth,
        }
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// One text field value in an autofill request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextField {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl TextField {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: value.into(),
        }
    }
}

/// Field name -> value map sent as the autofill `data` object.
pub type FieldValues = BTreeMap<String, TextField>;

/// Build the autofill field map for one platform.
pub fn format_payload(
    content_type: ContentType,
    platform: Platform,
    customer: &CustomerProfile,
    brand: &BrandProfile,
    content: &GeneratedContent,
) -> Result<FieldValues, CoreError> {
    let handle = customer.handle_for(platform);
    let mut fields = FieldValues::new();

    match (content_type, content) {
        (ContentType::Quiz, GeneratedContent::Quiz(quiz)) => {
            let option = |i: usize| quiz.options.get(i).cloned().unwrap_or_default();
            fields.insert(
                "greeting".into(),
                TextField::text(format!("Hey {}!", customer.first_name)),
            );
            fields.insert("handle".into(), TextField::text(handle));
            fields.insert(
                "preference".into(),
                TextField::text(customer.first_preference()),
            );
            fields.insert("reward".into(), TextField::text(&quiz.reward));
            fields.insert("question".into(), TextField::text(&quiz.question));
            fields.insert("option_one".into(), TextField::text(option(0)));
            fields.insert("option_two".into(), TextField::text(option(1)));
            fields.insert("option_three".into(), TextField::text(option(2)));
        }
        (ContentType::Myth, GeneratedContent::Myth(myth)) => {
            let brand = brand_name(customer, brand);
            fields.insert("myth_one".into(), TextField::text(&myth.myth_one));
            fields.insert("myth_two".into(), TextField::text(&myth.myth_two));
            fields.insert("fact_one".into(), TextField::text(&myth.fact_one));
            fields.insert("fact_two".into(), TextField::text(&myth.fact_two));
            fields.insert("deal".into(), TextField::text(&myth.deal));
            fields.insert("brand_name".into(), TextField::text(brand));
            fields.insert("handle".into(), TextField::text(handle));
        }
        (ContentType::Quiz | ContentType::Myth, other) => {
            return Err(CoreError::Validation(format!(
                "Generated {} content cannot fill a {} template",
                other.content_type(),
                content_type
            )));
        }
        (unsupported, _) => return Err(unsupported_content_type(unsupported.as_str())),
    }

    Ok(fields)
}
