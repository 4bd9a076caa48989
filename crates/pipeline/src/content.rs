//! Marketing copy generation.
//!
//! Builds a prompt from the customer and brand, asks the text service for a
//! JSON object and parses it into [`GeneratedContent`]. Malformed output is
//! an error for that call; nothing is retried.

use std::sync::Arc;

use donut_core::payload::{
    brand_name, BrandProfile, CustomerProfile, GeneratedContent, MythContent, QuizContent,
};
use donut_core::platform::{unsupported_content_type, ContentType};

use crate::error::PipelineError;
use crate::ports::TextGenerator;

const SYSTEM_PROMPT: &str = "You write short, upbeat marketing copy for a local donut shop. \
    Always answer with a single JSON object and nothing else.";

pub struct ContentGenerator {
    text: Arc<dyn TextGenerator>,
}

impl ContentGenerator {
    pub fn new(text: Arc<dyn TextGenerator>) -> Self {
        Self { text }
    }

    pub async fn generate(
        &self,
        content_type: ContentType,
        customer: &CustomerProfile,
        brand: &BrandProfile,
    ) -> Result<GeneratedContent, PipelineError> {
        let prompt = match content_type {
            ContentType::Quiz => quiz_prompt(customer, brand),
            ContentType::Myth => myth_prompt(customer, brand),
            other => return Err(unsupported_content_type(other.as_str()).into()),
        };

        let value = self.text.generate_json(SYSTEM_PROMPT, &prompt).await?;
        parse_content(content_type, value)
    }
}

/// Parse the model's JSON object for `content_type`.
pub fn parse_content(
    content_type: ContentType,
    value: serde_json::Value,
) -> Result<GeneratedContent, PipelineError> {
    let malformed = |e: serde_json::Error| {
        PipelineError::MalformedContent(format!("{content_type} content: {e}"))
    };

    match content_type {
        ContentType::Quiz => {
            let quiz: QuizContent = serde_json::from_value(value).map_err(malformed)?;
            quiz.validate()
                .map_err(|e| PipelineError::MalformedContent(e.to_string()))?;
            Ok(GeneratedContent::Quiz(quiz))
        }
        ContentType::Myth => {
            let myth: MythContent = serde_json::from_value(value).map_err(malformed)?;
            Ok(GeneratedContent::Myth(myth))
        }
        other => Err(unsupported_content_type(other.as_str()).into()),
    }
}

fn brand_context(customer: &CustomerProfile, brand: &BrandProfile) -> String {
    let name = brand_name(customer, brand);
    let products = if brand.products.is_empty() {
        "donuts and coffee".to_string()
    } else {
        brand.products.join(", ")
    };
    format!(
        "Brand: {name}\nAbout the brand: {}\nProducts: {products}",
        brand.description
    )
}

fn preferences(customer: &CustomerProfile) -> String {
    if customer.preferences.is_empty() {
        "no stated favourites".to_string()
    } else {
        customer.preferences.join(", ")
    }
}

fn quiz_prompt(customer: &CustomerProfile, brand: &BrandProfile) -> String {
    format!(
        "{}\nCustomer first name: {}\nCustomer favourites: {}\n\n\
         Write a fun multiple-choice donut trivia quiz for this customer. \
         Respond with JSON of the form \
         {{\"question\": string, \"options\": [string, string, string], \
         \"correctAnswer\": string, \"explanation\": string, \"reward\": string}}. \
         There must be exactly three options and correctAnswer must be one of them. \
         The reward is a short in-store offer for answering correctly.",
        brand_context(customer, brand),
        customer.first_name,
        preferences(customer)
    )
}

fn myth_prompt(customer: &CustomerProfile, brand: &BrandProfile) -> String {
    format!(
        "{}\nCustomer first name: {}\nCustomer favourites: {}\n\n\
         Write a myth-busting post about donuts for this customer. \
         Respond with JSON of the form \
         {{\"mythOne\": string, \"mythTwo\": string, \"factOne\": string, \
         \"factTwo\": string, \"deal\": string}}. \
         factOne debunks mythOne, factTwo debunks mythTwo, and deal is a short \
         in-store offer.",
        brand_context(customer, brand),
        customer.first_name,
        preferences(customer)
    )
}
