//! Campaign generation request rules.
//!
//! Decides which platforms a customer's campaign covers and which content
//! type each platform receives, before any external call is made.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::payload::CustomerProfile;
use crate::platform::{ContentType, Platform};

/// Maximum campaign title length.
pub const MAX_TITLE_LEN: usize = 200;

/// Validated parameters shared by single and bulk generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRequest {
    pub title: String,
    pub content_types: Vec<ContentType>,
    /// Requested platforms; empty means every platform.
    pub platforms: Vec<Platform>,
}

impl CampaignRequest {
    /// Parse and validate raw request values.
    pub fn parse(
        title: &str,
        content_types: &[String],
        platforms: &[String],
    ) -> Result<Self, CoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CoreError::Validation("Campaign title is required".into()));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(CoreError::Validation(format!(
                "Campaign title must be at most {MAX_TITLE_LEN} characters"
            )));
        }
        if content_types.is_empty() {
            return Err(CoreError::Validation(
                "At least one content type is required".into(),
            ));
        }

        let content_types = content_types
            .iter()
            .map(|raw| raw.parse::<ContentType>()?.require_supported())
            .collect::<Result<Vec<_>, _>>()?;
        let platforms = platforms
            .iter()
            .map(|raw| raw.parse::<Platform>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            title: title.to_string(),
            content_types,
            platforms,
        })
    }

    fn requested(&self, platform: Platform) -> bool {
        self.platforms.is_empty() || self.platforms.contains(&platform)
    }

    /// Platforms to attempt for `customer`, in generation order.
    ///
    /// Email is always attempted. A social platform is attempted when it was
    /// requested and the customer has a handle for it; otherwise it is
    /// skipped without being recorded.
    pub fn plan_platforms(&self, customer: &CustomerProfile) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|p| !p.is_social() || (self.requested(*p) && customer.supports(*p)))
            .collect()
    }

    /// Pair each attempted platform with its content type.
    ///
    /// Content types rotate across platforms: the i-th attempted platform
    /// gets `content_types[i % len]`.
    pub fn assignments(&self, customer: &CustomerProfile) -> Vec<(Platform, ContentType)> {
        self.plan_platforms(customer)
            .into_iter()
            .enumerate()
            .map(|(i, p)| (p, self.content_types[i % self.content_types.len()]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn email_only() -> CustomerProfile {
        CustomerProfile {
            first_name: "Lisa".into(),
            last_name: "Simpson".into(),
            email: "lisa@springfield.test".into(),
            ..Default::default()
        }
    }

    #[test]
    fn parse_rejects_unsupported_type() {
        let err = CampaignRequest::parse("Fall", &strings(&["quiz", "fact"]), &[]).unwrap_err();
        assert!(err.to_string().contains("Unsupported content type: fact"));
    }

    #[test]
    fn parse_rejects_empty_title_and_types() {
        assert!(CampaignRequest::parse("  ", &strings(&["quiz"]), &[]).is_err());
        assert!(CampaignRequest::parse("Fall", &[], &[]).is_err());
    }

    #[test]
    fn parse_rejects_unknown_platform() {
        assert!(CampaignRequest::parse("Fall", &strings(&["quiz"]), &strings(&["fax"])).is_err());
    }

    #[test]
    fn email_only_customer_gets_email_only() {
        let request = CampaignRequest::parse("Fall", &strings(&["quiz"]), &[]).unwrap();
        assert_eq!(request.plan_platforms(&email_only()), vec![Platform::Email]);
    }

    #[test]
    fn handles_gate_social_platforms() {
        let mut c = email_only();
        c.instagram_handle = Some("@sprinkle".into());
        let request = CampaignRequest::parse("Fall", &strings(&["quiz"]), &[]).unwrap();
        assert_eq!(
            request.plan_platforms(&c),
            vec![Platform::Email, Platform::Instagram]
        );
    }

    #[test]
    fn requested_platforms_filter_socials_but_keep_email() {
        let mut c = email_only();
        c.instagram_handle = Some("@a".into());
        c.tiktok_handle = Some("@b".into());
        let request =
            CampaignRequest::parse("Fall", &strings(&["quiz"]), &strings(&["tiktok"])).unwrap();
        assert_eq!(request.plan_platforms(&c), vec![Platform::Email, Platform::Tiktok]);
    }

    #[test]
    fn content_types_rotate() {
        let mut c = email_only();
        c.instagram_handle = Some("@a".into());
        c.twitter_handle = Some("@b".into());
        let request = CampaignRequest::parse("Fall", &strings(&["quiz", "myth"]), &[]).unwrap();
        assert_eq!(
            request.assignments(&c),
            vec![
                (Platform::Email, ContentType::Quiz),
                (Platform::Instagram, ContentType::Myth),
                (Platform::Twitter, ContentType::Quiz),
            ]
        );
    }
}
