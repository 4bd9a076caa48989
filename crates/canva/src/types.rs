//! Wire types for the autofill and OAuth endpoints.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Autofill
// ---------------------------------------------------------------------------

/// Body of `POST /autofills`.
#[derive(Debug, Serialize)]
pub struct CreateAutofillRequest<'a, D: Serialize> {
    pub brand_template_id: &'a str,
    pub title: &'a str,
    pub data: &'a D,
}

/// Envelope shared by `POST /autofills` and `GET /autofills/{id}`.
#[derive(Debug, Deserialize)]
pub struct AutofillResponse {
    pub job: AutofillJob,
}

/// An autofill job as reported by the design API.
#[derive(Debug, Clone, Deserialize)]
pub struct AutofillJob {
    #[serde(default)]
    pub id: String,
    /// `in_progress`, `success` or `failed`.
    pub status: String,
    pub result: Option<AutofillResult>,
    pub error: Option<AutofillError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AutofillResult {
    pub design: Option<ResultDesign>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResultDesign {
    pub id: Option<String>,
    pub url: Option<String>,
    pub thumbnail: Option<Thumbnail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thumbnail {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AutofillError {
    pub code: Option<String>,
    pub message: Option<String>,
}

/// Interpretation of an [`AutofillJob`] for status tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Still rendering; check again later.
    Pending,
    /// Finished with every result field present.
    Succeeded {
        design_id: String,
        edit_url: String,
        thumbnail_url: String,
    },
    /// Finished unsuccessfully, or finished without usable results.
    Failed { message: String },
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).cloned()
}

impl AutofillJob {
    pub fn outcome(&self) -> JobOutcome {
        match self.status.as_str() {
            "success" => {
                let design = self.result.as_ref().and_then(|r| r.design.as_ref());
                let design_id = design.and_then(|d| non_empty(d.id.as_ref()));
                let edit_url = design.and_then(|d| non_empty(d.url.as_ref()));
                let thumbnail_url = design
                    .and_then(|d| d.thumbnail.as_ref())
                    .and_then(|t| non_empty(t.url.as_ref()));

                match (design_id, edit_url, thumbnail_url) {
                    (Some(design_id), Some(edit_url), Some(thumbnail_url)) => {
                        JobOutcome::Succeeded {
                            design_id,
                            edit_url,
                            thumbnail_url,
                        }
                    }
                    (design_id, edit_url, _) => {
                        let missing = if design_id.is_none() {
                            "design id"
                        } else if edit_url.is_none() {
                            "edit URL"
                        } else {
                            "thumbnail URL"
                        };
                        JobOutcome::Failed {
                            message: format!("Autofill job succeeded without a {missing}"),
                        }
                    }
                }
            }
            "failed" => JobOutcome::Failed {
                message: self
                    .error
                    .as_ref()
                    .and_then(|e| {
                        non_empty(e.message.as_ref()).or_else(|| non_empty(e.code.as_ref()))
                    })
                    .unwrap_or_else(|| "Autofill job failed".to_string()),
            },
            _ => JobOutcome::Pending,
        }
    }
}

/// Derive the public view link from an edit link.
pub fn view_url_from_edit(edit_url: &str) -> String {
    edit_url.replace("/edit", "/view")
}

// ---------------------------------------------------------------------------
// OAuth
// ---------------------------------------------------------------------------

/// Successful response from the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime of `access_token` in seconds.
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}
