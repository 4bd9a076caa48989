//! REST client for the design API.
//!
//! Wraps autofill job creation and status lookups, plus the OAuth token
//! endpoint, using [`reqwest`].

use serde::Serialize;

use crate::config::CanvaConfig;
use crate::types::{AutofillJob, AutofillResponse, CreateAutofillRequest, TokenResponse};

/// Errors from the design-API layer.
#[derive(Debug, thiserror::Error)]
pub enum CanvaApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.) or the body
    /// could not be decoded.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("Canva API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The token endpoint returned an `expires_in` that cannot be a lifetime.
    #[error("Canva token lifetime is invalid: {0} seconds")]
    InvalidTokenLifetime(i64),

    /// A configured endpoint is not a valid URL.
    #[error("Invalid Canva URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// HTTP client for the design API, shared across users.
///
/// Every call takes the bearer token explicitly; token caching lives with
/// the caller.
#[derive(Clone)]
pub struct CanvaApi {
    client: reqwest::Client,
    config: CanvaConfig,
}

impl CanvaApi {
    pub fn new(config: CanvaConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    // ---- autofill ----

    /// Start an autofill job filling `brand_template_id` with `data`.
    ///
    /// Sends `POST /autofills`. The returned job is normally still
    /// `in_progress`.
    pub async fn create_autofill<D: Serialize>(
        &self,
        access_token: &str,
        brand_template_id: &str,
        title: &str,
        data: &D,
    ) -> Result<AutofillJob, CanvaApiError> {
        let body = CreateAutofillRequest {
            brand_template_id,
            title,
            data,
        };

        let response = self
            .client
            .post(format!("{}/autofills", self.config.api_base_url))
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await?;

        let parsed: AutofillResponse = Self::parse_response(response).await?;
        Ok(parsed.job)
    }

    /// Fetch the current state of an autofill job via `GET /autofills/{id}`.
    pub async fn get_autofill(
        &self,
        access_token: &str,
        job_id: &str,
    ) -> Result<AutofillJob, CanvaApiError> {
        let response = self
            .client
            .get(format!("{}/autofills/{}", self.config.api_base_url, job_id))
            .bearer_auth(access_token)
            .send()
            .await?;

        let parsed: AutofillResponse = Self::parse_response(response).await?;
        Ok(parsed.job)
    }

    // ---- oauth ----

    /// Browser URL that starts the PKCE authorization flow.
    pub fn authorize_url(
        &self,
        state: &str,
        code_challenge: &str,
    ) -> Result<String, CanvaApiError> {
        let url = url::Url::parse_with_params(
            &self.config.authorize_url,
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", self.config.scopes.as_str()),
                ("state", state),
                ("code_challenge", code_challenge),
                ("code_challenge_method", "S256"),
            ],
        )?;
        Ok(url.into())
    }

    /// Exchange an authorization code (plus its PKCE verifier) for tokens.
    pub async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<TokenResponse, CanvaApiError> {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("code_verifier", code_verifier),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ])
        .await
    }

    /// Trade a refresh token for a new token pair.
    pub async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenResponse, CanvaApiError> {
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    // ---- private helpers ----

    /// Form POST to the token endpoint authenticated with client credentials.
    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenResponse, CanvaApiError> {
        let response = self
            .client
            .post(self.config.token_url())
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(form)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Ensure the response has a success status code, otherwise return an
    /// [`CanvaApiError::ApiError`] with the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, CanvaApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(status = status.as_u16(), "Canva API returned an error status");
            return Err(CanvaApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, CanvaApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CanvaConfig {
        CanvaConfig {
            client_id: "client-1".into(),
            client_secret: "secret".into(),
            redirect_uri: "http://localhost:3001/canva/callback".into(),
            api_base_url: "https://api.canva.test/rest/v1".into(),
            authorize_url: "https://www.canva.test/api/oauth/authorize".into(),
            scopes: "design:content:write".into(),
        }
    }

    #[test]
    fn authorize_url_carries_pkce_parameters() {
        let api = CanvaApi::new(config());
        let raw = api.authorize_url("state-xyz", "challenge-abc").unwrap();
        let url = url::Url::parse(&raw).unwrap();
        let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("www.canva.test"));
        assert_eq!(params["response_type"], "code");
        assert_eq!(params["client_id"], "client-1");
        assert_eq!(params["state"], "state-xyz");
        assert_eq!(params["code_challenge"], "challenge-abc");
        assert_eq!(params["code_challenge_method"], "S256");
        assert_eq!(params["redirect_uri"], "http://localhost:3001/canva/callback");
    }

    #[test]
    fn invalid_authorize_url_is_reported() {
        let mut cfg = config();
        cfg.authorize_url = "not a url".into();
        let err = CanvaApi::new(cfg).authorize_url("s", "c").unwrap_err();
        assert_matches::assert_matches!(err, CanvaApiError::InvalidUrl(_));
    }

    #[test]
    fn token_url_derives_from_base() {
        assert_eq!(config().token_url(), "https://api.canva.test/rest/v1/oauth/token");
    }

    #[test]
    fn autofill_request_serializes_expected_shape() {
        let mut data = std::collections::BTreeMap::new();
        data.insert("handle", serde_json::json!({ "type": "text", "text": "@sprinkle" }));
        let body = CreateAutofillRequest {
            brand_template_id: "T1",
            title: "Instagram Design",
            data: &data,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["brand_template_id"], "T1");
        assert_eq!(json["data"]["handle"]["text"], "@sprinkle");
    }
}
