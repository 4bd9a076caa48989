//! Design-API client configuration loaded from environment variables.

/// OAuth client credentials and endpoints for the design API.
#[derive(Debug, Clone)]
pub struct CanvaConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// REST base, e.g. `https://api.canva.com/rest/v1`. No trailing slash.
    pub api_base_url: String,
    /// Browser-facing authorization page.
    pub authorize_url: String,
    /// Space separated OAuth scopes requested on connect.
    pub scopes: String,
}

/// Scopes needed to read brand templates and create designs from them.
pub const DEFAULT_SCOPES: &str = "design:content:read design:content:write design:meta:read \
    brandtemplate:content:read brandtemplate:meta:read";

impl CanvaConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env var               | Default                                     |
    /// |-----------------------|---------------------------------------------|
    /// | `CANVA_CLIENT_ID`     | **required**                                |
    /// | `CANVA_CLIENT_SECRET` | **required**                                |
    /// | `CANVA_REDIRECT_URI`  | `http://localhost:3001/canva/callback`      |
    /// | `CANVA_API_BASE_URL`  | `https://api.canva.com/rest/v1`             |
    /// | `CANVA_AUTHORIZE_URL` | `https://www.canva.com/api/oauth/authorize` |
    /// | `CANVA_SCOPES`        | [`DEFAULT_SCOPES`]                          |
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing. Missing OAuth credentials
    /// should stop the server from starting.
    pub fn from_env() -> Self {
        let client_id = std::env::var("CANVA_CLIENT_ID")
            .expect("CANVA_CLIENT_ID must be set in the environment");
        let client_secret = std::env::var("CANVA_CLIENT_SECRET")
            .expect("CANVA_CLIENT_SECRET must be set in the environment");

        let redirect_uri = std::env::var("CANVA_REDIRECT_URI")
            .unwrap_or_else(|_| "http://localhost:3001/canva/callback".into());
        let api_base_url = std::env::var("CANVA_API_BASE_URL")
            .unwrap_or_else(|_| "https://api.canva.com/rest/v1".into())
            .trim_end_matches('/')
            .to_string();
        let authorize_url = std::env::var("CANVA_AUTHORIZE_URL")
            .unwrap_or_else(|_| "https://www.canva.com/api/oauth/authorize".into());
        let scopes = std::env::var("CANVA_SCOPES").unwrap_or_else(|_| DEFAULT_SCOPES.into());

        Self {
            client_id,
            client_secret,
            redirect_uri,
            api_base_url,
            authorize_url,
            scopes,
        }
    }

    /// OAuth token endpoint, derived from the REST base.
    pub fn token_url(&self) -> String {
        format!("{}/oauth/token", self.api_base_url)
    }
}
