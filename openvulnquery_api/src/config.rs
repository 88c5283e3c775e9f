//! Endpoint defaults and per-client configuration.

/// Base URL of the openVuln advisories API.
pub const API_URL: &str = "https://api.cisco.com/security/advisories";

/// OAuth2 token endpoint used for the client-credentials exchange.
pub const REQUEST_TOKEN_URL: &str = "https://cloudsso.cisco.com/as/token.oauth2";

/// User agent sent when the caller does not name its application.
pub const DEFAULT_USER_AGENT: &str = "TestApp";

/// Endpoints and identification used by a [`Client`](crate::Client).
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL every request path is appended to.
    pub api_url: String,
    /// Token endpoint for the client-credentials exchange.
    pub token_url: String,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: API_URL.to_string(),
            token_url: REQUEST_TOKEN_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_token_url(mut self, token_url: &str) -> Self {
        self.token_url = token_url.to_string();
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_production() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url, API_URL);
        assert_eq!(config.token_url, REQUEST_TOKEN_URL);
        assert_eq!(config.user_agent, "TestApp");
    }

    #[test]
    fn api_url_trailing_slash_is_dropped() {
        let config = ClientConfig::default().with_api_url("http://localhost:8080/");
        assert_eq!(config.api_url, "http://localhost:8080");
    }
}
