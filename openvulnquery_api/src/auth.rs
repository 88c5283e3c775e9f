//! OAuth2 client-credentials exchange.

use serde::Deserialize;

use crate::Error;

/// Client application id and secret as issued by the API provider.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: &str, client_secret: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

/// Token endpoint response.
#[derive(Deserialize, Clone, Debug)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds. Tokens are not refreshed.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Exchanges client credentials for a bearer token.
pub(crate) async fn request_token(
    http: &reqwest::Client,
    token_url: &str,
    credentials: &Credentials,
) -> Result<Token, Error> {
    let form = [
        ("grant_type", "client_credentials"),
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.as_str()),
    ];
    let resp = http
        .post(token_url)
        .header("accept", "application/json")
        .form(&form)
        .send()
        .await
        .map_err(|e| {
            tracing::error!("Failed to reach token endpoint: {}", e);
            Error::RequestFailed
        })?;

    let status = resp.status();
    let body = resp.text().await.map_err(|e| {
        tracing::error!("Failed to read token response: {}", e);
        Error::RequestFailed
    })?;

    if !status.is_success() {
        tracing::error!("Token request rejected with status {}", status);
        return Err(Error::Auth {
            status: status.as_u16(),
            body: crate::client::truncate_body(&body),
        });
    }

    let token = serde_json::from_str::<Token>(&body).map_err(|e| {
        tracing::error!("Failed to parse token response: {}", e);
        Error::MalformedResponse(format!("token response: {}", e))
    })?;
    tracing::info!(
        "Obtained {} token for client {}",
        token.token_type.as_deref().unwrap_or("bearer"),
        credentials.client_id
    );
    Ok(token)
}
