//! HTTP client for the openVuln advisories API.

use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::{
    auth::{request_token, Credentials},
    config::ClientConfig,
    query::{ApiRequest, Filter, Query, ResponseShape, Topic},
    types::{Advisory, AdvisoryFormat},
    Error,
};

/// Request timeout for token and advisory calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Key holding the advisory list in every list-style response.
const ADVISORIES_KEY: &str = "advisories";

/// HTTP client for the openVuln advisories API.
///
/// Authenticates once when constructed and sends the bearer token with every
/// request afterwards. The token is never refreshed, so long-lived clients
/// eventually see `401` responses and should be rebuilt.
pub struct Client {
    client: reqwest::Client,
    /// Base URL for the API, without a trailing slash.
    base_api_url: String,
    auth_header: String,
}

impl Client {
    /// Authenticates against the production token endpoint and API.
    pub async fn new(client_id: &str, client_secret: &str) -> Result<Self, Error> {
        Self::connect(
            &Credentials::new(client_id, client_secret),
            &ClientConfig::default(),
        )
        .await
    }

    /// Exchanges the credentials for a token at `config.token_url` and returns
    /// a client for `config.api_url`.
    pub async fn connect(credentials: &Credentials, config: &ClientConfig) -> Result<Self, Error> {
        let client = build_http_client(&config.user_agent)?;
        let token = request_token(&client, &config.token_url, credentials).await?;
        Ok(Self {
            client,
            base_api_url: config.api_url.trim_end_matches('/').to_string(),
            auth_header: format!("Bearer {}", token.access_token),
        })
    }

    /// Creates a client from an already issued token. Used for testing with wiremock.
    pub fn with_token(base_url: &str, token: &str, user_agent: &str) -> Result<Self, Error> {
        Ok(Self {
            client: build_http_client(user_agent)?,
            base_api_url: base_url.trim_end_matches('/').to_string(),
            auth_header: format!("Bearer {}", token),
        })
    }

    /// Resolves a topic name and format token into a request without sending it.
    pub fn build_request(
        &self,
        topic: &str,
        format: &str,
        aspect: &str,
        filter: &Filter,
    ) -> Result<ApiRequest, Error> {
        let topic: Topic = topic.parse()?;
        Ok(topic.request(AdvisoryFormat::ensure(format), aspect, filter))
    }

    /// Dispatches a query by topic name: `all`, `cve`, `advisory`, `severity`,
    /// `year`, `latest`, `product`, `ios_xe` or `ios`.
    ///
    /// `aspect` is the topic's primary argument (CVE id, severity, version, ...).
    /// Unknown topics fail with [`Error::UnsupportedTopic`].
    pub async fn get_by(
        &self,
        topic: &str,
        format: &str,
        aspect: &str,
        filter: &Filter,
    ) -> Result<Vec<Advisory>, Error> {
        let request = self.build_request(topic, format, aspect, filter)?;
        self.execute(&request).await
    }

    /// Fetches all advisories, narrowed by the filter's path and parameters.
    pub async fn get_by_all(
        &self,
        format: AdvisoryFormat,
        all: &str,
        filter: &Filter,
    ) -> Result<Vec<Advisory>, Error> {
        self.execute(&Topic::All.request(format, all, filter)).await
    }

    /// Fetches the advisories covering a CVE id.
    pub async fn get_by_cve(&self, format: AdvisoryFormat, cve: &str) -> Result<Vec<Advisory>, Error> {
        self.execute(&Topic::Cve.request(format, cve, &Filter::Empty))
            .await
    }

    /// Fetches one advisory by id. Always returns exactly one advisory.
    pub async fn get_by_advisory(
        &self,
        format: AdvisoryFormat,
        advisory_id: &str,
    ) -> Result<Vec<Advisory>, Error> {
        self.execute(&Topic::Advisory.request(format, advisory_id, &Filter::Empty))
            .await
    }

    /// Fetches advisories by security impact rating.
    pub async fn get_by_severity(
        &self,
        format: AdvisoryFormat,
        severity: &str,
        filter: &Filter,
    ) -> Result<Vec<Advisory>, Error> {
        self.execute(&Topic::Severity.request(format, severity, filter))
            .await
    }

    /// Fetches advisories published in a year.
    pub async fn get_by_year(&self, format: AdvisoryFormat, year: &str) -> Result<Vec<Advisory>, Error> {
        self.execute(&Topic::Year.request(format, year, &Filter::Empty))
            .await
    }

    /// Fetches the `latest` most recently published advisories.
    pub async fn get_by_latest(
        &self,
        format: AdvisoryFormat,
        latest: &str,
    ) -> Result<Vec<Advisory>, Error> {
        self.execute(&Topic::Latest.request(format, latest, &Filter::Empty))
            .await
    }

    /// Fetches advisories mentioning a product name.
    pub async fn get_by_product(
        &self,
        format: AdvisoryFormat,
        product_name: &str,
    ) -> Result<Vec<Advisory>, Error> {
        self.execute(&Topic::Product.request(format, product_name, &Filter::Empty))
            .await
    }

    /// Fetches advisories affecting an IOS XE release.
    pub async fn get_by_ios_xe(&self, version: &str) -> Result<Vec<Advisory>, Error> {
        self.execute(&Topic::IosXe.request(AdvisoryFormat::Ios, version, &Filter::Empty))
            .await
    }

    /// Fetches advisories affecting an IOS release.
    pub async fn get_by_ios(&self, version: &str) -> Result<Vec<Advisory>, Error> {
        self.execute(&Topic::Ios.request(AdvisoryFormat::Ios, version, &Filter::Empty))
            .await
    }

    /// Sends a built request and maps the response into advisories.
    pub async fn execute(&self, request: &ApiRequest) -> Result<Vec<Advisory>, Error> {
        let body = self.get_request(&request.path, request).await?;
        let entries = match request.shape {
            ResponseShape::List => advisory_entries(body)?,
            ResponseShape::Single => vec![single_entry(body)?],
        };
        Self::advisory_list(entries, request.format.as_str())
    }

    /// Converts raw advisory entries into advisories of the given format,
    /// preserving order. Unknown format tokens fall back to the default format.
    pub fn advisory_list(entries: Vec<Value>, format: &str) -> Result<Vec<Advisory>, Error> {
        let format = AdvisoryFormat::ensure(format);
        entries
            .into_iter()
            .map(|entry| Advisory::from_json(entry, format))
            .collect()
    }

    fn get_url(&self, path: &str, query: &impl Query) -> Result<Url, Error> {
        let url = Url::parse(format!("{}/{}", &self.base_api_url, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed
        })?;
        Ok(query.add_to_url(&url))
    }

    /// Sends an authenticated GET for `path` relative to the base URL and
    /// returns the parsed JSON body. Any non-success status is an error.
    pub async fn get_request(&self, path: &str, query: &impl Query) -> Result<Value, Error> {
        let url = self.get_url(path, query)?;
        tracing::debug!("Sending GET request {}", url);
        let resp = self
            .client
            .get(url)
            .header("authorization", &self.auth_header)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                Error::RequestFailed
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        serde_json::from_str::<Value>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::MalformedResponse(format!("invalid JSON: {}", e))
        })
    }
}

fn build_http_client(user_agent: &str) -> Result<reqwest::Client, Error> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| {
            tracing::error!("Failed to build HTTP client: {}", e);
            Error::RequestFailed
        })
}

fn advisory_entries(body: Value) -> Result<Vec<Value>, Error> {
    match body {
        Value::Object(mut map) => match map.remove(ADVISORIES_KEY) {
            Some(Value::Array(entries)) => Ok(entries),
            _ => Err(Error::MalformedResponse(format!(
                "missing '{}' list",
                ADVISORIES_KEY
            ))),
        },
        _ => Err(Error::MalformedResponse(
            "expected a JSON object".to_string(),
        )),
    }
}

/// Key every advisory entry carries; error payloads do not.
const ADVISORY_ID_KEY: &str = "advisoryId";

/// Reduces a single-advisory response to its one entry, whether the API sent
/// the advisory itself, a bare list, or an `advisories` list. The entry must
/// carry an advisory id.
fn single_entry(body: Value) -> Result<Value, Error> {
    let entry = match body {
        Value::Array(entries) => entries.into_iter().next(),
        Value::Object(mut map) => match map.remove(ADVISORIES_KEY) {
            Some(Value::Array(entries)) => entries.into_iter().next(),
            Some(other) => {
                return Err(Error::MalformedResponse(format!(
                    "'{}' is not a list: {}",
                    ADVISORIES_KEY, other
                )))
            }
            None => Some(Value::Object(map)),
        },
        _ => {
            return Err(Error::MalformedResponse(
                "expected a JSON object or list".to_string(),
            ))
        }
    };
    match entry {
        Some(entry) if entry.get(ADVISORY_ID_KEY).is_some() => Ok(entry),
        Some(entry) => {
            tracing::error!("Response is not an advisory: {}", entry);
            Err(Error::MalformedResponse(format!(
                "response has no '{}': {}",
                ADVISORY_ID_KEY, entry
            )))
        }
        None => Err(Error::MalformedResponse(
            "empty advisory response".to_string(),
        )),
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
