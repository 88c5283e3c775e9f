//! Error types for the API client.

/// Errors that can occur when authenticating or making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An HTTP request failed (network error, timeout, or unreadable response).
    #[error("Request failed")]
    RequestFailed,
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    /// The token endpoint refused the client credentials.
    #[error("Authorization failed with status {status}: {body}")]
    Auth { status: u16, body: String },
    /// The requested query topic has no handler.
    #[error("REST API topic ({0}) not supported")]
    UnsupportedTopic(String),
    /// The response was valid JSON but not in the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn http_status_display_includes_body() {
        let err = Error::HttpStatus {
            status: 406,
            body: "Invalid IOS version 99".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Request failed with status 406: Invalid IOS version 99"
        );
    }

    #[test]
    fn auth_display_includes_body() {
        let err = Error::Auth {
            status: 401,
            body: "invalid_client".to_string(),
        };
        assert!(err.to_string().contains("invalid_client"));
    }
}
