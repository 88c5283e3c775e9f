//! Shared query infrastructure: the [`Query`] trait and the built [`ApiRequest`].

use url::Url;

use crate::types::AdvisoryFormat;

/// Anything that contributes query-string parameters to a request URL.
pub trait Query {
    /// Query parameters in the order they are sent.
    fn params(&self) -> Vec<(String, String)>;

    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        let params = self.params();
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params.iter() {
                pairs.append_pair(key, value);
            }
        }
        url
    }
}

/// How the advisories are laid out in a response body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseShape {
    /// An `advisories` list.
    List,
    /// A single advisory, which callers always receive as a one-element list.
    Single,
}

/// A fully resolved request: relative path, query parameters, and how to map
/// the response into advisories.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    /// Path relative to the API base URL, without a leading slash.
    pub path: String,
    pub params: Vec<(String, String)>,
    /// Format used to build advisories from the response.
    pub format: AdvisoryFormat,
    pub shape: ResponseShape,
}

impl ApiRequest {
    /// A list request with no query parameters.
    pub fn new(path: String, format: AdvisoryFormat) -> Self {
        Self {
            path,
            params: Vec::new(),
            format,
            shape: ResponseShape::List,
        }
    }

    pub fn with_params(mut self, params: Vec<(String, String)>) -> Self {
        self.params = params;
        self
    }

    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    pub fn single(mut self) -> Self {
        self.shape = ResponseShape::Single;
        self
    }
}

impl Query for ApiRequest {
    fn params(&self) -> Vec<(String, String)> {
        self.params.clone()
    }
}

impl Query for Vec<(String, String)> {
    fn params(&self) -> Vec<(String, String)> {
        self.clone()
    }
}
