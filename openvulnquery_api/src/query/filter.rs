//! Optional path and query refinements for list-style queries.

use super::Query;

/// Query-string key for the start of a publication date range.
pub const START_DATE: &str = "startDate";
/// Query-string key for the end of a publication date range.
pub const END_DATE: &str = "endDate";

/// Which publication timestamp a [`TemporalFilter`] restricts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublicationAspect {
    FirstPublished,
    LastPublished,
}

impl PublicationAspect {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationAspect::FirstPublished => "firstpublished",
            PublicationAspect::LastPublished => "lastpublished",
        }
    }
}

impl std::fmt::Display for PublicationAspect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Publication date range filter. Dates are `YYYY-MM-DD` strings passed through
/// to the API as given; a missing bound is simply not sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemporalFilter {
    pub aspect: PublicationAspect,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl TemporalFilter {
    pub fn new(aspect: PublicationAspect, start_date: Option<&str>, end_date: Option<&str>) -> Self {
        Self {
            aspect,
            start_date: start_date.map(str::to_string),
            end_date: end_date.map(str::to_string),
        }
    }
}

impl Query for TemporalFilter {
    fn params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(start) = &self.start_date {
            params.push((START_DATE.to_string(), start.clone()));
        }
        if let Some(end) = &self.end_date {
            params.push((END_DATE.to_string(), end.clone()));
        }
        params
    }
}

/// Refinement applied to `all` and `severity` queries: a path suffix plus
/// query parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Filter {
    /// No refinement: empty path suffix, no parameters.
    #[default]
    Empty,
    /// Arbitrary path suffix and parameters.
    Plain {
        path: String,
        params: Vec<(String, String)>,
    },
    /// Publication date range.
    Temporal(TemporalFilter),
}

impl Filter {
    pub fn plain(path: &str, params: &[(&str, &str)]) -> Self {
        Filter::Plain {
            path: path.to_string(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Advisories first published between `start` and `end`.
    pub fn first_published(start: &str, end: &str) -> Self {
        Filter::Temporal(TemporalFilter::new(
            PublicationAspect::FirstPublished,
            Some(start),
            Some(end),
        ))
    }

    /// Advisories last updated between `start` and `end`.
    pub fn last_published(start: &str, end: &str) -> Self {
        Filter::Temporal(TemporalFilter::new(
            PublicationAspect::LastPublished,
            Some(start),
            Some(end),
        ))
    }

    /// Path suffix appended after the topic segments.
    pub fn path(&self) -> &str {
        match self {
            Filter::Empty => "",
            Filter::Plain { path, .. } => path,
            Filter::Temporal(temporal) => temporal.aspect.as_str(),
        }
    }
}

impl Query for Filter {
    fn params(&self) -> Vec<(String, String)> {
        match self {
            Filter::Empty => Vec::new(),
            Filter::Plain { params, .. } => params.clone(),
            Filter::Temporal(temporal) => temporal.params(),
        }
    }
}
