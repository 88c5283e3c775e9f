//! Query topics and the fixed topic → path builder table.

use std::str::FromStr;

use crate::{types::AdvisoryFormat, Error};

use super::{ApiRequest, Filter, Query};

/// Uniform signature shared by every topic's path builder: normalized format,
/// the topic's primary argument, and the (possibly empty) filter.
pub type PathBuilder = fn(AdvisoryFormat, &str, &Filter) -> ApiRequest;

/// High-level query category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topic {
    All,
    Cve,
    Advisory,
    Severity,
    Year,
    Latest,
    Product,
    IosXe,
    Ios,
}

impl Topic {
    pub const VARIANTS: [Topic; 9] = [
        Topic::All,
        Topic::Cve,
        Topic::Advisory,
        Topic::Severity,
        Topic::Year,
        Topic::Latest,
        Topic::Product,
        Topic::IosXe,
        Topic::Ios,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::All => "all",
            Topic::Cve => "cve",
            Topic::Advisory => "advisory",
            Topic::Severity => "severity",
            Topic::Year => "year",
            Topic::Latest => "latest",
            Topic::Product => "product",
            Topic::IosXe => "ios_xe",
            Topic::Ios => "ios",
        }
    }

    /// Looks up the path builder for this topic.
    pub fn builder(&self) -> PathBuilder {
        match self {
            Topic::All => all_path,
            Topic::Cve => cve_path,
            Topic::Advisory => advisory_path,
            Topic::Severity => severity_path,
            Topic::Year => year_path,
            Topic::Latest => latest_path,
            Topic::Product => product_path,
            Topic::IosXe => ios_xe_path,
            Topic::Ios => ios_path,
        }
    }

    /// Builds the request for this topic.
    pub fn request(&self, format: AdvisoryFormat, aspect: &str, filter: &Filter) -> ApiRequest {
        (self.builder())(format, aspect, filter)
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Topic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::VARIANTS
            .iter()
            .find(|topic| topic.as_str() == s)
            .copied()
            .ok_or_else(|| Error::UnsupportedTopic(s.to_string()))
    }
}

fn all_path(format: AdvisoryFormat, all: &str, filter: &Filter) -> ApiRequest {
    ApiRequest::new(format!("{}/{}/{}", format, all, filter.path()), format)
        .with_params(filter.params())
}

fn cve_path(format: AdvisoryFormat, cve: &str, _filter: &Filter) -> ApiRequest {
    ApiRequest::new(format!("{}/cve/{}", format, cve), format)
}

fn advisory_path(format: AdvisoryFormat, advisory_id: &str, _filter: &Filter) -> ApiRequest {
    ApiRequest::new(format!("{}/advisory/{}", format, advisory_id), format).single()
}

fn severity_path(format: AdvisoryFormat, severity: &str, filter: &Filter) -> ApiRequest {
    ApiRequest::new(
        format!("{}/severity/{}/{}", format, severity, filter.path()),
        format,
    )
    .with_params(filter.params())
}

fn year_path(format: AdvisoryFormat, year: &str, _filter: &Filter) -> ApiRequest {
    ApiRequest::new(format!("{}/year/{}", format, year), format)
}

fn latest_path(format: AdvisoryFormat, latest: &str, _filter: &Filter) -> ApiRequest {
    ApiRequest::new(format!("{}/latest/{}", format, latest), format)
}

fn product_path(format: AdvisoryFormat, product: &str, _filter: &Filter) -> ApiRequest {
    ApiRequest::new(format!("{}/product", format), format).with_param("product", product)
}

// The software checker endpoints have no format prefix and always answer in
// the platform representation.
fn ios_xe_path(_format: AdvisoryFormat, version: &str, _filter: &Filter) -> ApiRequest {
    ApiRequest::new("iosxe".to_string(), AdvisoryFormat::default()).with_param("version", version)
}

fn ios_path(_format: AdvisoryFormat, version: &str, _filter: &Filter) -> ApiRequest {
    ApiRequest::new("ios".to_string(), AdvisoryFormat::default()).with_param("version", version)
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;
    use crate::query::ResponseShape;

    #[test]
    fn every_topic_round_trips_its_name() {
        for topic in Topic::VARIANTS {
            assert_eq!(topic.as_str().parse::<Topic>().unwrap(), topic);
        }
    }

    #[test]
    fn unknown_topic_names_the_topic() {
        let err = "bogus".parse::<Topic>().unwrap_err();
        assert!(matches!(&err, Error::UnsupportedTopic(t) if t == "bogus"));
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn topic_names_are_case_sensitive() {
        assert!("CVE".parse::<Topic>().is_err());
        assert!("iosxe".parse::<Topic>().is_err());
    }

    #[test]
    fn cve_path_has_no_params() {
        let req = Topic::Cve.request(AdvisoryFormat::Cvrf, "CVE-2015-1234", &Filter::Empty);
        assert_eq!(req.path, "cvrf/cve/CVE-2015-1234");
        assert!(req.params.is_empty());
        assert_eq!(req.shape, ResponseShape::List);
    }

    #[test]
    fn cve_ignores_filter() {
        let filter = Filter::first_published("2020-01-01", "2020-02-01");
        let req = Topic::Cve.request(AdvisoryFormat::Oval, "CVE-2015-1234", &filter);
        assert_eq!(req.path, "oval/cve/CVE-2015-1234");
        assert!(req.params.is_empty());
    }

    #[test]
    fn severity_without_filter_keeps_trailing_slash() {
        let req = Topic::Severity.request(AdvisoryFormat::Oval, "high", &Filter::Empty);
        assert_eq!(req.path, "oval/severity/high/");
        assert!(req.params.is_empty());
    }

    #[test]
    fn severity_with_temporal_filter() {
        let filter = Filter::last_published("2016-01-01", "2016-06-30");
        let req = Topic::Severity.request(AdvisoryFormat::Cvrf, "critical", &filter);
        assert_eq!(req.path, "cvrf/severity/critical/lastpublished");
        assert_eq!(req.params, filter.params());
    }

    #[test]
    fn all_uses_marker_and_filter() {
        let filter = Filter::first_published("2020-01-01", "2020-02-01");
        let req = Topic::All.request(AdvisoryFormat::Cvrf, "all", &filter);
        assert_eq!(req.path, "cvrf/all/firstpublished");
        assert_eq!(req.params.len(), 2);
    }

    #[test]
    fn advisory_is_single() {
        let req = Topic::Advisory.request(AdvisoryFormat::Cvrf, "cisco-sa-1", &Filter::Empty);
        assert_eq!(req.path, "cvrf/advisory/cisco-sa-1");
        assert_eq!(req.shape, ResponseShape::Single);
    }

    #[test]
    fn year_and_latest_paths() {
        let req = Topic::Year.request(AdvisoryFormat::Oval, "2016", &Filter::Empty);
        assert_eq!(req.path, "oval/year/2016");
        let req = Topic::Latest.request(AdvisoryFormat::Cvrf, "10", &Filter::Empty);
        assert_eq!(req.path, "cvrf/latest/10");
    }

    #[test]
    fn product_is_a_query_param() {
        let req = Topic::Product.request(AdvisoryFormat::Cvrf, "Cisco", &Filter::Empty);
        assert_eq!(req.path, "cvrf/product");
        assert_eq!(req.params, vec![("product".to_string(), "Cisco".to_string())]);
    }

    #[test]
    fn software_checker_forces_ios_format() {
        let req = Topic::Ios.request(AdvisoryFormat::Cvrf, "15.1(4)M2", &Filter::Empty);
        assert_eq!(req.path, "ios");
        assert_eq!(req.format, AdvisoryFormat::Ios);
        assert_eq!(req.params, vec![("version".to_string(), "15.1(4)M2".to_string())]);

        let req = Topic::IosXe.request(AdvisoryFormat::Oval, "3.16.1aS", &Filter::Empty);
        assert_eq!(req.path, "iosxe");
        assert_eq!(req.format, AdvisoryFormat::Ios);
    }

    fn url_for(topic: Topic, format: AdvisoryFormat, aspect: &str, filter: &Filter) -> String {
        let req = topic.request(format, aspect, filter);
        let url = Url::parse(&format!("https://example.com/{}", req.path)).unwrap();
        req.add_to_url(&url).to_string()
    }

    #[test]
    fn test_topic_urls() {
        insta::assert_yaml_snapshot!(
            "all_first_published",
            url_for(Topic::All, AdvisoryFormat::Cvrf, "all", &Filter::first_published("2020-01-01", "2020-02-01"))
        );
        insta::assert_yaml_snapshot!(
            "all_last_published",
            url_for(Topic::All, AdvisoryFormat::Oval, "all", &Filter::last_published("2020-01-01", "2020-02-01"))
        );
        insta::assert_yaml_snapshot!(
            "cve",
            url_for(Topic::Cve, AdvisoryFormat::Cvrf, "CVE-2015-1234", &Filter::Empty)
        );
        insta::assert_yaml_snapshot!(
            "advisory",
            url_for(Topic::Advisory, AdvisoryFormat::Oval, "cisco-sa-20180328-smi2", &Filter::Empty)
        );
        insta::assert_yaml_snapshot!(
            "severity",
            url_for(Topic::Severity, AdvisoryFormat::Oval, "high", &Filter::Empty)
        );
        insta::assert_yaml_snapshot!(
            "severity_last_published",
            url_for(Topic::Severity, AdvisoryFormat::Cvrf, "critical", &Filter::last_published("2016-01-01", "2016-03-31"))
        );
        insta::assert_yaml_snapshot!(
            "year",
            url_for(Topic::Year, AdvisoryFormat::Cvrf, "2016", &Filter::Empty)
        );
        insta::assert_yaml_snapshot!(
            "latest",
            url_for(Topic::Latest, AdvisoryFormat::Oval, "10", &Filter::Empty)
        );
        insta::assert_yaml_snapshot!(
            "product",
            url_for(Topic::Product, AdvisoryFormat::Cvrf, "Cisco IOS XE", &Filter::Empty)
        );
        insta::assert_yaml_snapshot!(
            "ios",
            url_for(Topic::Ios, AdvisoryFormat::Cvrf, "15.1(4)M2", &Filter::Empty)
        );
        insta::assert_yaml_snapshot!(
            "ios_xe",
            url_for(Topic::IosXe, AdvisoryFormat::Oval, "3.16.1aS", &Filter::Empty)
        );
        insta::assert_yaml_snapshot!(
            "misspelled_format",
            url_for(Topic::Cve, AdvisoryFormat::ensure("cvfr"), "CVE-2015-1234", &Filter::Empty)
        );
    }
}
