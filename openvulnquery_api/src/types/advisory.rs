//! Advisory records returned by the openVuln API.
//!
//! The API is loose about field presence: depending on the advisory, fields
//! may be missing, `null`, a bare string instead of a list, or a number
//! instead of a string. Missing text becomes `"NA"` and missing lists become
//! empty so every advisory carries the same columns.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{types::AdvisoryFormat, Error};

/// Placeholder for text fields the API did not populate.
pub const NOT_AVAILABLE: &str = "NA";

/// Fields shared by every advisory representation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct AdvisoryCommon {
    /// Vendor advisory identifier, e.g. `cisco-sa-20180328-smi2`.
    #[serde(default = "not_available", deserialize_with = "na_string")]
    pub advisory_id: String,

    /// Security Impact Rating: Critical, High, Medium, Low or Informational.
    #[serde(default = "not_available", deserialize_with = "na_string")]
    pub sir: String,

    #[serde(default = "not_available", deserialize_with = "na_string")]
    pub first_published: String,

    #[serde(default = "not_available", deserialize_with = "na_string")]
    pub last_updated: String,

    /// CVE identifiers covered by the advisory.
    #[serde(default, deserialize_with = "string_list")]
    pub cves: Vec<String>,

    /// Vendor bug tracker identifiers.
    #[serde(
        default,
        rename(deserialize = "bugIDs"),
        alias = "bugIds",
        deserialize_with = "string_list"
    )]
    pub bug_ids: Vec<String>,

    #[serde(default = "not_available", deserialize_with = "na_string")]
    pub cvss_base_score: String,

    #[serde(default = "not_available", deserialize_with = "na_string")]
    pub advisory_title: String,

    /// Human-readable advisory page.
    #[serde(default = "not_available", deserialize_with = "na_string")]
    pub publication_url: String,

    #[serde(default, deserialize_with = "string_list")]
    pub cwe: Vec<String>,

    #[serde(default, deserialize_with = "string_list")]
    pub product_names: Vec<String>,

    #[serde(default = "not_available", deserialize_with = "na_string")]
    pub summary: String,
}

/// Advisory requested in CVRF format.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct CvrfAdvisory {
    #[serde(flatten)]
    pub common: AdvisoryCommon,

    /// Link to the CVRF XML document.
    #[serde(default = "not_available", deserialize_with = "na_string")]
    pub cvrf_url: String,
}

/// Advisory requested in OVAL format.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct OvalAdvisory {
    #[serde(flatten)]
    pub common: AdvisoryCommon,

    /// Link to the OVAL definition.
    #[serde(default = "not_available", deserialize_with = "na_string")]
    pub oval_url: String,
}

/// Advisory returned by the IOS / IOS XE software checker.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct IosAdvisory {
    #[serde(flatten)]
    pub common: AdvisoryCommon,

    /// Releases the query matched against.
    #[serde(default, deserialize_with = "string_list")]
    pub ios_release: Vec<String>,

    /// First releases containing the fix.
    #[serde(default, deserialize_with = "string_list")]
    pub first_fixed: Vec<String>,
}

/// A single advisory, typed by the format it was requested in.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum Advisory {
    Cvrf(CvrfAdvisory),
    Oval(OvalAdvisory),
    Ios(IosAdvisory),
}

impl Advisory {
    /// Builds an advisory of the given format from one raw JSON entry.
    pub fn from_json(entry: Value, format: AdvisoryFormat) -> Result<Advisory, Error> {
        let advisory = match format {
            AdvisoryFormat::Cvrf => serde_json::from_value(entry).map(Advisory::Cvrf),
            AdvisoryFormat::Oval => serde_json::from_value(entry).map(Advisory::Oval),
            AdvisoryFormat::Ios => serde_json::from_value(entry).map(Advisory::Ios),
        };
        advisory.map_err(|e| {
            tracing::error!("Failed to build {} advisory: {}", format, e);
            Error::MalformedResponse(format!("invalid {} advisory: {}", format, e))
        })
    }

    /// The format this advisory was built for.
    pub fn format(&self) -> AdvisoryFormat {
        match self {
            Advisory::Cvrf(_) => AdvisoryFormat::Cvrf,
            Advisory::Oval(_) => AdvisoryFormat::Oval,
            Advisory::Ios(_) => AdvisoryFormat::Ios,
        }
    }

    pub fn common(&self) -> &AdvisoryCommon {
        match self {
            Advisory::Cvrf(adv) => &adv.common,
            Advisory::Oval(adv) => &adv.common,
            Advisory::Ios(adv) => &adv.common,
        }
    }

    pub fn advisory_id(&self) -> &str {
        &self.common().advisory_id
    }
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

fn na_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => not_available(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let to_text = |v: Value| match v {
        Value::String(s) => s,
        other => other.to_string(),
    };
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .into_iter()
            .filter(|v| !v.is_null())
            .map(to_text)
            .collect(),
        Some(single) => vec![to_text(single)],
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Value {
        json!({
            "advisoryId": "cisco-sa-20180328-smi2",
            "advisoryTitle": "Cisco IOS Smart Install RCE",
            "bugIDs": ["CSCvg76186"],
            "cves": ["CVE-2018-0171"],
            "cvssBaseScore": "9.8",
            "cwe": ["CWE-20"],
            "firstPublished": "2018-03-28T16:00:00-0500",
            "lastUpdated": "2018-04-05T14:36:00-0500",
            "productNames": ["Cisco IOS 15.2(5)E"],
            "publicationUrl": "https://tools.cisco.com/security/center/content/CiscoSecurityAdvisory/cisco-sa-20180328-smi2",
            "sir": "Critical",
            "summary": "A vulnerability in the Smart Install feature...",
            "cvrfUrl": "https://tools.cisco.com/security/center/contentxml/CiscoSecurityAdvisory/cisco-sa-20180328-smi2/cvrf/cisco-sa-20180328-smi2_cvrf.xml",
            "ovalUrl": "https://tools.cisco.com/security/center/contentxml/CiscoSecurityAdvisory/cisco-sa-20180328-smi2/oval/cisco-sa-20180328-smi2_oval.xml",
            "iosRelease": ["15.2(5)E"],
            "firstFixed": ["15.2(6)E1"]
        })
    }

    #[test]
    fn cvrf_keeps_cvrf_url() {
        let adv = Advisory::from_json(sample(), AdvisoryFormat::Cvrf).unwrap();
        assert_eq!(adv.format(), AdvisoryFormat::Cvrf);
        assert_eq!(adv.advisory_id(), "cisco-sa-20180328-smi2");
        match adv {
            Advisory::Cvrf(cvrf) => {
                assert!(cvrf.cvrf_url.ends_with("_cvrf.xml"));
                assert_eq!(cvrf.common.bug_ids, vec!["CSCvg76186"]);
                assert_eq!(cvrf.common.cvss_base_score, "9.8");
            }
            _ => panic!("expected cvrf advisory"),
        }
    }

    #[test]
    fn ios_keeps_release_fields() {
        let adv = Advisory::from_json(sample(), AdvisoryFormat::Ios).unwrap();
        match adv {
            Advisory::Ios(ios) => {
                assert_eq!(ios.ios_release, vec!["15.2(5)E"]);
                assert_eq!(ios.first_fixed, vec!["15.2(6)E1"]);
            }
            _ => panic!("expected ios advisory"),
        }
    }

    #[test]
    fn missing_fields_default_to_na() {
        let adv = Advisory::from_json(json!({"advisoryId": "x"}), AdvisoryFormat::Oval).unwrap();
        let common = adv.common();
        assert_eq!(common.sir, NOT_AVAILABLE);
        assert_eq!(common.summary, NOT_AVAILABLE);
        assert!(common.cves.is_empty());
        match adv {
            Advisory::Oval(oval) => assert_eq!(oval.oval_url, NOT_AVAILABLE),
            _ => panic!("expected oval advisory"),
        }
    }

    #[test]
    fn loose_values_are_normalized() {
        let adv = Advisory::from_json(
            json!({
                "advisoryId": "x",
                "cvssBaseScore": 7.5,
                "summary": null,
                "cves": "CVE-2020-0001",
                "cwe": null
            }),
            AdvisoryFormat::Cvrf,
        )
        .unwrap();
        let common = adv.common();
        assert_eq!(common.cvss_base_score, "7.5");
        assert_eq!(common.summary, NOT_AVAILABLE);
        assert_eq!(common.cves, vec!["CVE-2020-0001"]);
        assert!(common.cwe.is_empty());
    }

    #[test]
    fn non_object_entry_is_malformed() {
        let err = Advisory::from_json(json!("nope"), AdvisoryFormat::Cvrf).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn serializes_flat_snake_case() {
        let adv = Advisory::from_json(sample(), AdvisoryFormat::Oval).unwrap();
        let value = serde_json::to_value(&adv).unwrap();
        assert_eq!(value["advisory_id"], "cisco-sa-20180328-smi2");
        assert!(value["oval_url"].is_string());
        assert!(value.get("cvrf_url").is_none());
        assert!(value.get("common").is_none());
    }
}
