//! Advisory representation tokens.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Representation an advisory is requested in. Controls both the request path
/// prefix and which [`Advisory`](super::Advisory) variant is built from the response.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AdvisoryFormat {
    /// Common Vulnerability Reporting Framework documents.
    Cvrf,
    /// OVAL definitions.
    Oval,
    /// IOS / IOS XE software checker results. Also the catch-all.
    Ios,
}

impl AdvisoryFormat {
    /// Every known format, in token order. The last entry is the fallback.
    pub const VARIANTS: [AdvisoryFormat; 3] = [
        AdvisoryFormat::Cvrf,
        AdvisoryFormat::Oval,
        AdvisoryFormat::Ios,
    ];

    /// Maps any token onto a known format. Unrecognized tokens, including
    /// misspellings and other casings, become the last format in [`Self::VARIANTS`].
    pub fn ensure(token: &str) -> AdvisoryFormat {
        token.parse().unwrap_or(Self::VARIANTS[Self::VARIANTS.len() - 1])
    }

    /// The token used in request paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvisoryFormat::Cvrf => "cvrf",
            AdvisoryFormat::Oval => "oval",
            AdvisoryFormat::Ios => "ios",
        }
    }
}

impl Default for AdvisoryFormat {
    fn default() -> Self {
        Self::VARIANTS[Self::VARIANTS.len() - 1]
    }
}

impl std::fmt::Display for AdvisoryFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AdvisoryFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cvrf" => Ok(AdvisoryFormat::Cvrf),
            "oval" => Ok(AdvisoryFormat::Oval),
            "ios" => Ok(AdvisoryFormat::Ios),
            _ => Err(()),
        }
    }
}
