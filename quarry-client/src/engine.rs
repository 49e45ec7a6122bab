//! Search engine variant detection.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Engine family and major version a client is connected to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchEngineVariant {
    /// Elasticsearch 7.x.
    #[serde(rename = "ES7", alias = "es7")]
    Es7,
    /// Elasticsearch 8.x and later.
    #[serde(rename = "ES8", alias = "es8")]
    Es8,
    /// OpenSearch 1.x.
    #[serde(rename = "OS1", alias = "os1")]
    Os1,
    /// OpenSearch 2.x and later.
    #[serde(rename = "OS2", alias = "os2")]
    Os2,
}

impl SearchEngineVariant {
    /// Every variant.
    pub const ALL: [SearchEngineVariant; 4] = [Self::Es7, Self::Es8, Self::Os1, Self::Os2];

    /// Short name, e.g. `ES8`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Es7 => "ES7",
            Self::Es8 => "ES8",
            Self::Os1 => "OS1",
            Self::Os2 => "OS2",
        }
    }

    /// Whether this is an Elasticsearch variant.
    pub fn is_elasticsearch(&self) -> bool {
        matches!(self, Self::Es7 | Self::Es8)
    }

    /// Work out the variant from the body of `GET /`.
    ///
    /// OpenSearch reports `version.distribution = "opensearch"`;
    /// Elasticsearch leaves it out. Elasticsearch releases before 7 are
    /// treated as 7.
    pub fn from_root_info(info: &Value) -> Option<Self> {
        let version = info.get("version")?;
        let major: u64 = version
            .get("number")?
            .as_str()?
            .split('.')
            .next()?
            .parse()
            .ok()?;
        let opensearch = version
            .get("distribution")
            .and_then(Value::as_str)
            .is_some_and(|d| d.eq_ignore_ascii_case("opensearch"));

        Some(match (opensearch, major) {
            (true, 0..=1) => Self::Os1,
            (true, _) => Self::Os2,
            (false, 0..=7) => Self::Es7,
            (false, _) => Self::Es8,
        })
    }
}

impl fmt::Display for SearchEngineVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchEngineVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown search engine variant: {s}"))
    }
}
