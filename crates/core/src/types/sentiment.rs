//! Review sentiment codes.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned for sentiment codes or names that are not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SentimentError {
    #[error("unknown sentiment code: {0}")]
    UnknownCode(i64),
    #[error("unknown sentiment: {0}")]
    UnknownName(String),
}

/// Tone of a review as classified by the marketplace.
///
/// Serialized as the integer code used by the API: `1`, `0` or `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Every sentiment, in tab order.
    pub const ALL: [Self; 3] = [Self::Positive, Self::Neutral, Self::Negative];

    /// The API's integer code.
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::Positive => 1,
            Self::Neutral => 0,
            Self::Negative => -1,
        }
    }

    /// Lowercase name, as used in query strings.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }

    /// Capitalized name for tab labels.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
        }
    }
}

impl TryFrom<i64> for Sentiment {
    type Error = SentimentError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Positive),
            0 => Ok(Self::Neutral),
            -1 => Ok(Self::Negative),
            other => Err(SentimentError::UnknownCode(other)),
        }
    }
}

impl From<Sentiment> for i64 {
    fn from(sentiment: Sentiment) -> Self {
        sentiment.code()
    }
}

impl FromStr for Sentiment {
    type Err = SentimentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sentiment| s.trim().eq_ignore_ascii_case(sentiment.as_str()))
            .ok_or_else(|| SentimentError::UnknownName(s.to_owned()))
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The review tab a visitor has selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SentimentTab {
    #[default]
    All,
    Only(Sentiment),
}

impl SentimentTab {
    /// Read a tab from a query-string value; anything unrecognised is "all".
    #[must_use]
    pub fn parse_lenient(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse::<Sentiment>().ok())
            .map_or(Self::All, Self::Only)
    }

    /// Whether a review with this sentiment is shown under the tab.
    #[must_use]
    pub fn matches(&self, sentiment: Sentiment) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == sentiment,
        }
    }

    /// Lowercase name, as used in query strings.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(sentiment) => sentiment.as_str(),
        }
    }

    /// Capitalized name for tab labels.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(sentiment) => sentiment.label(),
        }
    }

    /// Every tab, "all" first.
    #[must_use]
    pub fn tabs() -> [Self; 4] {
        [
            Self::All,
            Self::Only(Sentiment::Positive),
            Self::Only(Sentiment::Neutral),
            Self::Only(Sentiment::Negative),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_roundtrip_through_json() {
        for sentiment in Sentiment::ALL {
            let json = serde_json::to_string(&sentiment).unwrap();
            assert_eq!(json, sentiment.code().to_string());
            assert_eq!(serde_json::from_str::<Sentiment>(&json).unwrap(), sentiment);
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert_eq!(Sentiment::try_from(2), Err(SentimentError::UnknownCode(2)));
        assert!(serde_json::from_str::<Sentiment>("5").is_err());
    }

    #[test]
    fn test_tab_parse() {
        assert_eq!(SentimentTab::parse_lenient(None), SentimentTab::All);
        assert_eq!(SentimentTab::parse_lenient(Some("all")), SentimentTab::All);
        assert_eq!(
            SentimentTab::parse_lenient(Some("Negative")),
            SentimentTab::Only(Sentiment::Negative)
        );
        assert_eq!(SentimentTab::parse_lenient(Some("bogus")), SentimentTab::All);
    }
}
