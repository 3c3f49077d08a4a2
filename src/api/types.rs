use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Opaque article identity assigned by the remote service.
///
/// The service currently emits serial integers, but the id is treated as a
/// token: both JSON numbers and strings are accepted and compared as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArticleId(String);

impl ArticleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ArticleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => ArticleId(n.to_string()),
            RawId::Text(s) => ArticleId(s),
        })
    }
}

/// Numeric ids go back to the server as JSON numbers so they match the
/// column type they came from. Anything that would not survive the trip
/// unchanged ("007", "+5") is sent as a string.
impl Serialize for ArticleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.parse::<i64>() {
            Ok(n) if n.to_string() == self.0 => serializer.serialize_i64(n),
            _ => serializer.serialize_str(&self.0),
        }
    }
}

/// A news article as returned by `/api/news` and `/api/recommendations`.
///
/// Immutable once received. Extra columns the server sends are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl Article {
    pub fn description_or_default(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or("No description available.")
    }

    pub fn source_or_default(&self) -> &str {
        self.source
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("N/A")
    }

    /// Publication date formatted for display.
    ///
    /// Accepts RFC 2822 (what Flask's `jsonify` emits for datetimes), RFC 3339
    /// and plain `YYYY-MM-DD HH:MM:SS`. Anything else is shown verbatim.
    pub fn published_label(&self) -> String {
        let Some(raw) = self.published_at.as_deref().map(str::trim) else {
            return "Unknown".to_string();
        };
        if raw.is_empty() {
            return "Unknown".to_string();
        }

        let parsed = DateTime::parse_from_rfc2822(raw)
            .or_else(|_| DateTime::parse_from_rfc3339(raw))
            .map(|dt| dt.naive_utc())
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"));

        match parsed {
            Ok(dt) => dt.format("%b %-d, %Y").to_string(),
            Err(_) => raw.to_string(),
        }
    }
}

/// Body of `GET /api/is_logged_in`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionStatus {
    pub logged_in: bool,
    #[serde(default)]
    pub username: Option<String>,
}

/// Body of the login, register and logout endpoints.
///
/// The service reports success with `message` and failure with `error`,
/// independently of the HTTP status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthReply {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}
