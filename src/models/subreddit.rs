//! Subreddit profile model.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Public metadata of a subreddit, as shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubredditProfile {
    pub name: String,
    /// Normalized icon URL: query string stripped, empty when the
    /// subreddit has no absolute icon URL.
    pub icon: String,
    pub subscribers: SubscriberCount,
    pub description: String,
}

impl SubredditProfile {
    /// Placeholder profile used when the metadata fetch for a subreddit
    /// fails; the entry stays in the list so the output matches the input
    /// names one-to-one.
    pub fn unavailable(name: &str) -> Self {
        Self {
            name: name.to_string(),
            icon: String::new(),
            subscribers: SubscriberCount::Unknown,
            description: String::new(),
        }
    }
}

/// Subscriber count, or `Unknown` when the fetch failed. Serialized as a
/// plain number or the string `"Unknown"` to keep the stored document
/// shape stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriberCount {
    Known(u64),
    Unknown,
}

impl Serialize for SubscriberCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SubscriberCount::Known(count) => serializer.serialize_u64(*count),
            SubscriberCount::Unknown => serializer.serialize_str("Unknown"),
        }
    }
}

impl<'de> Deserialize<'de> for SubscriberCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::Number(n) => n
                .as_u64()
                .map(SubscriberCount::Known)
                .ok_or_else(|| D::Error::custom("subscriber count out of range")),
            serde_json::Value::String(_) | serde_json::Value::Null => {
                Ok(SubscriberCount::Unknown)
            }
            other => Err(D::Error::custom(format!(
                "invalid subscriber count: {other}"
            ))),
        }
    }
}
