// This module contains the shape of the traffic records served by the data endpoint.

use std::borrow::Cow;

use serde::{de::Error as _, Deserialize, Deserializer};
use serde_json::Value;

/// The fields requested from the API, in the order they are written to file.
pub const FIELDS: [&str; 15] = [
    "timestamp",
    "ip",
    "userAgent",
    "platformOrigin",
    "campaignName",
    "source",
    "url",
    "device",
    "detection",
    "threatGroup",
    "term",
    "platform",
    "medium",
    "content",
    "gtmEvents",
];

/// Column titles, positionally matching [`FIELDS`].
pub const HEADER_TITLES: [&str; 15] = [
    "Timestamp",
    "IP",
    "User Agent",
    "Platform Origin",
    "Campaign Name",
    "Source",
    "URL",
    "Device",
    "Detection",
    "Threat Group",
    "Term",
    "Platform",
    "Medium",
    "Content",
    "GTM Events",
];

/// Fields a record is expected to carry. Records lacking them are kept but flagged.
pub const EXPECTED_FIELDS: [&str; 2] = ["timestamp", "ip"];

/// The body returned by the data endpoint for a single page.
#[derive(Debug, Deserialize)]
pub struct PageData {
    pub data: Vec<Record>,
}

/// GTM events usually arrive as a list and are written as a single comma joined string.
/// Scalar values are kept in their textual form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GtmEvents {
    List(Vec<String>),
    Joined(String),
}

/// A single traffic record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub ip: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub user_agent: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub platform_origin: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub campaign_name: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub device: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub detection: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub threat_group: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub term: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub platform: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub medium: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "gtm_events_from_json")]
    pub gtm_events: Option<GtmEvents>,
}

impl Record {
    /// Looks up a value by its API field name. Unknown names and absent values yield `None`.
    pub fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        let scalar = match name {
            "timestamp" => &self.timestamp,
            "ip" => &self.ip,
            "userAgent" => &self.user_agent,
            "platformOrigin" => &self.platform_origin,
            "campaignName" => &self.campaign_name,
            "source" => &self.source,
            "url" => &self.url,
            "device" => &self.device,
            "detection" => &self.detection,
            "threatGroup" => &self.threat_group,
            "term" => &self.term,
            "platform" => &self.platform,
            "medium" => &self.medium,
            "content" => &self.content,
            "gtmEvents" => {
                return self.gtm_events.as_ref().map(|events| match events {
                    GtmEvents::List(list) => Cow::Owned(list.join(",")),
                    GtmEvents::Joined(joined) => Cow::Borrowed(joined.as_str()),
                })
            }
            _ => return None,
        };
        scalar.as_deref().map(Cow::Borrowed)
    }

    /// The expected fields this record lacks.
    pub fn missing_expected_fields(&self) -> Vec<&'static str> {
        EXPECTED_FIELDS
            .iter()
            .copied()
            .filter(|name| self.field(name).map_or(true, |value| value.is_empty()))
            .collect()
    }
}

// The textual form of a scalar. Null has none; arrays and objects are not scalars.
fn scalar_text(value: Value) -> std::result::Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text)),
        Value::Number(number) => Ok(Some(number.to_string())),
        Value::Bool(flag) => Ok(Some(flag.to_string())),
        other => Err(format!("expected a scalar value, found {}", other)),
    }
}

// Accepts strings, numbers and booleans, keeping their textual form.
fn scalar_as_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) => scalar_text(value).map_err(D::Error::custom),
    }
}

// Lists keep their elements as text, null elements becoming empty; scalars are taken as joined.
fn gtm_events_from_json<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<GtmEvents>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| scalar_text(item).map(Option::unwrap_or_default))
            .collect::<std::result::Result<Vec<String>, String>>()
            .map(|events| Some(GtmEvents::List(events)))
            .map_err(D::Error::custom),
        Some(value) => scalar_text(value)
            .map(|text| text.map(GtmEvents::Joined))
            .map_err(D::Error::custom),
    }
}
