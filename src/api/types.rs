use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ApiError;

/// Envelope wrapping every backend response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub next_cursor: Option<String>,
}

fn default_success() -> bool {
    true
}

impl<T> ApiResponse<T> {
    /// Unwraps the payload, turning `success: false` into an error.
    pub fn into_data(self) -> Result<Option<T>, ApiError> {
        if !self.success {
            return Err(ApiError::Rejected(
                self.message.unwrap_or_else(|| "request rejected".to_string()),
            ));
        }
        Ok(self.data)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

/// Durations arrive as plain seconds, `m:ss` clock text, or ISO-8601 (`PT1M5S`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawDuration {
    Seconds(f64),
    Text(String),
}

impl RawDuration {
    pub fn to_duration(&self) -> Option<Duration> {
        match self {
            RawDuration::Seconds(secs) => seconds(*secs),
            RawDuration::Text(text) => parse_duration_text(text),
        }
    }
}

fn seconds(secs: f64) -> Option<Duration> {
    (secs.is_finite() && (0.0..1e9).contains(&secs)).then(|| Duration::from_secs_f64(secs))
}

fn parse_duration_text(text: &str) -> Option<Duration> {
    let text = text.trim();
    if let Some(rest) = text.strip_prefix("PT").or_else(|| text.strip_prefix("pt")) {
        return parse_iso8601_time(rest);
    }
    if text.contains(':') {
        let parts: Vec<&str> = text.split(':').collect();
        if parts.len() > 3 {
            return None;
        }
        let mut total: u64 = 0;
        for part in parts {
            let value: u64 = part.trim().parse().ok()?;
            total = total.checked_mul(60)?.checked_add(value)?;
        }
        return Some(Duration::from_secs(total));
    }
    seconds(text.parse().ok()?)
}

fn parse_iso8601_time(rest: &str) -> Option<Duration> {
    let mut total = 0.0;
    let mut number = String::new();
    for c in rest.chars() {
        match c {
            '0'..='9' | '.' => number.push(c),
            'H' | 'M' | 'S' | 'h' | 'm' | 's' => {
                let value: f64 = number.parse().ok()?;
                number.clear();
                total += value
                    * match c.to_ascii_uppercase() {
                        'H' => 3600.0,
                        'M' => 60.0,
                        _ => 1.0,
                    };
            }
            _ => return None,
        }
    }
    if !number.is_empty() {
        return None;
    }
    seconds(total)
}

/// A short as the backend serializes it. Both field spellings used by the
/// backend over time are accepted.
///
/// Optional fields are read leniently: a value of the wrong JSON type
/// becomes `None` rather than failing the item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortItem {
    pub id: Option<RawId>,
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub thumbnail: Option<String>,
    #[serde(alias = "videoUrl")]
    pub youtube_url: Option<String>,
    pub published_at: Option<String>,
    #[serde(alias = "views", default, deserialize_with = "lenient_count")]
    pub view_count: Option<u64>,
    #[serde(alias = "likes", default, deserialize_with = "lenient_count")]
    pub like_count: Option<u64>,
    pub duration: Option<RawDuration>,
    #[serde(alias = "tags", default, deserialize_with = "lenient_tags")]
    pub hashtags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub channel_name: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

/// Counts come as numbers or, from YouTube-sourced rows, as digit strings
/// (`"1520"`, `"1,520"`).
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64)),
        serde_json::Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    })
}

fn lenient_tags<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(values) => Some(
            values
                .into_iter()
                .filter_map(|v| match v {
                    serde_json::Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        serde_json::Value::String(s) => Some(s.split_whitespace().map(str::to_string).collect()),
        _ => None,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: Option<String>,
    pub media_url: String,
    pub published_at: DateTime<Utc>,
    pub view_count: u64,
    pub like_count: u64,
    pub duration_secs: u64,
    pub tags: Vec<String>,
    pub channel_name: Option<String>,
}

impl VideoItem {
    /// Converts a wire item, returning `None` when a required field
    /// (id, title, media URL, duration, publish time) is missing or unusable.
    pub fn from_short(short: ShortItem) -> Option<Self> {
        let id = short.id?.into_string();
        if id.trim().is_empty() {
            return None;
        }
        let media_url = short.youtube_url.filter(|u| !u.trim().is_empty())?;
        let duration = short.duration.as_ref().and_then(RawDuration::to_duration)?;
        let published_at = DateTime::parse_from_rfc3339(short.published_at?.trim())
            .ok()?
            .with_timezone(&Utc);

        Some(VideoItem {
            id,
            title: decode(&short.title?),
            description: short.description.map(|d| decode(&d)).unwrap_or_default(),
            thumbnail: short.thumbnail.filter(|t| !t.is_empty()),
            media_url,
            published_at,
            view_count: short.view_count.unwrap_or(0),
            like_count: short.like_count.unwrap_or(0),
            duration_secs: duration.as_secs(),
            tags: short
                .hashtags
                .unwrap_or_default()
                .into_iter()
                .map(|t| t.trim().trim_start_matches('#').to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            channel_name: short.channel_name.filter(|c| !c.is_empty()),
        })
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }
}

fn decode(text: &str) -> String {
    html_escape::decode_html_entities(text).trim().to_string()
}

/// One page of the feed. An absent cursor means the source is exhausted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<VideoItem>,
    pub next_cursor: Option<String>,
}

impl Page {
    /// Builds a page from a raw list response. Items are decoded one at a
    /// time so a single malformed entry never fails the whole page.
    pub fn from_response(response: ApiResponse<Vec<serde_json::Value>>) -> Result<Self, ApiError> {
        let next_cursor = response.next_cursor.clone().filter(|c| !c.is_empty());
        let raw = response.into_data()?.unwrap_or_default();
        let total = raw.len();

        let items: Vec<VideoItem> = raw
            .into_iter()
            .filter_map(|value| serde_json::from_value::<ShortItem>(value).ok())
            .filter_map(VideoItem::from_short)
            .collect();

        if items.len() < total {
            tracing::warn!(
                dropped = total - items.len(),
                total,
                "dropped incomplete shorts from page"
            );
        }

        Ok(Page { items, next_cursor })
    }
}
