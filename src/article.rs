use anyhow::{Context, Result};
use chrono::DateTime;
use serde::Serialize;

use crate::collectors::NewsItem;
use crate::sanitize::sanitize;

const PUB_DATE_FORMAT: &str = "%d %b %Y %H:%M:%S %z";
// Minutes are not part of the stored key; seconds sit in their place.
const STORED_FORMAT: &str = "%Y_%m_%d_%H:%S";

/// One sanitized article. The whole triple is its identity and the dedup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Article {
    pub published: String,
    pub title: String,
    pub description: String,
}

impl Article {
    pub fn new(published: &str, title: &str, description: &str) -> Self {
        Self {
            published: published.to_string(),
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    pub fn from_item(item: &NewsItem) -> Result<Self> {
        Ok(Self {
            published: format_pub_date(&item.pub_date)?,
            title: sanitize(&item.title),
            description: sanitize(&item.description),
        })
    }
}

/// Reformats an RFC-822 style `pubDate` ("Mon, 01 Jan 2024 10:30:45 +0900")
/// into the stored `YYYY_MM_DD_HH:SS` form.
pub fn format_pub_date(pub_date: &str) -> Result<String> {
    let rest = pub_date
        .split(", ")
        .nth(1)
        .with_context(|| format!("pubDate has no day-name prefix: {:?}", pub_date))?;
    let parsed = DateTime::parse_from_str(rest, PUB_DATE_FORMAT)
        .with_context(|| format!("Failed to parse pubDate {:?}", pub_date))?;
    Ok(parsed.format(STORED_FORMAT).to_string())
}
