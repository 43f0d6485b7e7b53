use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One extracted news entry. `link` is absolute and doubles as the
/// deduplication key and the RSS guid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub summary: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub source: String,
}

/// Static feed-level fields. Not derived from the page; each source
/// supplies these as constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelMetadata {
    pub title: String,
    pub link: String,
    pub description: String,
    pub language: String,
    pub managing_editor: Option<String>,
    pub web_master: Option<String>,
    /// atom:link rel="self" target, when the feed has a published URL.
    pub self_link: Option<String>,
}
