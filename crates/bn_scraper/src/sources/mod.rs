use async_trait::async_trait;
use bn_core::{Article, ChannelMetadata, Result};

pub mod belvedere;
pub use belvedere::BelvedereSource;

/// A scrapeable municipal news listing.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Display name of the news source.
    fn name(&self) -> &str;

    /// The listing page this source scrapes.
    fn news_url(&self) -> &str;

    /// Static feed-level metadata for the generated channel.
    fn channel(&self) -> ChannelMetadata;

    /// Fetches the listing page and extracts its articles.
    async fn fetch_articles(&self) -> Result<Vec<Article>>;
}
