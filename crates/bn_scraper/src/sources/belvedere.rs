use async_trait::async_trait;
use bn_core::{Article, ChannelMetadata, Result};
use tracing::info;
use url::Url;

use crate::extract::Extractor;
use crate::fetch::Fetcher;
use crate::sources::NewsSource;

/// The City of Belvedere news listing.
pub struct BelvedereSource {
    fetcher: Fetcher,
}

impl BelvedereSource {
    const BASE_URL: &'static str = "https://www.cityofbelvedere.org";
    const NEWS_URL: &'static str = "https://www.cityofbelvedere.org/news";

    pub fn new() -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new()?,
        })
    }
}

#[async_trait]
impl NewsSource for BelvedereSource {
    fn name(&self) -> &str {
        "City of Belvedere"
    }

    fn news_url(&self) -> &str {
        Self::NEWS_URL
    }

    fn channel(&self) -> ChannelMetadata {
        ChannelMetadata {
            title: "City of Belvedere News".to_string(),
            link: Self::NEWS_URL.to_string(),
            description: "Official news and updates from the City of Belvedere, California"
                .to_string(),
            language: "en-us".to_string(),
            managing_editor: Some("clerk@cityofbelvedere.org (City of Belvedere)".to_string()),
            web_master: Some("clerk@cityofbelvedere.org (City of Belvedere)".to_string()),
            self_link: Some(format!("{}/rss.xml", Self::BASE_URL)),
        }
    }

    async fn fetch_articles(&self) -> Result<Vec<Article>> {
        info!("Fetching news page from {}", Self::NEWS_URL);
        let html = self.fetcher.fetch_page(Self::NEWS_URL).await?;
        let base = Url::parse(Self::BASE_URL)?;
        let extractor = Extractor::new(base, self.name());
        Ok(extractor.extract(&html))
    }
}
