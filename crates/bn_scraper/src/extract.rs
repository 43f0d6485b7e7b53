use std::collections::HashSet;

use bn_core::Article;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::dates;

/// Tunable extraction knobs. The target page's markup is not guaranteed
/// stable, so selector and pattern lists are data rather than code.
#[derive(Debug, Clone)]
pub struct Heuristics {
    /// First pass: semantic article containers.
    pub container_selectors: Vec<String>,
    /// Second pass: class-name conventions for news/post blocks.
    pub class_selectors: Vec<String>,
    /// Third pass: href substrings that mark individual article links.
    pub link_path_markers: Vec<String>,
    pub max_articles: usize,
    pub max_summary_len: usize,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            container_selectors: vec![
                "article".to_string(),
                r#"[role="article"]"#.to_string(),
            ],
            class_selectors: vec![
                ".post".to_string(),
                ".news-item".to_string(),
                ".entry".to_string(),
                r#"[class*="post"]"#.to_string(),
                r#"[class*="article"]"#.to_string(),
                r#"[class*="news"]"#.to_string(),
            ],
            link_path_markers: vec!["/news".to_string()],
            max_articles: 20,
            max_summary_len: 500,
        }
    }
}

type Strategy = for<'a> fn(&Extractor, &'a Html) -> Vec<ElementRef<'a>>;

/// The cascade runs in order and stops at the first pass that yields
/// at least one candidate element.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("semantic elements", Extractor::semantic_candidates),
    ("class heuristics", Extractor::class_candidates),
    ("link patterns", Extractor::link_candidates),
];

/// Turns a listing page into article records via the strategy cascade.
pub struct Extractor {
    base_url: Url,
    source: String,
    heuristics: Heuristics,
}

impl Extractor {
    pub fn new(base_url: Url, source: impl Into<String>) -> Self {
        Self {
            base_url,
            source: source.into(),
            heuristics: Heuristics::default(),
        }
    }

    pub fn with_heuristics(mut self, heuristics: Heuristics) -> Self {
        self.heuristics = heuristics;
        self
    }

    /// Extracts articles in discovery order, deduplicated by resolved
    /// absolute link (first occurrence wins). An empty result is valid:
    /// it means the page had no recognizable article structure.
    pub fn extract(&self, html: &str) -> Vec<Article> {
        let document = Html::parse_document(html);

        let mut candidates = Vec::new();
        for (name, strategy) in STRATEGIES {
            candidates = strategy(self, &document);
            if !candidates.is_empty() {
                debug!("{} matched {} candidate elements", name, candidates.len());
                break;
            }
        }

        let mut seen = HashSet::new();
        let mut articles = Vec::new();
        for element in candidates {
            if articles.len() >= self.heuristics.max_articles {
                break;
            }
            match self.article_from_element(element) {
                Some(article) => {
                    if seen.insert(article.link.clone()) {
                        articles.push(article);
                    } else {
                        debug!("dropping duplicate link {}", article.link);
                    }
                }
                // Malformed fragments are skipped, never fatal.
                None => debug!("skipping fragment without usable title or link"),
            }
        }
        articles
    }

    fn semantic_candidates<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        self.select_first_match(document, &self.heuristics.container_selectors)
    }

    fn class_candidates<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        self.select_first_match(document, &self.heuristics.class_selectors)
    }

    /// Anchors whose href looks like an individual article path. The
    /// candidate element is the anchor's parent when one wraps it, so
    /// summary and date extraction can see the surrounding text.
    fn link_candidates<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        let anchor = Selector::parse("a[href]").unwrap();
        let mut found = Vec::new();
        for element in document.select(&anchor) {
            let href = match element.value().attr("href") {
                Some(href) => href,
                None => continue,
            };
            if !self.looks_like_article_path(href) {
                continue;
            }
            if element.text().collect::<String>().trim().is_empty() {
                continue;
            }
            found.push(element.parent().and_then(ElementRef::wrap).unwrap_or(element));
        }
        found
    }

    /// Tries each selector in order and returns the matches of the first
    /// one that hits, mirroring the cascade at the selector level.
    fn select_first_match<'a>(
        &self,
        document: &'a Html,
        selectors: &[String],
    ) -> Vec<ElementRef<'a>> {
        for raw in selectors {
            match Selector::parse(raw) {
                Ok(selector) => {
                    let found: Vec<_> = document.select(&selector).collect();
                    if !found.is_empty() {
                        return found;
                    }
                }
                Err(_) => warn!("ignoring invalid selector {:?}", raw),
            }
        }
        Vec::new()
    }

    fn looks_like_article_path(&self, href: &str) -> bool {
        self.heuristics
            .link_path_markers
            .iter()
            .any(|marker| href.contains(marker.as_str()))
            || (href.starts_with('/') && href.len() > 1)
    }

    fn article_from_element(&self, element: ElementRef<'_>) -> Option<Article> {
        let title = self.extract_title(element)?;
        let link = self.extract_link(element)?;
        let text = collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "));
        let summary = self.extract_summary(&text, &title);
        let published_at = dates::scan_date(&text);
        Some(Article {
            title,
            link,
            summary,
            published_at,
            source: self.source.clone(),
        })
    }

    /// Title preference: heading text, then the first anchor's text, then
    /// an element with a title/headline class.
    fn extract_title(&self, element: ElementRef<'_>) -> Option<String> {
        let headings = Selector::parse("h1, h2, h3, h4").unwrap();
        if let Some(heading) = element.select(&headings).next() {
            let title = collapse_whitespace(&heading.text().collect::<String>());
            if !title.is_empty() {
                return Some(title);
            }
        }

        // A bare anchor candidate has no child elements to select from.
        if element.value().name() == "a" {
            let title = collapse_whitespace(&element.text().collect::<String>());
            return (!title.is_empty()).then_some(title);
        }

        let anchor = Selector::parse("a").unwrap();
        if let Some(link) = element.select(&anchor).next() {
            let title = collapse_whitespace(&link.text().collect::<String>());
            if !title.is_empty() {
                return Some(title);
            }
        }

        let titled = Selector::parse(r#"[class*="title"], [class*="headline"]"#).unwrap();
        if let Some(node) = element.select(&titled).next() {
            let title = collapse_whitespace(&node.text().collect::<String>());
            if !title.is_empty() {
                return Some(title);
            }
        }

        None
    }

    /// Nearest href, resolved against the page's base URL. Candidates
    /// without a resolvable link are dropped.
    fn extract_link(&self, element: ElementRef<'_>) -> Option<String> {
        let href = if element.value().name() == "a" {
            element.value().attr("href")
        } else {
            let anchor = Selector::parse("a[href]").unwrap();
            element
                .select(&anchor)
                .next()
                .and_then(|link| link.value().attr("href"))
        }?;
        self.base_url
            .join(href.trim())
            .ok()
            .map(|resolved| resolved.to_string())
    }

    /// Element text with the title prefix stripped, truncated to the
    /// configured length.
    fn extract_summary(&self, text: &str, title: &str) -> Option<String> {
        let body = text.strip_prefix(title).unwrap_or(text).trim();
        if body.is_empty() {
            return None;
        }
        let mut summary: String = body.chars().take(self.heuristics.max_summary_len).collect();
        if summary.chars().count() < body.chars().count() {
            summary.push_str("...");
        }
        Some(summary)
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> Extractor {
        Extractor::new(Url::parse("https://example.org").unwrap(), "Example Town")
    }

    const SEMANTIC_PAGE: &str = r#"
        <html><body>
            <article>
                <h2>Road Closure on Beach Road</h2>
                <a href="/news/road-closure">Read more</a>
                <p>Posted on September 3, 2024. Beach Road will be closed for repaving.</p>
            </article>
            <article>
                <h3>Council Meeting Agenda</h3>
                <a href="https://example.org/news/council-agenda">Read more</a>
            </article>
            <article>
                <h2>Park Cleanup Day</h2>
                <a href="/news/park-cleanup">Read more</a>
            </article>
        </body></html>
    "#;

    #[test]
    fn test_semantic_blocks_in_document_order() {
        let articles = extractor().extract(SEMANTIC_PAGE);
        assert_eq!(articles.len(), 3);
        assert_eq!(articles[0].title, "Road Closure on Beach Road");
        assert_eq!(articles[1].title, "Council Meeting Agenda");
        assert_eq!(articles[2].title, "Park Cleanup Day");
    }

    #[test]
    fn test_relative_links_resolve_against_base() {
        let articles = extractor().extract(SEMANTIC_PAGE);
        assert_eq!(articles[0].link, "https://example.org/news/road-closure");
        assert_eq!(articles[1].link, "https://example.org/news/council-agenda");
    }

    #[test]
    fn test_date_and_summary_extracted_when_present() {
        let articles = extractor().extract(SEMANTIC_PAGE);
        let first = &articles[0];
        assert!(first.published_at.is_some());
        let summary = first.summary.as_deref().unwrap();
        assert!(summary.contains("repaving"));
        assert!(!summary.starts_with("Road Closure"));
        assert!(articles[1].published_at.is_none());
    }

    #[test]
    fn test_duplicate_links_first_occurrence_wins() {
        let html = r#"
            <article><h2>First Headline</h2><a href="/news/same"></a></article>
            <article><h2>Second Headline</h2><a href="/news/same"></a></article>
        "#;
        let articles = extractor().extract(html);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "First Headline");
    }

    #[test]
    fn test_class_heuristics_when_no_semantic_blocks() {
        let html = r#"
            <div class="news-item">
                <h3>Library Hours Extended</h3>
                <a href="/news/library-hours">details</a>
            </div>
            <div class="news-item">
                <h3>New Crossing Guard</h3>
                <a href="/news/crossing-guard">details</a>
            </div>
        "#;
        let articles = extractor().extract(html);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].link, "https://example.org/news/library-hours");
    }

    #[test]
    fn test_link_pattern_fallback() {
        let html = r#"
            <div>
                <a href="/news/storm-drain-work">Storm Drain Work Begins</a>
            </div>
            <div>
                <a href="/news/pier-repairs">Pier Repairs Scheduled</a>
            </div>
            <div>
                <a href="https://twitter.com/exampletown">Follow us</a>
            </div>
        "#;
        let articles = extractor().extract(html);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Storm Drain Work Begins");
        assert_eq!(articles[0].link, "https://example.org/news/storm-drain-work");
        assert_eq!(articles[1].title, "Pier Repairs Scheduled");
    }

    #[test]
    fn test_unrecognizable_page_yields_empty_list() {
        let articles = extractor().extract("<html><body><table><tr><td>hours</td></tr></table></body></html>");
        assert!(articles.is_empty());
    }

    #[test]
    fn test_fragment_without_link_is_skipped() {
        let html = r#"
            <article><h2>No Link Here</h2></article>
            <article><h2>Proper Entry</h2><a href="/news/proper"></a></article>
        "#;
        let articles = extractor().extract(html);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Proper Entry");
    }

    #[test]
    fn test_article_cap() {
        let mut html = String::new();
        for i in 0..30 {
            html.push_str(&format!(
                r#"<article><h2>Item {i}</h2><a href="/news/item-{i}"></a></article>"#
            ));
        }
        let articles = extractor().extract(&html);
        assert_eq!(articles.len(), 20);
    }

    #[test]
    fn test_summary_truncated_with_ellipsis() {
        let long = "word ".repeat(200);
        let html = format!(
            r#"<article><h2>Budget Report</h2><a href="/news/budget"></a><p>{long}</p></article>"#
        );
        let articles = extractor().extract(&html);
        let summary = articles[0].summary.as_deref().unwrap();
        assert!(summary.ends_with("..."));
        assert!(summary.chars().count() <= 500 + 3);
    }

    #[test]
    fn test_custom_heuristics_override() {
        let heuristics = Heuristics {
            link_path_markers: vec!["/updates".to_string()],
            ..Heuristics::default()
        };
        let html = r#"<span><a href="https://example.org/updates/1">Update One</a></span>"#;
        let articles = extractor().with_heuristics(heuristics).extract(html);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].link, "https://example.org/updates/1");
    }
}
