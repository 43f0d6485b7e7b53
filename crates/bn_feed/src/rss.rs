use std::path::Path;

use bn_core::{Article, ChannelMetadata, Error, Result};
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::debug;

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// Renders a complete RSS 2.0 document. `now` becomes the channel's
/// lastBuildDate and the pubDate of any article without an extracted
/// date, so every item carries a valid date.
pub fn render(
    channel: &ChannelMetadata,
    articles: &[Article],
    now: DateTime<Utc>,
) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    rss.push_attribute(("xmlns:atom", ATOM_NS));
    emit(&mut writer, Event::Start(rss))?;
    emit(&mut writer, Event::Start(BytesStart::new("channel")))?;

    text_element(&mut writer, "title", &channel.title)?;
    text_element(&mut writer, "link", &channel.link)?;
    text_element(&mut writer, "description", &channel.description)?;
    text_element(&mut writer, "language", &channel.language)?;
    text_element(&mut writer, "lastBuildDate", &now.to_rfc2822())?;
    if let Some(editor) = &channel.managing_editor {
        text_element(&mut writer, "managingEditor", editor)?;
    }
    if let Some(webmaster) = &channel.web_master {
        text_element(&mut writer, "webMaster", webmaster)?;
    }
    if let Some(self_link) = &channel.self_link {
        let mut atom = BytesStart::new("atom:link");
        atom.push_attribute(("href", self_link.as_str()));
        atom.push_attribute(("rel", "self"));
        atom.push_attribute(("type", "application/rss+xml"));
        emit(&mut writer, Event::Empty(atom))?;
    }

    for article in articles {
        emit(&mut writer, Event::Start(BytesStart::new("item")))?;
        text_element(&mut writer, "title", &article.title)?;
        text_element(&mut writer, "link", &article.link)?;
        text_element(
            &mut writer,
            "description",
            article.summary.as_deref().unwrap_or(""),
        )?;
        let pub_date = article.published_at.unwrap_or(now);
        text_element(&mut writer, "pubDate", &pub_date.to_rfc2822())?;

        let mut guid = BytesStart::new("guid");
        guid.push_attribute(("isPermaLink", "true"));
        emit(&mut writer, Event::Start(guid))?;
        emit(&mut writer, Event::Text(BytesText::new(&article.link)))?;
        emit(&mut writer, Event::End(BytesEnd::new("guid")))?;
        emit(&mut writer, Event::End(BytesEnd::new("item")))?;
    }

    emit(&mut writer, Event::End(BytesEnd::new("channel")))?;
    emit(&mut writer, Event::End(BytesEnd::new("rss")))?;

    String::from_utf8(writer.into_inner()).map_err(|e| Error::Feed(e.to_string()))
}

/// Overwrites `path` with the rendered feed. No append, no merge.
pub fn write_to(path: &Path, feed: &str) -> Result<()> {
    debug!("writing {} bytes to {}", feed.len(), path.display());
    std::fs::write(path, feed)?;
    Ok(())
}

/// One element with escaped text content. Text always goes through the
/// writer's text events so reserved characters are escaped structurally.
fn text_element<W: std::io::Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    emit(writer, Event::Start(BytesStart::new(name)))?;
    emit(writer, Event::Text(BytesText::new(&sanitize(text))))?;
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn emit<W: std::io::Write>(writer: &mut Writer<W>, event: Event) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::Feed(e.to_string()))
}

/// Strips control characters that are invalid in XML 1.0 text.
fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|&c| c == '\t' || c == '\n' || c == '\r' || c as u32 >= 0x20)
        .collect()
}
