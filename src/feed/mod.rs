//! RSS 2.0 feed of the visible posts

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use rayon::prelude::*;
use std::io::Cursor;

use crate::config::SiteConfig;
use crate::content::{MarkdownRenderer, Post};
use crate::error::{ContentError, Result};
use crate::helpers::post_url;

type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Serializes posts into an RSS document
pub struct FeedSerializer<'a> {
    config: &'a SiteConfig,
    renderer: &'a MarkdownRenderer,
}

impl<'a> FeedSerializer<'a> {
    pub fn new(config: &'a SiteConfig, renderer: &'a MarkdownRenderer) -> Self {
        Self { config, renderer }
    }

    /// Render the feed for `posts`, which should be the visible posts in
    /// listing order.
    ///
    /// Every item is rendered before any XML is written: one failing post
    /// fails the whole feed.
    pub fn render(&self, posts: &[&Post]) -> Result<String> {
        let descriptions = posts
            .par_iter()
            .map(|post| {
                self.renderer
                    .render(&post.body)
                    .map_err(|e| ContentError::render(format!("feed item `{}`", post.slug()), e))
            })
            .collect::<Result<Vec<String>>>()?;

        let xml = self
            .write_channel(posts, &descriptions)
            .map_err(|e| ContentError::render("feed", e))?;

        String::from_utf8(xml).map_err(|e| ContentError::render("feed", e))
    }

    fn write_channel(&self, posts: &[&Post], descriptions: &[String]) -> quick_xml::Result<Vec<u8>> {
        let config = self.config;
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("xmlns:dc", "http://purl.org/dc/elements/1.1/"));
        rss.push_attribute(("xmlns:atom", "http://www.w3.org/2005/Atom"));
        rss.push_attribute(("version", "2.0"));
        writer.write_event(Event::Start(rss))?;
        writer.write_event(Event::Start(BytesStart::new("channel")))?;

        let description = if config.description.is_empty() {
            config.title.as_str()
        } else {
            config.description.as_str()
        };
        push_text(&mut writer, "title", &config.title)?;
        push_text(&mut writer, "description", description)?;
        push_text(&mut writer, "link", config.base_url())?;
        push_text(&mut writer, "generator", "folio")?;

        // Newest post date rather than wall clock, so builds are reproducible
        if let Some(newest) = posts.iter().map(|p| p.meta.date).max() {
            push_text(&mut writer, "lastBuildDate", &newest.to_rfc2822())?;
        }

        let feed_url = config.feed_url();
        let mut self_link = BytesStart::new("atom:link");
        self_link.push_attribute(("href", feed_url.as_str()));
        self_link.push_attribute(("rel", "self"));
        self_link.push_attribute(("type", "application/rss+xml"));
        writer.write_event(Event::Empty(self_link))?;

        push_text(&mut writer, "language", &config.language)?;

        for (post, html) in posts.iter().zip(descriptions) {
            let url = post_url(config, post.slug());

            writer.write_event(Event::Start(BytesStart::new("item")))?;
            push_text(&mut writer, "title", &post.meta.title)?;
            push_cdata(&mut writer, "description", html)?;
            push_text(&mut writer, "link", &url)?;

            let mut guid = BytesStart::new("guid");
            guid.push_attribute(("isPermaLink", "true"));
            writer.write_event(Event::Start(guid))?;
            writer.write_event(Event::Text(BytesText::new(&url)))?;
            writer.write_event(Event::End(BytesEnd::new("guid")))?;

            push_text(&mut writer, "dc:creator", post.meta.author_or(&config.author))?;
            push_text(&mut writer, "pubDate", &post.meta.date.to_rfc2822())?;
            writer.write_event(Event::End(BytesEnd::new("item")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("channel")))?;
        writer.write_event(Event::End(BytesEnd::new("rss")))?;

        let mut xml = writer.into_inner().into_inner();
        xml.push(b'\n');
        Ok(xml)
    }
}

/// Convenience wrapper: render the feed of a collection's visible posts
pub fn render_feed(config: &SiteConfig, renderer: &MarkdownRenderer, posts: &[&Post]) -> Result<String> {
    tracing::debug!(
        "Rendering feed with {} items (newest {})",
        posts.len(),
        posts
            .first()
            .map(|p| p.meta.iso_date())
            .unwrap_or_else(|| "none".to_string())
    );
    FeedSerializer::new(config, renderer).render(posts)
}

fn push_text(writer: &mut XmlWriter, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// Write `text` as CDATA, splitting around any `]]>` it contains
fn push_cdata(writer: &mut XmlWriter, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    let pieces: Vec<&str> = text.split("]]>").collect();
    let last = pieces.len() - 1;
    for (i, piece) in pieces.iter().enumerate() {
        let mut section = String::with_capacity(piece.len() + 3);
        if i > 0 {
            section.push('>');
        }
        section.push_str(piece);
        if i < last {
            section.push_str("]]");
        }
        writer.write_event(Event::CData(BytesCData::new(section.as_str())))?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostMetadata;
    use chrono::DateTime;

    fn config() -> SiteConfig {
        SiteConfig {
            title: "My Blog".to_string(),
            description: "Notes & thoughts".to_string(),
            author: "Site Author".to_string(),
            url: "https://example.com/".to_string(),
            ..Default::default()
        }
    }

    fn post(slug: &str, date: &str, author: Option<&str>, body: &str) -> Post {
        Post {
            meta: PostMetadata {
                title: format!("Title of {}", slug),
                slug: slug.to_string(),
                date: DateTime::parse_from_rfc3339(date).unwrap(),
                description: None,
                author: author.map(str::to_string),
                hidden: false,
                published: true,
                effort_post: false,
            },
            body: body.to_string(),
            source: format!("{}.md", slug).into(),
        }
    }

    #[test]
    fn test_empty_feed_is_valid() {
        let renderer = MarkdownRenderer::new();
        let xml = render_feed(&config(), &renderer, &[]).unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains("<channel>"));
        assert!(xml.contains("<title>My Blog</title>"));
        assert!(xml.contains("<description>Notes &amp; thoughts</description>"));
        assert!(xml.contains(r#"<atom:link href="https://example.com/feed.xml" rel="self" type="application/rss+xml"/>"#));
        assert!(!xml.contains("<item>"));
        assert!(!xml.contains("lastBuildDate"));
        assert!(xml.trim_end().ends_with("</rss>"));
    }

    #[test]
    fn test_items_in_given_order() {
        let renderer = MarkdownRenderer::new();
        let newer = post("newer", "2023-06-01T00:00:00Z", None, "# Hello");
        let older = post("older", "2023-01-01T00:00:00Z", Some("Guest"), "Bye");
        let xml = render_feed(&config(), &renderer, &[&newer, &older]).unwrap();

        let first = xml.find("https://example.com/newer").unwrap();
        let second = xml.find("https://example.com/older").unwrap();
        assert!(first < second);

        assert!(xml.contains("<dc:creator>Site Author</dc:creator>"));
        assert!(xml.contains("<dc:creator>Guest</dc:creator>"));
        assert!(xml.contains("<![CDATA[<h1>Hello</h1>"));
        assert!(xml.contains(r#"<guid isPermaLink="true">https://example.com/newer</guid>"#));
        assert!(xml.contains("<pubDate>Thu, 1 Jun 2023 00:00:00 +0000</pubDate>"));
        assert!(xml.contains("<lastBuildDate>Thu, 1 Jun 2023 00:00:00 +0000</lastBuildDate>"));
    }

    #[test]
    fn test_feed_is_deterministic() {
        let renderer = MarkdownRenderer::new();
        let p = post("p", "2023-06-01T00:00:00Z", None, "```rust\nfn main() {}\n```");
        let a = render_feed(&config(), &renderer, &[&p]).unwrap();
        let b = render_feed(&config(), &renderer, &[&p]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_cdata_terminator_is_split() {
        let renderer = MarkdownRenderer::new();
        let p = post("p", "2023-06-01T00:00:00Z", None, "<div>a]]>b</div>\n");
        let xml = render_feed(&config(), &renderer, &[&p]).unwrap();
        assert!(xml.contains("<![CDATA[<div>a]]]]><![CDATA[>b</div>"));
    }
}
