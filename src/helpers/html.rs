//! HTML helper functions

use super::url::url_for;
use crate::config::SiteConfig;

/// Generate a feed link tag for the page head
pub fn feed_tag(config: &SiteConfig) -> String {
    format!(
        r#"<link rel="alternate" href="{}" title="{}" type="application/rss+xml">"#,
        html_escape(&url_for(&config.feed_path)),
        html_escape(&format!("RSS Feed for {}", config.base_url()))
    )
}

/// Escape text for use in HTML content and attributes
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_feed_tag() {
        let config = SiteConfig {
            url: "https://example.com/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            feed_tag(&config),
            r#"<link rel="alternate" href="/feed.xml" title="RSS Feed for https://example.com" type="application/rss+xml">"#
        );
    }
}
