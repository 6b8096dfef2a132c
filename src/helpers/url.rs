//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;

/// Characters left alone by JavaScript's `encodeURIComponent`
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Generate a site-absolute URL path
///
/// # Examples
/// ```ignore
/// url_for("css/style.css") // -> "/css/style.css"
/// ```
pub fn url_for(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/about") // -> "https://example.com/about"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    format!("{}{}", config.base_url(), url_for(path))
}

/// Encode a single URL path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, COMPONENT).to_string()
}

/// Site-absolute path of a post or page
pub fn post_path(slug: &str) -> String {
    format!("/{}", encode_segment(slug))
}

/// Absolute URL of a post, as used in the feed
pub fn post_url(config: &SiteConfig, slug: &str) -> String {
    full_url_for(config, &post_path(slug))
}
