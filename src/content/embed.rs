//! Rich embeds for bare links to known providers
//!
//! A paragraph holding nothing but a URL (plain text or `<autolink>`) to a
//! supported provider is replaced by an iframe embed. Everything else is
//! passed through untouched. No network access is needed: embed markup is
//! derived from the URL alone.

use lazy_static::lazy_static;
use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};
use regex::Regex;

use crate::helpers::html_escape;

lazy_static! {
    static ref YOUTUBE: Regex = Regex::new(
        r"^https?://(?:www\.|m\.)?(?:youtube\.com/watch\?(?:[^#\s]*&)?v=|youtu\.be/)([A-Za-z0-9_-]{11})(?:[&?#][^\s]*)?$"
    )
    .unwrap();
    static ref VIMEO: Regex =
        Regex::new(r"^https?://(?:www\.)?vimeo\.com/(\d+)/?(?:[?#][^\s]*)?$").unwrap();
    static ref CODEPEN: Regex = Regex::new(
        r"^https?://codepen\.io/([A-Za-z0-9_-]+)/pen/([A-Za-z0-9]+)/?(?:[?#][^\s]*)?$"
    )
    .unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    YouTube,
    Vimeo,
    CodePen,
}

impl Provider {
    fn name(self) -> &'static str {
        match self {
            Provider::YouTube => "youtube",
            Provider::Vimeo => "vimeo",
            Provider::CodePen => "codepen",
        }
    }
}

/// An embeddable reference recognised from a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    pub provider: Provider,
    pub src: String,
}

impl Embed {
    /// Recognise a provider URL
    pub fn lookup(url: &str) -> Option<Self> {
        let url = url.trim();

        if let Some(caps) = YOUTUBE.captures(url) {
            return Some(Self {
                provider: Provider::YouTube,
                src: format!("https://www.youtube-nocookie.com/embed/{}", &caps[1]),
            });
        }
        if let Some(caps) = VIMEO.captures(url) {
            return Some(Self {
                provider: Provider::Vimeo,
                src: format!("https://player.vimeo.com/video/{}", &caps[1]),
            });
        }
        if let Some(caps) = CODEPEN.captures(url) {
            return Some(Self {
                provider: Provider::CodePen,
                src: format!(
                    "https://codepen.io/{}/embed/{}?default-tab=result",
                    &caps[1], &caps[2]
                ),
            });
        }

        None
    }

    pub fn to_html(&self) -> String {
        format!(
            r#"<div class="embed embed-{name}"><iframe src="{src}" title="{name} embed" loading="lazy" frameborder="0" allow="autoplay; encrypted-media; fullscreen; picture-in-picture" allowfullscreen></iframe></div>"#,
            name = self.provider.name(),
            src = html_escape(&self.src),
        ) + "\n"
    }
}

/// Replace link-only paragraphs that point at a known provider
pub fn expand(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out = Vec::with_capacity(events.len());
    let mut i = 0;

    while i < events.len() {
        match match_embed(&events[i..]) {
            Some((embed, consumed)) => {
                tracing::trace!("Embedding {:?} from {}", embed.provider, embed.src);
                out.push(Event::Html(CowStr::from(embed.to_html())));
                i += consumed;
            }
            None => {
                out.push(events[i].clone());
                i += 1;
            }
        }
    }

    out
}

fn match_embed(events: &[Event<'_>]) -> Option<(Embed, usize)> {
    match events {
        [Event::Start(Tag::Paragraph), Event::Text(url), Event::End(TagEnd::Paragraph), ..] => {
            Embed::lookup(url).map(|e| (e, 3))
        }
        [Event::Start(Tag::Paragraph), Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url,
            ..
        }), Event::Text(_), Event::End(TagEnd::Link), Event::End(TagEnd::Paragraph), ..] => {
            Embed::lookup(dest_url).map(|e| (e, 5))
        }
        _ => None,
    }
}
