//! Markdown rendering with syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, TextMergeStream};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use super::embed;
use crate::config::SiteConfig;
use crate::error::{ContentError, Result};
use crate::helpers::html_escape;

const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Markdown renderer with syntax highlighting.
///
/// Rendering is deterministic: the same input always yields the same HTML.
/// Raw HTML in the source is passed through as-is, the content is trusted.
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    /// `None` disables highlighting
    theme: Option<Theme>,
    line_numbers: bool,
    math: bool,
    embeds: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options(Some(DEFAULT_THEME), false, true, true)
    }

    /// Create a renderer from the site configuration
    pub fn from_config(config: &SiteConfig) -> Self {
        let theme = config
            .highlight
            .enable
            .then_some(config.highlight.theme.as_str());
        Self::with_options(
            theme,
            config.highlight.line_number,
            config.markdown.math,
            config.markdown.embeds,
        )
    }

    /// Create with custom settings
    pub fn with_options(theme: Option<&str>, line_numbers: bool, math: bool, embeds: bool) -> Self {
        let theme = theme.and_then(|name| {
            let mut themes = ThemeSet::load_defaults().themes;
            themes.remove(name).or_else(|| {
                tracing::warn!(
                    "Unknown highlight theme {:?}, falling back to {}",
                    name,
                    DEFAULT_THEME
                );
                themes.remove(DEFAULT_THEME)
            })
        });

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
            line_numbers,
            math,
            embeds,
        }
    }

    fn options(&self) -> Options {
        // Front-matter is split off before rendering, so no metadata blocks
        let mut options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES;
        if self.math {
            options |= Options::ENABLE_MATH;
        }
        options
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        let parser = TextMergeStream::new(Parser::new_ext(markdown, self.options()));
        let mut events: Vec<Event> = parser.collect();

        if self.embeds {
            events = embed::expand(events);
        }

        let mut output: Vec<Event> = Vec::with_capacity(events.len());
        let mut code_block: Option<(Option<String>, String)> = None;

        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => fence_language(&info),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = code_block.take() {
                        let highlighted = self.highlight_code(&code, lang.as_deref());
                        output.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some((_, code)) = code_block.as_mut() {
                        code.push_str(&text);
                    }
                }
                Event::InlineMath(tex) => {
                    output.push(Event::InlineHtml(CowStr::from(math_markup(&tex, false))));
                }
                Event::DisplayMath(tex) => {
                    output.push(Event::InlineHtml(CowStr::from(math_markup(&tex, true))));
                }
                event => output.push(event),
            }
        }

        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::write_html_fmt(&mut html_output, output.into_iter())
            .map_err(|e| ContentError::render("markdown", e))?;

        Ok(html_output)
    }

    /// Highlight a code block, falling back to escaped plain text
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let highlighted = lang.zip(self.theme.as_ref()).and_then(|(lang, theme)| {
            let syntax = self
                .syntax_set
                .find_syntax_by_token(lang)
                .or_else(|| self.syntax_set.find_syntax_by_extension(lang))?;
            match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
                Ok(html) => Some(html),
                Err(e) => {
                    tracing::warn!("Failed to highlight {} block: {}", lang, e);
                    None
                }
            }
        });

        let lang_class = lang
            .map(|l| format!("language-{}", html_escape(l)))
            .unwrap_or_default();

        match highlighted {
            Some(html) if self.line_numbers => self.add_line_numbers(code, &html, &lang_class),
            Some(html) => format!(r#"<div class="highlight {}">{}</div>"#, lang_class, html) + "\n",
            None if lang.is_some() => {
                format!(
                    r#"<pre><code class="{}">{}</code></pre>"#,
                    lang_class,
                    html_escape(code)
                ) + "\n"
            }
            None => format!("<pre><code>{}</code></pre>\n", html_escape(code)),
        }
    }

    /// Add a line-number gutter next to highlighted code
    fn add_line_numbers(&self, code: &str, highlighted: &str, lang_class: &str) -> String {
        let gutter = (1..=code.lines().count().max(1))
            .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
            lang_class, gutter, highlighted
        ) + "\n"
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// First token of a fence info string (```` ```rust,ignore ```` -> `rust`)
fn fence_language(info: &str) -> Option<String> {
    info.split(|c: char| c.is_whitespace() || c == ',' || c == '{')
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// KaTeX auto-render compatible markup
fn math_markup(tex: &str, display: bool) -> String {
    if display {
        format!(
            r#"<span class="math math-display">\[{}\]</span>"#,
            html_escape(tex)
        )
    } else {
        format!(
            r#"<span class="math math-inline">\({}\)</span>"#,
            html_escape(tex)
        )
    }
}
