//! Front-matter parsing

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::Deserialize;

/// Front-matter data from a post or page
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub slug: Option<String>,
    /// Kept as a raw YAML scalar since sources write dates in many shapes
    pub date: Option<serde_yaml::Value>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub hidden: bool,
    /// Posts are published unless explicitly disabled
    #[serde(default = "default_published")]
    pub published: bool,
    #[serde(rename = "isEffortPost", alias = "effort_post")]
    pub effort_post: bool,
}

fn default_published() -> bool {
    true
}

impl Default for FrontMatter {
    fn default() -> Self {
        Self {
            title: None,
            slug: None,
            date: None,
            description: None,
            author: None,
            hidden: false,
            published: true,
            effort_post: false,
        }
    }
}

impl FrontMatter {
    /// Split a leading `---` fenced block from the body.
    ///
    /// Returns `None` when the content does not open with a fence or the
    /// fence is never closed.
    pub fn split(content: &str) -> Option<(&str, &str)> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let rest = content.strip_prefix("---")?;
        let rest = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))?;

        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            if line.trim_end() == "---" {
                return Some((&rest[..offset], &rest[offset + line.len()..]));
            }
            offset += line.len();
        }

        None
    }

    /// Parse front-matter from content string.
    ///
    /// Returns `(None, content)` when there is no front-matter block.
    pub fn parse(content: &str) -> Result<(Option<Self>, &str), serde_yaml::Error> {
        let Some((yaml, body)) = Self::split(content) else {
            return Ok((None, content));
        };

        if yaml.trim().is_empty() {
            return Ok((Some(FrontMatter::default()), body));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml)?;
        Ok((Some(fm), body))
    }

    /// True when the block sets `published: false`.
    ///
    /// Only that one key is read, so a draft with loosely typed fields is
    /// still recognised as a draft.
    pub fn is_unpublished(content: &str) -> bool {
        Self::split(content)
            .and_then(|(yaml, _)| serde_yaml::from_str::<serde_yaml::Value>(yaml).ok())
            .and_then(|value| value.get("published").and_then(serde_yaml::Value::as_bool))
            == Some(false)
    }

    /// The date scalar as text, whatever YAML type it was written as
    pub fn date_text(&self) -> Option<String> {
        match self.date.as_ref()? {
            serde_yaml::Value::String(s) => Some(s.clone()),
            serde_yaml::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Parse the date into an instant, reading offset-less dates in `tz`
    pub fn parse_date(&self, tz: Tz) -> Option<DateTime<FixedOffset>> {
        self.date_text().and_then(|s| parse_date_string(&s, tz))
    }
}

/// Parse a date string in various formats
pub fn parse_date_string(s: &str, tz: Tz) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S %z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
    ];
    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"];

    let naive = datetime_formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            date_formats
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
slug: hello-world
date: 2024-01-15
description: A first post
hidden: true
isEffortPost: true
---

This is the content.
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        let fm = fm.unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello World"));
        assert_eq!(fm.slug.as_deref(), Some("hello-world"));
        assert_eq!(fm.date_text().as_deref(), Some("2024-01-15"));
        assert!(fm.hidden);
        assert!(fm.published);
        assert!(fm.effort_post);
        assert_eq!(body, "\nThis is the content.\n");
    }

    #[test]
    fn test_no_frontmatter() {
        let (fm, body) = FrontMatter::parse("# Just markdown\n").unwrap();
        assert!(fm.is_none());
        assert_eq!(body, "# Just markdown\n");
    }

    #[test]
    fn test_unclosed_fence_is_not_frontmatter() {
        let content = "---\ntitle: Oops\n\nNever closed.\n";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert!(fm.is_none());
        assert_eq!(body, content);
    }

    #[test]
    fn test_empty_frontmatter_uses_defaults() {
        let (fm, body) = FrontMatter::parse("---\n---\nBody").unwrap();
        let fm = fm.unwrap();
        assert!(fm.title.is_none());
        assert!(fm.published);
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        assert!(FrontMatter::parse("---\ntitle: [unclosed\n---\n").is_err());
    }

    #[test]
    fn test_unpublished_peek_ignores_other_fields() {
        assert!(FrontMatter::is_unpublished(
            "---\ntitle: [1, 2]\nhidden: yes please\npublished: false\n---\n"
        ));
        assert!(!FrontMatter::is_unpublished("---\ntitle: Live\n---\n"));
        assert!(!FrontMatter::is_unpublished("---\npublished: true\n---\n"));
        assert!(!FrontMatter::is_unpublished("no front-matter"));
        assert!(!FrontMatter::is_unpublished("---\n: [broken\n---\n"));
    }

    #[test]
    fn test_published_false() {
        let (fm, _) = FrontMatter::parse("---\npublished: false\n---\n").unwrap();
        assert!(!fm.unwrap().published);
    }

    #[test]
    fn test_crlf_frontmatter() {
        let (fm, body) = FrontMatter::parse("---\r\ntitle: Windows\r\n---\r\nBody\r\n").unwrap();
        assert_eq!(fm.unwrap().title.as_deref(), Some("Windows"));
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn test_parse_date_formats() {
        let cases = [
            ("2023-06-01", "2023-06-01T00:00:00+00:00"),
            ("2023/06/01", "2023-06-01T00:00:00+00:00"),
            ("2023-06-01 10:30", "2023-06-01T10:30:00+00:00"),
            ("2023-06-01 10:30:15", "2023-06-01T10:30:15+00:00"),
            ("2023-06-01T10:30:15+02:00", "2023-06-01T10:30:15+02:00"),
            ("Thu, 01 Jun 2023 10:30:15 GMT", "2023-06-01T10:30:15+00:00"),
            ("June 1, 2023", "2023-06-01T00:00:00+00:00"),
        ];

        for (input, expected) in cases {
            let dt = parse_date_string(input, Tz::UTC)
                .unwrap_or_else(|| panic!("failed to parse {}", input));
            assert_eq!(dt, DateTime::parse_from_rfc3339(expected).unwrap(), "{}", input);
        }
    }

    #[test]
    fn test_naive_date_uses_timezone() {
        let dt = parse_date_string("2023-01-15 12:00", chrono_tz::America::New_York).unwrap();
        assert_eq!(dt.offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn test_unparseable_date() {
        assert!(parse_date_string("someday", Tz::UTC).is_none());
        assert!(parse_date_string("2023-13-45", Tz::UTC).is_none());
    }
}
