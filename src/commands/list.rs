//! List site content

use anyhow::Result;
use serde::Serialize;

use crate::content::loader::ContentLoader;
use crate::content::Post;
use crate::helpers::list_date;
use crate::Folio;

/// One row of `folio list --json`
#[derive(Debug, Serialize)]
pub struct ListEntry<'a> {
    pub slug: &'a str,
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub date: String,
    pub hidden: bool,
    #[serde(rename = "isEffortPost")]
    pub effort_post: bool,
}

impl<'a> From<&'a Post> for ListEntry<'a> {
    fn from(post: &'a Post) -> Self {
        Self {
            slug: post.slug(),
            title: &post.meta.title,
            description: post.meta.description.as_deref(),
            date: post.meta.iso_date(),
            hidden: post.meta.hidden,
            effort_post: post.meta.effort_post,
        }
    }
}

/// Print the ordered posts, hidden ones flagged
pub fn run(folio: &Folio, json: bool) -> Result<()> {
    let posts = ContentLoader::new(folio).load_posts()?;
    let posts: Vec<&Post> = posts.iter().collect();

    if json {
        println!("{}", format_json(&posts)?);
    } else {
        print!("{}", format_text(&posts));
    }

    Ok(())
}

pub fn format_json(posts: &[&Post]) -> Result<String> {
    let entries: Vec<ListEntry> = posts.iter().copied().map(ListEntry::from).collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

pub fn format_text(posts: &[&Post]) -> String {
    let mut out = format!("Posts ({}):\n", posts.len());
    for post in posts {
        let mut flags = String::new();
        if post.meta.hidden {
            flags.push_str(" [hidden]");
        }
        if post.meta.effort_post {
            flags.push_str(" [effort]");
        }
        out.push_str(&format!(
            "  {}  {} - {}{}\n",
            list_date(&post.meta.date),
            post.slug(),
            post.meta.title,
            flags
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostMetadata;
    use chrono::DateTime;

    fn post(slug: &str, hidden: bool, effort_post: bool) -> Post {
        Post {
            meta: PostMetadata {
                title: format!("About {}", slug),
                slug: slug.to_string(),
                date: DateTime::parse_from_rfc3339("2023-06-01T10:00:00+02:00").unwrap(),
                description: None,
                author: None,
                hidden,
                published: true,
                effort_post,
            },
            body: String::new(),
            source: format!("{}.md", slug).into(),
        }
    }

    #[test]
    fn test_format_text() {
        let a = post("a", false, true);
        let b = post("b", true, false);
        let text = format_text(&[&a, &b]);
        assert_eq!(
            text,
            "Posts (2):\n  2023-06-01  a - About a [effort]\n  2023-06-01  b - About b [hidden]\n"
        );
    }

    #[test]
    fn test_format_json() {
        let mut a = post("a", false, true);
        a.meta.description = Some("All about a".to_string());
        let b = post("b", false, false);
        let json = format_json(&[&a, &b]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["slug"], "a");
        assert_eq!(value[0]["date"], "2023-06-01T10:00:00+02:00");
        assert_eq!(value[0]["isEffortPost"], true);
        assert_eq!(value[0]["hidden"], false);
        assert_eq!(value[0]["description"], "All about a");
        assert!(value[1].get("description").is_none());
    }
}
