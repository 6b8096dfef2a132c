//! Previous/next navigation between posts

use super::Post;
use crate::config::HiddenNavigation;
use crate::error::{ContentError, Result};

/// The visible posts chronologically around a target post
#[derive(Debug, Clone, Copy, Default)]
pub struct Neighbors<'a> {
    /// The nearest older visible post
    pub previous: Option<&'a Post>,
    /// The nearest newer visible post
    pub next: Option<&'a Post>,
}

/// Resolve neighbors of `slug` in a newest-first sequence.
///
/// Hidden posts are never returned; a run of hidden posts is skipped over.
/// When the target itself is hidden, `policy` decides whether it gets
/// navigation at all.
pub fn resolve<'a>(posts: &'a [Post], slug: &str, policy: HiddenNavigation) -> Result<Neighbors<'a>> {
    let index = posts
        .iter()
        .position(|p| p.slug() == slug)
        .ok_or_else(|| ContentError::NotFound(slug.to_string()))?;

    if !posts[index].is_visible() && policy == HiddenNavigation::Isolate {
        return Ok(Neighbors::default());
    }

    let previous = posts[index + 1..].iter().find(|p| p.is_visible());
    let next = posts[..index].iter().rev().find(|p| p.is_visible());

    Ok(Neighbors { previous, next })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostMetadata;
    use chrono::{DateTime, Duration};

    /// Posts newest first; `true` marks a hidden post
    fn sequence(layout: &[(&str, bool)]) -> Vec<Post> {
        let newest = DateTime::parse_from_rfc3339("2023-12-01T00:00:00Z").unwrap();
        layout.iter()
            .enumerate()
            .map(|(i, (slug, hidden))| Post {
                meta: PostMetadata {
                    title: slug.to_uppercase(),
                    slug: slug.to_string(),
                    date: newest - Duration::days(i as i64),
                    description: None,
                    author: None,
                    hidden: *hidden,
                    published: true,
                    effort_post: false,
                },
                body: String::new(),
                source: format!("{}.md", slug).into(),
            })
            .collect()
    }

    fn slug_of(post: Option<&Post>) -> Option<&str> {
        post.map(|p| p.slug())
    }

    #[test]
    fn test_plain_neighbors() {
        let posts = sequence(&[("a", false), ("b", false), ("c", false)]);
        let n = resolve(&posts, "b", HiddenNavigation::Navigate).unwrap();
        assert_eq!(slug_of(n.previous), Some("c"));
        assert_eq!(slug_of(n.next), Some("a"));
    }

    #[test]
    fn test_ends_have_no_neighbor() {
        let posts = sequence(&[("a", false), ("b", false)]);
        let newest = resolve(&posts, "a", HiddenNavigation::Navigate).unwrap();
        assert_eq!(slug_of(newest.next), None);
        assert_eq!(slug_of(newest.previous), Some("b"));

        let oldest = resolve(&posts, "b", HiddenNavigation::Navigate).unwrap();
        assert_eq!(slug_of(oldest.previous), None);
        assert_eq!(slug_of(oldest.next), Some("a"));
    }

    #[test]
    fn test_skips_single_hidden_post() {
        let posts = sequence(&[("a", false), ("foo", true), ("c", false)]);
        let n = resolve(&posts, "a", HiddenNavigation::Navigate).unwrap();
        assert_eq!(slug_of(n.previous), Some("c"));

        let n = resolve(&posts, "c", HiddenNavigation::Navigate).unwrap();
        assert_eq!(slug_of(n.next), Some("a"));
    }

    #[test]
    fn test_skips_runs_of_hidden_posts() {
        let posts = sequence(&[
            ("a", false),
            ("h1", true),
            ("h2", true),
            ("h3", true),
            ("e", false),
        ]);
        let n = resolve(&posts, "a", HiddenNavigation::Navigate).unwrap();
        assert_eq!(slug_of(n.previous), Some("e"));
        let n = resolve(&posts, "e", HiddenNavigation::Navigate).unwrap();
        assert_eq!(slug_of(n.next), Some("a"));
    }

    #[test]
    fn test_exhausted_by_hidden_posts() {
        let posts = sequence(&[("h0", true), ("a", false), ("h1", true)]);
        let n = resolve(&posts, "a", HiddenNavigation::Navigate).unwrap();
        assert!(n.previous.is_none());
        assert!(n.next.is_none());
    }

    #[test]
    fn test_hidden_target_navigates() {
        let posts = sequence(&[("a", false), ("secret", true), ("c", false)]);
        let n = resolve(&posts, "secret", HiddenNavigation::Navigate).unwrap();
        assert_eq!(slug_of(n.previous), Some("c"));
        assert_eq!(slug_of(n.next), Some("a"));
    }

    #[test]
    fn test_hidden_target_isolated() {
        let posts = sequence(&[("a", false), ("secret", true), ("c", false)]);
        let n = resolve(&posts, "secret", HiddenNavigation::Isolate).unwrap();
        assert!(n.previous.is_none());
        assert!(n.next.is_none());

        // visible posts are unaffected by the policy
        let n = resolve(&posts, "a", HiddenNavigation::Isolate).unwrap();
        assert_eq!(slug_of(n.previous), Some("c"));
    }

    #[test]
    fn test_unknown_slug() {
        let posts = sequence(&[("a", false)]);
        let err = resolve(&posts, "nope", HiddenNavigation::Navigate).unwrap_err();
        assert!(matches!(err, ContentError::NotFound(ref s) if s == "nope"));
    }
}
