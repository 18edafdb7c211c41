//! In-memory post filtering.
//!
//! Used two ways: the fixture fallback path filters the whole sample set
//! here, and the Postgres path applies only the `search` step here after its
//! primary query (the data store never sees the substring search).

use ton_content::{Post, PostStatus};
use ton_interface::PostFilter;

/// Apply every filter option to an in-memory post list, newest first.
pub fn apply_post_filter(mut posts: Vec<Post>, filter: &PostFilter) -> Vec<Post> {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    if filter.published_only {
        posts.retain(|p| p.status == PostStatus::Published);
    }
    if let Some(tag) = &filter.tag {
        posts.retain(|p| p.tags.iter().any(|t| t == tag));
    }
    if let Some(created_after) = filter.created_after {
        posts.retain(|p| p.created_at >= created_after);
    }
    if let Some(ids) = &filter.ids {
        posts.retain(|p| ids.contains(&p.id));
    }
    if let Some(limit) = filter.limit {
        posts.truncate(limit.max(0) as usize);
    }
    apply_search(posts, filter.search.as_deref())
}

/// The post-hoc substring search: case-insensitive over title + flattened
/// body text, applied after whatever the primary query already fetched.
pub fn apply_search(mut posts: Vec<Post>, search: Option<&str>) -> Vec<Post> {
    let Some(needle) = search else {
        return posts;
    };
    let needle = needle.to_lowercase();
    if needle.is_empty() {
        return posts;
    }
    posts.retain(|p| {
        p.title.to_lowercase().contains(&needle)
            || p.flattened_text().to_lowercase().contains(&needle)
    });
    posts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn published_only_filters_drafts() {
        let filter = PostFilter::published();
        let result = apply_post_filter(fixtures::posts(), &filter);
        assert_eq!(result.len(), 5);
        assert!(result.iter().all(|p| p.status == PostStatus::Published));
    }

    #[test]
    fn tag_filter_is_exact() {
        let filter = PostFilter {
            tag: Some("Business".to_string()),
            ..Default::default()
        };
        let result = apply_post_filter(fixtures::posts(), &filter);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn search_is_case_insensitive_and_scans_body() {
        let result = apply_search(fixtures::posts(), Some("OLKARIA"));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].slug, "inside-the-rift-valleys-geothermal-boom");
    }

    #[test]
    fn search_runs_after_limit() {
        // The search only sees what the primary query fetched.
        let filter = PostFilter {
            limit: Some(1),
            search: Some("matatu".to_string()),
            ..Default::default()
        };
        let result = apply_post_filter(fixtures::posts(), &filter);
        // Newest post is the draft explainer, which does not match.
        assert!(result.is_empty());
    }

    #[test]
    fn ids_filter_restricts_membership() {
        let all = fixtures::posts();
        let filter = PostFilter {
            ids: Some(vec![all[0].id, all[2].id]),
            ..Default::default()
        };
        let result = apply_post_filter(all, &filter);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn results_are_newest_first() {
        let result = apply_post_filter(fixtures::posts(), &PostFilter::default());
        for pair in result.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }
}
