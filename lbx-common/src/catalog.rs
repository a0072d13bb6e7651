//! Catalog operations over a set of lessons
//!
//! Pure functions shared by every content source and by the content API:
//! global ordering, hierarchy building, tag counting, search filtering and
//! navigation. Both backends must produce identical results for the same
//! lesson set, so the logic lives here once.

use crate::model::{HierarchyNode, Lesson, LessonRef, NavigationInfo, TagIndex};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Global lesson ordering: `(order, title)` ascending, case-respecting
/// lexical comparison on the title tiebreak.
pub fn compare(a: &Lesson, b: &Lesson) -> Ordering {
    a.order.cmp(&b.order).then_with(|| a.title.cmp(&b.title))
}

/// Sort lessons into the global ordering.
pub fn sort_lessons(lessons: &mut [Lesson]) {
    lessons.sort_by(compare);
}

/// Count tag occurrences across all lessons.
pub fn count_tags(lessons: &[Lesson]) -> TagIndex {
    let mut tags = TagIndex::new();
    for lesson in lessons {
        for tag in &lesson.tags {
            *tags.entry(tag.clone()).or_insert(0) += 1;
        }
    }
    tags
}

/// Filter lessons by tag intersection and substring query, sorted into the
/// global ordering.
///
/// A lesson qualifies when:
/// - `tags` is `None`/empty, or its tag set intersects the requested set
///   (case-insensitive), and
/// - `query` is empty, or is a case-insensitive substring of the title or
///   raw content.
pub fn search(lessons: &[Lesson], query: &str, tags: Option<&[String]>) -> Vec<Lesson> {
    let query = query.to_lowercase();
    let wanted: Vec<String> = tags
        .unwrap_or_default()
        .iter()
        .map(|t| t.to_lowercase())
        .collect();

    let mut hits: Vec<Lesson> = lessons
        .iter()
        .filter(|lesson| {
            if !wanted.is_empty() {
                let lesson_tags: Vec<String> =
                    lesson.tags.iter().map(|t| t.to_lowercase()).collect();
                if !wanted.iter().any(|tag| lesson_tags.contains(tag)) {
                    return false;
                }
            }
            if query.is_empty() {
                return true;
            }
            lesson.title.to_lowercase().contains(&query)
                || lesson.content.to_lowercase().contains(&query)
        })
        .cloned()
        .collect();
    sort_lessons(&mut hits);
    hits
}

/// Build the lesson hierarchy from declared `parent` paths.
///
/// Parent resolution tries an exact path match first, then falls back to the
/// first lesson whose path ends with the declared parent. The suffix fallback
/// can match an unintended lesson when paths share a trailing segment; that
/// is a known limitation of the declared-parent scheme, kept as-is.
///
/// Every lesson appears exactly once in the result: an unresolvable parent
/// places the lesson at root level, and lessons caught in a parent cycle are
/// promoted to roots rather than dropped.
pub fn build_hierarchy(lessons: &[Lesson]) -> Vec<HierarchyNode> {
    let index_by_path: HashMap<&str, usize> = lessons
        .iter()
        .enumerate()
        .map(|(i, lesson)| (lesson.path.as_str(), i))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); lessons.len()];
    let mut roots: Vec<usize> = Vec::new();

    for (i, lesson) in lessons.iter().enumerate() {
        let Some(parent) = lesson.parent.as_deref() else {
            roots.push(i);
            continue;
        };
        let found = index_by_path.get(parent).copied().or_else(|| {
            lessons
                .iter()
                .position(|candidate| candidate.path.ends_with(parent))
        });
        match found {
            Some(p) if p != i => children[p].push(i),
            _ => roots.push(i),
        }
    }

    let mut visited = vec![false; lessons.len()];
    let mut nodes: Vec<HierarchyNode> = roots
        .iter()
        .filter_map(|&root| build_node(root, lessons, &children, &mut visited))
        .collect();

    // anything still unvisited sits in a parent cycle: surface it at root
    for i in 0..lessons.len() {
        if !visited[i] {
            if let Some(node) = build_node(i, lessons, &children, &mut visited) {
                nodes.push(node);
            }
        }
    }

    sort_nodes(&mut nodes);
    nodes
}

fn build_node(
    index: usize,
    lessons: &[Lesson],
    children: &[Vec<usize>],
    visited: &mut [bool],
) -> Option<HierarchyNode> {
    if visited[index] {
        return None;
    }
    visited[index] = true;
    let kids = children[index]
        .iter()
        .filter_map(|&child| build_node(child, lessons, children, visited))
        .collect();
    Some(HierarchyNode {
        lesson: lessons[index].clone(),
        children: kids,
    })
}

fn sort_nodes(nodes: &mut [HierarchyNode]) {
    nodes.sort_by(|a, b| compare(&a.lesson, &b.lesson));
    for node in nodes {
        sort_nodes(&mut node.children);
    }
}

/// Previous/next neighbors of `path` in the global ordering, plus the
/// breadcrumb chain of ancestors from a hierarchy root down to `path`.
///
/// An unknown path yields an empty `NavigationInfo`. A lesson whose ancestry
/// cannot be traced still gets a single-element breadcrumb of itself.
pub fn navigation(lessons: &[Lesson], path: &str) -> NavigationInfo {
    let mut ordered: Vec<&Lesson> = lessons.iter().collect();
    ordered.sort_by(|a, b| compare(a, b));

    let Some(index) = ordered.iter().position(|lesson| lesson.path == path) else {
        return NavigationInfo::default();
    };

    let previous = index
        .checked_sub(1)
        .map(|i| LessonRef::from(ordered[i]));
    let next = ordered.get(index + 1).map(|l| LessonRef::from(*l));

    let hierarchy = build_hierarchy(lessons);
    let breadcrumb = find_breadcrumb(&hierarchy, path, &mut Vec::new())
        .unwrap_or_else(|| vec![LessonRef::from(ordered[index])]);

    NavigationInfo {
        previous,
        next,
        breadcrumb,
    }
}

fn find_breadcrumb(
    nodes: &[HierarchyNode],
    target: &str,
    trail: &mut Vec<LessonRef>,
) -> Option<Vec<LessonRef>> {
    for node in nodes {
        trail.push(LessonRef::from(&node.lesson));
        if node.lesson.path == target {
            return Some(trail.clone());
        }
        if let Some(found) = find_breadcrumb(&node.children, target, trail) {
            return Some(found);
        }
        trail.pop();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn lesson(path: &str, title: &str, order: i64) -> Lesson {
        Lesson {
            path: path.to_string(),
            title: title.to_string(),
            order,
            parent: None,
            tags: Vec::new(),
            content: String::new(),
            last_modified: Utc::now(),
        }
    }

    fn with_parent(mut l: Lesson, parent: &str) -> Lesson {
        l.parent = Some(parent.to_string());
        l
    }

    fn with_tags(mut l: Lesson, tags: &[&str]) -> Lesson {
        l.tags = tags.iter().map(|t| t.to_string()).collect();
        l
    }

    #[test]
    fn test_sort_order_then_title() {
        let mut lessons = vec![
            lesson("b.md", "B", 1),
            lesson("a.md", "A", 1),
            lesson("z.md", "Z", 0),
        ];
        sort_lessons(&mut lessons);
        let titles: Vec<&str> = lessons.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Z", "A", "B"]);
    }

    #[test]
    fn test_count_tags() {
        let lessons = vec![
            with_tags(lesson("a.md", "A", 0), &["basics", "loops"]),
            with_tags(lesson("b.md", "B", 1), &["basics"]),
            lesson("c.md", "C", 2),
        ];
        let tags = count_tags(&lessons);
        assert_eq!(tags.get("basics"), Some(&2));
        assert_eq!(tags.get("loops"), Some(&1));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_search_by_query_and_tags() {
        let mut loops = with_tags(lesson("loops.md", "Loops", 0), &["basics"]);
        loops.content = "for while".to_string();
        let mut functions = with_tags(lesson("functions.md", "Functions", 1), &["advanced"]);
        functions.content = "def".to_string();
        let lessons = vec![loops, functions];

        let by_query = search(&lessons, "for", None);
        assert_eq!(by_query.len(), 1);
        assert_eq!(by_query[0].title, "Loops");

        let by_tag = search(&lessons, "", Some(&["advanced".to_string()]));
        assert_eq!(by_tag.len(), 1);
        assert_eq!(by_tag[0].title, "Functions");

        assert!(search(&lessons, "xyz", None).is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let lessons = vec![with_tags(lesson("a.md", "Loops", 0), &["Basics"])];
        assert_eq!(search(&lessons, "LOOPS", None).len(), 1);
        assert_eq!(search(&lessons, "", Some(&["basics".to_string()])).len(), 1);
    }

    #[test]
    fn test_search_empty_tag_list_matches_all() {
        let lessons = vec![lesson("a.md", "A", 0), lesson("b.md", "B", 1)];
        assert_eq!(search(&lessons, "", Some(&[])).len(), 2);
    }

    #[test]
    fn test_hierarchy_nesting_and_order() {
        let lessons = vec![
            lesson("basics.md", "Basics", 0),
            with_parent(lesson("basics/loops.md", "Loops", 2), "basics.md"),
            with_parent(lesson("basics/vars.md", "Variables", 1), "basics.md"),
            lesson("advanced.md", "Advanced", 1),
        ];
        let roots = build_hierarchy(&lessons);
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].lesson.title, "Basics");
        assert_eq!(roots[1].lesson.title, "Advanced");
        let kid_titles: Vec<&str> = roots[0]
            .children
            .iter()
            .map(|c| c.lesson.title.as_str())
            .collect();
        assert_eq!(kid_titles, vec!["Variables", "Loops"]);
    }

    #[test]
    fn test_hierarchy_unresolvable_parent_lands_at_root() {
        let lessons = vec![
            lesson("a.md", "A", 0),
            with_parent(lesson("b.md", "B", 1), "missing.md"),
        ];
        let roots = build_hierarchy(&lessons);
        assert_eq!(roots.len(), 2);
        let total: usize = roots.iter().map(count_nodes).sum();
        assert_eq!(total, lessons.len());
    }

    #[test]
    fn test_hierarchy_suffix_fallback() {
        // parent declared by filename only resolves via the suffix match
        let lessons = vec![
            lesson("chapters/basics.md", "Basics", 0),
            with_parent(lesson("chapters/loops.md", "Loops", 1), "basics.md"),
        ];
        let roots = build_hierarchy(&lessons);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].children.len(), 1);
        assert_eq!(roots[0].children[0].lesson.title, "Loops");
    }

    #[test]
    fn test_hierarchy_parent_cycle_keeps_every_lesson() {
        let lessons = vec![
            with_parent(lesson("a.md", "A", 0), "b.md"),
            with_parent(lesson("b.md", "B", 1), "a.md"),
            lesson("c.md", "C", 2),
        ];
        let roots = build_hierarchy(&lessons);
        let total: usize = roots.iter().map(count_nodes).sum();
        assert_eq!(total, 3);
    }

    fn count_nodes(node: &HierarchyNode) -> usize {
        1 + node.children.iter().map(count_nodes).sum::<usize>()
    }

    #[test]
    fn test_navigation_neighbors() {
        let lessons = vec![
            lesson("a.md", "A", 0),
            lesson("b.md", "B", 1),
            lesson("c.md", "C", 2),
        ];
        let nav = navigation(&lessons, "b.md");
        assert_eq!(nav.previous.as_ref().map(|r| r.path.as_str()), Some("a.md"));
        assert_eq!(nav.next.as_ref().map(|r| r.path.as_str()), Some("c.md"));

        let first = navigation(&lessons, "a.md");
        assert!(first.previous.is_none());
        assert_eq!(first.next.as_ref().map(|r| r.path.as_str()), Some("b.md"));

        let last = navigation(&lessons, "c.md");
        assert!(last.next.is_none());
    }

    #[test]
    fn test_navigation_unknown_path_is_empty() {
        let lessons = vec![lesson("a.md", "A", 0)];
        let nav = navigation(&lessons, "nope.md");
        assert!(nav.previous.is_none());
        assert!(nav.next.is_none());
        assert!(nav.breadcrumb.is_empty());
    }

    #[test]
    fn test_navigation_breadcrumb_chain() {
        let lessons = vec![
            lesson("basics.md", "Basics", 0),
            with_parent(lesson("basics/loops.md", "Loops", 1), "basics.md"),
            with_parent(lesson("basics/loops/for.md", "For", 2), "basics/loops.md"),
        ];
        let nav = navigation(&lessons, "basics/loops/for.md");
        let crumb: Vec<&str> = nav.breadcrumb.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(crumb, vec!["basics.md", "basics/loops.md", "basics/loops/for.md"]);
    }
}
