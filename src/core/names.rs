//! core::names
//!
//! Merging flat hierarchical names into a navigable forest.
//!
//! # Architecture
//!
//! Catalog listings (topics, services, params, nodes) arrive as flat lists of
//! slash-delimited names. Each name is first decomposed into a single chain of
//! [`PathNode`]s, one per segment, and the chains are then merged level by
//! level so that shared prefixes collapse into one node.
//!
//! # Invariants
//!
//! - `full_path` uniquely identifies a node within the forest
//! - No two siblings share a `name`
//! - Every input name is reachable as a root-to-node walk
//! - A node is a leaf if at least one input name ended at it
//!
//! Segments keep their leading separator (`"/a/b"` decomposes into `"/a"` and
//! `"/b"`), and `full_path` is built by plain concatenation, so repeated
//! separators survive verbatim.
//!
//! # Example
//!
//! ```
//! use rosdesk::core::names::to_forest;
//!
//! let forest = to_forest(["/a/b", "/a/c", "/x"]);
//! assert_eq!(forest.roots().len(), 2);
//!
//! let a = forest.find("/a").unwrap();
//! assert!(!a.is_leaf);
//! assert_eq!(a.children.len(), 2);
//! assert!(forest.find("/a/c").unwrap().is_leaf);
//! ```

use std::collections::HashMap;

use serde::Serialize;

/// The hierarchy separator.
pub const SEPARATOR: char = '/';

/// One segment of a hierarchical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathNode {
    /// The segment, including its leading separator when it had one.
    pub name: String,
    /// Cumulative prefix up to and including this segment.
    pub full_path: String,
    /// `full_path` of the parent, `None` for roots.
    pub parent_path: Option<String>,
    /// Child segments in first-occurrence order.
    pub children: Vec<PathNode>,
    /// True if at least one source name terminated at this node.
    pub is_leaf: bool,
}

impl PathNode {
    /// The segment without its leading separator, for display.
    pub fn label(&self) -> &str {
        self.name.strip_prefix(SEPARATOR).unwrap_or(&self.name)
    }

    /// Look up a direct child by segment name.
    pub fn child(&self, name: &str) -> Option<&PathNode> {
        self.children.iter().find(|c| c.name == name)
    }
}

/// Decompose one hierarchical name into a chain of nodes.
///
/// The name is split at the first separator after position 0; the remainder
/// (which starts with that separator) is decomposed recursively. Only the
/// final segment is marked as a leaf.
///
/// # Example
///
/// ```
/// use rosdesk::core::names::decompose;
///
/// let root = decompose("/robot/arm/joint_states");
/// assert_eq!(root.name, "/robot");
/// assert!(!root.is_leaf);
///
/// let leaf = &root.children[0].children[0];
/// assert_eq!(leaf.name, "/joint_states");
/// assert_eq!(leaf.full_path, "/robot/arm/joint_states");
/// assert_eq!(leaf.parent_path.as_deref(), Some("/robot/arm"));
/// assert!(leaf.is_leaf);
/// ```
pub fn decompose(path: &str) -> PathNode {
    decompose_under(path, None)
}

fn decompose_under(rest: &str, parent: Option<&str>) -> PathNode {
    // '/' is ASCII, so byte offsets are char boundaries.
    let split = rest
        .char_indices()
        .skip(1)
        .find(|&(_, c)| c == SEPARATOR)
        .map(|(i, _)| i);

    let (name, tail) = match split {
        Some(i) => (&rest[..i], Some(&rest[i..])),
        None => (rest, None),
    };

    let full_path = match parent {
        Some(p) => format!("{}{}", p, name),
        None => name.to_string(),
    };

    let children = match tail {
        Some(tail) => vec![decompose_under(tail, Some(&full_path))],
        None => Vec::new(),
    };

    PathNode {
        name: name.to_string(),
        parent_path: parent.map(str::to_string),
        is_leaf: tail.is_none(),
        children,
        full_path,
    }
}

/// Merge nodes of the same level.
///
/// Nodes with equal `name` are unified: their children lists are
/// concatenated and `is_leaf` is OR-ed. The first occurrence keeps its slot
/// and later duplicates are dropped. The merge then descends into every
/// surviving node's (concatenated) children.
pub fn merge(nodes: Vec<PathNode>) -> Vec<PathNode> {
    let mut merged: Vec<PathNode> = Vec::with_capacity(nodes.len());
    let mut slots: HashMap<String, usize> = HashMap::new();

    for node in nodes {
        match slots.get(&node.name) {
            Some(&slot) => {
                let existing = &mut merged[slot];
                existing.is_leaf |= node.is_leaf;
                existing.children.extend(node.children);
            }
            None => {
                slots.insert(node.name.clone(), merged.len());
                merged.push(node);
            }
        }
    }

    for node in &mut merged {
        let children = std::mem::take(&mut node.children);
        node.children = merge(children);
    }

    merged
}

/// Build a forest from a flat list of hierarchical names.
pub fn to_forest<I, S>(names: I) -> NameForest
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let chains = names
        .into_iter()
        .map(|name| decompose(name.as_ref()))
        .collect();
    NameForest {
        roots: merge(chains),
    }
}

/// A merged forest of [`PathNode`]s.
///
/// Forests are rebuilt from scratch on every catalog refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NameForest {
    roots: Vec<PathNode>,
}

impl NameForest {
    /// Top-level nodes in first-occurrence order.
    pub fn roots(&self) -> &[PathNode] {
        &self.roots
    }

    /// Whether the forest has no nodes.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Find a node by its cumulative path.
    ///
    /// Descends only into nodes whose `full_path` is a segment-aligned prefix
    /// of `full_path`.
    pub fn find(&self, full_path: &str) -> Option<&PathNode> {
        let mut level = &self.roots;
        loop {
            if let Some(hit) = level.iter().find(|n| n.full_path == full_path) {
                return Some(hit);
            }
            level = &level
                .iter()
                .find(|n| {
                    full_path
                        .strip_prefix(n.full_path.as_str())
                        .is_some_and(|rest| rest.starts_with(SEPARATOR))
                })?
                .children;
        }
    }

    /// All nodes in depth-first pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &PathNode> {
        let mut stack: Vec<&PathNode> = self.roots.iter().rev().collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Full paths of every leaf, in depth-first order.
    ///
    /// These are the entries a consumer makes selectable.
    pub fn leaves(&self) -> Vec<&str> {
        self.iter()
            .filter(|n| n.is_leaf)
            .map(|n| n.full_path.as_str())
            .collect()
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.iter().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod decompose {
        use super::*;

        #[test]
        fn single_segment() {
            let node = decompose("/rosout");
            assert_eq!(node.name, "/rosout");
            assert_eq!(node.full_path, "/rosout");
            assert_eq!(node.parent_path, None);
            assert!(node.is_leaf);
            assert!(node.children.is_empty());
        }

        #[test]
        fn nested_chain() {
            let node = decompose("/a/b/c");
            assert_eq!(node.name, "/a");
            assert!(!node.is_leaf);

            let b = &node.children[0];
            assert_eq!(b.name, "/b");
            assert_eq!(b.full_path, "/a/b");
            assert_eq!(b.parent_path.as_deref(), Some("/a"));
            assert!(!b.is_leaf);

            let c = &b.children[0];
            assert_eq!(c.full_path, "/a/b/c");
            assert!(c.is_leaf);
        }

        #[test]
        fn without_leading_separator() {
            let node = decompose("a/b");
            assert_eq!(node.name, "a");
            assert_eq!(node.children[0].name, "/b");
            assert_eq!(node.children[0].full_path, "a/b");
        }

        #[test]
        fn repeated_separators_are_preserved() {
            let node = decompose("/a//b");
            assert_eq!(node.name, "/a");
            let empty = &node.children[0];
            assert_eq!(empty.name, "/");
            assert_eq!(empty.full_path, "/a/");
            let b = &empty.children[0];
            assert_eq!(b.name, "/b");
            assert_eq!(b.full_path, "/a//b");
            assert!(b.is_leaf);
        }

        #[test]
        fn trailing_separator_yields_bare_leaf() {
            let node = decompose("/a/");
            assert_eq!(node.children[0].name, "/");
            assert_eq!(node.children[0].full_path, "/a/");
            assert!(node.children[0].is_leaf);
        }

        #[test]
        fn label_strips_separator() {
            let node = decompose("/camera");
            assert_eq!(node.label(), "camera");
        }
    }

    mod merge {
        use super::*;

        #[test]
        fn shared_prefix_collapses() {
            let merged = merge(vec![decompose("/a/b"), decompose("/a/c")]);
            assert_eq!(merged.len(), 1);
            let names: Vec<_> = merged[0].children.iter().map(|c| c.name.as_str()).collect();
            assert_eq!(names, vec!["/b", "/c"]);
        }

        #[test]
        fn leaf_flag_is_or_ed() {
            // "/a" is both a name on its own and a prefix of "/a/b".
            let merged = merge(vec![decompose("/a/b"), decompose("/a")]);
            assert_eq!(merged.len(), 1);
            assert!(merged[0].is_leaf);
            assert_eq!(merged[0].children.len(), 1);
        }

        #[test]
        fn preserves_first_occurrence_order() {
            let merged = merge(vec![
                decompose("/z/1"),
                decompose("/a/1"),
                decompose("/z/2"),
            ]);
            let names: Vec<_> = merged.iter().map(|n| n.name.as_str()).collect();
            assert_eq!(names, vec!["/z", "/a"]);
        }

        #[test]
        fn deep_duplicates_merge_recursively() {
            let merged = merge(vec![
                decompose("/a/b/c"),
                decompose("/a/b/d"),
                decompose("/a/b/c"),
            ]);
            let b = &merged[0].children;
            assert_eq!(b.len(), 1);
            let leaves: Vec<_> = b[0].children.iter().map(|n| n.name.as_str()).collect();
            assert_eq!(leaves, vec!["/c", "/d"]);
        }

        #[test]
        fn empty_input() {
            assert!(merge(Vec::new()).is_empty());
        }
    }

    mod forest {
        use super::*;

        #[test]
        fn example_listing() {
            let forest = to_forest(["/a/b", "/a/c", "/x"]);
            let roots: Vec<_> = forest.roots().iter().map(|n| n.label()).collect();
            assert_eq!(roots, vec!["a", "x"]);

            let a = forest.find("/a").unwrap();
            assert!(!a.is_leaf);
            assert!(a.child("/b").unwrap().is_leaf);
            assert!(a.child("/c").unwrap().is_leaf);
            assert!(forest.find("/x").unwrap().is_leaf);
        }

        #[test]
        fn find_missing() {
            let forest = to_forest(["/a/b"]);
            assert!(forest.find("/a/c").is_none());
            assert!(forest.find("/q").is_none());
        }

        #[test]
        fn find_does_not_match_partial_segment() {
            for names in [["/ab", "/a/b"], ["/a/b", "/ab"]] {
                let forest = to_forest(names);
                assert_eq!(forest.find("/a/b").unwrap().full_path, "/a/b");
                assert_eq!(forest.find("/ab").unwrap().full_path, "/ab");
            }
        }

        #[test]
        fn leaves_in_order() {
            let forest = to_forest(["/a/b", "/x", "/a/c"]);
            assert_eq!(forest.leaves(), vec!["/a/b", "/a/c", "/x"]);
        }

        #[test]
        fn len_counts_distinct_prefixes() {
            let forest = to_forest(["/a/b", "/a/c", "/x", "/a/b"]);
            assert_eq!(forest.len(), 4);
        }

        #[test]
        fn empty_forest() {
            let forest = to_forest(Vec::<String>::new());
            assert!(forest.is_empty());
            assert_eq!(forest.len(), 0);
        }
    }
}
