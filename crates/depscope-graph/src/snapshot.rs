//! Immutable view of a finished scan.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::{Path, PathBuf};

use path_clean::PathClean;
use serde::{Deserialize, Serialize};

use crate::descriptor::Descriptor;

/// One reachable file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Metadata from the file's descriptor comment
    pub descriptor: Descriptor,

    /// Files that import this one, sorted
    pub dependents: Vec<PathBuf>,
}

/// Reverse dependency graph of every file reachable from the entry.
///
/// Keys are canonical absolute paths. The entry is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub root: PathBuf,
    pub entry: PathBuf,
    pub nodes: BTreeMap<PathBuf, GraphNode>,
}

impl GraphSnapshot {
    pub fn new(root: impl Into<PathBuf>, entry: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entry: entry.into(),
            nodes: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, path: &Path) -> Option<&GraphNode> {
        self.nodes.get(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.nodes.contains_key(path)
    }

    /// Look up a path as written by an outside tool.
    ///
    /// Relative paths are taken from the repository root; both forms are
    /// normalized before the lookup.
    pub fn lookup(&self, path: &Path) -> Option<(&Path, &GraphNode)> {
        let key = if path.is_absolute() {
            path.clean()
        } else {
            self.root.join(path).clean()
        };

        self.nodes
            .get_key_value(&key)
            .map(|(path, node)| (path.as_path(), node))
    }

    /// Path relative to the root when it lies inside it.
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }

    /// Files that `path` imports, i.e. the nodes listing it as a dependent.
    pub fn dependencies_of(&self, path: &Path) -> Vec<&Path> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.dependents.iter().any(|d| d == path))
            .map(|(dep, _)| dep.as_path())
            .collect()
    }

    /// Every file that reaches `path` through one or more imports.
    ///
    /// `path` itself is excluded unless it sits on a cycle.
    pub fn transitive_dependents(&self, path: &Path) -> BTreeSet<PathBuf> {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::from([path.to_path_buf()]);

        while let Some(current) = queue.pop_front() {
            let Some(node) = self.nodes.get(&current) else {
                continue;
            };
            for dependent in &node.dependents {
                if seen.insert(dependent.clone()) {
                    queue.push_back(dependent.clone());
                }
            }
        }

        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(dependents: &[&str]) -> GraphNode {
        GraphNode {
            descriptor: Descriptor::new(),
            dependents: dependents.iter().map(PathBuf::from).collect(),
        }
    }

    // main -> a -> b, main -> b, b -> c
    fn sample() -> GraphSnapshot {
        let mut snapshot = GraphSnapshot::new("/r", "/r/main.js");
        snapshot.nodes.insert("/r/main.js".into(), node(&[]));
        snapshot.nodes.insert("/r/a.js".into(), node(&["/r/main.js"]));
        snapshot
            .nodes
            .insert("/r/b.js".into(), node(&["/r/a.js", "/r/main.js"]));
        snapshot.nodes.insert("/r/c.js".into(), node(&["/r/b.js"]));
        snapshot
    }

    #[test]
    fn test_lookup_relative_and_absolute() {
        let snapshot = sample();
        assert!(snapshot.lookup(Path::new("a.js")).is_some());
        assert!(snapshot.lookup(Path::new("./x/../a.js")).is_some());
        assert!(snapshot.lookup(Path::new("/r/a.js")).is_some());
        assert!(snapshot.lookup(Path::new("missing.js")).is_none());
    }

    #[test]
    fn test_display_path() {
        let snapshot = sample();
        assert_eq!(snapshot.display_path(Path::new("/r/src/a.js")), "src/a.js");
        assert_eq!(snapshot.display_path(Path::new("/elsewhere/a.js")), "/elsewhere/a.js");
    }

    #[test]
    fn test_dependencies_of() {
        let snapshot = sample();
        assert_eq!(
            snapshot.dependencies_of(Path::new("/r/main.js")),
            vec![Path::new("/r/a.js"), Path::new("/r/b.js")]
        );
    }

    #[test]
    fn test_transitive_dependents() {
        let impacted = sample().transitive_dependents(Path::new("/r/c.js"));
        let expected: BTreeSet<PathBuf> = ["/r/b.js", "/r/a.js", "/r/main.js"]
            .iter()
            .map(PathBuf::from)
            .collect();
        assert_eq!(impacted, expected);
    }

    #[test]
    fn test_transitive_dependents_on_cycle_includes_self() {
        let mut snapshot = GraphSnapshot::new("/r", "/r/a.js");
        snapshot.nodes.insert("/r/a.js".into(), node(&["/r/b.js"]));
        snapshot.nodes.insert("/r/b.js".into(), node(&["/r/a.js"]));

        let impacted = snapshot.transitive_dependents(Path::new("/r/a.js"));
        assert!(impacted.contains(Path::new("/r/a.js")));
        assert!(impacted.contains(Path::new("/r/b.js")));
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["nodes"]["/r/b.js"]["dependents"][1], "/r/main.js");
    }
}
