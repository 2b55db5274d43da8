//! Shared, concurrently-mutated dependency state.

use std::path::{Path, PathBuf};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rustc_hash::{FxBuildHasher, FxHashSet};

use crate::descriptor::Descriptor;
use crate::snapshot::{GraphNode, GraphSnapshot};

#[derive(Debug, Default)]
struct NodeEntry {
    descriptor: Option<Descriptor>,
    dependents: FxHashSet<PathBuf>,
}

/// Node table shared by every task of a scan.
///
/// Insertion through [`DepState::claim`] is the at-most-once gate: exactly
/// one caller sees `true` for a given path and is the only one to load and
/// parse it.
#[derive(Debug, Default)]
pub struct DepState {
    nodes: DashMap<PathBuf, NodeEntry, FxBuildHasher>,
}

impl DepState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically insert a node for `path`. Returns `true` for the caller
    /// that created it.
    pub fn claim(&self, path: &Path) -> bool {
        match self.nodes.entry(path.to_path_buf()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(NodeEntry::default());
                true
            }
        }
    }

    /// Store a node's descriptor. The first write wins.
    pub fn set_descriptor(&self, path: &Path, descriptor: Descriptor) -> bool {
        match self.nodes.get_mut(path) {
            Some(mut node) if node.descriptor.is_none() => {
                node.descriptor = Some(descriptor);
                true
            }
            _ => false,
        }
    }

    /// Record that `importer` imports `path`. Duplicate edges collapse.
    pub fn add_dependent(&self, path: &Path, importer: &Path) -> bool {
        self.nodes
            .entry(path.to_path_buf())
            .or_default()
            .dependents
            .insert(importer.to_path_buf())
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.nodes.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Copy the table into an ordered snapshot.
    ///
    /// Nodes whose descriptor was never set (load or parse failed) get an
    /// empty one.
    pub fn snapshot(&self, root: &Path, entry: &Path) -> GraphSnapshot {
        let mut snapshot = GraphSnapshot::new(root, entry);

        for item in self.nodes.iter() {
            let mut dependents: Vec<PathBuf> = item.dependents.iter().cloned().collect();
            dependents.sort();

            snapshot.nodes.insert(
                item.key().clone(),
                GraphNode {
                    descriptor: item.descriptor.clone().unwrap_or_default(),
                    dependents,
                },
            );
        }

        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_claim_once() {
        let state = DepState::new();
        let path = Path::new("/r/a.js");
        assert!(state.claim(path));
        assert!(!state.claim(path));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_descriptor_first_write_wins() {
        let state = DepState::new();
        let path = Path::new("/r/a.js");
        state.claim(path);

        let first = Descriptor::from([("Description".to_string(), "one".to_string())]);
        assert!(state.set_descriptor(path, first.clone()));
        assert!(!state.set_descriptor(path, Descriptor::new()));

        let snapshot = state.snapshot(Path::new("/r"), path);
        assert_eq!(snapshot.nodes[path].descriptor, first);
    }

    #[test]
    fn test_set_descriptor_requires_claim() {
        let state = DepState::new();
        assert!(!state.set_descriptor(Path::new("/r/a.js"), Descriptor::new()));
        assert!(state.is_empty());
    }

    #[test]
    fn test_dependents_deduplicated_and_sorted() {
        let state = DepState::new();
        let target = Path::new("/r/shared.js");
        state.claim(target);
        assert!(state.add_dependent(target, Path::new("/r/z.js")));
        assert!(state.add_dependent(target, Path::new("/r/a.js")));
        assert!(!state.add_dependent(target, Path::new("/r/z.js")));

        let snapshot = state.snapshot(Path::new("/r"), Path::new("/r/main.js"));
        assert_eq!(
            snapshot.nodes[target].dependents,
            vec![PathBuf::from("/r/a.js"), PathBuf::from("/r/z.js")]
        );
    }

    #[test]
    fn test_concurrent_claims_have_one_winner() {
        let state = Arc::new(DepState::new());
        let winners = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let state = Arc::clone(&state);
                let winners = Arc::clone(&winners);
                std::thread::spawn(move || {
                    if state.claim(Path::new("/r/hot.js")) {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(winners.load(Ordering::SeqCst), 1);
    }
}
