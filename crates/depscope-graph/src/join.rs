//! Joining change lists from version control onto a graph snapshot.
//!
//! Each changed file is annotated with the descriptor and direct dependents
//! of its node, so a reviewer sees both what a file is and who imports it.

use std::path::{MAIN_SEPARATOR, Path};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::descriptor::Descriptor;
use crate::snapshot::GraphSnapshot;

/// One changed file as reported by a diff source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffRecord {
    /// Path with `/` separators, relative to the repository root or absolute
    pub path: String,

    /// Whatever else the source reports (change type, rename origin, ...)
    #[serde(flatten)]
    pub meta: Map<String, Value>,
}

impl DiffRecord {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            meta: Map::new(),
        }
    }

    /// Attach a metadata field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Path with `/` replaced by the platform separator.
    pub fn native_path(&self) -> String {
        if MAIN_SEPARATOR == '/' {
            self.path.clone()
        } else {
            self.path.replace('/', &MAIN_SEPARATOR.to_string())
        }
    }
}

/// A diff record with graph information attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRecord {
    pub path: String,

    #[serde(flatten)]
    pub meta: Map<String, Value>,

    /// Descriptor of the file's node
    pub descriptor: Descriptor,

    /// Direct importers, relative to the repository root
    pub dependents: Vec<String>,
}

/// Source of changed-file records (git, a JSON file, ...).
pub trait DiffSource {
    type Error;

    fn changed_files(&self) -> Result<Vec<DiffRecord>, Self::Error>;
}

/// Annotate each diff record with its node's descriptor and dependents.
///
/// Output order follows input order. Records whose file is not in the graph
/// are dropped: most changed files (styles, tests, docs) are outside it.
/// Graph fields replace metadata keys of the same name.
pub fn join(diff: &[DiffRecord], snapshot: &GraphSnapshot) -> Vec<JoinedRecord> {
    diff.iter()
        .filter_map(|record| {
            let native = record.native_path();
            let (_, node) = snapshot.lookup(Path::new(&native))?;

            let mut meta = record.meta.clone();
            meta.remove("descriptor");
            meta.remove("dependents");
            meta.remove("path");

            Some(JoinedRecord {
                path: record.path.clone(),
                meta,
                descriptor: node.descriptor.clone(),
                dependents: node
                    .dependents
                    .iter()
                    .map(|dep| snapshot.display_path(dep))
                    .collect(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::GraphNode;
    use std::path::PathBuf;

    fn snapshot() -> GraphSnapshot {
        let mut snapshot = GraphSnapshot::new("/r", "/r/src/main.js");
        snapshot.nodes.insert(
            PathBuf::from("/r/src/main.js"),
            GraphNode::default(),
        );
        snapshot.nodes.insert(
            PathBuf::from("/r/src/views/List.vue"),
            GraphNode {
                descriptor: Descriptor::from([("Description".to_string(), "list".to_string())]),
                dependents: vec![PathBuf::from("/r/src/main.js")],
            },
        );
        snapshot
    }

    #[test]
    fn test_join_annotates_known_files() {
        let diff = vec![DiffRecord::new("src/views/List.vue").with("type", "modified")];
        let joined = join(&diff, &snapshot());

        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].descriptor["Description"], "list");
        assert_eq!(joined[0].dependents, vec!["src/main.js".to_string()]);
        assert_eq!(joined[0].meta["type"], "modified");
    }

    #[test]
    fn test_join_drops_files_outside_graph() {
        let diff = vec![DiffRecord::new("README.md"), DiffRecord::new("src/a.css")];
        assert!(join(&diff, &snapshot()).is_empty());
    }

    #[test]
    fn test_join_preserves_order_and_absolute_paths() {
        let diff = vec![
            DiffRecord::new("README.md"),
            DiffRecord::new("/r/src/views/List.vue"),
            DiffRecord::new("src/main.js"),
        ];
        let joined = join(&diff, &snapshot());

        let paths: Vec<_> = joined.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/r/src/views/List.vue", "src/main.js"]);
        assert_eq!(joined[0].dependents.len(), 1);
        assert!(joined[1].descriptor.is_empty());
    }

    #[test]
    fn test_graph_fields_replace_metadata() {
        let diff = vec![DiffRecord::new("src/views/List.vue").with("dependents", "stale")];
        let joined = join(&diff, &snapshot());

        let json = serde_json::to_value(&joined[0]).unwrap();
        assert_eq!(json["dependents"][0], "src/main.js");
        assert_eq!(json["path"], "src/views/List.vue");
    }

    #[test]
    fn test_diff_record_keeps_unknown_fields() {
        let record: DiffRecord =
            serde_json::from_str(r#"{"path":"a.js","type":"renamed","from":"b.js"}"#).unwrap();
        assert_eq!(record.path, "a.js");
        assert_eq!(record.meta["from"], "b.js");
    }
}
