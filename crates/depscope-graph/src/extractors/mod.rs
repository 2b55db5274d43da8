//! Component-file script extractors.
//!
//! Multi-part component files (currently Vue SFCs) carry their imports inside
//! `<script>` blocks. These extractors return just those blocks so the parser
//! never sees template or style markup.

mod common;
mod vue;

pub use common::{Extractor, ExtractorError, MAX_FILE_SIZE, MAX_SCRIPT_TAGS, ScriptBlock};
pub use vue::VueExtractor;

use std::path::Path;

/// Extract script blocks from a component file, dispatching on its extension.
///
/// Returns `None` when the extension is not a component format, in which case
/// the whole file is script.
pub fn extract_scripts<'a>(
    path: &Path,
    content: &'a str,
) -> Option<Result<Vec<ScriptBlock<'a>>, ExtractorError>> {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

    match extension {
        "vue" => Some(VueExtractor.extract(content)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_scripts_vue() {
        let path = Path::new("Button.vue");
        let scripts = extract_scripts(path, "<script setup>const x = 1</script>")
            .unwrap()
            .unwrap();
        assert_eq!(scripts.len(), 1);
        assert!(scripts[0].setup);
    }

    #[test]
    fn test_extract_scripts_plain_script() {
        assert!(extract_scripts(Path::new("index.js"), "const x = 1").is_none());
    }
}
