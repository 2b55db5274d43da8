//! Shared types for component-file script extractors.

/// One `<script>` block pulled out of a component file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptBlock<'a> {
    /// Script body, borrowed from the original file
    pub source_text: &'a str,

    /// Byte offset of `source_text` within the original file
    pub source_offset: usize,

    /// `true` for `<script setup>`
    pub setup: bool,

    /// Value of the `lang` attribute (`js` when absent)
    pub lang: &'a str,
}

/// Errors raised while extracting script blocks.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExtractorError {
    /// File exceeds maximum allowed size
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    /// Too many script tags found in the file
    #[error("Too many script tags: {count} found (max: {max} allowed)")]
    TooManyScriptTags { count: usize, max: usize },

    /// Script tag opened but never closed
    #[error("Unclosed script tag starting at byte position {position}")]
    UnclosedScriptTag { position: usize },
}

/// A component format whose script portion can be extracted.
pub trait Extractor {
    /// Extract every script block from the full file contents.
    fn extract<'a>(&self, source: &'a str) -> Result<Vec<ScriptBlock<'a>>, ExtractorError>;

    /// File extension handled by this extractor, without the dot.
    fn file_extension(&self) -> &'static str;
}

/// Maximum file size in bytes (10 MB)
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Maximum number of script tags to process
pub const MAX_SCRIPT_TAGS: usize = 100;
