//! Reads a module's bytes and hands back the script text to parse.

use std::path::{Path, PathBuf};

use crate::extractors::{ExtractorError, MAX_FILE_SIZE, extract_scripts};
use crate::parser::Syntax;
use crate::runtime::{Runtime, RuntimeError};

/// Script text ready for the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSource {
    pub text: String,
    pub syntax: Syntax,
}

/// Failure to produce parseable text for a module.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: RuntimeError,
    },

    #[error("File '{}' is too large: {size} bytes (max: {max} bytes)", path.display())]
    TooLarge { path: PathBuf, size: usize, max: usize },

    #[error("File '{}' is not valid UTF-8", path.display())]
    InvalidUtf8 { path: PathBuf },

    #[error("Failed to extract scripts from '{}': {source}", path.display())]
    Extraction {
        path: PathBuf,
        #[source]
        source: ExtractorError,
    },
}

/// Loads module text through a [`Runtime`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuleLoader;

impl ModuleLoader {
    /// Read `path` and return the text the parser should see.
    ///
    /// Component files (`.vue`) are reduced to their `<script>` blocks,
    /// joined in document order by blank lines. A component without any
    /// script yields empty text.
    pub async fn load(&self, path: &Path, runtime: &dyn Runtime) -> Result<LoadedSource, LoadError> {
        let text = self.read_text(path, runtime).await?;

        match extract_scripts(path, &text) {
            Some(Ok(blocks)) => {
                let syntax = blocks
                    .iter()
                    .map(|block| Syntax::from_lang(block.lang))
                    .find(|syntax| *syntax != Syntax::JavaScript)
                    .unwrap_or(Syntax::JavaScript);
                let joined = blocks
                    .iter()
                    .map(|block| block.source_text)
                    .collect::<Vec<_>>()
                    .join("\n\n");

                Ok(LoadedSource {
                    text: joined,
                    syntax,
                })
            }
            Some(Err(source)) => Err(LoadError::Extraction {
                path: path.to_path_buf(),
                source,
            }),
            None => Ok(LoadedSource {
                syntax: Syntax::from_path(path),
                text,
            }),
        }
    }

    async fn read_text(&self, path: &Path, runtime: &dyn Runtime) -> Result<String, LoadError> {
        if let Ok(metadata) = runtime.metadata(path).await {
            if metadata.size > MAX_FILE_SIZE as u64 {
                return Err(LoadError::TooLarge {
                    path: path.to_path_buf(),
                    size: metadata.size as usize,
                    max: MAX_FILE_SIZE,
                });
            }
        }

        let bytes = runtime
            .read_file(path)
            .await
            .map_err(|source| LoadError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        // Metadata may be unavailable or stale
        if bytes.len() > MAX_FILE_SIZE {
            return Err(LoadError::TooLarge {
                path: path.to_path_buf(),
                size: bytes.len(),
                max: MAX_FILE_SIZE,
            });
        }

        String::from_utf8(bytes).map_err(|_| LoadError::InvalidUtf8 {
            path: path.to_path_buf(),
        })
    }
}
