//! Vue single-file-component script extractor.
//!
//! Only the `<script>` portion of a `.vue` file takes part in the import graph;
//! template and style blocks are skipped without being parsed.

use memchr::memmem;

use super::common::{Extractor, ExtractorError, MAX_FILE_SIZE, MAX_SCRIPT_TAGS, ScriptBlock};

const OPEN_TAG: &[u8] = b"<script";
const CLOSE_TAG: &[u8] = b"</script>";

/// Vue SFC script extractor
#[derive(Debug, Clone, Copy)]
pub struct VueExtractor;

impl Extractor for VueExtractor {
    fn extract<'a>(&self, source: &'a str) -> Result<Vec<ScriptBlock<'a>>, ExtractorError> {
        if source.len() > MAX_FILE_SIZE {
            return Err(ExtractorError::FileTooLarge {
                size: source.len(),
                max: MAX_FILE_SIZE,
            });
        }

        let mut blocks = Vec::new();
        let mut pointer = 0;

        while let Some(block) = next_script(source, &mut pointer)? {
            blocks.push(block);

            if blocks.len() > MAX_SCRIPT_TAGS {
                return Err(ExtractorError::TooManyScriptTags {
                    count: blocks.len(),
                    max: MAX_SCRIPT_TAGS,
                });
            }
        }

        Ok(blocks)
    }

    fn file_extension(&self) -> &'static str {
        "vue"
    }
}

/// Finds the next `<script>` block at or after `pointer`, advancing it past the block.
fn next_script<'a>(
    source: &'a str,
    pointer: &mut usize,
) -> Result<Option<ScriptBlock<'a>>, ExtractorError> {
    let bytes = source.as_bytes();

    loop {
        let Some(tag_start) = find(bytes, *pointer, OPEN_TAG) else {
            return Ok(None);
        };
        *pointer = tag_start + OPEN_TAG.len();

        // Reject `<scripts>`, `<scripting>` and similar
        if let Some(&next) = bytes.get(*pointer) {
            if !matches!(next, b' ' | b'\t' | b'\n' | b'\r' | b'>' | b'/') {
                continue;
            }
        }

        let tag_end = find_closing_angle(bytes, *pointer).ok_or(
            ExtractorError::UnclosedScriptTag {
                position: tag_start,
            },
        )?;

        let attributes_text = &source[*pointer..tag_end];
        let setup = attributes(attributes_text).any(|(name, _)| name == "setup");
        let lang = lang_attribute(attributes_text);

        // Self-closing `<script ... />`
        if tag_end > 0 && bytes[tag_end - 1] == b'/' {
            *pointer = tag_end + 1;
            return Ok(Some(ScriptBlock {
                source_text: "",
                source_offset: tag_end + 1,
                setup,
                lang,
            }));
        }

        let content_start = tag_end + 1;
        let content_end = find(bytes, content_start, CLOSE_TAG).ok_or(
            ExtractorError::UnclosedScriptTag {
                position: tag_start,
            },
        )?;
        *pointer = content_end + CLOSE_TAG.len();

        return Ok(Some(ScriptBlock {
            source_text: &source[content_start..content_end],
            source_offset: content_start,
            setup,
            lang,
        }));
    }
}

fn find(bytes: &[u8], start: usize, needle: &[u8]) -> Option<usize> {
    memmem::find(&bytes[start..], needle).map(|pos| start + pos)
}

/// Finds the `>` closing an opening tag, ignoring any inside quoted attribute values.
fn find_closing_angle(bytes: &[u8], start: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;

    for (i, &byte) in bytes[start..].iter().enumerate() {
        match (byte, quote) {
            (b'"' | b'\'', None) => quote = Some(byte),
            (b, Some(q)) if b == q => quote = None,
            (b'>', None) => return Some(start + i),
            _ => {}
        }
    }

    None
}

/// Splits the inside of an opening tag into `(name, value)` pairs.
///
/// Values may be double-quoted, single-quoted or bare, with optional
/// whitespace around `=`. Boolean attributes have no value.
fn attributes(source: &str) -> impl Iterator<Item = (&str, Option<&str>)> {
    let is_name_end = |c: char| c.is_whitespace() || matches!(c, '=' | '/' | '>');
    let mut rest = source;

    std::iter::from_fn(move || {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '/');
        if rest.is_empty() {
            return None;
        }

        let name_end = rest.find(is_name_end).unwrap_or(rest.len()).max(1);
        let name = &rest[..name_end];
        rest = &rest[name_end..];

        let after_name = rest.trim_start();
        let Some(value_part) = after_name.strip_prefix('=') else {
            return Some((name, None));
        };
        let value_part = value_part.trim_start();

        let value = match value_part.chars().next() {
            Some(q @ ('"' | '\'')) => {
                let end = value_part[1..].find(q).map_or(value_part.len(), |i| i + 1);
                rest = value_part.get(end + 1..).unwrap_or("");
                &value_part[1..end]
            }
            _ => {
                let end = value_part
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(value_part.len());
                rest = &value_part[end..];
                &value_part[..end]
            }
        };

        Some((name, Some(value)))
    })
}

fn lang_attribute(source: &str) -> &str {
    attributes(source)
        .find(|(name, _)| name.eq_ignore_ascii_case("lang"))
        .and_then(|(_, value)| value)
        .filter(|value| !value.is_empty())
        .unwrap_or("js")
}
