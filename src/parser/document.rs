//! Loading calculation result documents.

use crate::error::{ExtractError, Result};
use roxmltree::{Document, ParsingOptions};
use std::fs;
use std::path::Path;

/// Encoding labels decoded byte-for-byte.
const LATIN1_LABELS: &[&str] = &[
    "iso-8859-1",
    "iso8859-1",
    "iso_8859-1",
    "latin1",
    "latin-1",
    "l1",
];

/// Read a result file into memory.
///
/// Text that does not decode under the document's encoding is rejected
/// rather than repaired.
pub fn read_document(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(ExtractError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = fs::read(path)?;
    let content = decode(&bytes).map_err(|encoding| ExtractError::Encoding {
        path: path.to_path_buf(),
        encoding,
    })?;

    if content.trim().is_empty() {
        return Err(ExtractError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    Ok(content)
}

/// Decode raw file bytes.
///
/// A UTF-16 byte order mark wins. Otherwise the `encoding` of the XML
/// declaration applies, UTF-8 when absent. On failure the encoding label
/// is returned.
fn decode(bytes: &[u8]) -> std::result::Result<String, String> {
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return decode_utf16(rest, u16::from_le_bytes).ok_or_else(|| "UTF-16LE".to_string());
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return decode_utf16(rest, u16::from_be_bytes).ok_or_else(|| "UTF-16BE".to_string());
    }

    // Exports occasionally carry a UTF-8 byte order mark.
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);

    match declared_encoding(bytes) {
        Some(label) if LATIN1_LABELS.contains(&label.to_ascii_lowercase().as_str()) => {
            Ok(bytes.iter().map(|&b| char::from(b)).collect())
        }
        label => String::from_utf8(bytes.to_vec())
            .map_err(|_| label.unwrap_or_else(|| "UTF-8".to_string())),
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .ok()
}

/// The `encoding` pseudo-attribute of a leading XML declaration.
fn declared_encoding(bytes: &[u8]) -> Option<String> {
    let prolog = bytes.strip_prefix(b"<?xml")?;
    let end = prolog.windows(2).position(|w| w == b"?>")?;
    let decl = std::str::from_utf8(&prolog[..end]).ok()?;

    let value = decl
        .split_once("encoding")?
        .1
        .trim_start()
        .strip_prefix('=')?
        .trim_start();
    let quote = value.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let label = value[1..].split(quote).next()?.trim();
    Some(label.to_string())
}

/// Parse document text, attributing failures to `filename`.
///
/// Internal DTDs are accepted; some exporters emit a `DOCTYPE`.
pub fn parse_document<'input>(content: &'input str, filename: &str) -> Result<Document<'input>> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(content, options).map_err(|source| ExtractError::Xml {
        filename: filename.to_string(),
        source,
    })
}

/// File name component used as record provenance.
pub fn source_filename(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
