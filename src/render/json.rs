//! JSON rendering for document outlines.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{Error, Result};
use crate::model::DocumentOutline;

/// Indentation used by [`JsonFormat::Pretty`].
const INDENT: &[u8] = b"    ";

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with four-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an outline to JSON. Non-ASCII text is written as-is.
pub fn to_json(outline: &DocumentOutline, format: JsonFormat) -> Result<String> {
    let bytes = to_json_bytes(outline, format)?;
    String::from_utf8(bytes).map_err(|e| Error::Render(format!("JSON is not UTF-8: {}", e)))
}

fn to_json_bytes(outline: &DocumentOutline, format: JsonFormat) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(256 + outline.outline.len() * 64);
    let result = match format {
        JsonFormat::Pretty => {
            let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
            outline.serialize(&mut ser)
        }
        JsonFormat::Compact => serde_json::to_writer(&mut buf, outline),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))?;
    Ok(buf)
}

/// Write an outline as JSON to `path`, replacing any existing file.
pub fn write_json<P: AsRef<Path>>(
    outline: &DocumentOutline,
    path: P,
    format: JsonFormat,
) -> Result<()> {
    let bytes = to_json_bytes(outline, format)?;
    fs::write(path, bytes)?;
    Ok(())
}
