//! C-ABI FFI bindings for cross-language integration.
//!
//! This module provides a C-compatible API for using pdfoutline from other
//! languages such as C#, Python, and Node.js. Outlines are returned as JSON.

use std::ffi::{c_char, CStr, CString};
use std::path::Path;
use std::ptr;
use std::time::Duration;

use crate::outline::NumberingScheme;
use crate::parser::SpanSource;
use crate::render::{to_json, JsonFormat};
use crate::{Outliner, PdfParser};

/// Result structure returned by FFI functions.
#[repr(C)]
pub struct OutlineFfiResult {
    /// Whether the operation succeeded.
    pub success: bool,
    /// The result data (null if failed). Must be freed with `pdfoutline_free_string`.
    pub data: *mut c_char,
    /// Error message (null if succeeded). Must be freed with `pdfoutline_free_string`.
    pub error: *mut c_char,
}

impl OutlineFfiResult {
    fn success(data: String) -> Self {
        Self {
            success: true,
            data: CString::new(data).unwrap_or_default().into_raw(),
            error: ptr::null_mut(),
        }
    }

    fn error(message: String) -> Self {
        Self {
            success: false,
            data: ptr::null_mut(),
            error: CString::new(message).unwrap_or_default().into_raw(),
        }
    }
}

/// Options for outline extraction via FFI.
#[repr(C)]
pub struct OutlineFfiOptions {
    /// Pretty-print the JSON with four-space indentation.
    pub pretty: bool,
    /// Skip unreadable pages instead of failing.
    pub lenient: bool,
    /// Use the two-component-only numbering rule.
    pub legacy_numbering: bool,
    /// Prefer the metadata title when present.
    pub prefer_metadata_title: bool,
    /// Per-document deadline in milliseconds (0 = none).
    pub deadline_ms: u64,
}

impl Default for OutlineFfiOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            lenient: true,
            legacy_numbering: false,
            prefer_metadata_title: false,
            deadline_ms: 0,
        }
    }
}

impl OutlineFfiOptions {
    fn outliner(&self) -> Outliner {
        let mut outliner = Outliner::new();
        if self.lenient {
            outliner = outliner.lenient();
        }
        if self.legacy_numbering {
            outliner = outliner.with_numbering(NumberingScheme::Legacy);
        }
        if self.prefer_metadata_title {
            outliner = outliner.prefer_metadata_title();
        }
        if self.deadline_ms > 0 {
            outliner = outliner.with_deadline(Duration::from_millis(self.deadline_ms));
        }
        outliner
    }

    fn format(&self) -> JsonFormat {
        if self.pretty {
            JsonFormat::Pretty
        } else {
            JsonFormat::Compact
        }
    }
}

/// Borrow a C string argument as UTF-8.
unsafe fn str_arg<'a>(ptr: *const c_char, what: &str) -> Result<&'a str, String> {
    if ptr.is_null() {
        return Err(format!("{} cannot be null", what));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| format!("Invalid UTF-8 {}", what.to_lowercase()))
}

/// Extract the outline of a PDF file as JSON.
///
/// # Safety
///
/// The `path` must be a valid null-terminated UTF-8 string.
/// The returned result must be freed with `pdfoutline_free_result`.
#[no_mangle]
pub unsafe extern "C" fn pdfoutline_extract(path: *const c_char, pretty: bool) -> OutlineFfiResult {
    let options = OutlineFfiOptions {
        pretty,
        ..OutlineFfiOptions::default()
    };
    pdfoutline_extract_with_options(path, options)
}

/// Extract the outline of a PDF file as JSON, with options.
///
/// # Safety
///
/// The `path` must be a valid null-terminated UTF-8 string.
/// The returned result must be freed with `pdfoutline_free_result`.
#[no_mangle]
pub unsafe extern "C" fn pdfoutline_extract_with_options(
    path: *const c_char,
    options: OutlineFfiOptions,
) -> OutlineFfiResult {
    let path_str = match str_arg(path, "Path") {
        Ok(s) => s,
        Err(e) => return OutlineFfiResult::error(e),
    };

    match extract_internal(Path::new(path_str), &options) {
        Ok(json) => OutlineFfiResult::success(json),
        Err(e) => OutlineFfiResult::error(e.to_string()),
    }
}

fn extract_internal(path: &Path, options: &OutlineFfiOptions) -> crate::Result<String> {
    let outline = options.outliner().extract_file(path)?;
    to_json(&outline, options.format())
}

/// Get the page count of a PDF file.
///
/// # Safety
///
/// The `path` must be a valid null-terminated UTF-8 string.
/// Returns -1 on error.
#[no_mangle]
pub unsafe extern "C" fn pdfoutline_page_count(path: *const c_char) -> i32 {
    let path_str = match str_arg(path, "Path") {
        Ok(s) => s,
        Err(_) => return -1,
    };

    match PdfParser::open(path_str) {
        Ok(parser) => parser.page_count() as i32,
        Err(_) => -1,
    }
}

/// Check if a file is a valid PDF.
///
/// # Safety
///
/// The `path` must be a valid null-terminated UTF-8 string.
#[no_mangle]
pub unsafe extern "C" fn pdfoutline_is_pdf(path: *const c_char) -> bool {
    match str_arg(path, "Path") {
        Ok(s) => crate::detect::is_pdf(Path::new(s)),
        Err(_) => false,
    }
}

/// Free a result returned by any pdfoutline function.
///
/// # Safety
///
/// The `result` must have been returned by a pdfoutline function.
/// This function should only be called once per result.
#[no_mangle]
pub unsafe extern "C" fn pdfoutline_free_result(result: OutlineFfiResult) {
    if !result.data.is_null() {
        drop(CString::from_raw(result.data));
    }
    if !result.error.is_null() {
        drop(CString::from_raw(result.error));
    }
}

/// Free a string allocated by pdfoutline.
///
/// # Safety
///
/// The `ptr` must have been allocated by pdfoutline.
/// This function should only be called once per pointer.
#[no_mangle]
pub unsafe extern "C" fn pdfoutline_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

/// Get the version of the pdfoutline library.
///
/// The returned string is statically allocated and should not be freed.
#[no_mangle]
pub extern "C" fn pdfoutline_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
