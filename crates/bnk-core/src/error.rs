//! Error types for BNK document reading

use std::io;
use thiserror::Error;

/// Document-level failures.
///
/// Problems inside individual records (bad coordinates, unknown styles) are
/// never reported here; they are logged and the record is defaulted or dropped.
#[derive(Debug, Error)]
pub enum BnkError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The tokenizer could not read the byte stream as XML
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Input ended while elements were still open
    #[error("Document ended with unclosed elements: {}", .open.join(" > "))]
    UnclosedElements {
        /// Open element names, outermost first
        open: Vec<String>,
    },
}

/// Result type for BNK operations
pub type Result<T> = std::result::Result<T, BnkError>;
