// Importer for .ork rocket design files
pub mod digest;
mod options;
mod parse;
pub mod types;
pub mod units;

pub use options::{ImportContext, ImportOptions};
pub use types::*;

use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrkError {
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected end of file inside <{0}>")]
    UnexpectedEof(String),

    #[error("Missing required element: {0}")]
    MissingDocument(&'static str),

    #[error("Unsupported file version: {0}")]
    UnsupportedVersion(String),

    #[error("Setter for '{element}' applied to incapable component kind {kind:?}")]
    IncapableTarget {
        kind: ComponentKind,
        element: String,
    },
}

pub type Result<T> = std::result::Result<T, OrkError>;

/// A design read from a file, with everything that went wrong on the way.
#[derive(Debug)]
pub struct LoadedDocument {
    pub document: DesignDocument,
    pub warnings: WarningSet,
}

/// Load a design from the text of a `.ork` XML document.
///
/// Only malformed XML and a few structural problems fail the load; all
/// other problems are collected in [`LoadedDocument::warnings`].
pub fn load_str(xml: &str, cx: &ImportContext) -> Result<LoadedDocument> {
    parse::load(xml, cx)
}

/// Load a design from an uncompressed `.ork` file.
pub fn load_file(path: impl AsRef<Path>, cx: &ImportContext) -> Result<LoadedDocument> {
    let path = path.as_ref();
    log::info!("loading design from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    load_str(&content, cx)
}
