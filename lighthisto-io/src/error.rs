use std::io;
use thiserror::Error;

use lighthisto_core::HistoError;

/// Error type for lighthisto-io operations.
#[derive(Error, Debug)]
pub enum CodecError {
    /// IO error occurred during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The document is not well-formed XML.
    #[error("Can't parse AIDA document: {0}")]
    Xml(#[from] roxmltree::Error),

    /// A mandatory attribute is missing from an element.
    #[error("<{element}> element is missing the '{attribute}' attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    /// An element does not have the expected children.
    #[error("Unexpected document structure: {0}")]
    UnexpectedShape(String),

    /// A numeric attribute could not be parsed.
    #[error("Invalid number '{value}' in {context}")]
    InvalidNumber { context: String, value: String },

    /// A flat-format block has no `AidaPath` header.
    #[error("Flat histogram block '{block}' has no AidaPath header")]
    MissingAidaPath { block: String },

    /// The document is neither UTF-8 nor declared as Latin-1.
    #[error("AIDA document is not valid UTF-8 and declares no Latin-1 encoding")]
    InvalidEncoding,

    /// A `# BEGIN HISTOGRAM` block was not closed.
    #[error("Histogram block '{0}' has no matching '# END HISTOGRAM'")]
    UnterminatedBlock(String),

    #[error(transparent)]
    Core(#[from] HistoError),
}

/// Result type alias for lighthisto-io operations.
pub type Result<T> = std::result::Result<T, CodecError>;
