use thiserror::Error;

/// Fatal conversion failures.
///
/// Everything here aborts the whole conversion; the caller must discard any
/// partially built output document. Non-fatal conditions (unsupported
/// elements or path segments) never show up as errors — they go to the
/// optional [`DiagnosticSink`](crate::diagnostics::DiagnosticSink) instead.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input bytes are not a well-formed XML document.
    #[error("malformed SVG document: {0}")]
    MalformedDocument(#[from] roxmltree::Error),

    /// A `transform` attribute does not parse as a chain of transform
    /// functions.
    #[error("malformed transform attribute {attribute:?}: {reason}")]
    MalformedTransform { attribute: String, reason: String },

    /// A path `d` attribute does not parse as path data.
    #[error("malformed path data: {0}")]
    MalformedPathData(String),

    /// A numeric shape attribute (or a polygon/polyline point list) does not
    /// parse as a number.
    #[error("malformed attribute {name:?} on <{element}>: {value:?}")]
    MalformedAttribute {
        element: String,
        name: String,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, ConvertError>;
