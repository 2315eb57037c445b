/// A non-fatal condition encountered during conversion.
///
/// Diagnostics never abort a conversion and produce no output entities; they
/// exist so callers can see what was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// An element whose kind the engine cannot convert (unknown tag, or a
    /// known tag in an unexpected position).
    UnsupportedElement { tag: String },
    /// A parsed path segment kind the emitter does not handle.
    UnsupportedSegment { description: String },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::UnsupportedElement { tag } => {
                write!(f, "skipped unsupported element <{tag}>")
            }
            Diagnostic::UnsupportedSegment { description } => {
                write!(f, "skipped unsupported path segment: {description}")
            }
        }
    }
}

/// Receiver for non-fatal conversion diagnostics.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Collects diagnostics for later inspection.
impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Sink used when the caller supplied none: diagnostics are logged at debug
/// level and otherwise discarded.
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        log::debug!("{diagnostic}");
    }
}
