#[cfg(feature = "cli")]
pub mod cli;
pub mod convert;
pub mod diagnostics;
pub mod dxf;
pub mod emit;
pub mod error;
pub mod path_data;
pub mod shapes;
pub mod style;
pub mod svg;
pub mod transform;

pub use convert::{convert, convert_document};
pub use diagnostics::{Diagnostic, DiagnosticSink};
pub use dxf::DxfDocument;
pub use error::ConvertError;
pub use style::LayerStyles;

#[cfg(feature = "cli")]
pub use cli::run;
