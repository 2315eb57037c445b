use log::trace;

use crate::diagnostics::{Diagnostic, DiagnosticSink, NullSink};
use crate::dxf::{DxfDocument, DEFAULT_LAYER};
use crate::emit::emit_segments;
use crate::error::Result;
use crate::path_data;
use crate::shapes;
use crate::style::{self, LayerStyles};
use crate::svg::{Element, ElementKind};
use crate::transform::{self, Transform};

/// Per-branch traversal state. Contexts are immutable values: every visited
/// element derives its own copy and children never see anything but that
/// derived copy.
#[derive(Debug, Clone)]
pub struct ElementContext {
    pub transform: Transform,
    pub layer: String,
}

impl ElementContext {
    /// Root context: the global axis flip (SVG y grows down, DXF y grows up)
    /// and the default layer.
    fn root() -> Self {
        Self {
            transform: Transform::matrix(1.0, 0.0, 0.0, -1.0, 0.0, 0.0),
            layer: DEFAULT_LAYER.to_string(),
        }
    }

    /// Compose the element's own transform attribute onto the inherited
    /// transform and re-resolve the layer from its class markers.
    fn derive(&self, element: &Element) -> Result<Self> {
        let transform = match element.transform_attribute() {
            Some(attribute) => self.transform.compose(&transform::parse(attribute)?),
            None => self.transform,
        };
        let layer = style::layer_from_class(element.class_attribute(), &self.layer);
        Ok(Self { transform, layer })
    }
}

/// Convert a parsed element tree into `document`.
///
/// Styled layers are created up front; traversal then walks the tree in
/// document order, appending one entity per converted path segment. On error
/// the document contents are unspecified and must be discarded — there is no
/// partial-output recovery.
pub fn convert(
    root: &Element,
    document: &mut DxfDocument,
    styles: Option<&LayerStyles>,
    sink: Option<&mut dyn DiagnosticSink>,
) -> Result<()> {
    if let Some(styles) = styles {
        styles.apply_to(document);
    }

    let mut null = NullSink;
    let sink: &mut dyn DiagnosticSink = match sink {
        Some(sink) => sink,
        None => &mut null,
    };

    visit(root, &ElementContext::root(), document, sink)
}

/// Parse SVG text and convert it in one step, returning the populated output
/// document.
pub fn convert_document(
    svg_text: &str,
    styles: Option<&LayerStyles>,
    sink: Option<&mut dyn DiagnosticSink>,
) -> Result<DxfDocument> {
    let tree = crate::svg::parse_document(svg_text)?;
    let mut document = DxfDocument::new();
    convert(&tree, &mut document, styles, sink)?;
    Ok(document)
}

fn visit(
    element: &Element,
    inherited: &ElementContext,
    document: &mut DxfDocument,
    sink: &mut dyn DiagnosticSink,
) -> Result<()> {
    let context = inherited.derive(element)?;
    trace!("visiting <{}> on layer {:?}", element.kind.tag_name(), context.layer);

    match &element.kind {
        ElementKind::Group => {
            for child in &element.children {
                visit(child, &context, document, sink)?;
            }
        }
        ElementKind::Path => {
            let segments = path_data::parse(element.attribute("d").unwrap_or(""))?;
            emit_segments(document, &segments, &context.transform, &context.layer, sink);
        }
        ElementKind::Line => convert_shape(shapes::line_to_path(element)?, &context, document, sink),
        ElementKind::Rect => convert_shape(shapes::rect_to_path(element)?, &context, document, sink),
        ElementKind::Polygon => {
            convert_shape(shapes::polygon_to_path(element)?, &context, document, sink)
        }
        ElementKind::Polyline => {
            convert_shape(shapes::polyline_to_path(element)?, &context, document, sink)
        }
        ElementKind::Circle => {
            convert_shape(shapes::circle_to_path(element)?, &context, document, sink)
        }
        ElementKind::Ellipse => {
            convert_shape(shapes::ellipse_to_path(element)?, &context, document, sink)
        }
        // Text content is ignored without a diagnostic.
        ElementKind::Text => {}
        ElementKind::Other(tag) => {
            sink.report(Diagnostic::UnsupportedElement { tag: tag.clone() });
        }
    }
    Ok(())
}

fn convert_shape(
    path: shapes::PathDescription,
    context: &ElementContext,
    document: &mut DxfDocument,
    sink: &mut dyn DiagnosticSink,
) {
    emit_segments(
        document,
        &path.to_segments(),
        &context.transform,
        &context.layer,
        sink,
    );
}
