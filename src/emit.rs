use log::trace;
use lyon_geom::{point, vector, Angle, Arc, ArcFlags, SvgArc};

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::dxf::DxfDocument;
use crate::path_data::{Point, Segment};
use crate::transform::Transform;

/// Clamped knot vector making a degree-3 spline with 4 control points
/// equivalent to a cubic Bezier.
pub const BEZIER_KNOTS: [f64; 8] = [0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];

/// Maximum sweep covered by one polyline piece of an elliptical arc.
const ARC_PIECE_DEGREES: f64 = 30.0;

/// Emit one output entity per segment, mapping every coordinate through the
/// accumulated transform and placing the entity on `layer`.
pub fn emit_segments(
    document: &mut DxfDocument,
    segments: &[Segment],
    transform: &Transform,
    layer: &str,
    sink: &mut dyn DiagnosticSink,
) {
    for segment in segments {
        emit_segment(document, segment, transform, layer, sink);
    }
}

fn emit_segment(
    document: &mut DxfDocument,
    segment: &Segment,
    transform: &Transform,
    layer: &str,
    sink: &mut dyn DiagnosticSink,
) {
    trace!("emitting {segment:?} on layer {layer:?}");
    match *segment {
        Segment::Line { start, end } => {
            let handle = document.add_line(transform.apply(start), transform.apply(end));
            document.entity_mut(handle).set_layer(layer);
        }
        Segment::Quadratic { start, control, end } => {
            // Promote to cubic form by using the single quadratic control
            // point for both cubic control points.
            emit_spline(document, transform, layer, start, control, control, end);
        }
        Segment::Cubic { start, control1, control2, end } => {
            emit_spline(document, transform, layer, start, control1, control2, end);
        }
        Segment::Arc { start, rx, ry, x_rotation, large_arc, sweep, end } => {
            emit_arc(
                document, transform, layer, sink, start, rx, ry, x_rotation, large_arc, sweep,
                end,
            );
        }
    }
}

fn emit_spline(
    document: &mut DxfDocument,
    transform: &Transform,
    layer: &str,
    start: Point,
    control1: Point,
    control2: Point,
    end: Point,
) {
    let handle = document.add_spline(
        [
            transform.apply3(start),
            transform.apply3(control1),
            transform.apply3(control2),
            transform.apply3(end),
        ],
        BEZIER_KNOTS,
    );
    document.entity_mut(handle).set_layer(layer);
}

/// Subdivide an elliptical arc into pieces of at most 30 degrees of sweep
/// and emit each piece as a 4-point polyline sampled at sweep fractions
/// {0, 1/3, 2/3, 1}. The very first and very last samples are replaced with
/// the segment's exact endpoints so chained segments never drift apart.
#[allow(clippy::too_many_arguments)]
fn emit_arc(
    document: &mut DxfDocument,
    transform: &Transform,
    layer: &str,
    sink: &mut dyn DiagnosticSink,
    start: Point,
    rx: f64,
    ry: f64,
    x_rotation: f64,
    large_arc: bool,
    sweep: bool,
    end: Point,
) {
    let parameters = [start.0, start.1, rx, ry, x_rotation, end.0, end.1];
    if parameters.iter().any(|v| !v.is_finite()) {
        sink.report(Diagnostic::UnsupportedSegment {
            description: format!("elliptical arc with non-finite parameters {parameters:?}"),
        });
        return;
    }

    let svg_arc = SvgArc {
        from: point(start.0, start.1),
        to: point(end.0, end.1),
        radii: vector(rx, ry),
        x_rotation: Angle::degrees(x_rotation),
        flags: ArcFlags { large_arc, sweep },
    };

    // Zero radii or coincident endpoints degenerate to a straight line per
    // the SVG arc rules.
    if svg_arc.is_straight_line() {
        let handle = document.add_line(transform.apply(start), transform.apply(end));
        document.entity_mut(handle).set_layer(layer);
        return;
    }

    let arc = Arc::from_svg_arc(&svg_arc);
    let sweep_degrees = arc.sweep_angle.to_degrees().abs();
    // The small epsilon keeps an exactly-90-degree sweep at 3 pieces despite
    // rounding in the center computation.
    let pieces = ((sweep_degrees - 1e-9) / ARC_PIECE_DEGREES).ceil().max(1.0) as usize;

    for piece in 0..pieces {
        let mut samples: Vec<Point> = (0..4)
            .map(|step| {
                let t = (piece as f64 + f64::from(step) / 3.0) / pieces as f64;
                let sampled = arc.sample(t);
                (sampled.x, sampled.y)
            })
            .collect();
        if piece == 0 {
            samples[0] = start;
        }
        if piece == pieces - 1 {
            samples[3] = end;
        }

        let transformed = samples.into_iter().map(|p| transform.apply(p)).collect();
        let handle = document.add_polyline(transformed);
        document.entity_mut(handle).set_layer(layer);
    }
}
