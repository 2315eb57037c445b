use svgtypes::{PathParser, PathSegment};

use crate::error::{ConvertError, Result};

pub type Point = (f64, f64);

/// One atomic piece of a path, with all coordinates resolved to absolute
/// values. This is what the emitter consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line {
        start: Point,
        end: Point,
    },
    Quadratic {
        start: Point,
        control: Point,
        end: Point,
    },
    Cubic {
        start: Point,
        control1: Point,
        control2: Point,
        end: Point,
    },
    Arc {
        start: Point,
        rx: f64,
        ry: f64,
        x_rotation: f64,
        large_arc: bool,
        sweep: bool,
        end: Point,
    },
}

/// Parse a path `d` attribute into absolute segments.
///
/// Relative commands are resolved against the current position, H/V commands
/// expand to full lines, smooth (S/T) commands reflect the previous control
/// point, and Z closes back to the subpath start with a line segment.
pub fn parse(data: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut position: Point = (0.0, 0.0);
    let mut subpath_start: Point = (0.0, 0.0);
    // Previous control points, for S/T reflection. Cleared by any segment
    // that is not the matching curve kind.
    let mut last_cubic_control: Option<Point> = None;
    let mut last_quad_control: Option<Point> = None;

    for token in PathParser::from(data) {
        let token = token.map_err(|e| ConvertError::MalformedPathData(e.to_string()))?;
        let mut cubic_control = None;
        let mut quad_control = None;

        match token {
            PathSegment::MoveTo { abs, x, y } => {
                position = resolve(abs, position, (x, y));
                subpath_start = position;
            }
            PathSegment::LineTo { abs, x, y } => {
                let end = resolve(abs, position, (x, y));
                segments.push(Segment::Line { start: position, end });
                position = end;
            }
            PathSegment::HorizontalLineTo { abs, x } => {
                let end = if abs { (x, position.1) } else { (position.0 + x, position.1) };
                segments.push(Segment::Line { start: position, end });
                position = end;
            }
            PathSegment::VerticalLineTo { abs, y } => {
                let end = if abs { (position.0, y) } else { (position.0, position.1 + y) };
                segments.push(Segment::Line { start: position, end });
                position = end;
            }
            PathSegment::CurveTo { abs, x1, y1, x2, y2, x, y } => {
                let control1 = resolve(abs, position, (x1, y1));
                let control2 = resolve(abs, position, (x2, y2));
                let end = resolve(abs, position, (x, y));
                segments.push(Segment::Cubic { start: position, control1, control2, end });
                cubic_control = Some(control2);
                position = end;
            }
            PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
                let control1 = reflect(position, last_cubic_control);
                let control2 = resolve(abs, position, (x2, y2));
                let end = resolve(abs, position, (x, y));
                segments.push(Segment::Cubic { start: position, control1, control2, end });
                cubic_control = Some(control2);
                position = end;
            }
            PathSegment::Quadratic { abs, x1, y1, x, y } => {
                let control = resolve(abs, position, (x1, y1));
                let end = resolve(abs, position, (x, y));
                segments.push(Segment::Quadratic { start: position, control, end });
                quad_control = Some(control);
                position = end;
            }
            PathSegment::SmoothQuadratic { abs, x, y } => {
                let control = reflect(position, last_quad_control);
                let end = resolve(abs, position, (x, y));
                segments.push(Segment::Quadratic { start: position, control, end });
                quad_control = Some(control);
                position = end;
            }
            PathSegment::EllipticalArc {
                abs,
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
            } => {
                let end = resolve(abs, position, (x, y));
                segments.push(Segment::Arc {
                    start: position,
                    rx,
                    ry,
                    x_rotation: x_axis_rotation,
                    large_arc,
                    sweep,
                    end,
                });
                position = end;
            }
            PathSegment::ClosePath { .. } => {
                if position != subpath_start {
                    segments.push(Segment::Line { start: position, end: subpath_start });
                }
                position = subpath_start;
            }
        }

        last_cubic_control = cubic_control;
        last_quad_control = quad_control;
    }

    Ok(segments)
}

fn resolve(abs: bool, position: Point, point: Point) -> Point {
    if abs {
        point
    } else {
        (position.0 + point.0, position.1 + point.1)
    }
}

/// Reflect the previous control point across the current position. When the
/// previous segment carried no control point, SVG says the control point
/// collapses onto the current position.
fn reflect(position: Point, previous_control: Option<Point>) -> Point {
    match previous_control {
        Some((cx, cy)) => (2.0 * position.0 - cx, 2.0 * position.1 - cy),
        None => position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_lines() {
        let segments = parse("M 10 10 L 20 30").unwrap();
        assert_eq!(
            segments,
            vec![Segment::Line { start: (10.0, 10.0), end: (20.0, 30.0) }]
        );
    }

    #[test]
    fn relative_commands_accumulate() {
        let segments = parse("m 5 5 l 10 0 v 3 h -2").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Line { start: (5.0, 5.0), end: (15.0, 5.0) },
                Segment::Line { start: (15.0, 5.0), end: (15.0, 8.0) },
                Segment::Line { start: (15.0, 8.0), end: (13.0, 8.0) },
            ]
        );
    }

    #[test]
    fn close_returns_to_subpath_start() {
        let segments = parse("M 0 0 L 10 0 L 10 10 Z").unwrap();
        assert_eq!(
            segments.last(),
            Some(&Segment::Line { start: (10.0, 10.0), end: (0.0, 0.0) })
        );
    }

    #[test]
    fn close_on_already_closed_subpath_adds_nothing() {
        let segments = parse("M 0 0 L 10 0 L 0 0 Z").unwrap();
        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn cubic_and_smooth_reflection() {
        let segments = parse("M 0 0 C 1 2 3 4 5 0 S 9 4 10 0").unwrap();
        assert_eq!(segments.len(), 2);
        let Segment::Cubic { start, control1, .. } = segments[1] else {
            panic!("expected cubic, got {:?}", segments[1]);
        };
        assert_eq!(start, (5.0, 0.0));
        // Reflection of (3,4) across (5,0).
        assert_eq!(control1, (7.0, -4.0));
    }

    #[test]
    fn smooth_quadratic_without_predecessor_uses_current_point() {
        let segments = parse("M 2 3 T 10 3").unwrap();
        assert_eq!(
            segments,
            vec![Segment::Quadratic {
                start: (2.0, 3.0),
                control: (2.0, 3.0),
                end: (10.0, 3.0),
            }]
        );
    }

    #[test]
    fn arc_keeps_flags_and_radii() {
        let segments = parse("M 0 0 A 10 5 30 1 0 20 0").unwrap();
        assert_eq!(
            segments,
            vec![Segment::Arc {
                start: (0.0, 0.0),
                rx: 10.0,
                ry: 5.0,
                x_rotation: 30.0,
                large_arc: true,
                sweep: false,
                end: (20.0, 0.0),
            }]
        );
    }

    #[test]
    fn malformed_data_is_fatal() {
        assert!(parse("M 10 banana").is_err());
    }
}
