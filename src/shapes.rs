use crate::error::Result;
use crate::path_data::{Point, Segment};
use crate::svg::Element;

/// Control-point offset factor for approximating a quarter circle with one
/// cubic Bezier. Keeps the curve within ~0.027% radial error of a true
/// circle.
pub const KAPPA: f64 = 0.55228;

/// One canonical drawing command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicCurveTo {
        control1: Point,
        control2: Point,
        end: Point,
    },
}

/// Canonical path form every primitive shape is normalized into.
///
/// A non-empty description always starts with `MoveTo`; the normalizers in
/// this module only ever produce a single connected subpath.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathDescription {
    pub commands: Vec<PathCommand>,
    pub style: Option<String>,
}

impl PathDescription {
    fn with_style(element: &Element) -> Self {
        Self {
            commands: Vec::new(),
            style: element.attribute("style").map(str::to_string),
        }
    }

    fn move_to(&mut self, point: Point) {
        self.commands.push(PathCommand::MoveTo(point));
    }

    fn line_to(&mut self, point: Point) {
        self.commands.push(PathCommand::LineTo(point));
    }

    fn cubic_to(&mut self, control1: Point, control2: Point, end: Point) {
        self.commands.push(PathCommand::CubicCurveTo { control1, control2, end });
    }

    /// Lower the description to the emitter's segment form, threading the
    /// current point through the command list.
    pub fn to_segments(&self) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut position: Point = (0.0, 0.0);
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(point) => position = point,
                PathCommand::LineTo(point) => {
                    segments.push(Segment::Line { start: position, end: point });
                    position = point;
                }
                PathCommand::CubicCurveTo { control1, control2, end } => {
                    segments.push(Segment::Cubic { start: position, control1, control2, end });
                    position = end;
                }
            }
        }
        segments
    }
}

/// `<line>`: a single straight stroke.
pub fn line_to_path(element: &Element) -> Result<PathDescription> {
    let mut path = PathDescription::with_style(element);
    path.move_to((element.number_or("x1", 0.0)?, element.number_or("y1", 0.0)?));
    path.line_to((element.number_or("x2", 0.0)?, element.number_or("y2", 0.0)?));
    Ok(path)
}

/// `<rect>`: starts at the last corner so walking all four corners closes
/// the outline without an explicit close command. Missing x/y default to 0.
pub fn rect_to_path(element: &Element) -> Result<PathDescription> {
    let x = element.number_or("x", 0.0)?;
    let y = element.number_or("y", 0.0)?;
    let width = element.number("width")?;
    let height = element.number("height")?;

    let corners = [(x, y), (x + width, y), (x + width, y + height), (x, y + height)];
    let mut path = PathDescription::with_style(element);
    path.move_to(corners[3]);
    for corner in corners {
        path.line_to(corner);
    }
    Ok(path)
}

/// `<polygon>`: starts at the last point, then lines through every point in
/// order — this intentionally closes the shape.
pub fn polygon_to_path(element: &Element) -> Result<PathDescription> {
    let points = element.points()?;
    let mut path = PathDescription::with_style(element);
    if let Some(last) = points.last() {
        path.move_to(*last);
        for point in points {
            path.line_to(point);
        }
    }
    Ok(path)
}

/// `<polyline>`: same point list but left open — starts at the first point
/// with no closing segment.
pub fn polyline_to_path(element: &Element) -> Result<PathDescription> {
    let points = element.points()?;
    let mut path = PathDescription::with_style(element);
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for point in rest {
            path.line_to(*point);
        }
    }
    Ok(path)
}

/// `<circle>`: four-cubic approximation. Missing cx/cy default to 0.
pub fn circle_to_path(element: &Element) -> Result<PathDescription> {
    let cx = element.number_or("cx", 0.0)?;
    let cy = element.number_or("cy", 0.0)?;
    let r = element.number("r")?;
    let mut path = PathDescription::with_style(element);
    cubic_approx_ellipse(&mut path, cx, cy, r, r);
    Ok(path)
}

/// `<ellipse>`: same approximation with independent radii.
pub fn ellipse_to_path(element: &Element) -> Result<PathDescription> {
    let cx = element.number_or("cx", 0.0)?;
    let cy = element.number_or("cy", 0.0)?;
    let rx = element.number("rx")?;
    let ry = element.number("ry")?;
    let mut path = PathDescription::with_style(element);
    cubic_approx_ellipse(&mut path, cx, cy, rx, ry);
    Ok(path)
}

fn cubic_approx_ellipse(path: &mut PathDescription, cx: f64, cy: f64, rx: f64, ry: f64) {
    let ox = rx * KAPPA;
    let oy = ry * KAPPA;

    path.move_to((cx - rx, cy));
    path.cubic_to((cx - rx, cy - oy), (cx - ox, cy - ry), (cx, cy - ry));
    path.cubic_to((cx + ox, cy - ry), (cx + rx, cy - oy), (cx + rx, cy));
    path.cubic_to((cx + rx, cy + oy), (cx + ox, cy + ry), (cx, cy + ry));
    path.cubic_to((cx - ox, cy + ry), (cx - rx, cy + oy), (cx - rx, cy));
}
