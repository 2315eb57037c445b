use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ConvertError;

static FUNCTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-zA-Z]+)\s*\(\s*([^)]*)\)").unwrap());

/// A 2D affine map stored as a full 3x3 homogeneous matrix (row-major,
/// column-vector convention). Every constructor keeps the last row at
/// `(0, 0, 1)`, but composition works on the general matrix so it never
/// fails — a degenerate (non-invertible) transform is legal and simply
/// collapses points onto a line or point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    m: [f64; 9],
}

pub const IDENTITY: Transform = Transform {
    m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
};

impl Transform {
    /// SVG `matrix(a, b, c, d, e, f)`:
    ///
    /// ```text
    /// | a  c  e |
    /// | b  d  f |
    /// | 0  0  1 |
    /// ```
    pub fn matrix(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self {
            m: [a, c, e, b, d, f, 0.0, 0.0, 1.0],
        }
    }

    pub fn translate(x: f64, y: f64) -> Self {
        Self::matrix(1.0, 0.0, 0.0, 1.0, x, y)
    }

    pub fn scale(x: f64, y: f64) -> Self {
        Self::matrix(x, 0.0, 0.0, y, 0.0, 0.0)
    }

    /// Rotation about the origin, `degrees` counter-clockwise.
    pub fn rotate(degrees: f64) -> Self {
        let r = degrees.to_radians();
        let (sin, cos) = r.sin_cos();
        Self::matrix(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Rotation about the pivot `(cx, cy)`:
    /// `translate(cx, cy) ∘ rotate(degrees) ∘ translate(-cx, -cy)`.
    pub fn rotate_about(degrees: f64, cx: f64, cy: f64) -> Self {
        Self::translate(cx, cy)
            .compose(&Self::rotate(degrees))
            .compose(&Self::translate(-cx, -cy))
    }

    pub fn skew_x(degrees: f64) -> Self {
        Self::matrix(1.0, 0.0, degrees.to_radians().tan(), 1.0, 0.0, 0.0)
    }

    pub fn skew_y(degrees: f64) -> Self {
        Self::matrix(1.0, degrees.to_radians().tan(), 0.0, 1.0, 0.0, 0.0)
    }

    /// Matrix product `self × other`.
    ///
    /// `other` is applied to points first, then `self` — so deriving a child
    /// context is `parent.compose(&local)`, and a chained attribute string
    /// composes left-to-right with the textually rightmost function reaching
    /// the point first.
    pub fn compose(&self, other: &Transform) -> Transform {
        let mut m = [0.0; 9];
        for row in 0..3 {
            for col in 0..3 {
                let mut sum = 0.0;
                for k in 0..3 {
                    sum += self.m[row * 3 + k] * other.m[k * 3 + col];
                }
                m[row * 3 + col] = sum;
            }
        }
        Transform { m }
    }

    /// Map a 2D point through the matrix (homogeneous coordinate 1).
    pub fn apply(&self, point: (f64, f64)) -> (f64, f64) {
        let (x, y) = point;
        (
            self.m[0] * x + self.m[1] * y + self.m[2],
            self.m[3] * x + self.m[4] * y + self.m[5],
        )
    }

    /// Map a 2D point and pad it to 3D with z = 0, for entities that take
    /// 3D coordinates.
    pub fn apply3(&self, point: (f64, f64)) -> (f64, f64, f64) {
        let (x, y) = self.apply(point);
        (x, y, 0.0)
    }
}

/// Parse an SVG `transform` attribute: a chain of
/// `translate(x[,y])`, `scale(x[,y])`, `rotate(deg[,cx,cy])`, `skewX(deg)`,
/// `skewY(deg)` and `matrix(a,b,c,d,e,f)` calls, composed left-to-right.
pub fn parse(attribute: &str) -> Result<Transform, ConvertError> {
    let malformed = |reason: &str| ConvertError::MalformedTransform {
        attribute: attribute.to_string(),
        reason: reason.to_string(),
    };

    let mut result = IDENTITY;
    let mut matched_any = false;
    let mut cursor = 0;

    for capture in FUNCTION_RE.captures_iter(attribute) {
        let whole = capture.get(0).unwrap();
        let between = &attribute[cursor..whole.start()];
        if !between.chars().all(|c| c.is_whitespace() || c == ',') {
            return Err(malformed("unexpected text between transform functions"));
        }
        cursor = whole.end();
        matched_any = true;

        let name = capture.get(1).unwrap().as_str();
        let args = parse_arguments(capture.get(2).unwrap().as_str())
            .ok_or_else(|| malformed("non-numeric argument"))?;

        let transform = match (name, args.as_slice()) {
            ("translate", [x]) => Transform::translate(*x, 0.0),
            ("translate", [x, y]) => Transform::translate(*x, *y),
            ("scale", [s]) => Transform::scale(*s, *s),
            ("scale", [x, y]) => Transform::scale(*x, *y),
            ("rotate", [deg]) => Transform::rotate(*deg),
            ("rotate", [deg, cx, cy]) => Transform::rotate_about(*deg, *cx, *cy),
            ("skewX", [deg]) => Transform::skew_x(*deg),
            ("skewY", [deg]) => Transform::skew_y(*deg),
            ("matrix", [a, b, c, d, e, f]) => Transform::matrix(*a, *b, *c, *d, *e, *f),
            (
                "translate" | "scale" | "rotate" | "skewX" | "skewY" | "matrix",
                _,
            ) => return Err(malformed(&format!("wrong argument count for {name}"))),
            _ => return Err(malformed(&format!("unknown transform function {name}"))),
        };
        result = result.compose(&transform);
    }

    let trailing = &attribute[cursor..];
    if !matched_any && !attribute.trim().is_empty() {
        return Err(malformed("no transform functions found"));
    }
    if !trailing.chars().all(|c| c.is_whitespace() || c == ',') {
        return Err(malformed("trailing garbage after transform functions"));
    }
    Ok(result)
}

fn parse_arguments(raw: &str) -> Option<Vec<f64>> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| token.parse::<f64>().ok())
        .collect()
}
