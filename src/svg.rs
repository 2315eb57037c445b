use std::collections::HashMap;

use crate::error::{ConvertError, Result};

/// Closed set of element kinds the converter dispatches over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// `<svg>` and `<g>` containers.
    Group,
    Path,
    Line,
    Rect,
    Polygon,
    Polyline,
    Circle,
    Ellipse,
    Text,
    /// Anything else; carries the original tag name for diagnostics.
    Other(String),
}

impl ElementKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "svg" | "g" => Self::Group,
            "path" => Self::Path,
            "line" => Self::Line,
            "rect" => Self::Rect,
            "polygon" => Self::Polygon,
            "polyline" => Self::Polyline,
            "circle" => Self::Circle,
            "ellipse" => Self::Ellipse,
            "text" => Self::Text,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn tag_name(&self) -> &str {
        match self {
            Self::Group => "g",
            Self::Path => "path",
            Self::Line => "line",
            Self::Rect => "rect",
            Self::Polygon => "polygon",
            Self::Polyline => "polyline",
            Self::Circle => "circle",
            Self::Ellipse => "ellipse",
            Self::Text => "text",
            Self::Other(tag) => tag,
        }
    }
}

/// One node of the materialized input tree. The whole tree is owned and
/// read-only for the duration of a conversion.
#[derive(Debug, Clone)]
pub struct Element {
    pub kind: ElementKind,
    attributes: HashMap<String, String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            attributes: HashMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// The raw `transform` attribute, if present and non-empty.
    pub fn transform_attribute(&self) -> Option<&str> {
        self.attribute("transform").filter(|v| !v.trim().is_empty())
    }

    /// The CSS-class-like attribute, if present.
    pub fn class_attribute(&self) -> Option<&str> {
        self.attribute("class")
    }

    /// Numeric attribute, defaulting when absent. A present but unparseable
    /// value is a fatal input error.
    pub fn number_or(&self, name: &str, default: f64) -> Result<f64> {
        match self.attribute(name) {
            None => Ok(default),
            Some(raw) => raw.trim().parse::<f64>().map_err(|_| self.bad_attribute(name, raw)),
        }
    }

    /// Numeric attribute that must be present.
    pub fn number(&self, name: &str) -> Result<f64> {
        let raw = self
            .attribute(name)
            .ok_or_else(|| self.bad_attribute(name, ""))?;
        raw.trim().parse::<f64>().map_err(|_| self.bad_attribute(name, raw))
    }

    /// The `points` attribute parsed as whitespace-separated `x,y` tokens.
    pub fn points(&self) -> Result<Vec<(f64, f64)>> {
        let raw = self.attribute("points").unwrap_or("");
        let mut points = Vec::new();
        for token in raw.split_whitespace() {
            let mut parts = token.split(',');
            let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err(self.bad_attribute("points", token));
            };
            let x = x.trim().parse::<f64>().map_err(|_| self.bad_attribute("points", token))?;
            let y = y.trim().parse::<f64>().map_err(|_| self.bad_attribute("points", token))?;
            points.push((x, y));
        }
        Ok(points)
    }

    fn bad_attribute(&self, name: &str, value: &str) -> ConvertError {
        ConvertError::MalformedAttribute {
            element: self.kind.tag_name().to_string(),
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Parse SVG text into the owned element tree. The returned root is the
/// `<svg>` element itself, treated as a group.
pub fn parse_document(text: &str) -> Result<Element> {
    let document = roxmltree::Document::parse(text)?;
    Ok(build_element(document.root_element()))
}

fn build_element(node: roxmltree::Node) -> Element {
    let mut element = Element::new(ElementKind::from_tag(node.tag_name().name()));
    for attribute in node.attributes() {
        element
            .attributes
            .insert(attribute.name().to_string(), attribute.value().to_string());
    }
    for child in node.children().filter(roxmltree::Node::is_element) {
        element.children.push(build_element(child));
    }
    element
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_groups_in_document_order() {
        let tree = parse_document(
            r#"<svg><g transform="translate(1,2)"><rect width="4" height="2"/><circle r="1"/></g></svg>"#,
        )
        .unwrap();
        assert_eq!(tree.kind, ElementKind::Group);
        assert_eq!(tree.children.len(), 1);
        let group = &tree.children[0];
        assert_eq!(group.transform_attribute(), Some("translate(1,2)"));
        assert_eq!(group.children[0].kind, ElementKind::Rect);
        assert_eq!(group.children[1].kind, ElementKind::Circle);
    }

    #[test]
    fn unknown_tags_keep_their_name() {
        let tree = parse_document("<svg><foreignObject/></svg>").unwrap();
        assert_eq!(
            tree.children[0].kind,
            ElementKind::Other("foreignObject".to_string())
        );
    }

    #[test]
    fn malformed_xml_is_fatal() {
        assert!(parse_document("<svg><rect></svg>").is_err());
    }

    #[test]
    fn missing_numeric_attribute_takes_default() {
        let rect = Element::new(ElementKind::Rect).with_attribute("width", "10");
        assert_eq!(rect.number_or("x", 0.0).unwrap(), 0.0);
        assert_eq!(rect.number_or("width", 0.0).unwrap(), 10.0);
    }

    #[test]
    fn unparseable_numeric_attribute_is_fatal() {
        let rect = Element::new(ElementKind::Rect).with_attribute("x", "wide");
        assert!(rect.number_or("x", 0.0).is_err());
    }

    #[test]
    fn points_parse_as_coordinate_pairs() {
        let polygon = Element::new(ElementKind::Polygon).with_attribute("points", "0,0 10,0 5,8.5");
        assert_eq!(polygon.points().unwrap(), vec![(0.0, 0.0), (10.0, 0.0), (5.0, 8.5)]);
    }

    #[test]
    fn malformed_point_token_is_fatal() {
        let polygon = Element::new(ElementKind::Polygon).with_attribute("points", "0,0 10");
        assert!(polygon.points().is_err());
    }
}
