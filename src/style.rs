use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::dxf::{DxfDocument, DEFAULT_COLOR};

/// Class-list token prefix that names the drawing layer for an element and
/// its descendants.
pub const LAYER_CLASS_MARKER: &str = "dxf-layer-";

/// AutoCAD color index palette used for downsampling. Index 7 doubles as
/// black per DXF convention, so black is listed explicitly.
const ACI_PALETTE: [(u8, [u8; 3]); 10] = [
    (1, [255, 0, 0]),
    (2, [255, 255, 0]),
    (3, [0, 255, 0]),
    (4, [0, 255, 255]),
    (5, [0, 0, 255]),
    (6, [255, 0, 255]),
    (7, [255, 255, 255]),
    (7, [0, 0, 0]),
    (8, [128, 128, 128]),
    (9, [192, 192, 192]),
];

/// Mapping from layer name to a comma-separated `key:value` style string,
/// e.g. `{"cut": "color:#ff0000"}`. Deserializes straight from the CLI's
/// JSON styles file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerStyles {
    entries: BTreeMap<String, String>,
}

impl LayerStyles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, layer: impl Into<String>, style: impl Into<String>) {
        self.entries.insert(layer.into(), style.into());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Create every styled layer in the output document. The document's
    /// guaranteed `"default"` layer is left alone unless the mapping restyles
    /// it.
    pub fn apply_to(&self, document: &mut DxfDocument) {
        for (name, style) in &self.entries {
            let mut color = DEFAULT_COLOR;
            for (key, value) in parse_style_tokens(style) {
                match key {
                    "color" => match parse_hex_color(value) {
                        Some([r, g, b]) => color = nearest_color_index(r, g, b),
                        None => debug!("dropping unparseable color {value:?} for layer {name:?}"),
                    },
                    other => debug!("ignoring unknown style key {other:?} for layer {name:?}"),
                }
            }
            document.create_layer(name, color);
        }
    }
}

/// Split a style string into `key:value` pairs. Tokens without exactly one
/// colon are silently dropped; the rest of the entry still applies.
fn parse_style_tokens(style: &str) -> Vec<(&str, &str)> {
    let mut tokens = Vec::new();
    for token in style.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let mut parts = token.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(key), Some(value), None) => tokens.push((key.trim(), value.trim())),
            _ => debug!("dropping malformed style token {token:?}"),
        }
    }
    tokens
}

fn parse_hex_color(value: &str) -> Option<[u8; 3]> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some([r, g, b])
}

/// Downsample an RGB color to the nearest supported AutoCAD color index.
pub fn nearest_color_index(r: u8, g: u8, b: u8) -> u8 {
    let mut best = DEFAULT_COLOR;
    let mut best_distance = u32::MAX;
    for (index, [pr, pg, pb]) in ACI_PALETTE {
        let distance = distance_squared([r, g, b], [pr, pg, pb]);
        if distance < best_distance {
            best_distance = distance;
            best = index;
        }
    }
    best
}

fn distance_squared(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = i32::from(*x) - i32::from(*y);
            (d * d) as u32
        })
        .sum()
}

/// Resolve the drawing layer for an element from its class list: the suffix
/// of the first `dxf-layer-` token wins, otherwise the inherited layer
/// stands.
pub fn layer_from_class(class: Option<&str>, inherited: &str) -> String {
    if let Some(class) = class {
        for token in class.split_whitespace() {
            if let Some(suffix) = token.strip_prefix(LAYER_CLASS_MARKER) {
                let name = suffix.trim();
                if !name.is_empty() {
                    return name.to_string();
                }
            }
        }
    }
    inherited.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dxf::DEFAULT_LAYER;

    #[test]
    fn red_downsamples_to_index_1() {
        assert_eq!(nearest_color_index(255, 0, 0), 1);
        assert_eq!(nearest_color_index(250, 10, 5), 1);
    }

    #[test]
    fn black_downsamples_to_index_7() {
        assert_eq!(nearest_color_index(0, 0, 0), 7);
    }

    #[test]
    fn styled_layers_are_created_with_downsampled_colors() {
        let mut styles = LayerStyles::new();
        styles.insert("cut", "color:#ff0000");
        styles.insert("engrave", "color:#0000fe, depth:3");

        let mut document = DxfDocument::new();
        styles.apply_to(&mut document);

        assert_eq!(document.layer("cut").unwrap().color, 1);
        assert_eq!(document.layer("engrave").unwrap().color, 5);
        assert_eq!(document.layer(DEFAULT_LAYER).unwrap().color, DEFAULT_COLOR);
    }

    #[test]
    fn restyling_the_default_layer_overwrites_not_duplicates() {
        let mut styles = LayerStyles::new();
        styles.insert(DEFAULT_LAYER, "color:#00ff00");

        let mut document = DxfDocument::new();
        styles.apply_to(&mut document);

        assert_eq!(document.layers().len(), 1);
        assert_eq!(document.layer(DEFAULT_LAYER).unwrap().color, 3);
    }

    #[test]
    fn malformed_tokens_are_dropped_but_others_apply() {
        let mut styles = LayerStyles::new();
        styles.insert("cut", "color, color:#ff0000, a:b:c");

        let mut document = DxfDocument::new();
        styles.apply_to(&mut document);

        assert_eq!(document.layer("cut").unwrap().color, 1);
    }

    #[test]
    fn unparseable_color_falls_back_to_default() {
        let mut styles = LayerStyles::new();
        styles.insert("cut", "color:red");

        let mut document = DxfDocument::new();
        styles.apply_to(&mut document);

        assert_eq!(document.layer("cut").unwrap().color, DEFAULT_COLOR);
    }

    #[test]
    fn first_layer_marker_wins() {
        let layer = layer_from_class(Some("thick dxf-layer-cut dxf-layer-engrave"), "default");
        assert_eq!(layer, "cut");
    }

    #[test]
    fn missing_marker_inherits() {
        assert_eq!(layer_from_class(Some("thick dashed"), "outer"), "outer");
        assert_eq!(layer_from_class(None, "outer"), "outer");
    }

    #[test]
    fn empty_marker_suffix_is_ignored() {
        assert_eq!(layer_from_class(Some("dxf-layer- other"), "outer"), "outer");
    }
}
