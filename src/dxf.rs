use std::io::{self, Write};

pub type Point2 = (f64, f64);
pub type Point3 = (f64, f64, f64);

/// The layer every entity lands on unless something resolves another one.
pub const DEFAULT_LAYER: &str = "default";

/// AutoCAD color index 7 (black/white depending on background).
pub const DEFAULT_COLOR: u8 = 7;

/// Named entity grouping with an AutoCAD color index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerDefinition {
    pub name: String,
    pub color: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    Line {
        start: Point2,
        end: Point2,
    },
    /// Cubic Bezier-equivalent spline: 4 control points with a clamped knot
    /// vector.
    Spline {
        control_points: [Point3; 4],
        knot_values: [f64; 8],
    },
    Polyline {
        points: Vec<Point2>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub kind: EntityKind,
    pub layer: String,
}

impl Entity {
    pub fn set_layer(&mut self, name: &str) {
        self.layer = name.to_string();
    }
}

/// Index into the document's entity list, handed out by the `add_*` methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityHandle(usize);

/// The output drawing: a layer table plus a flat entity list, serialized as
/// minimal ASCII DXF (header, layer table, entities).
#[derive(Debug, Default)]
pub struct DxfDocument {
    layers: Vec<LayerDefinition>,
    entities: Vec<Entity>,
}

impl DxfDocument {
    /// New document with the guaranteed `"default"` layer.
    pub fn new() -> Self {
        let mut document = Self::default();
        document.create_layer(DEFAULT_LAYER, DEFAULT_COLOR);
        document
    }

    /// Create a layer, or recolor it if a layer of that name already exists.
    /// Layer names stay unique.
    pub fn create_layer(&mut self, name: &str, color: u8) {
        if let Some(existing) = self.layers.iter_mut().find(|l| l.name == name) {
            existing.color = color;
        } else {
            self.layers.push(LayerDefinition { name: name.to_string(), color });
        }
    }

    pub fn layer(&self, name: &str) -> Option<&LayerDefinition> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn layers(&self) -> &[LayerDefinition] {
        &self.layers
    }

    pub fn add_line(&mut self, start: Point2, end: Point2) -> EntityHandle {
        self.push(EntityKind::Line { start, end })
    }

    pub fn add_spline(
        &mut self,
        control_points: [Point3; 4],
        knot_values: [f64; 8],
    ) -> EntityHandle {
        self.push(EntityKind::Spline { control_points, knot_values })
    }

    pub fn add_polyline(&mut self, points: Vec<Point2>) -> EntityHandle {
        self.push(EntityKind::Polyline { points })
    }

    fn push(&mut self, kind: EntityKind) -> EntityHandle {
        self.entities.push(Entity { kind, layer: DEFAULT_LAYER.to_string() });
        EntityHandle(self.entities.len() - 1)
    }

    pub fn entity_mut(&mut self, handle: EntityHandle) -> &mut Entity {
        &mut self.entities[handle.0]
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Write the document as ASCII DXF. Layers referenced by entities but
    /// never created are materialized with the default color so the layer
    /// table stays consistent.
    pub fn serialize<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        let mut layers = self.layers.clone();
        for entity in &self.entities {
            if !layers.iter().any(|l| l.name == entity.layer) {
                layers.push(LayerDefinition {
                    name: entity.layer.clone(),
                    color: DEFAULT_COLOR,
                });
            }
        }

        tag(sink, 0, "SECTION")?;
        tag(sink, 2, "HEADER")?;
        tag(sink, 9, "$ACADVER")?;
        tag(sink, 1, "AC1027")?;
        tag(sink, 0, "ENDSEC")?;

        tag(sink, 0, "SECTION")?;
        tag(sink, 2, "TABLES")?;
        tag(sink, 0, "TABLE")?;
        tag(sink, 2, "LAYER")?;
        tag(sink, 70, &layers.len().to_string())?;
        for layer in &layers {
            tag(sink, 0, "LAYER")?;
            tag(sink, 2, &layer.name)?;
            tag(sink, 70, "0")?;
            tag(sink, 62, &layer.color.to_string())?;
            tag(sink, 6, "CONTINUOUS")?;
        }
        tag(sink, 0, "ENDTAB")?;
        tag(sink, 0, "ENDSEC")?;

        tag(sink, 0, "SECTION")?;
        tag(sink, 2, "ENTITIES")?;
        for entity in &self.entities {
            self.write_entity(sink, entity)?;
        }
        tag(sink, 0, "ENDSEC")?;
        tag(sink, 0, "EOF")?;
        Ok(())
    }

    fn write_entity<W: Write>(&self, sink: &mut W, entity: &Entity) -> io::Result<()> {
        match &entity.kind {
            EntityKind::Line { start, end } => {
                tag(sink, 0, "LINE")?;
                tag(sink, 8, &entity.layer)?;
                float_tag(sink, 10, start.0)?;
                float_tag(sink, 20, start.1)?;
                float_tag(sink, 30, 0.0)?;
                float_tag(sink, 11, end.0)?;
                float_tag(sink, 21, end.1)?;
                float_tag(sink, 31, 0.0)?;
            }
            EntityKind::Spline { control_points, knot_values } => {
                tag(sink, 0, "SPLINE")?;
                tag(sink, 8, &entity.layer)?;
                // Planar flag, degree 3, knot and control point counts.
                tag(sink, 70, "8")?;
                tag(sink, 71, "3")?;
                tag(sink, 72, &knot_values.len().to_string())?;
                tag(sink, 73, &control_points.len().to_string())?;
                tag(sink, 74, "0")?;
                for knot in knot_values {
                    float_tag(sink, 40, *knot)?;
                }
                for (x, y, z) in control_points {
                    float_tag(sink, 10, *x)?;
                    float_tag(sink, 20, *y)?;
                    float_tag(sink, 30, *z)?;
                }
            }
            EntityKind::Polyline { points } => {
                tag(sink, 0, "LWPOLYLINE")?;
                tag(sink, 8, &entity.layer)?;
                tag(sink, 90, &points.len().to_string())?;
                tag(sink, 70, "0")?;
                for (x, y) in points {
                    float_tag(sink, 10, *x)?;
                    float_tag(sink, 20, *y)?;
                }
            }
        }
        Ok(())
    }
}

fn tag<W: Write>(sink: &mut W, code: i32, value: &str) -> io::Result<()> {
    writeln!(sink, "{code}\n{value}")
}

fn float_tag<W: Write>(sink: &mut W, code: i32, value: f64) -> io::Result<()> {
    writeln!(sink, "{code}\n{value:.6}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serialized(document: &DxfDocument) -> String {
        let mut buffer = Vec::new();
        document.serialize(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn new_document_has_default_layer() {
        let document = DxfDocument::new();
        assert_eq!(
            document.layer(DEFAULT_LAYER),
            Some(&LayerDefinition { name: "default".to_string(), color: DEFAULT_COLOR })
        );
    }

    #[test]
    fn recreating_a_layer_overwrites_its_color() {
        let mut document = DxfDocument::new();
        document.create_layer("cut", 3);
        document.create_layer("cut", 1);
        assert_eq!(document.layers().len(), 2);
        assert_eq!(document.layer("cut").unwrap().color, 1);
    }

    #[test]
    fn entities_default_to_the_default_layer() {
        let mut document = DxfDocument::new();
        let handle = document.add_line((0.0, 0.0), (1.0, 1.0));
        assert_eq!(document.entity_mut(handle).layer, DEFAULT_LAYER);
    }

    #[test]
    fn set_layer_moves_an_entity() {
        let mut document = DxfDocument::new();
        let handle = document.add_line((0.0, 0.0), (1.0, 1.0));
        document.entity_mut(handle).set_layer("cut");
        assert_eq!(document.entities()[0].layer, "cut");
    }

    #[test]
    fn serialize_emits_sections_and_entities() {
        let mut document = DxfDocument::new();
        document.create_layer("cut", 1);
        document.add_line((0.0, 0.0), (10.0, 0.0));
        document.add_polyline(vec![(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        document.add_spline(
            [(0.0, 0.0, 0.0), (1.0, 1.0, 0.0), (2.0, 1.0, 0.0), (3.0, 0.0, 0.0)],
            [0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0],
        );

        let text = serialized(&document);
        assert!(text.starts_with("0\nSECTION\n2\nHEADER\n"));
        assert!(text.contains("$ACADVER"));
        assert!(text.contains("0\nLINE\n8\ndefault\n"));
        assert!(text.contains("0\nLWPOLYLINE\n"));
        assert!(text.contains("0\nSPLINE\n"));
        assert!(text.trim_end().ends_with("0\nEOF"));
    }

    #[test]
    fn referenced_but_uncreated_layer_is_materialized() {
        let mut document = DxfDocument::new();
        let handle = document.add_line((0.0, 0.0), (1.0, 0.0));
        document.entity_mut(handle).set_layer("engrave");

        let text = serialized(&document);
        assert!(text.contains("0\nLAYER\n2\nengrave\n"));
        // Two layers in the table: default plus the materialized one.
        assert!(text.contains("2\nLAYER\n70\n2\n"));
    }
}
