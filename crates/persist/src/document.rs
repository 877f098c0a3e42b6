//! Structured world document: the persisted shape of a [`World`].
//!
//! The top level is an ordered mapping from layer name to a list of feature
//! records, plus an optional `number_of_robots` entry that is carried through
//! untouched. Coordinates are flat `[x, y]` sequences here and `Point`s
//! everywhere else.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use worldspec_common::{Constraints, GeometryError, Point, Primitive};
use worldspec_kernel::{Visualizer, World};

use crate::PersistError;

/// Reserved top-level key holding the simulation's robot count.
pub const ROBOT_COUNT_KEY: &str = "number_of_robots";

/// Structural problems found while reading a world document.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("could not decode {format} document: {message}")]
    Decode {
        format: crate::DocumentFormat,
        message: String,
    },
    #[error("feature #{index} in layer '{layer}' is missing `{field}`")]
    MissingField {
        layer: String,
        index: usize,
        field: &'static str,
    },
    #[error("feature '{id}' in layer '{layer}' has no primitives")]
    EmptyFeature { layer: String, id: String },
    #[error("feature '{id}' in layer '{layer}': {source}")]
    InvalidGeometry {
        layer: String,
        id: String,
        #[source]
        source: GeometryError,
    },
}

/// One primitive as written in the document, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PrimitiveRecord {
    Circle {
        center: [f64; 2],
        radius: f64,
    },
    Rectangle {
        corner: [f64; 2],
        width: f64,
        height: f64,
    },
    Polygon {
        vertices: Vec<[f64; 2]>,
    },
}

impl From<&Primitive> for PrimitiveRecord {
    fn from(primitive: &Primitive) -> Self {
        match primitive {
            Primitive::Circle { center, radius } => Self::Circle {
                center: center.to_array(),
                radius: *radius,
            },
            Primitive::Rectangle {
                corner,
                width,
                height,
            } => Self::Rectangle {
                corner: corner.to_array(),
                width: *width,
                height: *height,
            },
            Primitive::Polygon { vertices } => Self::Polygon {
                vertices: vertices.iter().map(|v| v.to_array()).collect(),
            },
        }
    }
}

impl From<&PrimitiveRecord> for Primitive {
    fn from(record: &PrimitiveRecord) -> Self {
        match record {
            PrimitiveRecord::Circle { center, radius } => Primitive::Circle {
                center: Point::from_array(*center),
                radius: *radius,
            },
            PrimitiveRecord::Rectangle {
                corner,
                width,
                height,
            } => Primitive::Rectangle {
                corner: Point::from_array(*corner),
                width: *width,
                height: *height,
            },
            PrimitiveRecord::Polygon { vertices } => Primitive::Polygon {
                vertices: vertices.iter().copied().map(Point::from_array).collect(),
            },
        }
    }
}

/// One feature as written in the document.
///
/// `id` and `primitives` are optional at the serde level so that their
/// absence is reported as a [`FormatError::MissingField`] with layer context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primitives: Option<Vec<PrimitiveRecord>>,
    #[serde(default)]
    pub constraints: Constraints,
}

/// A named layer and its feature records, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRecord {
    pub name: String,
    pub features: Vec<FeatureRecord>,
}

/// A validated feature ready to be replayed into a world.
struct CheckedFeature {
    id: String,
    primitives: Vec<Primitive>,
    constraints: Constraints,
}

/// The persisted form of a world.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldDocument {
    layers: Vec<LayerRecord>,
    number_of_robots: Option<u64>,
}

impl WorldDocument {
    /// Capture the world's layers, features and primitives in order.
    pub fn capture<V>(world: &World<V>) -> Self {
        let layers = world
            .layers()
            .map(|layer| LayerRecord {
                name: layer.name().to_owned(),
                features: layer
                    .features()
                    .iter()
                    .map(|f| FeatureRecord {
                        id: Some(f.id().to_owned()),
                        primitives: Some(f.primitives().iter().map(PrimitiveRecord::from).collect()),
                        constraints: f.constraints().clone(),
                    })
                    .collect(),
            })
            .collect();
        Self {
            layers,
            number_of_robots: None,
        }
    }

    /// Attach the robot count passthrough.
    pub fn with_robot_count(mut self, number_of_robots: u64) -> Self {
        self.number_of_robots = Some(number_of_robots);
        self
    }

    /// Robot count carried by the document, if any.
    pub fn robot_count(&self) -> Option<u64> {
        self.number_of_robots
    }

    /// Layer records in document order.
    pub fn layers(&self) -> &[LayerRecord] {
        &self.layers
    }

    /// Rebuild a world, notifying `visualizer` as a fresh build would.
    ///
    /// Every record is checked before the world is touched, so a malformed
    /// document yields an error and no partially populated world. Layers are
    /// added in one `add_layers_in_order` call in document order, then each
    /// feature is added in turn.
    pub fn restore<V: Visualizer>(&self, visualizer: V) -> Result<World<V>, PersistError> {
        let checked = self.check()?;

        let mut world = World::with_visualizer(visualizer);
        world.add_layers_in_order(self.layers.iter().map(|l| l.name.as_str()));
        for (layer, features) in self.layers.iter().zip(checked) {
            for feature in features {
                world.add_feature(&layer.name, feature.id, feature.primitives, feature.constraints)?;
            }
        }
        Ok(world)
    }

    fn check(&self) -> Result<Vec<Vec<CheckedFeature>>, FormatError> {
        self.layers
            .iter()
            .map(|layer| {
                layer
                    .features
                    .iter()
                    .enumerate()
                    .map(|(index, record)| check_feature(&layer.name, index, record))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect()
    }
}

fn check_feature(layer: &str, index: usize, record: &FeatureRecord) -> Result<CheckedFeature, FormatError> {
    let missing = |field| FormatError::MissingField {
        layer: layer.to_owned(),
        index,
        field,
    };
    let id = record.id.clone().ok_or_else(|| missing("id"))?;
    let records = record.primitives.as_ref().ok_or_else(|| missing("primitives"))?;
    if records.is_empty() {
        return Err(FormatError::EmptyFeature {
            layer: layer.to_owned(),
            id,
        });
    }

    let primitives: Vec<Primitive> = records.iter().map(Primitive::from).collect();
    if let Some(source) = primitives.iter().find_map(|p| p.validate().err()) {
        return Err(FormatError::InvalidGeometry {
            layer: layer.to_owned(),
            id,
            source,
        });
    }

    Ok(CheckedFeature {
        id,
        primitives,
        constraints: record.constraints.clone(),
    })
}

impl Serialize for WorldDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.layers.len() + usize::from(self.number_of_robots.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        for layer in &self.layers {
            map.serialize_entry(&layer.name, &layer.features)?;
        }
        if let Some(n) = self.number_of_robots {
            map.serialize_entry(ROBOT_COUNT_KEY, &n)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for WorldDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DocumentVisitor)
    }
}

/// Reads the top-level mapping entry by entry so layer order is the order
/// keys appear in the text.
struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = WorldDocument;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping from layer name to a list of features")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut doc = WorldDocument::default();
        while let Some(key) = map.next_key::<String>()? {
            if key == ROBOT_COUNT_KEY {
                if doc.number_of_robots.is_some() {
                    return Err(de::Error::duplicate_field(ROBOT_COUNT_KEY));
                }
                doc.number_of_robots = Some(map.next_value()?);
                continue;
            }
            if doc.layers.iter().any(|l| l.name == key) {
                return Err(de::Error::custom(format!("layer '{key}' appears more than once")));
            }
            // `Base:` with no value is an empty layer.
            let features: Option<Vec<FeatureRecord>> = map.next_value()?;
            doc.layers.push(LayerRecord {
                name: key,
                features: features.unwrap_or_default(),
            });
        }
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use worldspec_kernel::{RecordingVisualizer, World};

    fn sample_world() -> World {
        let mut w = World::new();
        w.add_layers_in_order(["Base", "Landmarks", "RestrictedZones"]);
        let mut restricted = Constraints::new();
        restricted.insert("min_linear_velocity".into(), 1.0);
        restricted.insert("max_linear_velocity".into(), 10.0);
        restricted.insert("max_altitude".into(), 100.0);
        w.add_feature(
            "RestrictedZones",
            "restricted_zone_1",
            vec![Primitive::circle((0.5, 0.5), 0.1)],
            restricted,
        )
        .unwrap();
        w.add_feature(
            "Landmarks",
            "landmark_1",
            vec![Primitive::rectangle((-0.5, -0.5), 0.2, 0.1)],
            Constraints::new(),
        )
        .unwrap();
        w.add_feature(
            "Landmarks",
            "polygon_1",
            vec![
                Primitive::polygon([(0.0, 0.0), (0.3, 0.0), (0.3, 0.3), (0.0, 0.3)]),
                Primitive::circle((0.15, 0.15), 0.05),
            ],
            Constraints::new(),
        )
        .unwrap();
        w
    }

    #[test]
    fn capture_flattens_coordinates() {
        let doc = WorldDocument::capture(&sample_world());
        let names: Vec<&str> = doc.layers().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Base", "Landmarks", "RestrictedZones"]);
        assert_eq!(
            doc.layers()[2].features[0].primitives.as_deref(),
            Some(
                &[PrimitiveRecord::Circle {
                    center: [0.5, 0.5],
                    radius: 0.1
                }][..]
            )
        );
    }

    #[test]
    fn capture_then_restore_is_identity() {
        let world = sample_world();
        let restored = WorldDocument::capture(&world)
            .restore(RecordingVisualizer::new())
            .unwrap();
        assert!(restored == world);
    }

    #[test]
    fn restore_replays_notifications_like_a_fresh_build() {
        let mut fresh = World::with_visualizer(RecordingVisualizer::new());
        fresh.add_layers_in_order(["Base", "Landmarks"]);
        fresh
            .add_feature(
                "Landmarks",
                "a",
                vec![Primitive::circle((0.0, 0.0), 1.0)],
                Constraints::new(),
            )
            .unwrap();
        fresh
            .add_feature(
                "Landmarks",
                "b",
                vec![Primitive::rectangle((0.0, 0.0), 1.0, 2.0)],
                Constraints::new(),
            )
            .unwrap();

        let restored = WorldDocument::capture(&fresh)
            .restore(RecordingVisualizer::new())
            .unwrap();
        assert_eq!(restored.visualizer().calls(), fresh.visualizer().calls());
    }

    #[test]
    fn restore_aborts_without_notifying_on_bad_record() {
        let mut doc = WorldDocument::capture(&sample_world());
        doc.layers[2].features.push(FeatureRecord {
            id: None,
            primitives: Some(vec![]),
            constraints: Constraints::new(),
        });
        let mut visualizer = RecordingVisualizer::new();
        let err = doc.restore(&mut visualizer).unwrap_err();
        assert!(matches!(
            err,
            PersistError::Format(FormatError::MissingField {
                field: "id",
                index: 1,
                ..
            })
        ));
        assert!(visualizer.calls().is_empty());
    }

    #[test]
    fn restore_rejects_invalid_geometry() {
        let mut doc = WorldDocument::default();
        doc.layers.push(LayerRecord {
            name: "Base".into(),
            features: vec![FeatureRecord {
                id: Some("sliver".into()),
                primitives: Some(vec![PrimitiveRecord::Polygon {
                    vertices: vec![[0.0, 0.0], [1.0, 1.0]],
                }]),
                constraints: Constraints::new(),
            }],
        });
        let err = doc.restore(RecordingVisualizer::new()).unwrap_err();
        assert!(matches!(
            err,
            PersistError::Format(FormatError::InvalidGeometry {
                source: GeometryError::TooFewVertices(2),
                ..
            })
        ));
    }

    #[test]
    fn robot_count_passthrough() {
        let doc = WorldDocument::capture(&sample_world()).with_robot_count(5);
        assert_eq!(doc.robot_count(), Some(5));
        assert_eq!(WorldDocument::capture(&World::new()).robot_count(), None);
    }
}
