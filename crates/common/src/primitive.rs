use std::fmt;

use crate::types::{Point, Segment};

/// Errors raised when a primitive violates its shape invariants.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    #[error("circle radius must be non-negative, got {0}")]
    NegativeRadius(f64),
    #[error("{kind} has a non-finite coordinate or dimension")]
    NonFinite { kind: PrimitiveKind },
}

/// Discriminant of a [`Primitive`], used to tag query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Circle,
    Rectangle,
    Polygon,
}

impl PrimitiveKind {
    /// Display name, as used in intersection reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Circle => "Circle",
            Self::Rectangle => "Rectangle",
            Self::Polygon => "Polygon",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An atomic shape composing a feature.
///
/// Rectangles are axis-aligned with `corner` at the lower-left. Width and
/// height are assumed positive and not checked.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Circle { center: Point, radius: f64 },
    Rectangle { corner: Point, width: f64, height: f64 },
    Polygon { vertices: Vec<Point> },
}

impl Primitive {
    /// Circle around `center`.
    pub fn circle(center: impl Into<Point>, radius: f64) -> Self {
        Self::Circle {
            center: center.into(),
            radius,
        }
    }

    /// Axis-aligned rectangle with `corner` at the lower-left.
    pub fn rectangle(corner: impl Into<Point>, width: f64, height: f64) -> Self {
        Self::Rectangle {
            corner: corner.into(),
            width,
            height,
        }
    }

    /// Polygon from vertices in order; the closing edge is implicit.
    pub fn polygon<P: Into<Point>>(vertices: impl IntoIterator<Item = P>) -> Self {
        Self::Polygon {
            vertices: vertices.into_iter().map(Into::into).collect(),
        }
    }

    /// Which variant this is.
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Circle { .. } => PrimitiveKind::Circle,
            Self::Rectangle { .. } => PrimitiveKind::Rectangle,
            Self::Polygon { .. } => PrimitiveKind::Polygon,
        }
    }

    /// Check the shape invariants: finite values, radius >= 0, polygon >= 3 vertices.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let kind = self.kind();
        match self {
            Self::Circle { center, radius } => {
                if !center.is_finite() || !radius.is_finite() {
                    return Err(GeometryError::NonFinite { kind });
                }
                if *radius < 0.0 {
                    return Err(GeometryError::NegativeRadius(*radius));
                }
            }
            Self::Rectangle {
                corner,
                width,
                height,
            } => {
                if !corner.is_finite() || !width.is_finite() || !height.is_finite() {
                    return Err(GeometryError::NonFinite { kind });
                }
            }
            Self::Polygon { vertices } => {
                if vertices.len() < 3 {
                    return Err(GeometryError::TooFewVertices(vertices.len()));
                }
                if vertices.iter().any(|v| !v.is_finite()) {
                    return Err(GeometryError::NonFinite { kind });
                }
            }
        }
        Ok(())
    }

    /// Outline edges in traversal order. Circles have no straight edges.
    ///
    /// Rectangles yield bottom, right, top, left. Polygons yield each edge in
    /// vertex order followed by the closing edge.
    pub fn edges(&self) -> Vec<Segment> {
        match self {
            Self::Circle { .. } => Vec::new(),
            Self::Rectangle {
                corner,
                width,
                height,
            } => {
                let p0 = *corner;
                let p1 = Point::new(corner.x + width, corner.y);
                let p2 = Point::new(corner.x + width, corner.y + height);
                let p3 = Point::new(corner.x, corner.y + height);
                vec![
                    Segment { a: p0, b: p1 },
                    Segment { a: p1, b: p2 },
                    Segment { a: p2, b: p3 },
                    Segment { a: p3, b: p0 },
                ]
            }
            Self::Polygon { vertices } => {
                let n = vertices.len();
                (0..n)
                    .map(|i| Segment {
                        a: vertices[i],
                        b: vertices[(i + 1) % n],
                    })
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(Primitive::circle((0.0, 0.0), 1.0).kind(), PrimitiveKind::Circle);
        assert_eq!(
            Primitive::rectangle((0.0, 0.0), 1.0, 1.0).kind(),
            PrimitiveKind::Rectangle
        );
        assert_eq!(
            Primitive::polygon([(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]).kind(),
            PrimitiveKind::Polygon
        );
    }

    #[test]
    fn kind_display_is_capitalized() {
        assert_eq!(PrimitiveKind::Rectangle.to_string(), "Rectangle");
    }

    #[test]
    fn validate_rejects_short_polygon() {
        let p = Primitive::polygon([(0.0, 0.0), (1.0, 0.0)]);
        assert_eq!(p.validate(), Err(GeometryError::TooFewVertices(2)));
    }

    #[test]
    fn validate_rejects_negative_radius() {
        let c = Primitive::circle((0.0, 0.0), -0.5);
        assert_eq!(c.validate(), Err(GeometryError::NegativeRadius(-0.5)));
    }

    #[test]
    fn validate_accepts_zero_radius() {
        assert!(Primitive::circle((0.0, 0.0), 0.0).validate().is_ok());
    }

    #[test]
    fn validate_rejects_nan() {
        let r = Primitive::rectangle((f64::NAN, 0.0), 1.0, 1.0);
        assert!(matches!(
            r.validate(),
            Err(GeometryError::NonFinite {
                kind: PrimitiveKind::Rectangle
            })
        ));
    }

    #[test]
    fn rectangle_edges_close_the_loop() {
        let r = Primitive::rectangle((-0.5, -0.5), 0.2, 0.1);
        let edges = r.edges();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[0].a, Point::new(-0.5, -0.5));
        assert_eq!(edges[3].b, Point::new(-0.5, -0.5));
    }

    #[test]
    fn polygon_edges_include_closing_edge() {
        let p = Primitive::polygon([(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        let edges = p.edges();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[2].a, Point::new(0.0, 1.0));
        assert_eq!(edges[2].b, Point::new(0.0, 0.0));
    }
}
