use glam::DVec2;
use std::collections::BTreeMap;

/// A 2D world-space coordinate.
///
/// This is the single in-memory coordinate representation. Flattening into
/// `[x, y]` sequences happens only at the persistence boundary.
pub type Point = DVec2;

/// Opaque per-feature metadata such as `min_linear_velocity` or `max_altitude`.
///
/// Never interpreted by the world model, only stored and round-tripped.
/// BTreeMap keeps key order deterministic when serialized.
pub type Constraints = BTreeMap<String, f64>;

/// Absolute tolerance used for boundary tests and de-duplication of hits.
pub const EPSILON: f64 = 1e-9;

/// A directed line segment from `a` to `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

impl Segment {
    /// Segment from `a` to `b`; accepts `Point`s or `(x, y)` tuples.
    pub fn new(a: impl Into<Point>, b: impl Into<Point>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
        }
    }

    /// Vector from `a` to `b`.
    pub fn direction(&self) -> Point {
        self.b - self.a
    }

    /// Euclidean length; zero for a degenerate segment.
    pub fn length(&self) -> f64 {
        self.direction().length()
    }

    /// Point at parameter `t`, where `t = 0` is `a` and `t = 1` is `b`.
    pub fn point_at(&self, t: f64) -> Point {
        self.a + self.direction() * t
    }

    /// Euclidean distance from `p` to the closest point of the segment.
    pub fn distance_to(&self, p: Point) -> f64 {
        let d = self.direction();
        let len2 = d.length_squared();
        let t = if len2 > 0.0 {
            ((p - self.a).dot(d) / len2).clamp(0.0, 1.0)
        } else {
            0.0
        };
        p.distance(self.point_at(t))
    }
}
