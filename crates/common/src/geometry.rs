//! Containment and boundary-intersection math for [`Primitive`] shapes.
//!
//! Boundary membership is inclusive for every kind: a point on the outline
//! of a circle, rectangle or polygon is contained. Circles and rectangles
//! compare exactly; polygons accept points within [`EPSILON`] of an edge.

use crate::primitive::{Primitive, PrimitiveKind};
use crate::types::{EPSILON, Point, Segment};

/// A point where a segment crosses a primitive's outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryHit {
    pub kind: PrimitiveKind,
    pub point: Point,
}

/// Whether `point` lies inside or on the boundary of `primitive`.
pub fn contains(primitive: &Primitive, point: Point) -> bool {
    match primitive {
        Primitive::Circle { center, radius } => point.distance(*center) <= *radius,
        Primitive::Rectangle {
            corner,
            width,
            height,
        } => {
            point.x >= corner.x
                && point.x <= corner.x + width
                && point.y >= corner.y
                && point.y <= corner.y + height
        }
        Primitive::Polygon { vertices } => {
            primitive.edges().iter().any(|e| e.distance_to(point) <= EPSILON)
                || point_in_polygon(point, vertices)
        }
    }
}

/// Whether `point` lies on the outline of `primitive`, within [`EPSILON`].
pub fn on_boundary(primitive: &Primitive, point: Point) -> bool {
    match primitive {
        Primitive::Circle { center, radius } => (point.distance(*center) - radius).abs() <= EPSILON,
        Primitive::Rectangle { .. } | Primitive::Polygon { .. } => primitive
            .edges()
            .iter()
            .any(|e| e.distance_to(point) <= EPSILON),
    }
}

/// Points where `segment` crosses the outline of `primitive`.
///
/// Circles report 0, 1 (tangent) or 2 points ordered along the segment.
/// Rectangles and polygons test each edge in order and drop duplicates, so a
/// segment through a corner reports that corner once. An edge that the
/// segment runs along collinearly contributes nothing by itself.
pub fn boundary_intersections(primitive: &Primitive, segment: Segment) -> Vec<BoundaryHit> {
    let kind = primitive.kind();
    if segment.length() <= EPSILON {
        return if on_boundary(primitive, segment.a) {
            vec![BoundaryHit {
                kind,
                point: segment.a,
            }]
        } else {
            Vec::new()
        };
    }

    let points = match primitive {
        Primitive::Circle { center, radius } => segment_circle(segment, *center, *radius),
        Primitive::Rectangle { .. } | Primitive::Polygon { .. } => {
            let mut points: Vec<Point> = Vec::new();
            for edge in primitive.edges() {
                if let Some(p) = segment_segment(segment, edge) {
                    if !points.iter().any(|q| q.abs_diff_eq(p, EPSILON)) {
                        points.push(p);
                    }
                }
            }
            points
        }
    };

    points
        .into_iter()
        .map(|point| BoundaryHit { kind, point })
        .collect()
}

/// Even-odd ray casting. Boundary points are resolved by the caller.
fn point_in_polygon(point: Point, vertices: &[Point]) -> bool {
    let mut inside = false;
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (vi, vj) = (vertices[i], vertices[j]);
        if (vi.y > point.y) != (vj.y > point.y)
            && point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Intersection of two segments, or `None` when they miss or are parallel.
fn segment_segment(s: Segment, e: Segment) -> Option<Point> {
    let d1 = s.direction();
    let d2 = e.direction();
    let len2 = d2.length();
    if len2 <= EPSILON {
        return None;
    }
    let denom = d1.perp_dot(d2);
    if denom.abs() <= EPSILON * d1.length() * len2 {
        return None;
    }

    let w = e.a - s.a;
    let t = w.perp_dot(d2) / denom;
    let u = w.perp_dot(d1) / denom;

    let t_tol = EPSILON / d1.length();
    let u_tol = EPSILON / len2;
    if t >= -t_tol && t <= 1.0 + t_tol && u >= -u_tol && u <= 1.0 + u_tol {
        Some(s.point_at(t.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Intersection of a segment with a circle's perimeter, ordered along the segment.
fn segment_circle(s: Segment, center: Point, radius: f64) -> Vec<Point> {
    let d = s.direction();
    let len = d.length();
    // Foot of the perpendicular from the center onto the carrier line.
    let t0 = (center - s.a).dot(d) / (len * len);
    let foot = s.point_at(t0);
    let dist = foot.distance(center);
    if dist > radius + EPSILON {
        return Vec::new();
    }

    let t_tol = EPSILON / len;
    let in_range = |t: f64| t >= -t_tol && t <= 1.0 + t_tol;

    if (dist - radius).abs() <= EPSILON {
        return if in_range(t0) { vec![foot] } else { Vec::new() };
    }

    let half_chord = (radius * radius - dist * dist).max(0.0).sqrt() / len;
    [t0 - half_chord, t0 + half_chord]
        .into_iter()
        .filter(|t| in_range(*t))
        .map(|t| s.point_at(t.clamp(0.0, 1.0)))
        .collect()
}
