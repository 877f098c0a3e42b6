//! Shared geometry for the world model: points, segments, primitive shapes,
//! containment tests and boundary intersection.
//!
//! # Invariants
//! - Every function here is pure; no shared state.
//! - Boundary membership is inclusive for all primitive kinds.

pub mod geometry;
pub mod primitive;
pub mod types;

pub use geometry::{BoundaryHit, boundary_intersections, contains, on_boundary};
pub use primitive::{GeometryError, Primitive, PrimitiveKind};
pub use types::{Constraints, EPSILON, Point, Segment};
