//! Spatial queries over the layered world.
//!
//! Every query walks layers in order, then features in insertion order, then
//! primitives in declaration order. Results follow that traversal.

use worldspec_common::{BoundaryHit, Point, Segment, boundary_intersections, contains};

use crate::world::{Feature, Layer, World};

impl<V> World<V> {
    /// All features paired with their layer, in traversal order.
    pub fn features(&self) -> impl Iterator<Item = (&Layer, &Feature)> {
        self.layers()
            .flat_map(|layer| layer.features().iter().map(move |f| (layer, f)))
    }

    /// First feature with the given id, in traversal order.
    pub fn feature(&self, feature_id: &str) -> Option<(&Layer, &Feature)> {
        self.features().find(|(_, f)| f.id() == feature_id)
    }

    /// Whether any feature named `feature_id` contains `point`.
    ///
    /// Ids are not required to be unique; the scan stops at the first
    /// same-id feature with a primitive containing the point.
    pub fn is_point_in_feature(&self, point: Point, feature_id: &str) -> bool {
        let inside = self
            .features()
            .filter(|(_, f)| f.id() == feature_id)
            .any(|(_, f)| feature_contains(f, point));
        tracing::debug!(x = point.x, y = point.y, feature_id, inside, "point in feature");
        inside
    }

    /// Ids of every feature containing `point`, each listed at most once.
    pub fn features_containing_point(&self, point: Point) -> Vec<&str> {
        let ids: Vec<&str> = self
            .features()
            .filter(|(_, f)| feature_contains(f, point))
            .map(|(_, f)| f.id())
            .collect();
        tracing::debug!(x = point.x, y = point.y, features = ?ids, "features containing point");
        ids
    }

    /// Every boundary crossing of `segment` with every primitive in the world.
    ///
    /// Hits are neither sorted nor de-duplicated across primitives.
    pub fn intersections_with_world(&self, segment: Segment) -> Vec<BoundaryHit> {
        let hits: Vec<BoundaryHit> = self
            .features()
            .flat_map(|(_, f)| f.primitives().iter())
            .flat_map(|p| boundary_intersections(p, segment))
            .collect();
        tracing::debug!(count = hits.len(), "intersections found");
        hits
    }
}

fn feature_contains(feature: &Feature, point: Point) -> bool {
    feature.primitives().iter().any(|p| contains(p, point))
}
