use std::fmt;

use worldspec_common::{Constraints, GeometryError, Primitive};

use crate::visualizer::{NullVisualizer, Visualizer};

/// Errors from world mutations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("layer '{0}' does not exist")]
    LayerNotFound(String),
    #[error("feature '{0}' has no primitives")]
    EmptyFeature(String),
    #[error("feature '{id}' has an invalid primitive: {source}")]
    InvalidFeature {
        id: String,
        #[source]
        source: GeometryError,
    },
}

/// A named geometric entity: one or more primitives plus opaque constraints.
///
/// Features are immutable once added to a layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    id: String,
    primitives: Vec<Primitive>,
    constraints: Constraints,
}

impl Feature {
    pub(crate) fn new(id: String, primitives: Vec<Primitive>, constraints: Constraints) -> Self {
        Self {
            id,
            primitives,
            constraints,
        }
    }

    /// Caller-chosen identifier; not required to be unique.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Primitives in the order they were given.
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Opaque numeric constraints carried with the feature.
    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }
}

/// A named, ordered group of features.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    name: String,
    features: Vec<Feature>,
}

impl Layer {
    /// Layer name, unique within a world.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Features in insertion order.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Number of features in the layer.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True when the layer has no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// The authoritative layered world model.
///
/// All mutations go through `add_layers_in_order` and `add_feature`, and each
/// one notifies the visualizer inline. Layers live in a `Vec` so iteration
/// and serialization follow the order they were first added.
#[derive(Debug, Clone, Default)]
pub struct World<V = NullVisualizer> {
    layers: Vec<Layer>,
    visualizer: V,
}

impl World {
    /// Create an empty world that discards notifications.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<V: Visualizer> World<V> {
    /// Create an empty world that notifies `visualizer` on every mutation.
    pub fn with_visualizer(visualizer: V) -> Self {
        Self {
            layers: Vec::new(),
            visualizer,
        }
    }

    /// Create or reset each named layer, then notify the visualizer once.
    ///
    /// New names are appended in the order given. A name that already exists
    /// keeps its position in the layer order but loses all of its features.
    ///
    /// `number_of_robots` is accepted here, but it is the reserved robot count
    /// key of the persisted document, so a world holding such a layer cannot
    /// be saved.
    pub fn add_layers_in_order<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        for name in &names {
            match self.layers.iter_mut().find(|l| &l.name == name) {
                Some(existing) => {
                    tracing::debug!(layer = %name, dropped = existing.features.len(), "layer reset");
                    existing.features.clear();
                }
                None => self.layers.push(Layer {
                    name: name.clone(),
                    features: Vec::new(),
                }),
            }
        }
        tracing::debug!(layers = ?names, "layers added in order");
        self.visualizer.display_layers(&names);
    }

    /// Append a feature to an existing layer and notify the visualizer.
    ///
    /// Fails with [`WorldError::LayerNotFound`] before looking at the payload,
    /// so an absent layer is reported regardless of the primitives given.
    pub fn add_feature(
        &mut self,
        layer_name: &str,
        feature_id: impl Into<String>,
        primitives: Vec<Primitive>,
        constraints: Constraints,
    ) -> Result<(), WorldError> {
        let layer = self
            .layers
            .iter_mut()
            .find(|l| l.name == layer_name)
            .ok_or_else(|| WorldError::LayerNotFound(layer_name.to_owned()))?;

        let id = feature_id.into();
        if primitives.is_empty() {
            return Err(WorldError::EmptyFeature(id));
        }
        if let Some(source) = primitives.iter().find_map(|p| p.validate().err()) {
            return Err(WorldError::InvalidFeature { id, source });
        }

        tracing::debug!(
            layer = layer_name,
            feature_id = %id,
            primitives = primitives.len(),
            constraints = ?constraints,
            "feature added"
        );
        let index = layer.features.len();
        layer.features.push(Feature::new(id, primitives, constraints));
        self.visualizer
            .display_feature(&layer.name, &layer.features[index]);
        Ok(())
    }
}

impl<V> World<V> {
    /// Layers in order.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    /// Look up a layer by name.
    pub fn layer(&self, name: &str) -> Result<&Layer, WorldError> {
        self.layers
            .iter()
            .find(|l| l.name == name)
            .ok_or_else(|| WorldError::LayerNotFound(name.to_owned()))
    }

    /// Layer names in order.
    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.name.as_str()).collect()
    }

    /// Number of layers in the world.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Total number of features across all layers.
    pub fn feature_count(&self) -> usize {
        self.layers.iter().map(Layer::len).sum()
    }

    /// The visualizer notified on every mutation.
    pub fn visualizer(&self) -> &V {
        &self.visualizer
    }

    /// Mutable access to the visualizer, for the optional display hooks.
    pub fn visualizer_mut(&mut self) -> &mut V {
        &mut self.visualizer
    }

    /// Consume the world and hand back its visualizer.
    pub fn into_visualizer(self) -> V {
        self.visualizer
    }

    /// Produce a summary of the world contents.
    pub fn summary(&self) -> WorldSummary {
        WorldSummary {
            layers: self
                .layers
                .iter()
                .map(|l| LayerSummary {
                    name: l.name.clone(),
                    features: l.features.len(),
                    primitives: l.features.iter().map(|f| f.primitives.len()).sum(),
                })
                .collect(),
        }
    }
}

/// Two worlds are equal when their layers are, regardless of visualizer.
impl<V, W> PartialEq<World<W>> for World<V> {
    fn eq(&self, other: &World<W>) -> bool {
        self.layers == other.layers
    }
}

/// Per-layer counts reported by [`World::summary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSummary {
    pub name: String,
    pub features: usize,
    pub primitives: usize,
}

/// Summary of world contents for inspection tooling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldSummary {
    pub layers: Vec<LayerSummary>,
}

impl WorldSummary {
    pub fn feature_count(&self) -> usize {
        self.layers.iter().map(|l| l.features).sum()
    }

    pub fn primitive_count(&self) -> usize {
        self.layers.iter().map(|l| l.primitives).sum()
    }
}

impl fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "World: layers={} features={} primitives={}",
            self.layers.len(),
            self.feature_count(),
            self.primitive_count()
        )?;
        for layer in &self.layers {
            write!(
                f,
                "\n  {}: features={} primitives={}",
                layer.name, layer.features, layer.primitives
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visualizer::{RecordingVisualizer, VisualizerCall};

    fn zone() -> Vec<Primitive> {
        vec![Primitive::circle((0.5, 0.5), 0.1)]
    }

    #[test]
    fn world_starts_empty() {
        let w = World::new();
        assert_eq!(w.layer_count(), 0);
        assert_eq!(w.feature_count(), 0);
    }

    #[test]
    fn layers_keep_given_order() {
        let mut w = World::new();
        w.add_layers_in_order(["Base", "Landmarks", "RestrictedZones"]);
        assert_eq!(w.layer_names(), vec!["Base", "Landmarks", "RestrictedZones"]);
    }

    #[test]
    fn add_feature_to_missing_layer_fails() {
        let mut w = World::new();
        w.add_layers_in_order(["Base"]);
        let payloads = [
            zone(),
            Vec::new(),
            vec![Primitive::polygon([(0.0, 0.0), (1.0, 1.0)])],
        ];
        for primitives in payloads {
            let err = w
                .add_feature("Landmarks", "f", primitives, Constraints::new())
                .unwrap_err();
            assert!(matches!(err, WorldError::LayerNotFound(ref name) if name == "Landmarks"));
        }
        assert_eq!(w.feature_count(), 0);
    }

    #[test]
    fn features_keep_insertion_order() {
        let mut w = World::new();
        w.add_layers_in_order(["Landmarks"]);
        for id in ["a", "b", "c"] {
            w.add_feature("Landmarks", id, zone(), Constraints::new())
                .unwrap();
        }
        let ids: Vec<&str> = w
            .layer("Landmarks")
            .unwrap()
            .features()
            .iter()
            .map(Feature::id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn re_adding_layer_resets_it_in_place() {
        let mut w = World::new();
        w.add_layers_in_order(["Base", "Landmarks", "RestrictedZones"]);
        w.add_feature("Landmarks", "l1", zone(), Constraints::new())
            .unwrap();
        w.add_feature("RestrictedZones", "r1", zone(), Constraints::new())
            .unwrap();

        w.add_layers_in_order(["Landmarks", "Extra"]);

        assert_eq!(
            w.layer_names(),
            vec!["Base", "Landmarks", "RestrictedZones", "Extra"]
        );
        assert!(w.layer("Landmarks").unwrap().is_empty());
        assert_eq!(w.layer("RestrictedZones").unwrap().len(), 1);
    }

    #[test]
    fn duplicate_names_in_one_call_make_one_layer() {
        let mut w = World::new();
        w.add_layers_in_order(["Base", "Base"]);
        assert_eq!(w.layer_count(), 1);
    }

    #[test]
    fn empty_feature_rejected() {
        let mut w = World::new();
        w.add_layers_in_order(["Base"]);
        let err = w
            .add_feature("Base", "nothing", Vec::new(), Constraints::new())
            .unwrap_err();
        assert!(matches!(err, WorldError::EmptyFeature(_)));
    }

    #[test]
    fn invalid_primitive_rejected() {
        let mut w = World::new();
        w.add_layers_in_order(["Base"]);
        let err = w
            .add_feature(
                "Base",
                "bad",
                vec![zone().remove(0), Primitive::circle((0.0, 0.0), -1.0)],
                Constraints::new(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            WorldError::InvalidFeature {
                source: GeometryError::NegativeRadius(_),
                ..
            }
        ));
        assert!(w.layer("Base").unwrap().is_empty());
    }

    #[test]
    fn duplicate_feature_ids_are_kept() {
        let mut w = World::new();
        w.add_layers_in_order(["A", "B"]);
        w.add_feature("A", "dup", zone(), Constraints::new()).unwrap();
        w.add_feature("B", "dup", zone(), Constraints::new()).unwrap();
        assert_eq!(w.feature_count(), 2);
    }

    #[test]
    fn layer_lookup_missing() {
        let w = World::new();
        assert!(matches!(w.layer("nope"), Err(WorldError::LayerNotFound(_))));
    }

    #[test]
    fn mutations_notify_visualizer() {
        let mut w = World::with_visualizer(RecordingVisualizer::new());
        w.add_layers_in_order(["Base", "RestrictedZones"]);
        let mut constraints = Constraints::new();
        constraints.insert("max_altitude".into(), 100.0);
        w.add_feature("RestrictedZones", "r1", zone(), constraints.clone())
            .unwrap();
        // failed mutations stay silent
        let _ = w.add_feature("Missing", "x", zone(), Constraints::new());

        let calls = w.visualizer().calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[0],
            VisualizerCall::Layers(vec!["Base".into(), "RestrictedZones".into()])
        );
        match &calls[1] {
            VisualizerCall::Feature { layer, feature } => {
                assert_eq!(layer, "RestrictedZones");
                assert_eq!(feature.id(), "r1");
                assert_eq!(feature.constraints(), &constraints);
            }
            other => panic!("expected feature call, got {other:?}"),
        }
    }

    #[test]
    fn equality_ignores_visualizer() {
        let mut a = World::new();
        let mut b = World::with_visualizer(RecordingVisualizer::new());
        a.add_layers_in_order(["Base"]);
        b.add_layers_in_order(["Base"]);
        a.add_feature("Base", "f", zone(), Constraints::new()).unwrap();
        assert!(a != b);
        b.add_feature("Base", "f", zone(), Constraints::new()).unwrap();
        assert!(a == b);
    }

    #[test]
    fn summary_counts() {
        let mut w = World::new();
        w.add_layers_in_order(["Base", "Landmarks"]);
        w.add_feature(
            "Landmarks",
            "l1",
            vec![
                Primitive::rectangle((-0.5, -0.5), 0.2, 0.1),
                Primitive::circle((0.0, 0.0), 0.1),
            ],
            Constraints::new(),
        )
        .unwrap();
        let s = w.summary();
        assert_eq!(s.feature_count(), 1);
        assert_eq!(s.primitive_count(), 2);
        assert_eq!(s.layers[0].features, 0);
        assert!(s.to_string().starts_with("World: layers=2 features=1 primitives=2"));
    }
}
