//! World Kernel: the layered world model, visualizer notifications and
//! spatial queries.
//!
//! # Invariants
//! - Layer names are unique; a feature belongs to exactly one layer.
//! - All state mutations flow through `add_layers_in_order` and `add_feature`.
//! - Iteration, queries and serialization follow layer order, then feature
//!   insertion order.

pub mod query;
pub mod visualizer;
pub mod world;

pub use visualizer::{
    Color, NullVisualizer, RecordingVisualizer, TracingVisualizer, Visualizer, VisualizerCall,
};
pub use world::{Feature, Layer, LayerSummary, World, WorldError, WorldSummary};
