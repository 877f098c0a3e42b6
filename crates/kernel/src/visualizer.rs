use worldspec_common::Point;

use crate::world::Feature;

/// An RGB display color passed to the optional point hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const RED: Self = Self([255, 0, 0]);
    pub const GREEN: Self = Self([0, 128, 0]);
    pub const BLUE: Self = Self([0, 0, 255]);
    pub const ORANGE: Self = Self([255, 165, 0]);
    pub const PURPLE: Self = Self([128, 0, 128]);
}

/// Display collaborator notified by the world after every mutation.
///
/// Calls are synchronous and made on the mutating thread, so
/// implementations must return promptly. The world only ever invokes
/// [`display_layers`](Self::display_layers) and
/// [`display_feature`](Self::display_feature); the remaining hooks exist for
/// callers that want to show query results and default to no-ops.
pub trait Visualizer {
    /// Called once per `add_layers_in_order`, with the names as given.
    fn display_layers(&mut self, layer_names: &[String]);

    /// Called once per successful `add_feature`.
    fn display_feature(&mut self, layer_name: &str, feature: &Feature);

    fn highlight_point(&mut self, _point: Point, _color: Color) {}

    fn draw_line_segment(&mut self, _a: Point, _b: Point) {}

    fn display_point(&mut self, _point: Point, _color: Color, _size: f64) {}
}

impl<V: Visualizer + ?Sized> Visualizer for &mut V {
    fn display_layers(&mut self, layer_names: &[String]) {
        (**self).display_layers(layer_names);
    }

    fn display_feature(&mut self, layer_name: &str, feature: &Feature) {
        (**self).display_feature(layer_name, feature);
    }

    fn highlight_point(&mut self, point: Point, color: Color) {
        (**self).highlight_point(point, color);
    }

    fn draw_line_segment(&mut self, a: Point, b: Point) {
        (**self).draw_line_segment(a, b);
    }

    fn display_point(&mut self, point: Point, color: Color, size: f64) {
        (**self).display_point(point, color, size);
    }
}

impl<V: Visualizer + ?Sized> Visualizer for Box<V> {
    fn display_layers(&mut self, layer_names: &[String]) {
        (**self).display_layers(layer_names);
    }

    fn display_feature(&mut self, layer_name: &str, feature: &Feature) {
        (**self).display_feature(layer_name, feature);
    }

    fn highlight_point(&mut self, point: Point, color: Color) {
        (**self).highlight_point(point, color);
    }

    fn draw_line_segment(&mut self, a: Point, b: Point) {
        (**self).draw_line_segment(a, b);
    }

    fn display_point(&mut self, point: Point, color: Color, size: f64) {
        (**self).display_point(point, color, size);
    }
}

/// Visualizer that discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullVisualizer;

impl Visualizer for NullVisualizer {
    fn display_layers(&mut self, _layer_names: &[String]) {}

    fn display_feature(&mut self, _layer_name: &str, _feature: &Feature) {}
}

/// Visualizer that turns notifications into `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingVisualizer;

impl Visualizer for TracingVisualizer {
    fn display_layers(&mut self, layer_names: &[String]) {
        tracing::info!(layers = ?layer_names, "display layers");
    }

    fn display_feature(&mut self, layer_name: &str, feature: &Feature) {
        tracing::info!(
            layer = layer_name,
            feature_id = feature.id(),
            primitives = feature.primitives().len(),
            "display feature"
        );
    }

    fn highlight_point(&mut self, point: Point, color: Color) {
        tracing::info!(x = point.x, y = point.y, color = ?color.0, "highlight point");
    }

    fn draw_line_segment(&mut self, a: Point, b: Point) {
        tracing::info!(ax = a.x, ay = a.y, bx = b.x, by = b.y, "draw line segment");
    }

    fn display_point(&mut self, point: Point, color: Color, size: f64) {
        tracing::info!(x = point.x, y = point.y, color = ?color.0, size, "display point");
    }
}

/// A single notification captured by [`RecordingVisualizer`].
#[derive(Debug, Clone, PartialEq)]
pub enum VisualizerCall {
    Layers(Vec<String>),
    Feature { layer: String, feature: Feature },
    Highlight { point: Point, color: Color },
    Segment { a: Point, b: Point },
    Marker { point: Point, color: Color, size: f64 },
}

/// Visualizer that records every call in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingVisualizer {
    calls: Vec<VisualizerCall>,
}

impl RecordingVisualizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only access to the recorded calls.
    pub fn calls(&self) -> &[VisualizerCall] {
        &self.calls
    }

    /// Drain and return the recorded calls.
    pub fn take_calls(&mut self) -> Vec<VisualizerCall> {
        std::mem::take(&mut self.calls)
    }
}

impl Visualizer for RecordingVisualizer {
    fn display_layers(&mut self, layer_names: &[String]) {
        self.calls.push(VisualizerCall::Layers(layer_names.to_vec()));
    }

    fn display_feature(&mut self, layer_name: &str, feature: &Feature) {
        self.calls.push(VisualizerCall::Feature {
            layer: layer_name.to_owned(),
            feature: feature.clone(),
        });
    }

    fn highlight_point(&mut self, point: Point, color: Color) {
        self.calls.push(VisualizerCall::Highlight { point, color });
    }

    fn draw_line_segment(&mut self, a: Point, b: Point) {
        self.calls.push(VisualizerCall::Segment { a, b });
    }

    fn display_point(&mut self, point: Point, color: Color, size: f64) {
        self.calls.push(VisualizerCall::Marker { point, color, size });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use worldspec_common::{Constraints, Primitive};

    #[test]
    fn recording_captures_optional_hooks() {
        let mut v = RecordingVisualizer::new();
        v.highlight_point(Point::new(0.2, 0.2), Color::GREEN);
        v.draw_line_segment(Point::ZERO, Point::ONE);
        v.display_point(Point::new(0.2, 0.2), Color::PURPLE, 10.0);
        assert_eq!(v.calls().len(), 3);
        assert_eq!(
            v.calls()[1],
            VisualizerCall::Segment {
                a: Point::ZERO,
                b: Point::ONE
            }
        );
    }

    fn notify<V: Visualizer>(mut visualizer: V) {
        visualizer.display_layers(&["Base".to_owned()]);
        let feature = Feature::new(
            "f".to_owned(),
            vec![Primitive::circle((0.0, 0.0), 1.0)],
            Constraints::new(),
        );
        visualizer.display_feature("Base", &feature);
    }

    #[test]
    fn borrowed_visualizer_forwards_calls() {
        let mut inner = RecordingVisualizer::new();
        notify(&mut inner);
        assert_eq!(inner.calls().len(), 2);
        assert_eq!(inner.calls()[0], VisualizerCall::Layers(vec!["Base".to_owned()]));
    }

    #[test]
    fn take_calls_clears_log() {
        let mut v = RecordingVisualizer::new();
        v.display_layers(&[]);
        assert_eq!(v.take_calls().len(), 1);
        assert!(v.calls().is_empty());
    }
}
