use std::collections::BTreeMap;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::network::{network_graph::GraphModel, node::NodeId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// Positions of every node of a model, in layout units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    positions: BTreeMap<NodeId, Point>,
}

impl Layout {
    pub fn position(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Point)> {
        self.positions.iter().map(|(id, point)| (id.as_str(), *point))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Bounding box as (min, max).
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let mut points = self.positions.values();
        let first = *points.next()?;
        Some(points.fold((first, first), |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        }))
    }
}

/// Strategy placing the nodes of a model on a plane. Selected by the caller.
pub trait LayoutStrategy {
    fn name(&self) -> &'static str;

    fn layout(&self, model: &GraphModel) -> Layout;
}

/// Nodes evenly spaced on a circle, with an optional hub at the origin.
#[derive(Debug, Clone)]
pub struct CircularLayout {
    pub center: Option<NodeId>,
    pub radius: f32,
}

impl Default for CircularLayout {
    fn default() -> Self {
        Self {
            center: None,
            radius: 8.0,
        }
    }
}

impl LayoutStrategy for CircularLayout {
    fn name(&self) -> &'static str {
        "circular"
    }

    fn layout(&self, model: &GraphModel) -> Layout {
        let center = self
            .center
            .as_deref()
            .filter(|id| model.contains_node(id));
        let ring: Vec<&str> = model
            .nodes()
            .map(|node| node.id.as_str())
            .filter(|id| Some(*id) != center)
            .collect();

        let mut positions = BTreeMap::new();
        let step = std::f32::consts::TAU / ring.len().max(1) as f32;
        for (i, id) in ring.into_iter().enumerate() {
            let angle = step * i as f32;
            positions.insert(
                id.to_string(),
                Point::new(self.radius * angle.cos(), self.radius * angle.sin()),
            );
        }
        if let Some(center) = center {
            positions.insert(center.to_string(), Point::ORIGIN);
        }
        Layout { positions }
    }
}

/// Fruchterman–Reingold spring layout inside a `[-extent, extent]` square.
/// Initial positions come from a seeded RNG, so a given seed always gives the same layout.
#[derive(Debug, Clone)]
pub struct ForceDirectedLayout {
    pub iterations: usize,
    pub seed: u64,
    pub extent: f32,
}

impl Default for ForceDirectedLayout {
    fn default() -> Self {
        Self {
            iterations: 200,
            seed: 42,
            extent: DEFAULT_EXTENT,
        }
    }
}

const MIN_DISTANCE: f32 = 0.01;
const DEFAULT_EXTENT: f32 = 8.0;

impl LayoutStrategy for ForceDirectedLayout {
    fn name(&self) -> &'static str {
        "force"
    }

    fn layout(&self, model: &GraphModel) -> Layout {
        let ids: Vec<&str> = model.nodes().map(|node| node.id.as_str()).collect();
        let n = ids.len();
        if n == 0 {
            return Layout::default();
        }

        let index_of: BTreeMap<&str, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let edges: Vec<(usize, usize)> = model
            .edges()
            .into_iter()
            .filter_map(|edge| Some((*index_of.get(edge.source.as_str())?, *index_of.get(edge.target.as_str())?)))
            .collect();

        // Sampling needs a finite, non-empty range
        let extent = if self.extent.is_finite() {
            self.extent.max(MIN_DISTANCE)
        } else {
            DEFAULT_EXTENT
        };
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut pos: Vec<Point> = (0..n)
            .map(|_| {
                Point::new(
                    rng.random_range(-extent..extent),
                    rng.random_range(-extent..extent),
                )
            })
            .collect();

        let side = 2.0 * extent;
        let k = (side * side / n as f32).sqrt();
        let mut temperature = side / 10.0;
        let cooling = temperature / self.iterations.max(1) as f32;

        for _ in 0..self.iterations {
            let mut disp = vec![Point::ORIGIN; n];

            for i in 0..n {
                for j in (i + 1)..n {
                    let delta = Point::new(pos[i].x - pos[j].x, pos[i].y - pos[j].y);
                    let distance = delta.length().max(MIN_DISTANCE);
                    let force = k * k / distance;
                    let (fx, fy) = (delta.x / distance * force, delta.y / distance * force);
                    disp[i].x += fx;
                    disp[i].y += fy;
                    disp[j].x -= fx;
                    disp[j].y -= fy;
                }
            }

            for &(s, t) in &edges {
                let delta = Point::new(pos[s].x - pos[t].x, pos[s].y - pos[t].y);
                let distance = delta.length().max(MIN_DISTANCE);
                let force = distance * distance / k;
                let (fx, fy) = (delta.x / distance * force, delta.y / distance * force);
                disp[s].x -= fx;
                disp[s].y -= fy;
                disp[t].x += fx;
                disp[t].y += fy;
            }

            for (p, d) in pos.iter_mut().zip(&disp) {
                let length = d.length().max(MIN_DISTANCE);
                let step = length.min(temperature);
                p.x = (p.x + d.x / length * step).clamp(-extent, extent);
                p.y = (p.y + d.y / length * step).clamp(-extent, extent);
            }
            temperature = (temperature - cooling).max(MIN_DISTANCE);
        }

        Layout {
            positions: ids.into_iter().map(String::from).zip(pos).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{TextSource, load_model};

    fn model() -> GraphModel {
        load_model(
            &TextSource::new("topology", include_str!("../../test_data/topology.txt")),
            &TextSource::new("connections", include_str!("../../test_data/connections.txt")),
        )
        .unwrap()
    }

    #[test]
    fn test_circular_layout_places_center_at_origin() {
        let model = model();
        let layout = CircularLayout {
            center: Some("192.168.134.3".into()),
            radius: 8.0,
        }
        .layout(&model);

        assert_eq!(layout.len(), model.node_count());
        assert_eq!(layout.position("192.168.134.3"), Some(Point::ORIGIN));
        for (id, point) in layout.iter().filter(|(id, _)| *id != "192.168.134.3") {
            assert!((point.length() - 8.0).abs() < 1e-3, "{id} is off the circle");
        }
    }

    #[test]
    fn test_circular_layout_ignores_unknown_center() {
        let model = model();
        let layout = CircularLayout {
            center: Some("172.16.0.1".into()),
            radius: 5.0,
        }
        .layout(&model);

        assert_eq!(layout.len(), model.node_count());
        assert!(layout.position("172.16.0.1").is_none());
        assert!(layout.iter().all(|(_, p)| (p.length() - 5.0).abs() < 1e-3));
    }

    #[test]
    fn test_force_layout_is_deterministic_and_bounded() {
        let model = model();
        let strategy = ForceDirectedLayout {
            iterations: 50,
            seed: 7,
            extent: 8.0,
        };
        let first = strategy.layout(&model);
        let second = strategy.layout(&model);

        assert_eq!(first, second);
        assert_eq!(first.len(), model.node_count());
        let (min, max) = first.bounds().unwrap();
        assert!(min.x >= -8.0 && min.y >= -8.0 && max.x <= 8.0 && max.y <= 8.0);
    }

    #[test]
    fn test_force_layout_with_unusable_extent_falls_back() {
        let model = model();
        for extent in [f32::INFINITY, f32::NEG_INFINITY, f32::NAN, 0.0, -3.0] {
            let layout = ForceDirectedLayout {
                iterations: 5,
                seed: 1,
                extent,
            }
            .layout(&model);

            assert_eq!(layout.len(), model.node_count());
            assert!(
                layout.iter().all(|(_, p)| p.x.is_finite() && p.y.is_finite()),
                "non-finite position for extent {extent}"
            );
        }
    }

    #[test]
    fn test_layouts_of_empty_model() {
        let model = load_model(&TextSource::new("t", ""), &TextSource::new("c", "")).unwrap();
        assert!(CircularLayout::default().layout(&model).is_empty());
        assert!(ForceDirectedLayout::default().layout(&model).is_empty());
        assert!(Layout::default().bounds().is_none());
    }
}
