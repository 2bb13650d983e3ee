//! Conversion of layer assignments into diagram coordinates.

use indexmap::IndexMap;
use log::debug;

use proofviz_core::{
    geometry::{Point, Size},
    identifier::Id,
};

use super::LayerAssignment;

/// Fixed node box size and spacing used by [`assign_positions`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    node_size: Size,
    horizontal_spacing: f32,
    vertical_spacing: f32,
}

impl LayoutMetrics {
    pub fn new(node_size: Size, horizontal_spacing: f32, vertical_spacing: f32) -> Self {
        Self {
            node_size,
            horizontal_spacing,
            vertical_spacing,
        }
    }

    pub fn node_size(&self) -> Size {
        self.node_size
    }

    pub fn horizontal_spacing(&self) -> f32 {
        self.horizontal_spacing
    }

    pub fn vertical_spacing(&self) -> f32 {
        self.vertical_spacing
    }

    /// Width of a row holding `count` nodes.
    fn row_width(&self, count: usize) -> f32 {
        if count == 0 {
            return 0.0;
        }
        count as f32 * self.node_size.width() + (count - 1) as f32 * self.horizontal_spacing
    }

    /// Height of a stack of `count` layers.
    fn stack_height(&self, count: usize) -> f32 {
        if count == 0 {
            return 0.0;
        }
        count as f32 * self.node_size.height() + (count - 1) as f32 * self.vertical_spacing
    }
}

/// Top-left node coordinates plus the overall size of the arrangement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Positions {
    points: IndexMap<Id, Point>,
    size: Size,
}

impl Positions {
    pub fn get(&self, id: Id) -> Option<Point> {
        self.points.get(&id).copied()
    }

    /// `(id, top-left)` pairs, layer by layer, left to right.
    pub fn iter(&self) -> impl Iterator<Item = (Id, Point)> + '_ {
        self.points.iter().map(|(id, point)| (*id, *point))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Width of the widest layer by height of all layers.
    pub fn size(&self) -> Size {
        self.size
    }
}

/// Places every node of `layers` on a grid, each layer centered under the
/// widest one.
///
/// The k-th node of layer L is placed at
/// `x = k * (w + hs) + (total_width - layer_width) / 2`,
/// `y = L * (h + vs)`.
///
/// # Examples
///
/// ```
/// use proofviz::graph::{Edge, Graph, Node};
/// use proofviz::layout::{LayoutMetrics, assign_layers, assign_positions};
/// use proofviz_core::{geometry::Size, identifier::Id};
///
/// let (a, b, c) = (Id::new("A"), Id::new("B"), Id::new("C"));
/// let mut builder = Graph::builder();
/// for id in [a, b, c] {
///     builder.add_node(Node::new(id, "")).unwrap();
/// }
/// builder.add_edge(Edge::new(a, c)).add_edge(Edge::new(b, c));
/// let graph = builder.build();
///
/// let metrics = LayoutMetrics::new(Size::new(100.0, 40.0), 20.0, 30.0);
/// let positions = assign_positions(&assign_layers(&graph).unwrap(), &metrics);
///
/// // C is centered between A and B, one layer down
/// assert_eq!(positions.get(a).unwrap().x(), 0.0);
/// assert_eq!(positions.get(b).unwrap().x(), 120.0);
/// assert_eq!(positions.get(c).unwrap().x(), 60.0);
/// assert_eq!(positions.get(c).unwrap().y(), 70.0);
/// ```
pub fn assign_positions(layers: &LayerAssignment, metrics: &LayoutMetrics) -> Positions {
    let rows = layers.by_layer();
    let widest = rows.iter().map(Vec::len).max().unwrap_or(0);
    let total_width = metrics.row_width(widest);

    let column_step = metrics.node_size().width() + metrics.horizontal_spacing();
    let row_step = metrics.node_size().height() + metrics.vertical_spacing();

    let mut points = IndexMap::with_capacity(layers.len());
    for (layer, row) in rows.iter().enumerate() {
        let offset = (total_width - metrics.row_width(row.len())) / 2.0;
        let y = layer as f32 * row_step;
        for (column, id) in row.iter().enumerate() {
            let point = Point::new(column as f32 * column_step, y).offset_x(offset);
            points.insert(*id, point);
        }
    }

    let size = Size::new(total_width, metrics.stack_height(rows.len()));
    debug!(
        nodes = points.len(),
        width = size.width(),
        height = size.height();
        "Positions assigned"
    );

    Positions { points, size }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{
        graph::{Graph, Node},
        layout::assign_layers,
    };

    proptest! {
        /// Every layer is centered on the same vertical axis.
        #[test]
        fn layers_share_a_center_axis(widths in proptest::collection::vec(1usize..6, 1..6)) {
            // Build disjoint fans: layer sizes follow `widths` via chains from distinct roots
            let metrics = LayoutMetrics::new(Size::new(80.0, 30.0), 10.0, 20.0);
            let mut builder = Graph::builder();
            let mut previous: Vec<Id> = Vec::new();
            for (layer, width) in widths.iter().enumerate() {
                let current: Vec<Id> = (0..*width)
                    .map(|k| Id::new(&format!("l{layer}k{k}")))
                    .collect();
                for id in &current {
                    builder.add_node(Node::new(*id, "")).unwrap();
                }
                // Every node of this layer depends on every node of the previous one
                for source in &previous {
                    for target in &current {
                        builder.add_edge(crate::graph::Edge::new(*source, *target));
                    }
                }
                previous = current;
            }
            let layers = assign_layers(&builder.build()).unwrap();
            let positions = assign_positions(&layers, &metrics);
            let axis = positions.size().width() / 2.0;

            for row in layers.by_layer() {
                let first = positions.get(row[0]).unwrap();
                let last = positions.get(row[row.len() - 1]).unwrap();
                let center = (first.x() + last.x() + metrics.node_size().width()) / 2.0;
                prop_assert!((center - axis).abs() < 0.01);
            }
        }
    }
}
