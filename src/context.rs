//! The polygon collection and its batch query API.

use std::sync::OnceLock;

use geo_traits::CoordTrait;
use log::{debug, trace};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::bbox::BoundingBox;
use crate::bvh::nearest::{EdgeDistance, VertexDistance, WeightedVertexDistance};
use crate::bvh::{nearest, Bvh, BvhBuilder, Nearest, DEFAULT_BVH_NODE_SIZE};
use crate::contains::contains_any;
use crate::error::{PolygonIndexError, Result};
use crate::polygon::{is_closed, ring_edges, validate_ring, Edge, Polygon, Vertex};
use crate::r#type::Point2D;

/// The default multiplier applied to distances by weighted nearest-vertex queries.
pub const DEFAULT_SCALE_FACTOR: f64 = 0.995792;

/// Options controlling how a [`Context`] builds and queries its trees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextOptions {
    /// Number of leaves grouped under one node in both trees. Must be at least 2.
    pub leaf_node_size: u16,
    /// Branching factor of both trees above the leaf groups. Must be at least 2.
    pub node_size: u16,
    /// Multiplier applied to the Euclidean distance in weighted nearest-vertex queries. Must be
    /// finite and not negative.
    pub scale_factor: f64,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            leaf_node_size: DEFAULT_BVH_NODE_SIZE,
            node_size: DEFAULT_BVH_NODE_SIZE,
            scale_factor: DEFAULT_SCALE_FACTOR,
        }
    }
}

impl ContextOptions {
    /// Set the branching factor of every level, leaf groups included.
    pub fn with_node_size(mut self, node_size: u16) -> Self {
        self.leaf_node_size = node_size;
        self.node_size = node_size;
        self
    }

    /// Set the number of leaves grouped under one node, keeping the branching factor above.
    pub fn with_leaf_node_size(mut self, leaf_node_size: u16) -> Self {
        self.leaf_node_size = leaf_node_size;
        self
    }

    /// Set the weighted query scale factor.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.leaf_node_size < 2 {
            return Err(PolygonIndexError::InvalidInput(format!(
                "Leaf node size must be at least 2, got {}.",
                self.leaf_node_size
            )));
        }
        if self.node_size < 2 {
            return Err(PolygonIndexError::InvalidInput(format!(
                "Node size must be at least 2, got {}.",
                self.node_size
            )));
        }
        check_scale_factor(self.scale_factor)
    }
}

fn check_scale_factor(scale_factor: f64) -> Result<()> {
    if scale_factor.is_finite() && scale_factor >= 0.0 {
        Ok(())
    } else {
        Err(PolygonIndexError::InvalidInput(format!(
            "Scale factor must be finite and not negative, got {}.",
            scale_factor
        )))
    }
}

#[derive(Debug, Clone)]
struct Trees {
    edges: Bvh,
    vertices: Bvh,
}

/// A collection of polygons answering batch proximity and containment queries.
///
/// Polygons are accumulated with [`Context::add_polygon`]. The edge and vertex trees are built on
/// the first query and reused until the next polygon is added, which discards them. Queries only
/// need `&self`, so a built context can be shared between threads.
///
/// ```
/// use polygon_bvh::{Context, Point2D};
///
/// let mut context = Context::new();
/// context
///     .add_polygon_interleaved(&[0., 0., 1., 0., 1., 1., 0., 1.], None)
///     .unwrap();
///
/// let points = [Point2D::new(0.5, 0.5), Point2D::new(0.5, -0.5)];
/// assert_eq!(context.contains(&points).unwrap(), vec![true, false]);
/// assert_eq!(context.nearest_edge_distance(&points).unwrap(), vec![0.5, 0.5]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    options: ContextOptions,
    polygons: Vec<Polygon>,
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    trees: OnceLock<Trees>,
}

impl Context {
    /// Create an empty context with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty context with the given options.
    pub fn try_with_options(options: ContextOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            ..Default::default()
        })
    }

    /// The options this context was created with.
    pub fn options(&self) -> &ContextOptions {
        &self.options
    }

    /// Add one polygon ring.
    ///
    /// The ring may be open or closed. An open ring gets an extra closing edge from its last vertex
    /// back to its first. A closed ring, whose last vertex repeats the first, keeps that vertex and
    /// its global index. `weights`, when given, must hold one finite value per vertex; otherwise all
    /// weights are zero.
    ///
    /// Vertices receive consecutive global indices continuing from the vertices already added.
    pub fn add_polygon(&mut self, vertices: &[Point2D], weights: Option<&[f64]>) -> Result<()> {
        validate_ring(vertices, weights)?;
        if u32::try_from(self.vertices.len() + vertices.len()).is_err() {
            return Err(PolygonIndexError::InvalidPolygon(format!(
                "Too many vertices: a context holds at most {}.",
                u32::MAX
            )));
        }

        let first_vertex = self.vertices.len();
        self.vertices
            .extend(vertices.iter().enumerate().map(|(i, point)| Vertex {
                point: *point,
                index: first_vertex + i,
                weight: weights.map_or(0.0, |weights| weights[i]),
            }));

        let first_edge = self.edges.len();
        self.edges.extend(ring_edges(
            first_vertex,
            vertices.len(),
            is_closed(vertices),
        ));

        self.polygons.push(Polygon {
            vertices: first_vertex..self.vertices.len(),
            edges: first_edge..self.edges.len(),
            bbox: BoundingBox::from_points(vertices),
        });
        trace!(
            "added polygon {} with {} vertices",
            self.polygons.len() - 1,
            vertices.len()
        );

        if self.trees.take().is_some() {
            trace!("discarded trees, rebuilding on next query");
        }
        Ok(())
    }

    /// Add one polygon ring from anything implementing [`CoordTrait`].
    pub fn add_polygon_coords<C: CoordTrait<T = f64>>(
        &mut self,
        ring: impl IntoIterator<Item = C>,
        weights: Option<&[f64]>,
    ) -> Result<()> {
        let vertices: Vec<_> = ring
            .into_iter()
            .map(|coord| Point2D::from_coord(&coord))
            .collect();
        self.add_polygon(&vertices, weights)
    }

    /// Add one polygon ring from an interleaved `[x0, y0, x1, y1, ...]` buffer.
    pub fn add_polygon_interleaved(&mut self, coords: &[f64], weights: Option<&[f64]>) -> Result<()> {
        let vertices = Point2D::slice_from_interleaved(coords).map_err(|err| match err {
            PolygonIndexError::InvalidInput(msg) => PolygonIndexError::InvalidPolygon(msg),
            err => err,
        })?;
        self.add_polygon(vertices, weights)
    }

    /// The number of polygons added so far.
    pub fn num_polygons(&self) -> usize {
        self.polygons.len()
    }

    /// The number of vertices over all polygons.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// The number of edges over all polygons, closing edges included.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// All polygons in insertion order.
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// All vertices, positioned at their global index.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Build the trees now rather than on the first query.
    pub fn build(&self) -> Result<()> {
        self.trees().map(|_| ())
    }

    /// The tree over all edges, built if needed.
    pub fn edge_tree(&self) -> Result<&Bvh> {
        Ok(&self.trees()?.edges)
    }

    /// The tree over all vertices, built if needed.
    pub fn vertex_tree(&self) -> Result<&Bvh> {
        Ok(&self.trees()?.vertices)
    }

    fn check_not_empty(&self) -> Result<()> {
        if self.polygons.is_empty() {
            return Err(PolygonIndexError::EmptyContext);
        }
        Ok(())
    }

    fn trees(&self) -> Result<&Trees> {
        self.check_not_empty()?;
        Ok(self.trees.get_or_init(|| self.build_trees()))
    }

    fn build_trees(&self) -> Trees {
        let ContextOptions {
            leaf_node_size,
            node_size,
            ..
        } = self.options;

        // edge queries are unweighted
        let mut builder =
            BvhBuilder::new_with_node_sizes(self.edges.len(), leaf_node_size, node_size);
        for edge in &self.edges {
            builder.add(edge.bbox(&self.vertices), 0.0);
        }
        let edges = builder.finish();

        let mut builder =
            BvhBuilder::new_with_node_sizes(self.vertices.len(), leaf_node_size, node_size);
        for vertex in &self.vertices {
            builder.add(BoundingBox::from_point(&vertex.point), vertex.weight);
        }
        let vertices = builder.finish();

        debug!(
            "built edge tree ({} items, {} nodes, {} levels) and vertex tree ({} items, {} nodes, {} levels) with node sizes {}/{}",
            edges.num_items(),
            edges.num_nodes(),
            edges.num_levels(),
            vertices.num_items(),
            vertices.num_nodes(),
            vertices.num_levels(),
            leaf_node_size,
            node_size
        );
        Trees { edges, vertices }
    }

    /// Whether each point lies inside at least one polygon.
    ///
    /// Points on a left or bottom boundary count as inside, points on a right or top boundary as
    /// outside; see [`crate::contains`].
    pub fn contains(&self, points: &[Point2D]) -> Result<Vec<bool>> {
        self.check_not_empty()?;
        validate_points(points)?;
        Ok(map_points(points, |point| {
            contains_any(point, &self.polygons, &self.edges, &self.vertices)
        }))
    }

    /// Distance from each point to the nearest polygon edge.
    pub fn nearest_edge_distance(&self, points: &[Point2D]) -> Result<Vec<f64>> {
        let trees = self.trees()?;
        validate_points(points)?;
        let metric = EdgeDistance {
            edges: &self.edges,
            vertices: &self.vertices,
        };
        Ok(map_points(points, |point| {
            nearest(trees.edges.root(), &metric, point, Nearest::NONE)
                .value
                .sqrt()
        }))
    }

    /// Distance from each point to the nearest polygon vertex.
    pub fn nearest_vertex_distance(&self, points: &[Point2D]) -> Result<Vec<f64>> {
        Ok(self
            .nearest_vertices(points)?
            .into_iter()
            .map(|(_, distance)| distance)
            .collect())
    }

    /// Global index of the nearest vertex to each point. Among equally near vertices the lowest
    /// index wins.
    pub fn nearest_vertex_index(&self, points: &[Point2D]) -> Result<Vec<usize>> {
        Ok(self
            .nearest_vertices(points)?
            .into_iter()
            .map(|(index, _)| index)
            .collect())
    }

    /// Global index of and distance to the nearest vertex, found in a single traversal per point.
    pub fn nearest_vertices(&self, points: &[Point2D]) -> Result<Vec<(usize, f64)>> {
        let trees = self.trees()?;
        validate_points(points)?;
        let metric = VertexDistance {
            vertices: &self.vertices,
        };
        map_points(points, |point| {
            let best = nearest(trees.vertices.root(), &metric, point, Nearest::NONE);
            let index = best.index.ok_or(PolygonIndexError::EmptyContext)?;
            Ok((index, best.value.sqrt()))
        })
        .into_iter()
        .collect()
    }

    /// The smallest `scale_factor * distance + weight` over all vertices, for each point, using
    /// the context's scale factor.
    pub fn nearest_weighted_vertex_value(&self, points: &[Point2D]) -> Result<Vec<f64>> {
        let trees = self.trees()?;
        validate_points(points)?;
        let metric = WeightedVertexDistance {
            vertices: &self.vertices,
            scale_factor: self.options.scale_factor,
        };
        Ok(map_points(points, |point| {
            nearest(trees.vertices.root(), &metric, point, Nearest::NONE).value
        }))
    }

    /// Like [`Context::nearest_weighted_vertex_value`], with one scale factor per point.
    pub fn nearest_weighted_vertex_values_with_scales(
        &self,
        points: &[Point2D],
        scale_factors: &[f64],
    ) -> Result<Vec<f64>> {
        if scale_factors.len() != points.len() {
            return Err(PolygonIndexError::InvalidInput(format!(
                "Got {} scale factors for {} points.",
                scale_factors.len(),
                points.len()
            )));
        }
        scale_factors
            .iter()
            .try_for_each(|scale_factor| check_scale_factor(*scale_factor))?;

        let trees = self.trees()?;
        validate_points(points)?;
        let pairs: Vec<_> = points.iter().zip(scale_factors).collect();
        Ok(map_items(&pairs, |(point, scale_factor)| {
            let metric = WeightedVertexDistance {
                vertices: &self.vertices,
                scale_factor: **scale_factor,
            };
            nearest(trees.vertices.root(), &metric, point, Nearest::NONE).value
        }))
    }
}

/// Rejects the whole batch if any query point has a non-finite coordinate.
fn validate_points(points: &[Point2D]) -> Result<()> {
    match points.iter().position(|p| !p.is_finite()) {
        Some(i) => Err(PolygonIndexError::InvalidInput(format!(
            "Query point {} has non-finite coordinates ({}, {}).",
            i, points[i].x, points[i].y
        ))),
        None => Ok(()),
    }
}

/// Evaluate `f` for every point, in parallel with the `rayon` feature. Output order always matches
/// input order.
fn map_points<T, F>(points: &[Point2D], f: F) -> Vec<T>
where
    T: Send,
    F: Fn(&Point2D) -> T + Sync + Send,
{
    map_items(points, f)
}

fn map_items<I, T, F>(items: &[I], f: F) -> Vec<T>
where
    I: Sync,
    T: Send,
    F: Fn(&I) -> T + Sync + Send,
{
    #[cfg(feature = "rayon")]
    {
        items.par_iter().map(f).collect()
    }

    #[cfg(not(feature = "rayon"))]
    {
        items.iter().map(f).collect()
    }
}
