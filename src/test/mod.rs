//! Shared fixtures, brute-force references and randomized agreement tests.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::contains::crosses;
use crate::distance::squared_distance_point_segment;
use crate::{Context, ContextOptions, Point2D};


/// Star-shaped (hence simple) rings with random radii, laid out on a grid.
pub(crate) fn random_rings(rng: &mut StdRng, num_rings: usize) -> Vec<Vec<Point2D>> {
    let columns = (num_rings as f64).sqrt().ceil() as usize;
    (0..num_rings)
        .map(|i| {
            let cx = (i % columns) as f64 * 3.0;
            let cy = (i / columns) as f64 * 3.0;
            let num_vertices = rng.gen_range(3..40);
            (0..num_vertices)
                .map(|k| {
                    let angle = 2.0 * PI * k as f64 / num_vertices as f64;
                    let radius = rng.gen_range(0.3..1.6);
                    Point2D::new(cx + radius * angle.cos(), cy + radius * angle.sin())
                })
                .collect()
        })
        .collect()
}

pub(crate) fn random_points(rng: &mut StdRng, num_points: usize, extent: f64) -> Vec<Point2D> {
    (0..num_points)
        .map(|_| {
            Point2D::new(
                rng.gen_range(-2.0..extent + 2.0),
                rng.gen_range(-2.0..extent + 2.0),
            )
        })
        .collect()
}

pub(crate) fn random_context(
    seed: u64,
    num_rings: usize,
    node_size: u16,
) -> (Context, Vec<Vec<Point2D>>) {
    random_context_with_options(
        seed,
        num_rings,
        ContextOptions::default().with_node_size(node_size),
    )
}

pub(crate) fn random_context_with_options(
    seed: u64,
    num_rings: usize,
    options: ContextOptions,
) -> (Context, Vec<Vec<Point2D>>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let rings = random_rings(&mut rng, num_rings);
    let mut context = Context::try_with_options(options).unwrap();
    for ring in &rings {
        let weights: Vec<f64> = ring.iter().map(|_| rng.gen_range(-1.0..1.0)).collect();
        context.add_polygon(ring, Some(&weights)).unwrap();
    }
    (context, rings)
}

fn brute_force_edge(context: &Context, point: &Point2D) -> f64 {
    let vertices = context.vertices();
    context
        .edges()
        .iter()
        .map(|e| {
            squared_distance_point_segment(point, &vertices[e.start].point, &vertices[e.end].point)
        })
        .fold(f64::INFINITY, f64::min)
}

fn brute_force_vertex(context: &Context, point: &Point2D) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for vertex in context.vertices() {
        let d = point.squared_distance(&vertex.point);
        if d < best.1 {
            best = (vertex.index, d);
        }
    }
    best
}

fn brute_force_weighted(context: &Context, point: &Point2D, scale_factor: f64) -> f64 {
    context
        .vertices()
        .iter()
        .map(|v| scale_factor * point.squared_distance(&v.point).sqrt() + v.weight)
        .fold(f64::INFINITY, f64::min)
}

fn brute_force_contains(context: &Context, point: &Point2D) -> bool {
    let vertices = context.vertices();
    context.polygons().iter().any(|polygon| {
        let n = context.edges()[polygon.edges.clone()]
            .iter()
            .filter(|e| crosses(point, &vertices[e.start].point, &vertices[e.end].point))
            .count();
        n % 2 == 1
    })
}

#[test]
fn tree_queries_match_brute_force() {
    let mut rng = StdRng::seed_from_u64(7);
    let points = random_points(&mut rng, 500, 12.);

    for node_size in [2, 3, 4, 16, 64] {
        let (context, _) = random_context(1, 20, node_size);

        let edge = context.nearest_edge_distance(&points).unwrap();
        let vertex = context.nearest_vertices(&points).unwrap();
        let weighted = context.nearest_weighted_vertex_value(&points).unwrap();
        let contains = context.contains(&points).unwrap();

        for (i, point) in points.iter().enumerate() {
            let expected = brute_force_edge(&context, point);
            assert!(
                (edge[i] * edge[i] - expected).abs() < 1e-7,
                "edge distance of point {} with node size {}",
                i,
                node_size
            );

            let (index, d2) = brute_force_vertex(&context, point);
            assert_eq!(vertex[i], (index, d2.sqrt()));

            let expected = brute_force_weighted(&context, point, context.options().scale_factor);
            assert!((weighted[i] - expected).abs() < 1e-9);

            assert_eq!(contains[i], brute_force_contains(&context, point));
        }
    }
}

#[test]
fn results_do_not_depend_on_node_size() {
    let mut rng = StdRng::seed_from_u64(11);
    let points = random_points(&mut rng, 300, 9.);

    let (reference, _) = random_context(3, 12, 2);
    let edge = reference.nearest_edge_distance(&points).unwrap();
    let vertex = reference.nearest_vertices(&points).unwrap();
    let weighted = reference.nearest_weighted_vertex_value(&points).unwrap();

    let options = [3, 5, 8, 16, 100, 1000]
        .map(|node_size| ContextOptions::default().with_node_size(node_size))
        .into_iter()
        .chain([(2, 9), (32, 2), (7, 3)].map(|(leaf_node_size, node_size)| {
            ContextOptions::default()
                .with_node_size(node_size)
                .with_leaf_node_size(leaf_node_size)
        }));
    for options in options {
        let (context, _) = random_context_with_options(3, 12, options);
        assert_eq!(context.nearest_edge_distance(&points).unwrap(), edge);
        assert_eq!(context.nearest_vertices(&points).unwrap(), vertex);
        assert_eq!(
            context.nearest_weighted_vertex_value(&points).unwrap(),
            weighted
        );
    }
}

#[test]
fn repeated_queries_are_identical() {
    let mut rng = StdRng::seed_from_u64(5);
    let points = random_points(&mut rng, 200, 6.);
    let (context, _) = random_context(9, 4, 4);

    let first = (
        context.contains(&points).unwrap(),
        context.nearest_edge_distance(&points).unwrap(),
        context.nearest_vertex_index(&points).unwrap(),
        context.nearest_weighted_vertex_value(&points).unwrap(),
    );
    for _ in 0..3 {
        let again = (
            context.contains(&points).unwrap(),
            context.nearest_edge_distance(&points).unwrap(),
            context.nearest_vertex_index(&points).unwrap(),
            context.nearest_weighted_vertex_value(&points).unwrap(),
        );
        assert_eq!(again, first);
    }
}

#[test]
fn per_point_scales_match_brute_force() {
    let mut rng = StdRng::seed_from_u64(13);
    let points = random_points(&mut rng, 100, 6.);
    let scales: Vec<f64> = points.iter().map(|_| rng.gen_range(0.0..3.0)).collect();
    let (context, _) = random_context(17, 9, 4);

    let values = context
        .nearest_weighted_vertex_values_with_scales(&points, &scales)
        .unwrap();
    for ((point, scale), value) in points.iter().zip(&scales).zip(values) {
        assert!((value - brute_force_weighted(&context, point, *scale)).abs() < 1e-9);
    }
}

#[test]
fn concurrent_queries_share_a_context() {
    let mut rng = StdRng::seed_from_u64(21);
    let points = random_points(&mut rng, 400, 9.);
    let (context, _) = random_context(23, 9, 8);
    let expected = context.nearest_edge_distance(&points).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = points
            .chunks(100)
            .map(|chunk| scope.spawn(|| context.nearest_edge_distance(chunk).unwrap()))
            .collect();
        let joined: Vec<f64> = handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect();
        assert_eq!(joined, expected);
    });
}
