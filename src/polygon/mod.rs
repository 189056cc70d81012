//! Polygon representation and convex partitioning algorithms.
//!
//! This module provides the building blocks behind
//! [`PolygonPartition`](crate::PolygonPartition):
//! - Index loops and owned polygons, area, containment and convexity
//! - Input validation (orientation, simplicity, hole nesting)
//! - Ear-clipping triangulation
//! - Diagonal and visibility computation
//! - Hertel–Mehlhorn approximate partitioning
//! - Keil–Snoeyink optimal partitioning
//! - Hole bridging
//!
//! # Example
//!
//! ```
//! use convexum::polygon::{hertel_mehlhorn, keil_snoeyink};
//! use convexum::Point2;
//!
//! // L-shaped polygon with one notch
//! let pts = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(2.0, 0.0),
//!     Point2::new(2.0, 1.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(1.0, 2.0),
//!     Point2::new(0.0, 2.0),
//! ];
//! let poly = [0, 1, 2, 3, 4, 5];
//!
//! let optimal = keil_snoeyink(&pts, &poly, 1e-10).unwrap();
//! let approx = hertel_mehlhorn(&pts, &poly, 1e-10).unwrap();
//! assert_eq!(optimal.len(), 2);
//! assert!(approx.len() >= optimal.len());
//! ```

mod core;
mod decompose;
mod holes;
mod optimal;
mod triangulate;
mod validate;
mod visibility;

pub use self::core::{
    is_reflex, loop_contains, loop_is_convex, loop_signed_area, polygon_contains,
    polygon_signed_area, winding, IndexPolygon, Polygon,
};
pub use decompose::{
    convex_decomposition, count_reflex_vertices, find_reflex_vertices, hertel_mehlhorn,
};
pub use holes::{bridge_hole, merge_holes};
pub use optimal::{keil_snoeyink, optimal_convex_decomposition};
pub use triangulate::{
    triangulate_loop, triangulate_polygon, triangulation_area, PolygonTriangle,
    TriangulationResult,
};
pub use validate::{
    find_self_intersections, has_self_intersection, is_simple, validate_loop, validate_loops,
    LoopKind, SelfIntersection,
};
pub use visibility::{is_valid_diagonal, segment_is_clear, VisibilityGraph};
