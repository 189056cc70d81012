//! convexum - Convex partitioning of simple polygons
//!
//! Splits polygons, optionally with holes, into convex pieces whose union is
//! the input region. Two strategies are provided: the Keil–Snoeyink dynamic
//! program, which finds the minimum number of parts, and the Hertel–Mehlhorn
//! heuristic, which is much faster and never worse than four times the
//! optimum.
//!
//! Polygons are index loops over a shared point table. Outer boundaries run
//! counter-clockwise and holes clockwise. Every geometric predicate takes an
//! explicit tolerance.
//!
//! # Example
//!
//! ```
//! use convexum::{Point2, PolygonPartition};
//!
//! let pts = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(2.0, 0.0),
//!     Point2::new(2.0, 1.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(1.0, 2.0),
//!     Point2::new(0.0, 2.0),
//! ];
//!
//! let parts = PolygonPartition::new().apply_hm(&pts, &[0, 1, 2, 3, 4, 5]).unwrap();
//! assert_eq!(parts.len(), 2);
//! ```

pub mod error;
pub mod partition;
pub mod polygon;
pub mod primitives;
pub mod tolerance;

pub use error::{PartitionError, PartitionResult, Winding};
pub use partition::{PartitionParams, PolygonPartition};
pub use polygon::{IndexPolygon, Polygon};
pub use primitives::{Point2, Segment2, Vec2};
pub use tolerance::{
    in_cone, orient2d, point_in_triangle, point_on_segment, segments_cross, segments_intersect,
    Orientation, SegmentIntersection,
};
