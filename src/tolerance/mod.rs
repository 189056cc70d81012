//! Epsilon-aware geometric predicates.
//!
//! All functions in this module take explicit tolerance parameters.
//! No hidden epsilons are used.

mod predicates;

pub use predicates::{
    in_cone, orient2d, point_in_triangle, point_on_segment, segments_cross, segments_intersect,
    Orientation, SegmentIntersection,
};
