//! Error types for convex partitioning.

use thiserror::Error;

/// Winding direction of a closed loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    /// Positive signed area. Required for outer boundaries.
    CounterClockwise,
    /// Negative signed area. Required for holes.
    Clockwise,
}

impl std::fmt::Display for Winding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Winding::CounterClockwise => write!(f, "counter-clockwise"),
            Winding::Clockwise => write!(f, "clockwise"),
        }
    }
}

/// Errors that can occur while partitioning a polygon.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PartitionError {
    /// A loop has fewer than three vertices.
    #[error("polygon has {count} vertices, at least 3 are required")]
    TooFewVertices {
        /// Number of vertices supplied.
        count: usize,
    },

    /// A loop references a point that is not in the point table.
    #[error("vertex index {index} is out of range for {len} points")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Length of the point table.
        len: usize,
    },

    /// The same point index occurs twice in one loop.
    #[error("vertex index {index} is repeated within a polygon")]
    RepeatedIndex {
        /// The repeated index.
        index: usize,
    },

    /// Two consecutive vertices sit at the same location.
    #[error("consecutive vertices {a} and {b} coincide")]
    CoincidentVertices {
        /// First point index.
        a: usize,
        /// Second point index.
        b: usize,
    },

    /// A loop encloses no area.
    #[error("polygon has zero area")]
    ZeroArea,

    /// A loop runs the wrong way round.
    #[error("polygon must be {expected}")]
    WrongOrientation {
        /// The winding the loop was required to have.
        expected: Winding,
    },

    /// A loop crosses or touches itself.
    #[error("polygon boundary is self-intersecting")]
    SelfIntersecting,

    /// Two different input loops cross or touch.
    #[error("input loops {first} and {second} intersect")]
    LoopsIntersect {
        /// Position of the first loop in the combined outer-then-hole list.
        first: usize,
        /// Position of the second loop in the combined outer-then-hole list.
        second: usize,
    },

    /// A hole is not contained in any outer polygon.
    #[error("hole {hole} is not inside any outer polygon")]
    HoleOutside {
        /// Position of the hole in the input hole list.
        hole: usize,
    },

    /// A loop sits directly inside a loop of the same kind.
    #[error("loop {index} is directly nested inside a loop of the same kind")]
    InvalidNesting {
        /// Position of the loop in the combined outer-then-hole list.
        index: usize,
    },

    /// Ear clipping ran out of ears before finishing.
    #[error("no ear found with {remaining} vertices left; input is not simple or mis-oriented")]
    NoEar {
        /// Vertices still unclipped when the search failed.
        remaining: usize,
    },

    /// A hole could not be connected to its host boundary.
    #[error("no bridge found for hole {hole}")]
    NoBridge {
        /// Position of the hole in the input hole list.
        hole: usize,
    },

    /// The optimal partition could not resolve a sub-polygon.
    #[error("optimal partition failed on the chain from {start} to {end}")]
    Unresolvable {
        /// First vertex position of the sub-chain.
        start: usize,
        /// Last vertex position of the sub-chain.
        end: usize,
    },
}

/// Result type for partitioning operations.
pub type PartitionResult<T> = std::result::Result<T, PartitionError>;
