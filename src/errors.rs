//! Error types produced while building, solving or optimising bridge trusses.

use thiserror::Error;

use crate::geometry::Vector2;

/// Error returned by a geometric operation that has no meaningful result.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    /// Returned when normalising a vector of zero length.
    #[error("cannot normalise a zero-length vector")]
    ZeroLengthVector,
}

/// Error returned when the member forces of a truss cannot be solved.
///
/// # Examples
///
/// ```
/// use bridgex::{member, solve, vector, LoadCase, SolveError, Supports};
///
/// // Three joints need three members; two leave the structure a mechanism.
/// let members = [
///     member(vector(0.0, 0.0), vector(6.0, 3.0)),
///     member(vector(6.0, 3.0), vector(12.0, 0.0)),
/// ];
/// let error = solve(&members, &Supports::reference(), &LoadCase::default())
///     .expect_err("two bars cannot carry three joints");
/// assert_eq!(error, SolveError::Indeterminate { joints: 3, members: 2 });
/// ```
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SolveError {
    /// Returned when `2 * joints != members + 3`, so the method of joints does not
    /// produce a square system.
    #[error(
        "truss is not statically determinate: {joints} joints cannot balance \
         {members} members and 3 reactions"
    )]
    Indeterminate {
        /// Number of distinct joints.
        joints: usize,
        /// Number of members.
        members: usize,
    },
    /// Returned when a member connects a joint to itself.
    #[error("member {0} has zero length")]
    ZeroLengthMember(usize),
    /// Returned when the equilibrium matrix cannot be inverted.
    #[error("equilibrium matrix is singular; the geometry is unstable")]
    UnstableGeometry,
}

/// Error returned when an adjacency matrix cannot describe a set of members.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum TopologyError {
    /// Returned when a member endpoint is missing from the joint ordering.
    #[error("member endpoint {0:?} is not in the joint list")]
    UnknownJoint(Vector2),
    /// Returned when the joint ordering lists the same position twice.
    #[error("joint {0:?} appears more than once in the joint list")]
    DuplicateJoint(Vector2),
    /// Returned when a coordinate list does not match the adjacency matrix.
    #[error("expected {expected} joint positions but received {found}")]
    SizeMismatch {
        /// Number of joints described by the adjacency matrix.
        expected: usize,
        /// Number of positions supplied.
        found: usize,
    },
    /// Returned when members connect the listed joints differently from the
    /// adjacency matrix.
    #[error("members connect joints {0} and {1} differently from the adjacency matrix")]
    AdjacencyMismatch(usize, usize),
}

/// Error returned when a numeric parameter is not usable.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ParameterError {
    /// Returned when a parameter lies outside its admissible range.
    #[error("{name} is out of range (received {value})")]
    OutOfRange {
        /// Name of the offending parameter.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// Returned when the tension limit is not negative or the compression limit is
    /// not positive.
    #[error("force limits must satisfy min_force < 0 < max_force (received {min_force}, {max_force})")]
    InvertedForceLimits {
        /// Tension capacity of one element.
        min_force: f64,
        /// Compression capacity of one element.
        max_force: f64,
    },
}

/// Error returned when reading or writing a JSON document.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Returned when the file cannot be read or written.
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    /// Returned when the document is not valid JSON for the expected type.
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
    /// Returned when a configuration document parses but holds unusable values.
    #[error("invalid configuration: {0}")]
    InvalidParameters(#[from] ParameterError),
}

/// Error returned by the geometry optimizer.
///
/// Rejected candidates are never errors; only problems with the starting point or
/// an empty search surface here.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum OptimizeError {
    /// Returned when the starting geometry cannot be solved.
    #[error("starting geometry cannot be solved: {0}")]
    InitialSolve(#[from] SolveError),
    /// Returned when the starting members do not fit the supplied topology.
    #[error("starting geometry does not match the topology: {0}")]
    Topology(#[from] TopologyError),
    /// Returned when the optimizer settings are unusable.
    #[error("invalid optimizer settings: {0}")]
    InvalidSettings(#[from] ParameterError),
    /// Returned when neither the starting geometry nor any sampled candidate passed
    /// the validity rules.
    #[error("no valid design found; cheapest invalid design costs {best_cost}")]
    NoValidDesign {
        /// Cost of the starting geometry.
        best_cost: f64,
    },
}
