#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

pub mod config;
pub mod design;
pub mod errors;
pub mod evaluation;
pub mod geometry;
pub mod optimizer;
pub mod report;
pub mod solver;
pub mod topology;
pub mod truss;

pub use config::BridgeConfig;
pub use design::Design;
pub use errors::{
    GeometryError, OptimizeError, ParameterError, PersistenceError, SolveError, TopologyError,
};
pub use evaluation::{
    assess, cost, parallel_count, validity, Assessment, DesignCriteria, Verdict, FORCE_DECIMALS,
};
pub use geometry::{member, vector, JointKey, Member, Vector2, JOINT_KEY_DECIMALS};
pub use optimizer::{
    optimize, GenerationRecord, OptimizationResult, Optimizer, OptimizerSettings,
};
pub use solver::{distribute_floor_load, solve, LoadCase, Reactions, Solution, Supports};
pub use topology::Topology;
pub use truss::{GroundJoint, Truss};
