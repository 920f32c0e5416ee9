//! Randomised hill climbing over joint coordinates.
//!
//! The connectivity of the truss is frozen in a [`Topology`]; only joint positions
//! move. Each iteration perturbs a copy of the best joint list, rebuilds the
//! members, solves and evaluates them, and keeps the candidate only when it is
//! valid and strictly cheaper than the best cost so far. The best cost starts at
//! the cost of the starting geometry, valid or not, and never increases.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::ThreadRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::BridgeConfig;
use crate::design::Design;
use crate::errors::{OptimizeError, ParameterError};
use crate::evaluation::{assess, DesignCriteria};
use crate::geometry::{Member, Vector2};
use crate::solver::{LoadCase, Solution, Supports};
use crate::topology::Topology;

/// Search parameters.
///
/// All fields are public; override the ones you care about:
/// ```
/// let settings = bridgex::OptimizerSettings {
///     iterations: 500,
///     ..bridgex::OptimizerSettings::default()
/// };
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerSettings {
    /// Probability that a movable joint is perturbed in a candidate.
    pub selection_rate: f64,
    /// Largest perturbation applied to one coordinate.
    pub radius: f64,
    /// Candidates sampled per generation.
    pub iterations: usize,
    /// Number of generations.
    pub generations: usize,
    /// Vertical line whose joints may only move vertically.
    pub symmetry_axis: Option<f64>,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            selection_rate: 0.1,
            radius: 0.0005,
            iterations: 2000,
            generations: 30,
            symmetry_axis: Some(6.0),
        }
    }
}

impl OptimizerSettings {
    /// Check that the settings can drive a search.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::OutOfRange`] for a selection rate outside `[0, 1]`,
    /// a negative or non-finite radius, or a non-finite symmetry axis.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if !(0.0..=1.0).contains(&self.selection_rate) {
            return Err(ParameterError::OutOfRange {
                name: "selection_rate",
                value: self.selection_rate,
            });
        }
        if !(self.radius >= 0.0 && self.radius.is_finite()) {
            return Err(ParameterError::OutOfRange {
                name: "radius",
                value: self.radius,
            });
        }
        if let Some(axis) = self.symmetry_axis {
            if !axis.is_finite() {
                return Err(ParameterError::OutOfRange {
                    name: "symmetry_axis",
                    value: axis,
                });
            }
        }
        Ok(())
    }
}

/// What happened to the candidates of one generation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GenerationRecord {
    /// Zero-based generation number.
    pub generation: usize,
    /// Best cost at the end of the generation.
    pub best_cost: f64,
    /// Candidates that replaced the best design.
    pub accepted: usize,
    /// Candidates whose geometry could not be solved.
    pub unsolvable: usize,
    /// Candidates that broke a design rule.
    pub invalid: usize,
    /// Valid candidates that were not cheaper.
    pub not_cheaper: usize,
}

/// Outcome of a search.
#[derive(Clone, Debug, PartialEq)]
pub struct OptimizationResult {
    /// Cost of the starting geometry.
    pub initial_cost: f64,
    /// Cost of the best valid geometry.
    pub best_cost: f64,
    /// Joint positions of the best geometry, in topology order.
    pub joints: Vec<Vector2>,
    /// Members of the best geometry.
    pub members: Vec<Member>,
    /// Rounded forces of the best geometry.
    pub solution: Solution,
    /// One record per generation.
    pub history: Vec<GenerationRecord>,
}

impl OptimizationResult {
    /// Cost saved relative to the starting geometry.
    #[must_use]
    pub fn improvement(&self) -> f64 {
        self.initial_cost - self.best_cost
    }

    /// Package the best geometry as a [`Design`].
    #[must_use]
    pub fn design(&self, supports: Supports) -> Design {
        Design::new(self.members.clone(), supports)
    }
}

/// The hill-climbing search.
///
/// ```
/// use bridgex::{BridgeConfig, Design, Optimizer, Topology};
/// use rand::SeedableRng;
///
/// let mut config = BridgeConfig::default();
/// config.optimizer.iterations = 20;
/// config.optimizer.generations = 2;
///
/// let design = Design::reference();
/// let topology = Topology::from_members(&design.members);
/// let rng = rand::rngs::StdRng::seed_from_u64(7);
/// let result = Optimizer::with_rng(&config, rng)
///     .run(&design.members, &design.supports, &topology)
///     .expect("reference bridge is valid");
/// assert!(result.best_cost <= result.initial_cost);
/// ```
pub struct Optimizer<R> {
    /// Search parameters.
    settings: OptimizerSettings,
    /// Load solved for every candidate.
    load: LoadCase,
    /// Rules and prices applied to every candidate.
    criteria: DesignCriteria,
    /// Source of perturbations.
    rng: R,
}

impl Optimizer<ThreadRng> {
    /// Create an optimizer drawing from the thread-local generator.
    #[must_use]
    pub fn new(config: &BridgeConfig) -> Self {
        Self::with_rng(config, rand::thread_rng())
    }
}

impl<R: Rng> Optimizer<R> {
    /// Create an optimizer with an explicit generator, e.g. a seeded one for tests.
    pub fn with_rng(config: &BridgeConfig, rng: R) -> Self {
        Self {
            settings: config.optimizer,
            load: config.load,
            criteria: config.criteria,
            rng,
        }
    }

    /// Search for a cheaper valid geometry with the connectivity of `topology`.
    ///
    /// `members` is the starting geometry; its endpoints must all be joints of
    /// `topology`. The search starts from the joint positions stored in
    /// `topology`.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizeError::InvalidSettings`] for unusable settings,
    /// [`OptimizeError::Topology`] when `members` do not connect the joints of
    /// `topology` exactly as its adjacency matrix does,
    /// [`OptimizeError::InitialSolve`] when the starting geometry cannot be solved
    /// and [`OptimizeError::NoValidDesign`] when no valid geometry was seen.
    pub fn run(
        &mut self,
        members: &[Member],
        supports: &Supports,
        topology: &Topology,
    ) -> Result<OptimizationResult, OptimizeError> {
        self.settings.validate()?;
        topology.check_members(members)?;
        let initial = assess(members, supports, &self.load, &self.criteria)?;

        // An invalid start still sets the bar: candidates must beat its cost.
        let mut found_valid = initial.verdict.is_valid();
        let mut best_cost = initial.cost;
        let mut best_joints = topology.joints().to_vec();
        let mut best_members = members.to_vec();
        let mut best_solution = initial.solution;
        let mut history = Vec::with_capacity(self.settings.generations);

        for generation in 0..self.settings.generations {
            let mut record = GenerationRecord {
                generation,
                ..GenerationRecord::default()
            };
            for _ in 0..self.settings.iterations {
                let joints = self.perturb(&best_joints, supports);
                let candidate = topology.reconstruct(&joints)?;
                match assess(&candidate, supports, &self.load, &self.criteria) {
                    Err(_) => record.unsolvable += 1,
                    Ok(assessment) if !assessment.verdict.is_valid() => record.invalid += 1,
                    Ok(assessment) if assessment.cost < best_cost => {
                        record.accepted += 1;
                        found_valid = true;
                        best_cost = assessment.cost;
                        best_joints = joints;
                        best_members = candidate;
                        best_solution = assessment.solution;
                    }
                    Ok(_) => record.not_cheaper += 1,
                }
            }
            record.best_cost = best_cost;
            history.push(record);
        }

        if !found_valid {
            return Err(OptimizeError::NoValidDesign {
                best_cost: initial.cost,
            });
        }
        Ok(OptimizationResult {
            initial_cost: initial.cost,
            best_cost,
            joints: best_joints,
            members: best_members,
            solution: best_solution,
            history,
        })
    }

    /// Draw a candidate joint list around `joints`.
    ///
    /// Supports never move. A selected ground joint moves only in `x`, a joint on
    /// the symmetry axis only in `y`, and any other joint in both.
    fn perturb(&mut self, joints: &[Vector2], supports: &Supports) -> Vec<Vector2> {
        let settings = self.settings;
        let step = Uniform::new_inclusive(-settings.radius, settings.radius);
        let fixed = [supports.pin.key(), supports.roller.key()];

        let mut candidate = joints.to_vec();
        for joint in &mut candidate {
            if fixed.contains(&joint.key()) {
                continue;
            }
            if self.rng.gen::<f64>() >= settings.selection_rate {
                continue;
            }
            let on_axis = settings
                .symmetry_axis
                .map_or(false, |axis| Vector2::new(axis, joint.y).key() == joint.key());
            if !on_axis {
                joint.x += step.sample(&mut self.rng);
            }
            if joint.y != 0.0 {
                joint.y += step.sample(&mut self.rng);
            }
        }
        candidate
    }
}

/// Run a search with the thread-local generator.
///
/// # Errors
///
/// See [`Optimizer::run`].
pub fn optimize(
    members: &[Member],
    supports: &Supports,
    topology: &Topology,
    config: &BridgeConfig,
) -> Result<OptimizationResult, OptimizeError> {
    Optimizer::new(config).run(members, supports, topology)
}
