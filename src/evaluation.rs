//! Build cost and design rules for a solved bridge.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ParameterError, SolveError};
use crate::geometry::{Member, Vector2};
use crate::solver::{solve, LoadCase, Solution, Supports};
use crate::truss::Truss;

/// Decimal places kept on solved forces before they are costed and checked.
pub const FORCE_DECIMALS: i32 = 4;

/// Capacities, prices and geometric limits a design is judged against.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignCriteria {
    /// Tension capacity of one element, negative.
    pub min_force: f64,
    /// Compression capacity of one element, positive.
    pub max_force: f64,
    /// Cost of one gusset plate, charged per joint.
    pub joint_cost: f64,
    /// Cost per unit length of one element.
    pub member_cost_per_length: f64,
    /// Longest allowed gap between neighbouring deck joints.
    pub max_floor_span: f64,
    /// Shortest allowed member.
    pub min_member_length: f64,
    /// Required vector from support A to support B.
    pub required_span: Vector2,
    /// Most elements that may be laid side by side in one member.
    pub max_parallel: u32,
}

impl Default for DesignCriteria {
    fn default() -> Self {
        Self {
            min_force: -9.0,
            max_force: 6.0,
            joint_cost: 5.0,
            member_cost_per_length: 15.0,
            max_floor_span: 3.5,
            min_member_length: 1.0,
            required_span: Vector2::new(12.0, 0.0),
            max_parallel: 3,
        }
    }
}

impl DesignCriteria {
    /// Check that the criteria describe a usable design space.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError`] naming the first unusable value.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if !(self.min_force < 0.0 && self.max_force > 0.0) {
            return Err(ParameterError::InvertedForceLimits {
                min_force: self.min_force,
                max_force: self.max_force,
            });
        }
        let non_negative = [
            ("joint_cost", self.joint_cost),
            ("member_cost_per_length", self.member_cost_per_length),
            ("max_floor_span", self.max_floor_span),
            ("min_member_length", self.min_member_length),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ParameterError::OutOfRange { name, value });
            }
        }
        if self.max_parallel == 0 {
            return Err(ParameterError::OutOfRange {
                name: "max_parallel",
                value: 0.0,
            });
        }
        Ok(())
    }
}

/// Number of elements laid side by side to carry `force`.
///
/// The count is `ceil(force / capacity)` using the tension or compression capacity
/// that matches the sign of `force`, clamped to `1..=max_parallel`.
///
/// # Examples
/// ```
/// use bridgex::{parallel_count, DesignCriteria};
///
/// let criteria = DesignCriteria::default();
/// assert_eq!(parallel_count(0.0, &criteria), 1);
/// assert_eq!(parallel_count(7.0, &criteria), 2);
/// assert_eq!(parallel_count(-30.0, &criteria), 3);
/// ```
#[must_use]
pub fn parallel_count(force: f64, criteria: &DesignCriteria) -> u32 {
    let capacity = if force < 0.0 {
        criteria.min_force
    } else {
        criteria.max_force
    };
    let needed = (force / capacity).ceil();
    let ceiling = criteria.max_parallel.max(1);
    if needed.is_nan() || needed <= 1.0 {
        1
    } else if needed >= f64::from(ceiling) {
        ceiling
    } else {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = needed as u32;
        count
    }
}

/// Price of a design: gussets for every joint plus every element of every member.
///
/// `forces` holds one entry per member; extra trailing entries are ignored.
#[must_use]
pub fn cost(members: &[Member], forces: &[f64], criteria: &DesignCriteria) -> f64 {
    let joints = Truss::from_members(members).joint_count();
    let gussets = criteria.joint_cost * joints as f64;
    members
        .iter()
        .zip(forces)
        .map(|(member, &force)| {
            criteria.member_cost_per_length
                * member.length()
                * f64::from(parallel_count(force, criteria))
        })
        .fold(gussets, |total, price| total + price)
}

/// Outcome of the design rules, naming the first rule that failed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Verdict {
    /// Every rule holds.
    Valid,
    /// The supports are not separated by the required span.
    SupportsMisplaced {
        /// Actual vector from A to B.
        span: Vector2,
    },
    /// Two neighbouring deck joints are too far apart.
    FloorBeamTooLong {
        /// Left deck joint.
        from: Vector2,
        /// Right deck joint.
        to: Vector2,
    },
    /// A member is shorter than allowed.
    MemberTooShort {
        /// Index of the member.
        member: usize,
        /// Its length.
        length: f64,
    },
    /// A member force exceeds the capacity of its elements.
    ForceExceeded {
        /// Index of the member.
        member: usize,
        /// The offending force.
        force: f64,
    },
}

impl Verdict {
    /// Whether the design passed every rule.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => write!(f, "design valid"),
            Self::SupportsMisplaced { span } => {
                write!(f, "supports A and B are {:.4}, {:.4} apart", span.x, span.y)
            }
            Self::FloorBeamTooLong { from, to } => write!(
                f,
                "floor beam from x = {:.4} to x = {:.4} is too long",
                from.x, to.x
            ),
            Self::MemberTooShort { member, length } => {
                write!(f, "member {member} is too short ({length:.4})")
            }
            Self::ForceExceeded { member, force } => {
                write!(f, "member {member} force {force:.4} exceeds capacity")
            }
        }
    }
}

/// Apply the design rules in order and report the first failure.
///
/// The support span is checked first, then deck joint spacing, member lengths and
/// finally member forces against `parallel_count` elements of capacity.
#[must_use]
pub fn validity(
    members: &[Member],
    forces: &[f64],
    supports: &Supports,
    criteria: &DesignCriteria,
) -> Verdict {
    let span = supports.span();
    if span.key() != criteria.required_span.key() {
        return Verdict::SupportsMisplaced { span };
    }

    let ground = Truss::from_members(members).ground_joints();
    for pair in ground.windows(2) {
        if (pair[1].position - pair[0].position).norm() > criteria.max_floor_span {
            return Verdict::FloorBeamTooLong {
                from: pair[0].position,
                to: pair[1].position,
            };
        }
    }

    for (index, member) in members.iter().enumerate() {
        let length = member.length();
        if length < criteria.min_member_length {
            return Verdict::MemberTooShort {
                member: index,
                length,
            };
        }
    }

    for (index, &force) in forces.iter().take(members.len()).enumerate() {
        let parallel = f64::from(parallel_count(force, criteria));
        if force < criteria.min_force * parallel || force > criteria.max_force * parallel {
            return Verdict::ForceExceeded {
                member: index,
                force,
            };
        }
    }

    Verdict::Valid
}

/// A solved design with its price and verdict.
#[derive(Clone, Debug, PartialEq)]
pub struct Assessment {
    /// Forces rounded to [`FORCE_DECIMALS`] places.
    pub solution: Solution,
    /// Build cost.
    pub cost: f64,
    /// Design rule outcome.
    pub verdict: Verdict,
}

/// Solve a design, then price and check it.
///
/// # Errors
///
/// Propagates the [`SolveError`] when the geometry cannot be solved.
pub fn assess(
    members: &[Member],
    supports: &Supports,
    load: &LoadCase,
    criteria: &DesignCriteria,
) -> Result<Assessment, SolveError> {
    let solution = solve(members, supports, load)?.rounded(FORCE_DECIMALS);
    let forces = solution.member_forces();
    let cost = cost(members, forces, criteria);
    let verdict = validity(members, forces, supports, criteria);
    Ok(Assessment {
        solution,
        cost,
        verdict,
    })
}
