//! Method-of-joints solver for statically determinate plane trusses.
//!
//! Each joint contributes an x and a y equilibrium equation. Member `i` fills
//! column `i` with the unit vector pointing from its far end into the joint, so
//! a positive solved force pushes into both of its joints (compression) and a
//! negative force pulls on them (tension). Three further columns hold the pin
//! reactions `Ax`, `Ay` at support A and the roller reaction `By` at support B.
//! See <https://en.wikipedia.org/wiki/Structural_analysis#Method_of_joints>.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::errors::SolveError;
use crate::geometry::{round_to, Member, Vector2};
use crate::truss::{GroundJoint, Truss};

/// Pivots smaller than this fraction of the largest pivot mark a singular system.
const SINGULAR_PIVOT_RATIO: f64 = 1.0e-10;

/// The moving load carried by the deck.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadCase {
    /// Downward load per unit length of deck, applied to one truss side.
    pub intensity: f64,
}

impl Default for LoadCase {
    fn default() -> Self {
        Self { intensity: 2.5 }
    }
}

/// The two support joints of a bridge.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Supports {
    /// Support A, a pin providing horizontal and vertical reactions.
    pub pin: Vector2,
    /// Support B, a roller providing a vertical reaction only.
    pub roller: Vector2,
}

impl Supports {
    /// Create supports from the pin (A) and roller (B) positions.
    #[must_use]
    pub const fn new(pin: Vector2, roller: Vector2) -> Self {
        Self { pin, roller }
    }

    /// Supports at `(0, 0)` and `(12, 0)`.
    #[must_use]
    pub const fn reference() -> Self {
        Self::new(Vector2::new(0.0, 0.0), Vector2::new(12.0, 0.0))
    }

    /// Vector from A to B.
    #[must_use]
    pub fn span(&self) -> Vector2 {
        self.roller - self.pin
    }
}

impl Default for Supports {
    fn default() -> Self {
        Self::reference()
    }
}

/// Support reactions, positive to the right and upward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reactions {
    /// Horizontal reaction at A.
    pub ax: f64,
    /// Vertical reaction at A.
    pub ay: f64,
    /// Vertical reaction at B.
    pub by: f64,
}

/// Solved force vector: one axial force per member followed by `[Ax, Ay, By]`.
///
/// Member forces are positive in compression and negative in tension.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    /// Member forces then reactions.
    forces: Vec<f64>,
}

impl Solution {
    /// Wrap a raw force vector of `members + 3` entries.
    fn from_vector(forces: &DVector<f64>) -> Self {
        Self {
            forces: forces.iter().copied().collect(),
        }
    }

    /// Number of members the solution covers.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.forces.len() - 3
    }

    /// Axial force in each member, in member order.
    #[must_use]
    pub fn member_forces(&self) -> &[f64] {
        &self.forces[..self.member_count()]
    }

    /// Axial force in one member.
    #[must_use]
    pub fn member_force(&self, member: usize) -> Option<f64> {
        self.member_forces().get(member).copied()
    }

    /// Support reactions.
    #[must_use]
    pub fn reactions(&self) -> Reactions {
        let base = self.member_count();
        Reactions {
            ax: self.forces[base],
            ay: self.forces[base + 1],
            by: self.forces[base + 2],
        }
    }

    /// Copy of the solution with every entry rounded to `decimals` places.
    #[must_use]
    pub fn rounded(&self, decimals: i32) -> Self {
        Self {
            forces: self
                .forces
                .iter()
                .map(|&force| round_to(force, decimals))
                .collect(),
        }
    }
}

/// Lump a uniform deck load onto the ground joints.
///
/// Each span between consecutive ground joints sends half of `intensity × length`
/// to each of its two ends, so an interior joint collects half of both adjacent
/// spans and the outermost joints half of one. The result is aligned with
/// `ground` and holds downward magnitudes.
///
/// The supports are ground joints too, so they take their half-span share like
/// any other deck joint. That share goes straight into the vertical reaction and
/// leaves every member force unchanged.
///
/// # Examples
/// ```
/// use bridgex::{distribute_floor_load, member, vector, Truss};
///
/// let truss = Truss::from_members(&[
///     member(vector(0.0, 0.0), vector(3.0, 0.0)),
///     member(vector(3.0, 0.0), vector(6.0, 0.0)),
/// ]);
/// let loads = distribute_floor_load(&truss.ground_joints(), 2.0);
/// assert_eq!(loads, vec![3.0, 6.0, 3.0]);
/// ```
#[must_use]
pub fn distribute_floor_load(ground: &[GroundJoint], intensity: f64) -> Vec<f64> {
    let mut loads = vec![0.0; ground.len()];
    for (span, pair) in ground.windows(2).enumerate() {
        let half = 0.5 * intensity * (pair[1].position - pair[0].position).norm();
        loads[span] += half;
        loads[span + 1] += half;
    }
    loads
}

/// Solve the member forces and support reactions of a bridge truss.
///
/// # Errors
///
/// Returns [`SolveError::Indeterminate`] without attempting a solve when
/// `2 × joints ≠ members + 3`, [`SolveError::ZeroLengthMember`] when a member
/// joins a joint to itself and [`SolveError::UnstableGeometry`] when the
/// equilibrium matrix is singular.
///
/// # Examples
/// ```
/// use bridgex::{member, solve, vector, LoadCase, Supports};
///
/// let a = vector(0.0, 0.0);
/// let b = vector(12.0, 0.0);
/// let solution = solve(&[member(a, b)], &Supports::new(a, b), &LoadCase::default())
///     .expect("a bare deck beam is determinate");
/// assert_eq!(solution.member_forces().len(), 1);
/// assert!((solution.reactions().ay - 15.0).abs() < 1.0e-9);
/// ```
pub fn solve(
    members: &[Member],
    supports: &Supports,
    load: &LoadCase,
) -> Result<Solution, SolveError> {
    let truss = Truss::from_members(members);
    if !truss.is_determinate() {
        return Err(SolveError::Indeterminate {
            joints: truss.joint_count(),
            members: truss.member_count(),
        });
    }
    let coefficients = build_equilibrium_matrix(&truss, members, supports)?;
    let constants = build_load_vector(&truss, load);
    let forces = solve_forces(coefficients, &constants)?;
    Ok(Solution::from_vector(&forces))
}

/// Assemble the `2J × (M + 3)` equilibrium matrix.
fn build_equilibrium_matrix(
    truss: &Truss,
    members: &[Member],
    supports: &Supports,
) -> Result<DMatrix<f64>, SolveError> {
    let member_count = members.len();
    let mut matrix = DMatrix::zeros(2 * truss.joint_count(), member_count + 3);
    let pin = truss.find_joint(supports.pin);
    let roller = truss.find_joint(supports.roller);

    for (joint, position) in truss.joints() {
        let row = 2 * joint.index();
        if pin == Some(joint) {
            matrix[(row, member_count)] = 1.0;
            matrix[(row + 1, member_count + 1)] = 1.0;
        }
        if roller == Some(joint) {
            matrix[(row + 1, member_count + 2)] = 1.0;
        }

        for index in truss.incident_members(joint) {
            let member = &members[index];
            if member.start.key() == member.end.key() {
                return Err(SolveError::ZeroLengthMember(index));
            }
            let other = member
                .other_end(position.key())
                .ok_or(SolveError::ZeroLengthMember(index))?;
            let direction = (position - other)
                .normalize()
                .map_err(|_| SolveError::ZeroLengthMember(index))?;
            matrix[(row, index)] = direction.x;
            matrix[(row + 1, index)] = direction.y;
        }
    }
    Ok(matrix)
}

/// Assemble the right-hand side from the lumped deck load.
fn build_load_vector(truss: &Truss, load: &LoadCase) -> DVector<f64> {
    let mut constants = DVector::zeros(2 * truss.joint_count());
    let ground = truss.ground_joints();
    for (entry, magnitude) in ground
        .iter()
        .zip(distribute_floor_load(&ground, load.intensity))
    {
        // the applied load is (0, -magnitude); it moves across with its sign flipped
        constants[2 * entry.joint.index() + 1] = magnitude;
    }
    constants
}

/// Solve the square system with an LU factorisation.
fn solve_forces(
    coefficients: DMatrix<f64>,
    constants: &DVector<f64>,
) -> Result<DVector<f64>, SolveError> {
    let lu = coefficients.lu();
    let pivots = lu.u().diagonal();
    let largest = pivots.amax();
    if largest == 0.0
        || pivots
            .iter()
            .any(|pivot| pivot.abs() <= largest * SINGULAR_PIVOT_RATIO)
    {
        return Err(SolveError::UnstableGeometry);
    }
    let forces = lu.solve(constants).ok_or(SolveError::UnstableGeometry)?;
    if forces.iter().all(|force| force.is_finite()) {
        Ok(forces)
    } else {
        Err(SolveError::UnstableGeometry)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::{member, vector};

    /// Two deck panels, a king post and two rafters.
    fn king_post(apex_height: f64) -> Vec<Member> {
        let apex = vector(6.0, apex_height);
        vec![
            member(vector(0.0, 0.0), vector(6.0, 0.0)),
            member(vector(6.0, 0.0), vector(12.0, 0.0)),
            member(vector(0.0, 0.0), apex),
            member(apex, vector(12.0, 0.0)),
            member(vector(6.0, 0.0), apex),
        ]
    }

    #[test]
    fn king_post_truss_matches_hand_calculation() {
        let solution = solve(&king_post(3.0), &Supports::reference(), &LoadCase::default())
            .expect("king post truss is stable");
        let forces = solution.member_forces();
        let rafter = 15.0 * 45.0_f64.sqrt() / 6.0;

        assert_relative_eq!(forces[0], -15.0, epsilon = 1.0e-9);
        assert_relative_eq!(forces[1], -15.0, epsilon = 1.0e-9);
        assert_relative_eq!(forces[2], rafter, epsilon = 1.0e-9);
        assert_relative_eq!(forces[3], rafter, epsilon = 1.0e-9);
        assert_relative_eq!(forces[4], -15.0, epsilon = 1.0e-9);

        let reactions = solution.reactions();
        assert_relative_eq!(reactions.ax, 0.0, epsilon = 1.0e-9);
        assert_relative_eq!(reactions.ay, 15.0, epsilon = 1.0e-9);
        assert_relative_eq!(reactions.by, 15.0, epsilon = 1.0e-9);
    }

    #[test]
    fn reactions_carry_the_whole_deck_load() {
        for height in [1.5, 3.0, 4.5] {
            let load = LoadCase { intensity: 4.0 };
            let solution = solve(&king_post(height), &Supports::reference(), &load)
                .expect("king post truss is stable");
            let reactions = solution.reactions();
            assert_relative_eq!(reactions.ay + reactions.by, 48.0, epsilon = 1.0e-9);
        }
    }

    #[test]
    fn mirrored_members_carry_mirrored_forces() {
        let solution = solve(&king_post(2.0), &Supports::reference(), &LoadCase::default())
            .expect("king post truss is stable");
        let forces = solution.member_forces();
        assert_relative_eq!(forces[0], forces[1], epsilon = 1.0e-9);
        assert_relative_eq!(forces[2], forces[3], epsilon = 1.0e-9);
    }

    #[test]
    fn bare_deck_beam_sends_load_straight_to_supports() {
        let a = vector(0.0, 0.0);
        let b = vector(12.0, 0.0);
        let solution = solve(&[member(a, b)], &Supports::new(a, b), &LoadCase::default())
            .expect("single member is determinate");
        assert_relative_eq!(solution.member_forces()[0], 0.0, epsilon = 1.0e-12);
        assert_relative_eq!(solution.reactions().ay, 15.0, epsilon = 1.0e-12);
        assert_relative_eq!(solution.reactions().by, 15.0, epsilon = 1.0e-12);
    }

    #[test]
    fn single_bay_triangle_is_symmetric() {
        let a = vector(0.0, 0.0);
        let apex = vector(6.0, 3.0);
        let b = vector(12.0, 0.0);
        let members = [member(a, apex), member(apex, b), member(a, b)];
        let solution = solve(&members, &Supports::new(a, b), &LoadCase::default())
            .expect("triangle is stable");
        let forces = solution.member_forces();
        assert_relative_eq!(forces[0], forces[1], epsilon = 1.0e-12);
        assert_relative_eq!(forces[2], 0.0, epsilon = 1.0e-12);
        assert_relative_eq!(solution.reactions().ay, solution.reactions().by, epsilon = 1.0e-12);
    }

    #[test]
    fn support_shares_pass_straight_into_reactions() {
        let members = king_post(3.0);
        let truss = Truss::from_members(&members);
        let shares = distribute_floor_load(&truss.ground_joints(), 2.5);
        assert_eq!(shares, vec![7.5, 15.0, 7.5]);

        let solution = solve(&members, &Supports::reference(), &LoadCase::default())
            .expect("king post truss is stable");
        // without the support shares the deck would only push 7.5 into each support
        assert_relative_eq!(solution.reactions().ay - shares[0], 7.5, epsilon = 1.0e-9);
        assert_relative_eq!(solution.reactions().by - shares[2], 7.5, epsilon = 1.0e-9);
    }

    #[test]
    fn unbalanced_counts_are_indeterminate() {
        // an open chain of n bars has n + 1 joints, which only balances for n = 1
        for bars in 2..8 {
            let members: Vec<Member> = (0..bars)
                .map(|i| {
                    let x = f64::from(i) * 2.0;
                    member(
                        vector(x, f64::from(i % 2)),
                        vector(x + 2.0, f64::from((i + 1) % 2)),
                    )
                })
                .collect();
            let truss = Truss::from_members(&members);
            let error = solve(&members, &Supports::reference(), &LoadCase::default())
                .expect_err("open chain is not determinate");
            assert_eq!(
                error,
                SolveError::Indeterminate {
                    joints: truss.joint_count(),
                    members: truss.member_count(),
                }
            );
        }

        let square = [
            member(vector(0.0, 0.0), vector(12.0, 0.0)),
            member(vector(12.0, 0.0), vector(12.0, 4.0)),
            member(vector(12.0, 4.0), vector(0.0, 4.0)),
            member(vector(0.0, 4.0), vector(0.0, 0.0)),
        ];
        assert_eq!(
            solve(&square, &Supports::reference(), &LoadCase::default()),
            Err(SolveError::Indeterminate {
                joints: 4,
                members: 4
            })
        );
    }

    #[test]
    fn zero_length_member_is_rejected() {
        let a = vector(0.0, 0.0);
        let apex = vector(6.0, 3.0);
        let b = vector(12.0, 0.0);
        let members = [member(a, a), member(a, apex), member(apex, b)];
        assert_eq!(
            solve(&members, &Supports::new(a, b), &LoadCase::default()),
            Err(SolveError::ZeroLengthMember(0))
        );
    }

    #[test]
    fn mechanism_is_reported_as_unstable() {
        // the midspan deck joint has only horizontal bars and cannot carry its load
        let a = vector(0.0, 0.0);
        let mid = vector(6.0, 0.0);
        let b = vector(12.0, 0.0);
        let apex = vector(6.0, 3.0);
        let members = [
            member(a, mid),
            member(mid, b),
            member(a, b),
            member(a, apex),
            member(apex, b),
        ];
        assert_eq!(
            solve(&members, &Supports::new(a, b), &LoadCase::default()),
            Err(SolveError::UnstableGeometry)
        );
    }

    #[test]
    fn missing_support_is_reported_as_unstable() {
        let supports = Supports::new(vector(0.0, 0.0), vector(24.0, 0.0));
        assert_eq!(
            solve(&king_post(3.0), &supports, &LoadCase::default()),
            Err(SolveError::UnstableGeometry)
        );
    }

    #[test]
    fn floor_load_uses_tributary_lengths() {
        let d = 3.0;
        let w = 2.5;
        let members: Vec<Member> = (0..4)
            .map(|i| {
                let x = f64::from(i) * d;
                member(vector(x, 0.0), vector(x + d, 0.0))
            })
            .collect();
        let truss = Truss::from_members(&members);
        let loads = distribute_floor_load(&truss.ground_joints(), w);
        assert_eq!(loads.len(), 5);
        assert_relative_eq!(loads[0], w * d / 2.0);
        for interior in &loads[1..4] {
            assert_relative_eq!(*interior, w * d);
        }
        assert_relative_eq!(loads[4], w * d / 2.0);
    }

    #[test]
    fn single_floor_joint_uses_the_same_lumping_rule() {
        let truss = Truss::from_members(&[
            member(vector(0.0, 0.0), vector(4.0, 0.0)),
            member(vector(4.0, 0.0), vector(12.0, 0.0)),
        ]);
        let loads = distribute_floor_load(&truss.ground_joints(), 1.0);
        assert_eq!(loads, vec![2.0, 6.0, 4.0]);
        assert!(distribute_floor_load(&[], 1.0).is_empty());
    }

    #[test]
    fn rounding_keeps_layout() {
        let solution = solve(&king_post(3.0), &Supports::reference(), &LoadCase::default())
            .expect("king post truss is stable");
        let rounded = solution.rounded(2);
        assert_eq!(rounded.member_count(), 5);
        assert_eq!(rounded.member_force(2), Some(16.77));
        assert_eq!(rounded.member_force(5), None);
    }
}
