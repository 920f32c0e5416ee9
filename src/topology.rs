//! Fixed connectivity of a truss, independent of joint coordinates.

use std::collections::{HashMap, HashSet};

use ndarray::Array2;

use crate::errors::TopologyError;
use crate::geometry::{JointKey, Member, Vector2};
use crate::truss::Truss;

/// Symmetric 0/1 adjacency matrix over an ordered joint list.
///
/// Entry `(i, j)` is 1 when a member joins joint `i` and joint `j`. The matrix is
/// only meaningful together with the ordering it was built from: rebuilding
/// members from a permuted position list connects different physical joints.
#[derive(Clone, Debug, PartialEq)]
pub struct Topology {
    /// Joint positions defining the row and column order.
    joints: Vec<Vector2>,
    /// Connectivity.
    adjacency: Array2<u8>,
}

impl Topology {
    /// Derive the topology of `members`, ordering joints by ascending `x`.
    ///
    /// # Examples
    /// ```
    /// use bridgex::{Design, Topology};
    ///
    /// let design = Design::reference();
    /// let topology = Topology::from_members(&design.members);
    /// assert_eq!(topology.joint_count(), 8);
    /// assert_eq!(topology.member_count(), 13);
    /// ```
    #[must_use]
    pub fn from_members(members: &[Member]) -> Self {
        let joints = Truss::from_members(members).positions_by_x();
        let index = index_joints(&joints);
        let mut adjacency = Array2::zeros((joints.len(), joints.len()));
        for member in members {
            // every endpoint is a joint of the truss built from the same members
            let start = index.get(&member.start.key());
            let end = index.get(&member.end.key());
            if let (Some(&i), Some(&j)) = (start, end) {
                adjacency[[i, j]] = 1;
                adjacency[[j, i]] = 1;
            }
        }
        Self { joints, adjacency }
    }

    /// Derive the topology of `members` over an explicit joint ordering.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::DuplicateJoint`] when `joints` repeats a position and
    /// [`TopologyError::UnknownJoint`] when a member endpoint is not listed.
    pub fn with_joint_order(
        members: &[Member],
        joints: Vec<Vector2>,
    ) -> Result<Self, TopologyError> {
        let index = index_joints(&joints);
        if index.len() != joints.len() {
            let mut seen = HashSet::new();
            for &joint in &joints {
                if !seen.insert(joint.key()) {
                    return Err(TopologyError::DuplicateJoint(joint));
                }
            }
        }
        let lookup = |position: Vector2| {
            index
                .get(&position.key())
                .copied()
                .ok_or(TopologyError::UnknownJoint(position))
        };
        let mut adjacency = Array2::zeros((joints.len(), joints.len()));
        for member in members {
            let i = lookup(member.start)?;
            let j = lookup(member.end)?;
            adjacency[[i, j]] = 1;
            adjacency[[j, i]] = 1;
        }
        Ok(Self { joints, adjacency })
    }

    /// Check that `members` join this topology's joints exactly as its
    /// adjacency matrix says.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::UnknownJoint`] for an endpoint outside the joint
    /// list and [`TopologyError::AdjacencyMismatch`] naming the first pair of
    /// joints whose connection differs.
    pub fn check_members(&self, members: &[Member]) -> Result<(), TopologyError> {
        let given = Self::with_joint_order(members, self.joints.clone())?;
        match self
            .adjacency
            .indexed_iter()
            .find(|&((i, j), &entry)| given.adjacency[[i, j]] != entry)
        {
            Some(((i, j), _)) => Err(TopologyError::AdjacencyMismatch(i, j)),
            None => Ok(()),
        }
    }

    /// Number of joints.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Number of distinct joint pairs that are connected.
    #[must_use]
    pub fn member_count(&self) -> usize {
        let n = self.joint_count();
        (0..n)
            .map(|row| (0..row).filter(|&col| self.connected(row, col)).count())
            .sum()
    }

    /// Joint positions in matrix order.
    #[must_use]
    pub fn joints(&self) -> &[Vector2] {
        &self.joints
    }

    /// The adjacency matrix.
    #[must_use]
    pub fn adjacency(&self) -> &Array2<u8> {
        &self.adjacency
    }

    /// Whether joints `i` and `j` are joined by a member.
    #[must_use]
    pub fn connected(&self, i: usize, j: usize) -> bool {
        self.adjacency.get((i, j)).copied() == Some(1)
    }

    /// Rebuild members from new joint positions, one per connected pair.
    ///
    /// Only the lower triangle is read. Members come out ordered by row then
    /// column, running from the higher-indexed joint to the lower.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::SizeMismatch`] when `positions` does not have one
    /// entry per joint.
    pub fn reconstruct(&self, positions: &[Vector2]) -> Result<Vec<Member>, TopologyError> {
        if positions.len() != self.joint_count() {
            return Err(TopologyError::SizeMismatch {
                expected: self.joint_count(),
                found: positions.len(),
            });
        }
        let mut members = Vec::new();
        for row in 0..self.joint_count() {
            for col in 0..row {
                if self.connected(row, col) {
                    members.push(Member::new(positions[row], positions[col]));
                }
            }
        }
        Ok(members)
    }
}

/// Map each joint key to its position in `joints`, keeping the first occurrence.
fn index_joints(joints: &[Vector2]) -> HashMap<JointKey, usize> {
    let mut index = HashMap::with_capacity(joints.len());
    for (i, joint) in joints.iter().enumerate() {
        index.entry(joint.key()).or_insert(i);
    }
    index
}
