//! Joint model derived from a list of members.

use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};

use crate::geometry::{JointKey, Member, Vector2};

/// A joint lying on the ground line, with its index in the full joint list.
///
/// Ground joints form their own sequence ordered by `x`; `joint` maps each entry
/// back to the joint ordering used by [`Truss`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundJoint {
    /// Index of the joint in the truss.
    pub joint: NodeIndex,
    /// Position of the joint.
    pub position: Vector2,
}

/// Joints and incidence lists for a set of members.
///
/// Joints are numbered in the order their positions are first seen while walking
/// the members, and member `i` is stored as edge `i`. Positions are merged through
/// [`JointKey`], so endpoints that agree to [`JOINT_KEY_DECIMALS`] places share a
/// joint.
///
/// [`JOINT_KEY_DECIMALS`]: crate::geometry::JOINT_KEY_DECIMALS
#[derive(Clone, Debug, Default)]
pub struct Truss {
    /// Joint positions as nodes, member indices as edges.
    graph: UnGraph<Vector2, usize>,
    /// Map from rounded position to joint.
    lookup: HashMap<JointKey, NodeIndex>,
}

impl Truss {
    /// Build the joint model for `members`.
    ///
    /// # Examples
    /// ```
    /// use bridgex::{member, vector, Truss};
    ///
    /// let truss = Truss::from_members(&[
    ///     member(vector(0.0, 0.0), vector(6.0, 3.0)),
    ///     member(vector(6.0, 3.0), vector(12.0, 0.0)),
    ///     member(vector(12.0, 0.0), vector(0.0, 0.0)),
    /// ]);
    /// assert_eq!(truss.joint_count(), 3);
    /// assert_eq!(truss.member_count(), 3);
    /// ```
    #[must_use]
    pub fn from_members(members: &[Member]) -> Self {
        let mut truss = Self::default();
        for (index, member) in members.iter().enumerate() {
            let start = truss.joint_for(member.start);
            let end = truss.joint_for(member.end);
            truss.graph.add_edge(start, end, index);
        }
        truss
    }

    /// Return the existing joint at `position`, adding one if needed.
    fn joint_for(&mut self, position: Vector2) -> NodeIndex {
        let graph = &mut self.graph;
        *self
            .lookup
            .entry(position.key())
            .or_insert_with(|| graph.add_node(position))
    }

    /// Return the number of distinct joints.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of members.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Check the method-of-joints count `2J = M + 3`.
    #[must_use]
    pub fn is_determinate(&self) -> bool {
        2 * self.joint_count() == self.member_count() + 3
    }

    /// Find the joint at `position`.
    #[must_use]
    pub fn find_joint(&self, position: Vector2) -> Option<NodeIndex> {
        self.lookup.get(&position.key()).copied()
    }

    /// Retrieve the position of a joint.
    #[must_use]
    pub fn joint_position(&self, joint: NodeIndex) -> Option<Vector2> {
        self.graph.node_weight(joint).copied()
    }

    /// Iterate over joints in first-seen order.
    pub fn joints(&self) -> impl Iterator<Item = (NodeIndex, Vector2)> + '_ {
        self.graph
            .node_indices()
            .map(move |joint| (joint, self.graph[joint]))
    }

    /// Return the indices of members meeting at `joint`, ascending.
    #[must_use]
    pub fn incident_members(&self, joint: NodeIndex) -> Vec<usize> {
        let mut members: Vec<usize> = self
            .graph
            .edges(joint)
            .map(|edge| *edge.weight())
            .collect();
        members.sort_unstable();
        members
    }

    /// Return the joints with exactly `y == 0`, ordered by ascending `x`.
    #[must_use]
    pub fn ground_joints(&self) -> Vec<GroundJoint> {
        let mut ground: Vec<GroundJoint> = self
            .joints()
            .filter(|(_, position)| position.y == 0.0)
            .map(|(joint, position)| GroundJoint { joint, position })
            .collect();
        ground.sort_by(|a, b| a.position.x.total_cmp(&b.position.x));
        ground
    }

    /// Return joint positions sorted by ascending `x`, ties kept in first-seen order.
    #[must_use]
    pub fn positions_by_x(&self) -> Vec<Vector2> {
        let mut positions: Vec<Vector2> = self.joints().map(|(_, position)| position).collect();
        positions.sort_by(|a, b| a.x.total_cmp(&b.x));
        positions
    }

    /// Return joints with fewer than two members; such ends carry no load path.
    #[must_use]
    pub fn free_joints(&self) -> Vec<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|&joint| self.graph.edges(joint).count() < 2)
            .collect()
    }
}
