//! Blend tree nodes
//!
//! A tree is built from [`BlendNode`]s. Leaves sample a [`PoseSource`]; inner
//! nodes hold a [`Blend1D`] or [`Blend2D`] and combine their children's poses.
//! Each node keeps its own output pose, overwritten on every
//! [`produce_pose`](BlendNode::produce_pose) call.

use crate::blend1d::Blend1D;
use crate::blend2d::Blend2D;
use crate::pose::Pose;
use crate::source::PoseSource;
use glam::Vec2;
use std::fmt;
use std::sync::Arc;

/// What a `produce_pose` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendOutcome {
    /// A leaf sampled its source
    Sampled,
    /// A blend node with one child copied that child's pose
    Delegated,
    /// A blend node with no children cleared its pose
    Empty,
    /// The 1D parameter sat at or outside the children's range; the boundary
    /// child's pose was copied
    Clamped,
    /// Children were combined
    Blended,
    /// The 2D parameter lies outside every triangle; the previous pose is kept
    OutsideBlendSpace,
}

/// The role of a node in the tree
pub enum NodeKind {
    Leaf(Arc<dyn PoseSource>),
    Blend1D(Blend1D),
    Blend2D(Blend2D),
}

impl fmt::Debug for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Leaf(source) => f.debug_tuple("Leaf").field(&source.name()).finish(),
            NodeKind::Blend1D(node) => f
                .debug_struct("Blend1D")
                .field("parameter", &node.parameter())
                .field("children", &node.children().len())
                .finish(),
            NodeKind::Blend2D(node) => f
                .debug_struct("Blend2D")
                .field("parameter", &node.parameter())
                .field("children", &node.children().len())
                .field("triangles", &node.triangles().len())
                .finish(),
        }
    }
}

/// A node in a blend tree, positioned in its parent's blend space.
///
/// 1D parents read only `position.x`.
#[derive(Debug)]
pub struct BlendNode {
    pub(crate) position: Vec2,
    kind: NodeKind,
    pub(crate) pose: Pose,
}

impl BlendNode {
    pub fn leaf(source: Arc<dyn PoseSource>) -> Self {
        Self::with_kind(NodeKind::Leaf(source))
    }

    pub fn blend_1d() -> Self {
        Self::with_kind(NodeKind::Blend1D(Blend1D::new()))
    }

    pub fn blend_2d() -> Self {
        Self::with_kind(NodeKind::Blend2D(Blend2D::new()))
    }

    pub fn with_kind(kind: NodeKind) -> Self {
        Self {
            position: Vec2::ZERO,
            kind,
            pose: Pose::new(),
        }
    }

    /// Place the node at a 1D position (`x`)
    pub fn at(self, x: f32) -> Self {
        self.at_2d(Vec2::new(x, 0.0))
    }

    pub fn at_2d(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    pub fn as_blend_1d_mut(&mut self) -> Option<&mut Blend1D> {
        match &mut self.kind {
            NodeKind::Blend1D(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_blend_2d_mut(&mut self) -> Option<&mut Blend2D> {
        match &mut self.kind {
            NodeKind::Blend2D(node) => Some(node),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Children of a blend node; empty for leaves
    pub fn children(&self) -> &[BlendNode] {
        match &self.kind {
            NodeKind::Leaf(_) => &[],
            NodeKind::Blend1D(node) => node.children(),
            NodeKind::Blend2D(node) => node.children(),
        }
    }

    /// The pose written by the last `produce_pose` call
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Longest source duration under this node
    pub fn duration(&self) -> f64 {
        match &self.kind {
            NodeKind::Leaf(source) => source.duration(),
            _ => self
                .children()
                .iter()
                .map(BlendNode::duration)
                .fold(0.0, f64::max),
        }
    }

    /// Total number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(BlendNode::node_count).sum::<usize>()
    }

    /// Produce this node's pose at `time`.
    ///
    /// Leaves sample their source. Blend nodes with one child hand the call
    /// down and copy the child's pose; with two or more they run their blend.
    pub fn produce_pose(&mut self, time: f64) -> BlendOutcome {
        match &mut self.kind {
            NodeKind::Leaf(source) => {
                self.pose = source.sample_pose(time);
                BlendOutcome::Sampled
            }
            NodeKind::Blend1D(node) => match node.children().len() {
                0 => clear(&mut self.pose),
                1 => delegate(&mut node.children_mut()[0], time, &mut self.pose),
                _ => node.blend_children(time, &mut self.pose),
            },
            NodeKind::Blend2D(node) => match node.children().len() {
                0 => clear(&mut self.pose),
                1 => delegate(&mut node.children_mut()[0], time, &mut self.pose),
                _ => node.blend_children(time, &mut self.pose),
            },
        }
    }
}

fn clear(pose: &mut Pose) -> BlendOutcome {
    pose.clear();
    BlendOutcome::Empty
}

fn delegate(child: &mut BlendNode, time: f64, out: &mut Pose) -> BlendOutcome {
    child.produce_pose(time);
    out.clone_from(&child.pose);
    BlendOutcome::Delegated
}
