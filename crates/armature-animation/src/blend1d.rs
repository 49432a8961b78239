//! One-dimensional blending between children ordered along `x`

use crate::blend::lerp_pose;
use crate::blend_tree::{BlendNode, BlendOutcome};
use crate::pose::Pose;
use armature_core::{ArmatureError, Result};

/// Children sorted by `position.x`, blended by a scalar parameter.
#[derive(Debug, Default)]
pub struct Blend1D {
    children: Vec<BlendNode>,
    parameter: f32,
}

impl Blend1D {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parameter(&self) -> f32 {
        self.parameter
    }

    pub fn set_parameter(&mut self, parameter: f32) {
        self.parameter = parameter;
    }

    pub fn children(&self) -> &[BlendNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [BlendNode] {
        &mut self.children
    }

    /// Insert a child, keeping the list sorted by `x`. Ties go after existing
    /// children at the same position. Returns the child's index.
    pub fn add_child(&mut self, child: BlendNode) -> usize {
        let x = child.position.x;
        let index = self.children.partition_point(|c| c.position.x <= x);
        self.children.insert(index, child);
        index
    }

    pub fn remove_child(&mut self, index: usize) -> Result<BlendNode> {
        self.check_index(index)?;
        Ok(self.children.remove(index))
    }

    /// Move a child along the axis. Ordering is not restored until
    /// [`sort_children`](Self::sort_children) is called.
    pub fn set_child_position(&mut self, index: usize, x: f32) -> Result<()> {
        self.check_index(index)?;
        self.children[index].position.x = x;
        Ok(())
    }

    /// Stable sort of children by `x`
    pub fn sort_children(&mut self) {
        self.children
            .sort_by(|a, b| a.position.x.total_cmp(&b.position.x));
    }

    /// Find the pair of adjacent children bracketing `parameter`.
    ///
    /// Returns `None` when the parameter is at or below the first child or
    /// above the last. Otherwise returns `(i - 1, i)` for the first child `i`
    /// with `x >= parameter`, falling back to the last two children.
    pub fn find_segment(&self, parameter: f32) -> Option<(usize, usize)> {
        let first = self.children.first()?;
        let last = self.children.last()?;
        if parameter <= first.position.x || parameter > last.position.x {
            return None;
        }

        let len = self.children.len();
        let upper = self
            .children
            .iter()
            .position(|c| c.position.x >= parameter)
            .unwrap_or(len - 1)
            .max(1);
        Some((upper - 1, upper))
    }

    /// Blend the two children around the parameter into `out`.
    ///
    /// Outside the children's range the nearest boundary child is produced
    /// and copied.
    pub(crate) fn blend_children(&mut self, time: f64, out: &mut Pose) -> BlendOutcome {
        if self.children.is_empty() {
            out.clear();
            return BlendOutcome::Empty;
        }

        let parameter = self.parameter;
        let Some((lo, hi)) = self.find_segment(parameter) else {
            let boundary = if parameter <= self.children[0].position.x {
                0
            } else {
                self.children.len() - 1
            };
            let child = &mut self.children[boundary];
            child.produce_pose(time);
            out.clone_from(&child.pose);
            return BlendOutcome::Clamped;
        };

        self.children[lo].produce_pose(time);
        self.children[hi].produce_pose(time);

        let x0 = self.children[lo].position.x;
        let x1 = self.children[hi].position.x;
        let span = x1 - x0;
        let weight = if span.abs() > f32::EPSILON {
            (parameter - x0) / span
        } else {
            0.0
        };

        *out = lerp_pose(&self.children[lo].pose, &self.children[hi].pose, weight);
        BlendOutcome::Blended
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.children.len() {
            return Err(ArmatureError::ChildOutOfRange {
                index,
                count: self.children.len(),
            });
        }
        Ok(())
    }
}
