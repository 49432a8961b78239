//! Two-dimensional blending over a triangulated blend space

use crate::blend::barycentric_pose;
use crate::blend_tree::{BlendNode, BlendOutcome};
use crate::delaunay::{is_degenerate, triangulate};
use crate::pose::Pose;
use armature_core::{cross_2d, ArmatureError, Result};
use glam::Vec2;

/// Weights below this are treated as zero when testing containment
const INSIDE_EPSILON: f32 = 1e-6;

/// Triangle containing a blend parameter, with per-vertex weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarycentricHit {
    pub nodes: [usize; 3],
    pub weights: [f32; 3],
}

/// Children scattered in 2D, blended three at a time by barycentric weights.
///
/// The triangulation is only rebuilt by
/// [`generate_triangles`](Self::generate_triangles); edits to the children
/// leave it stale until then.
#[derive(Debug, Default)]
pub struct Blend2D {
    children: Vec<BlendNode>,
    parameter: Vec2,
    triangles: Vec<[usize; 3]>,
}

impl Blend2D {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parameter(&self) -> Vec2 {
        self.parameter
    }

    pub fn set_parameter(&mut self, parameter: Vec2) {
        self.parameter = parameter;
    }

    pub fn children(&self) -> &[BlendNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [BlendNode] {
        &mut self.children
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    pub fn add_child(&mut self, child: BlendNode) -> usize {
        self.children.push(child);
        self.children.len() - 1
    }

    pub fn remove_child(&mut self, index: usize) -> Result<BlendNode> {
        self.check_index(index)?;
        Ok(self.children.remove(index))
    }

    pub fn set_child_position(&mut self, index: usize, position: Vec2) -> Result<()> {
        self.check_index(index)?;
        self.children[index].position = position;
        Ok(())
    }

    /// Rebuild the Delaunay triangulation from the children's positions.
    pub fn generate_triangles(&mut self) {
        let positions: Vec<Vec2> = self.children.iter().map(|c| c.position).collect();
        self.triangles = triangulate(&positions);
        if self.triangles.is_empty() && self.children.len() >= 3 {
            log::warn!(
                "Blend space with {} children produced no triangles (collinear positions?)",
                self.children.len()
            );
        } else {
            log::debug!(
                "Triangulated {} blend children into {} triangles",
                self.children.len(),
                self.triangles.len()
            );
        }
    }

    /// Find the first triangle containing `parameter` and its barycentric weights.
    ///
    /// A parameter on a vertex gets weight exactly 1 for that vertex. Tiny
    /// negative weights from rounding on edges are clamped to zero.
    pub fn find_nodes_barycentric(&self, parameter: Vec2) -> Option<BarycentricHit> {
        let count = self.children.len();
        for tri in &self.triangles {
            if tri.iter().any(|&i| i >= count) {
                continue;
            }
            let [p0, p1, p2] = tri.map(|i| self.children[i].position);
            if is_degenerate(p0.as_dvec2(), p1.as_dvec2(), p2.as_dvec2()) {
                continue;
            }
            let area = cross_2d(p1 - p0, p2 - p0);

            let (d0, d1, d2) = (p0 - parameter, p1 - parameter, p2 - parameter);
            let weights = [
                cross_2d(d1, d2) / area,
                cross_2d(d2, d0) / area,
                cross_2d(d0, d1) / area,
            ];
            if weights.iter().all(|w| *w >= -INSIDE_EPSILON) {
                return Some(BarycentricHit {
                    nodes: *tri,
                    weights: snap_to_vertex(weights.map(|w| w.max(0.0))),
                });
            }
        }
        None
    }

    /// Blend the three children around the parameter into `out`.
    ///
    /// When the parameter lies outside the triangulation `out` is left as is.
    pub(crate) fn blend_children(&mut self, time: f64, out: &mut Pose) -> BlendOutcome {
        let Some(hit) = self.find_nodes_barycentric(self.parameter) else {
            log::trace!("Blend parameter {:?} outside blend space", self.parameter);
            return BlendOutcome::OutsideBlendSpace;
        };

        for &i in &hit.nodes {
            self.children[i].produce_pose(time);
        }

        let [a, b, c] = hit.nodes;
        *out = barycentric_pose(
            &self.children[a].pose,
            &self.children[b].pose,
            &self.children[c].pose,
            hit.weights,
        );
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

/// A weight within epsilon of 1 becomes exactly 1 (and the others 0)
fn snap_to_vertex(weights: [f32; 3]) -> [f32; 3] {
    match weights.iter().position(|w| *w >= 1.0 - INSIDE_EPSILON) {
        Some(vertex) => {
            let mut snapped = [0.0; 3];
            snapped[vertex] = 1.0;
            snapped
        }
        None => weights,
    }
}
