//! Skeletal animation for Armature
//!
//! - Keyframed skeletal clips loaded from TOML and sampled into poses
//! - Pose blending primitives (two-way lerp, three-way barycentric)
//! - Blend trees with 1D segment blending and 2D Delaunay blend spaces
//! - A playback clock and an `Animator` that writes the result to a skeleton

pub mod blend;
pub mod blend1d;
pub mod blend2d;
pub mod blend_tree;
pub mod clip;
pub mod delaunay;
pub mod library;
pub mod loader;
pub mod playback;
pub mod pose;
pub mod sampler;
pub mod source;

pub use blend::{barycentric_pose, lerp_pose};
pub use blend1d::Blend1D;
pub use blend2d::{BarycentricHit, Blend2D};
pub use blend_tree::{BlendNode, BlendOutcome, NodeKind};
pub use clip::{Interpolation, JointKeyframe, JointProperty, JointTrack, SkeletalClip};
pub use library::ClipLibrary;
pub use playback::{Animator, PlaybackState};
pub use pose::Pose;
pub use source::{PoseSource, StaticPose};
