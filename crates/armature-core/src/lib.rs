//! Armature Core - Foundational types for the Armature animation crates
//!
//! This crate provides the types that the blend tree and IK crates share:
//! - `JointId` - Index of a joint inside a `Skeleton`
//! - `Transform` - Position / rotation / scale with interpolation helpers
//! - `Skeleton` - Joint hierarchy with local and world transforms
//! - Error types and Result alias

mod error;
mod id;
mod skeleton;
mod types;

pub use error::{ArmatureError, Result};
pub use id::JointId;
pub use skeleton::{Joint, Skeleton};
pub use types::{cross_2d, lerp_vec3, slerp_shortest, Transform};

pub use glam::{Quat, Vec2, Vec3};
