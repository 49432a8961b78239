//! Error types for Armature

use crate::id::JointId;
use thiserror::Error;

/// The main error type for Armature operations.
///
/// Only structural misuse and I/O end up here. Numeric conditions such as an
/// unreachable IK target or a blend parameter outside the blend space are
/// reported through solver state and blend outcomes instead.
#[derive(Debug, Error)]
pub enum ArmatureError {
    #[error("Joint not found: {0}")]
    JointNotFound(JointId),

    #[error("Joint {0} still has children and cannot be removed")]
    JointHasChildren(JointId),

    #[error("Only the most recently added joint can be removed, got {0}")]
    NotTailJoint(JointId),

    #[error("Invalid chain: {0}")]
    InvalidChain(String),

    #[error("Clip not found: {0}")]
    ClipNotFound(String),

    #[error("Invalid clip: {0}")]
    InvalidClip(String),

    #[error("Invalid blend tree: {0}")]
    InvalidBlendTree(String),

    #[error("Child index {index} out of range ({count} children)")]
    ChildOutOfRange { index: usize, count: usize },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),
}

/// Result type alias for Armature operations
pub type Result<T> = std::result::Result<T, ArmatureError>;

impl From<toml::de::Error> for ArmatureError {
    fn from(err: toml::de::Error) -> Self {
        ArmatureError::TomlParseError(err.to_string())
    }
}
