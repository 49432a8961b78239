//! TOML rig configuration
//!
//! ```toml
//! target = [1.0, 2.0, 0.0]
//!
//! [ik]
//! solver = "fabrik"
//! distance_threshold = 0.4
//! max_iterations = 5
//! joint_count = 6
//! bone_length = 1.0
//!
//! [two_bone]
//! d1 = 3.0
//! d2 = 3.0
//! ```

use armature_core::{ArmatureError, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

fn default_distance_threshold() -> f32 {
    0.4
}

fn default_max_iterations() -> u32 {
    5
}

fn default_joint_count() -> usize {
    6
}

fn default_bone_length() -> f32 {
    1.0
}

fn default_bone() -> f32 {
    3.0
}

/// Which iterative solver drives the chain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    #[default]
    Ccd,
    Fabrik,
}

impl FromStr for SolverKind {
    type Err = ArmatureError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ccd" => Ok(SolverKind::Ccd),
            "fabrik" => Ok(SolverKind::Fabrik),
            other => Err(ArmatureError::ConfigError(format!(
                "unknown solver '{}' (expected ccd or fabrik)",
                other
            ))),
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverKind::Ccd => f.write_str("ccd"),
            SolverKind::Fabrik => f.write_str("fabrik"),
        }
    }
}

/// Settings for the iterative solvers and the chain they build
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IkSettings {
    #[serde(default)]
    pub solver: SolverKind,
    #[serde(default = "default_distance_threshold")]
    pub distance_threshold: f32,
    /// Extra passes allowed after the first before giving up
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    #[serde(default = "default_joint_count")]
    pub joint_count: usize,
    #[serde(default = "default_bone_length")]
    pub bone_length: f32,
}

impl Default for IkSettings {
    fn default() -> Self {
        Self {
            solver: SolverKind::default(),
            distance_threshold: default_distance_threshold(),
            max_iterations: default_max_iterations(),
            joint_count: default_joint_count(),
            bone_length: default_bone_length(),
        }
    }
}

/// Bone lengths for the analytical two-bone arm
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TwoBoneSettings {
    #[serde(default = "default_bone")]
    pub d1: f32,
    #[serde(default = "default_bone")]
    pub d2: f32,
}

impl Default for TwoBoneSettings {
    fn default() -> Self {
        Self {
            d1: default_bone(),
            d2: default_bone(),
        }
    }
}

/// A full rig file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RigConfig {
    #[serde(default)]
    pub ik: IkSettings,
    #[serde(default)]
    pub two_bone: TwoBoneSettings,
    /// Initial target, if the file sets one
    #[serde(default)]
    pub target: Option<[f32; 3]>,
}

impl RigConfig {
    pub fn validate(&self) -> Result<()> {
        if self.ik.distance_threshold.is_nan() || self.ik.distance_threshold <= 0.0 {
            return Err(ArmatureError::ConfigError(format!(
                "ik.distance_threshold must be positive, got {}",
                self.ik.distance_threshold
            )));
        }
        if self.ik.joint_count < crate::chain::MIN_CHAIN_JOINTS {
            return Err(ArmatureError::ConfigError(format!(
                "ik.joint_count must be at least {}, got {}",
                crate::chain::MIN_CHAIN_JOINTS,
                self.ik.joint_count
            )));
        }
        if self.ik.bone_length.is_nan() || self.ik.bone_length <= 0.0 {
            return Err(ArmatureError::ConfigError(format!(
                "ik.bone_length must be positive, got {}",
                self.ik.bone_length
            )));
        }
        if self.two_bone.d1 < 0.0 || self.two_bone.d2 < 0.0 {
            return Err(ArmatureError::ConfigError(format!(
                "two_bone lengths must not be negative (d1 = {}, d2 = {})",
                self.two_bone.d1, self.two_bone.d2
            )));
        }
        Ok(())
    }
}

pub fn load_rig_from_str(content: &str) -> Result<RigConfig> {
    let config: RigConfig = toml::from_str(content)?;
    config.validate()?;
    log::debug!(
        "Rig config: {} solver, {} joints, threshold {}, {} iterations",
        config.ik.solver,
        config.ik.joint_count,
        config.ik.distance_threshold,
        config.ik.max_iterations
    );
    Ok(config)
}

pub fn load_rig_from_file(path: &Path) -> Result<RigConfig> {
    let content = std::fs::read_to_string(path)?;
    load_rig_from_str(&content).map_err(|e| match e {
        ArmatureError::ConfigError(msg) => {
            ArmatureError::ConfigError(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}
