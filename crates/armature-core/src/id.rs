//! Joint identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a joint inside a [`Skeleton`](crate::Skeleton).
///
/// Poses and clip tracks key their data by `JointId`, so a pose produced by a
/// clip can be applied to any skeleton that shares the same joint ordering.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JointId(pub u32);

impl JointId {
    /// Create a JointId from a raw value
    pub fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw value
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Position of the joint in its skeleton's joint array
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

impl fmt::Debug for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JointId({})", self.0)
    }
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
