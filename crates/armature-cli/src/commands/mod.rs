//! CLI command implementations

pub mod blend;
pub mod ik;
pub mod two_bone;
