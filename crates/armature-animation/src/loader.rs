//! TOML loading for skeletal clips and blend trees

use crate::blend_tree::BlendNode;
use crate::clip::SkeletalClip;
use crate::library::ClipLibrary;
use armature_core::{ArmatureError, Result};
use glam::Vec2;
use serde::Deserialize;
use std::path::Path;

/// Load a skeletal clip from a `.anim.toml` file.
///
/// ```toml
/// name = "wave"
/// duration = 1.0
///
/// [[tracks]]
/// joint = 2
/// property = "Rotation"
/// interpolation = "Linear"
///
/// [[tracks.keyframes]]
/// time = 0.0
/// value = [0.0, 0.0, 0.0, 1.0]
/// # ...more keyframes
/// ```
pub fn load_clip_from_file(path: &Path) -> Result<SkeletalClip> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ArmatureError::InvalidClip(format!("Failed to read {}: {}", path.display(), e))
    })?;
    load_clip_from_str(&content).map_err(|e| match e {
        ArmatureError::TomlParseError(msg) => {
            ArmatureError::InvalidClip(format!("Failed to parse {}: {}", path.display(), msg))
        }
        other => other,
    })
}

/// Parse and validate a skeletal clip from a TOML string.
pub fn load_clip_from_str(content: &str) -> Result<SkeletalClip> {
    let mut clip: SkeletalClip = toml::from_str(content)?;
    clip.validate()?;
    log::debug!(
        "Loaded clip '{}' ({} tracks, {:.2}s)",
        clip.name,
        clip.joint_tracks.len(),
        clip.duration
    );
    Ok(clip)
}

/// A blend tree file: optional inline clips plus the tree description.
#[derive(Debug, Deserialize)]
pub struct BlendTreeFile {
    #[serde(default)]
    pub clips: Vec<SkeletalClip>,
    pub tree: NodeDef,
}

/// Serialized form of one blend-tree node
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeDef {
    Clip {
        clip: String,
        #[serde(default)]
        position: [f32; 2],
    },
    #[serde(rename = "blend_1d")]
    Blend1D {
        #[serde(default)]
        position: [f32; 2],
        #[serde(default)]
        parameter: f32,
        #[serde(default)]
        children: Vec<NodeDef>,
    },
    #[serde(rename = "blend_2d")]
    Blend2D {
        #[serde(default)]
        position: [f32; 2],
        #[serde(default)]
        parameter: [f32; 2],
        #[serde(default)]
        children: Vec<NodeDef>,
    },
}

impl NodeDef {
    /// Build the runtime node, resolving clip names against `library`.
    ///
    /// 1D children are inserted in sorted order; 2D nodes are triangulated.
    pub fn build(&self, library: &ClipLibrary) -> Result<BlendNode> {
        if let NodeDef::Blend1D { children, .. } | NodeDef::Blend2D { children, .. } = self {
            if children.is_empty() {
                return Err(ArmatureError::InvalidBlendTree(
                    "blend node declares no children".to_string(),
                ));
            }
        }

        match self {
            NodeDef::Clip { clip, position } => {
                let source = library.source(clip)?;
                Ok(BlendNode::leaf(source).at_2d(Vec2::from(*position)))
            }
            NodeDef::Blend1D {
                position,
                parameter,
                children,
            } => {
                let mut node = BlendNode::blend_1d().at_2d(Vec2::from(*position));
                if let Some(blend) = node.as_blend_1d_mut() {
                    for child in children {
                        blend.add_child(child.build(library)?);
                    }
                    blend.set_parameter(*parameter);
                }
                Ok(node)
            }
            NodeDef::Blend2D {
                position,
                parameter,
                children,
            } => {
                let mut node = BlendNode::blend_2d().at_2d(Vec2::from(*position));
                if let Some(blend) = node.as_blend_2d_mut() {
                    for child in children {
                        blend.add_child(child.build(library)?);
                    }
                    blend.set_parameter(Vec2::from(*parameter));
                    blend.generate_triangles();
                }
                Ok(node)
            }
        }
    }
}

/// Parse a blend tree file. Inline clips are validated and registered in
/// `library` before the tree is built, so they pick up the library's bound
/// skeleton as their rest pose.
pub fn load_blend_tree_from_str(content: &str, library: &mut ClipLibrary) -> Result<BlendNode> {
    let file: BlendTreeFile = toml::from_str(content)?;
    for mut clip in file.clips {
        clip.validate()?;
        library.add_clip(clip);
    }
    let root = file.tree.build(library)?;
    log::info!(
        "Built blend tree with {} nodes ({} clips available)",
        root.node_count(),
        library.clip_count()
    );
    Ok(root)
}

pub fn load_blend_tree_from_file(path: &Path, library: &mut ClipLibrary) -> Result<BlendNode> {
    let content = std::fs::read_to_string(path)?;
    load_blend_tree_from_str(&content, library)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blend_tree::{BlendOutcome, NodeKind};
    use armature_core::JointId;
    use std::io::Write;

    const SLIDE: &str = r#"
name = "slide"

[[tracks]]
joint = 1
property = "Translation"

[[tracks.keyframes]]
time = 0.0
value = [0.0, 0.0, 0.0]

[[tracks.keyframes]]
time = 1.0
value = [1.0, 1.0, 1.0]
"#;

    #[test]
    fn parse_minimal_clip() {
        let clip = load_clip_from_str(SLIDE).unwrap();
        assert_eq!(clip.name, "slide");
        assert_eq!(clip.duration, 1.0);
        assert_eq!(clip.joint_tracks.len(), 1);
        assert_eq!(clip.joint_tracks[0].joint, JointId::from_raw(1));
        assert_eq!(clip.joint_tracks[0].keyframes.len(), 2);
    }

    #[test]
    fn reject_empty_track() {
        let toml_str = r#"
name = "empty_track"
duration = 1.0

[[tracks]]
joint = 0
property = "Scale"
keyframes = []
"#;
        assert!(matches!(
            load_clip_from_str(toml_str),
            Err(ArmatureError::InvalidClip(_))
        ));
    }

    #[test]
    fn reject_malformed_toml() {
        assert!(matches!(
            load_clip_from_str("name = "),
            Err(ArmatureError::TomlParseError(_))
        ));
    }

    #[test]
    fn load_clip_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SLIDE.as_bytes()).unwrap();
        let clip = load_clip_from_file(file.path()).unwrap();
        assert_eq!(clip.name, "slide");
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_clip_from_file(&dir.path().join("nope.anim.toml"));
        assert!(matches!(result, Err(ArmatureError::InvalidClip(_))));
    }

    #[test]
    fn build_locomotion_tree() {
        let toml_str = r#"
[[clips]]
name = "idle"
[[clips.tracks]]
joint = 0
property = "Translation"
[[clips.tracks.keyframes]]
time = 0.0
value = [0.0, 0.0, 0.0]

[[clips]]
name = "walk"
[[clips.tracks]]
joint = 0
property = "Translation"
[[clips.tracks.keyframes]]
time = 0.0
value = [2.0, 0.0, 0.0]

[tree]
kind = "blend_1d"
parameter = 0.5

[[tree.children]]
kind = "clip"
clip = "walk"
position = [1.0, 0.0]

[[tree.children]]
kind = "clip"
clip = "idle"
position = [0.0, 0.0]
"#;
        let mut library = ClipLibrary::new();
        let mut root = load_blend_tree_from_str(toml_str, &mut library).unwrap();
        assert_eq!(library.clip_count(), 2);
        assert!(matches!(root.kind(), NodeKind::Blend1D(_)));
        // Children were sorted on insert
        assert_eq!(root.children()[0].position().x, 0.0);

        assert_eq!(root.produce_pose(0.0), BlendOutcome::Blended);
        let t = root.pose().get(JointId::from_raw(0)).unwrap();
        assert!((t.position.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn childless_blend_node_is_rejected() {
        let mut library = ClipLibrary::new();
        let result = load_blend_tree_from_str("[tree]\nkind = \"blend_1d\"\n", &mut library);
        assert!(matches!(result, Err(ArmatureError::InvalidBlendTree(_))));
    }

    #[test]
    fn unknown_clip_fails_build() {
        let toml_str = r#"
[tree]
kind = "blend_2d"

[[tree.children]]
kind = "clip"
clip = "ghost"
"#;
        let mut library = ClipLibrary::new();
        let result = load_blend_tree_from_str(toml_str, &mut library);
        assert!(matches!(result, Err(ArmatureError::ClipNotFound(_))));
    }
}
