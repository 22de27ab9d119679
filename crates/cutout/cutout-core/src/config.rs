//! Core configuration for cutout-core.

use serde::{Deserialize, Serialize};

/// Configuration for document normalization and pose sizing.
/// Passed explicitly to the loader and to every pose; there is no global.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Negate bone keyframe angles while mirroring the source Y axis.
    /// Object keyframe angles are always negated.
    pub mirror_bone_angle: bool,

    /// Deepest chain of nested sub-entity poses a pose will drive.
    pub max_sub_entity_depth: usize,

    /// Initial capacity hints for the resolved bone/object arrays.
    pub bone_capacity: usize,
    pub object_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mirror_bone_angle: true,
            max_sub_entity_depth: 16,
            bone_capacity: 32,
            object_capacity: 64,
        }
    }
}
