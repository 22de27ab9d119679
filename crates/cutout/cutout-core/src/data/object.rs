//! Object payloads carried by timeline keyframes and by a resolved pose.
//!
//! Seven kinds exist. Every dispatch over them is an exhaustive `match`, so
//! adding a kind fails to compile until each site handles it.

use serde::{Deserialize, Serialize};

use crate::data::entity::VarValue;
use crate::json::{load_bool, load_float, load_int};
use crate::math::{tween, Angle, Space, Vector};

/// Discriminant of [`Object`]; also the `object_type` of a timeline.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Sprite,
    Bone,
    Box,
    Point,
    Sound,
    Entity,
    Variable,
}

impl ObjectKind {
    pub fn parse(name: &str) -> Option<ObjectKind> {
        match name {
            "sprite" => Some(ObjectKind::Sprite),
            "bone" => Some(ObjectKind::Bone),
            "box" => Some(ObjectKind::Box),
            "point" => Some(ObjectKind::Point),
            "sound" => Some(ObjectKind::Sound),
            "entity" => Some(ObjectKind::Entity),
            "variable" => Some(ObjectKind::Variable),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Sprite => "sprite",
            ObjectKind::Bone => "bone",
            ObjectKind::Box => "box",
            ObjectKind::Point => "point",
            ObjectKind::Sound => "sound",
            ObjectKind::Entity => "entity",
            ObjectKind::Variable => "variable",
        }
    }
}

/// Read `x`, `y`, `angle` (degrees), `scale_x`, `scale_y`.
pub fn load_space(json: &serde_json::Value) -> Space {
    Space {
        position: Vector::new(load_float(json, "x", 0.0), load_float(json, "y", 0.0)),
        rotation: Angle::from_deg(load_float(json, "angle", 0.0)),
        scale: Vector::new(
            load_float(json, "scale_x", 1.0),
            load_float(json, "scale_y", 1.0),
        ),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteObject {
    pub folder_index: i32,
    pub file_index: i32,
    pub local_space: Space,
    pub world_space: Space,
    /// Pivot was absent in the document and comes from the image file.
    pub default_pivot: bool,
    pub pivot: Vector,
    pub z_index: i32,
    pub alpha: f64,
}

impl SpriteObject {
    pub fn load(json: &serde_json::Value) -> Self {
        let local_space = load_space(json);
        let has_pivot = json.get("pivot_x").is_some() || json.get("pivot_y").is_some();
        Self {
            folder_index: load_int(json, "folder", -1),
            file_index: load_int(json, "file", -1),
            local_space,
            world_space: local_space,
            default_pivot: !has_pivot,
            pivot: if has_pivot {
                Vector::new(
                    load_float(json, "pivot_x", 0.0),
                    load_float(json, "pivot_y", 0.0),
                )
            } else {
                Vector::default()
            },
            z_index: load_int(json, "z_index", 0),
            alpha: load_float(json, "a", 1.0),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoneObject {
    pub local_space: Space,
    pub world_space: Space,
}

impl BoneObject {
    pub fn load(json: &serde_json::Value) -> Self {
        let local_space = load_space(json);
        Self {
            local_space,
            world_space: local_space,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxObject {
    pub local_space: Space,
    pub world_space: Space,
    pub pivot: Vector,
}

impl BoxObject {
    pub fn load(json: &serde_json::Value) -> Self {
        let local_space = load_space(json);
        Self {
            local_space,
            world_space: local_space,
            pivot: Vector::new(
                load_float(json, "pivot_x", 0.0),
                load_float(json, "pivot_y", 0.0),
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointObject {
    pub local_space: Space,
    pub world_space: Space,
}

impl PointObject {
    pub fn load(json: &serde_json::Value) -> Self {
        let local_space = load_space(json);
        Self {
            local_space,
            world_space: local_space,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SoundObject {
    pub folder_index: i32,
    pub file_index: i32,
    pub trigger: bool,
    pub volume: f64,
    pub panning: f64,
}

impl SoundObject {
    pub fn load(json: &serde_json::Value) -> Self {
        Self {
            folder_index: load_int(json, "folder", -1),
            file_index: load_int(json, "file", -1),
            trigger: load_bool(json, "trigger", false),
            volume: load_float(json, "volume", 1.0),
            panning: load_float(json, "panning", 0.0),
        }
    }
}

/// Nested rig instance: which entity/animation to play and how far into it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityObject {
    pub local_space: Space,
    pub world_space: Space,
    pub entity_index: i32,
    pub animation_index: i32,
    /// Fraction [0,1] of the sub-animation's length.
    pub animation_time: f64,
}

impl EntityObject {
    pub fn load(json: &serde_json::Value) -> Self {
        let local_space = load_space(json);
        Self {
            local_space,
            world_space: local_space,
            entity_index: load_int(json, "entity", -1),
            animation_index: load_int(json, "animation", -1),
            animation_time: load_float(json, "t", 0.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariableObject {
    pub value: VarValue,
}

impl VariableObject {
    pub fn load(json: &serde_json::Value) -> Self {
        let value = json
            .get("val")
            .and_then(VarValue::from_json)
            .unwrap_or(VarValue::Float(0.0));
        Self { value }
    }
}

/// Polymorphic object payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Object {
    Sprite(SpriteObject),
    Bone(BoneObject),
    Box(BoxObject),
    Point(PointObject),
    Sound(SoundObject),
    Entity(EntityObject),
    Variable(VariableObject),
}

impl Object {
    pub fn load(kind: ObjectKind, json: &serde_json::Value) -> Object {
        match kind {
            ObjectKind::Sprite => Object::Sprite(SpriteObject::load(json)),
            ObjectKind::Bone => Object::Bone(BoneObject::load(json)),
            ObjectKind::Box => Object::Box(BoxObject::load(json)),
            ObjectKind::Point => Object::Point(PointObject::load(json)),
            ObjectKind::Sound => Object::Sound(SoundObject::load(json)),
            ObjectKind::Entity => Object::Entity(EntityObject::load(json)),
            ObjectKind::Variable => Object::Variable(VariableObject::load(json)),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            Object::Sprite(_) => ObjectKind::Sprite,
            Object::Bone(_) => ObjectKind::Bone,
            Object::Box(_) => ObjectKind::Box,
            Object::Point(_) => ObjectKind::Point,
            Object::Sound(_) => ObjectKind::Sound,
            Object::Entity(_) => ObjectKind::Entity,
            Object::Variable(_) => ObjectKind::Variable,
        }
    }

    /// Local space of spatial kinds.
    pub fn local_space(&self) -> Option<&Space> {
        match self {
            Object::Sprite(o) => Some(&o.local_space),
            Object::Bone(o) => Some(&o.local_space),
            Object::Box(o) => Some(&o.local_space),
            Object::Point(o) => Some(&o.local_space),
            Object::Entity(o) => Some(&o.local_space),
            Object::Sound(_) | Object::Variable(_) => None,
        }
    }

    /// World space of spatial kinds, valid after a resolve.
    pub fn world_space(&self) -> Option<&Space> {
        match self {
            Object::Sprite(o) => Some(&o.world_space),
            Object::Bone(o) => Some(&o.world_space),
            Object::Box(o) => Some(&o.world_space),
            Object::Point(o) => Some(&o.world_space),
            Object::Entity(o) => Some(&o.world_space),
            Object::Sound(_) | Object::Variable(_) => None,
        }
    }

    /// Move `self` (a copy of the left keyframe) towards `other` by `pct`.
    /// Mismatched kinds leave `self` untouched (prefer left).
    pub fn tween(&mut self, other: &Object, pct: f64, spin: i32) {
        match (self, other) {
            (Object::Sprite(a), Object::Sprite(b)) => {
                a.local_space = Space::tween(&a.local_space, &b.local_space, pct, spin);
                if !a.default_pivot {
                    a.pivot = a.pivot.tween(b.pivot, pct);
                }
                a.alpha = tween(a.alpha, b.alpha, pct);
            }
            (Object::Bone(a), Object::Bone(b)) => {
                a.local_space = Space::tween(&a.local_space, &b.local_space, pct, spin);
            }
            (Object::Box(a), Object::Box(b)) => {
                a.local_space = Space::tween(&a.local_space, &b.local_space, pct, spin);
            }
            (Object::Point(a), Object::Point(b)) => {
                a.local_space = Space::tween(&a.local_space, &b.local_space, pct, spin);
            }
            (Object::Sound(a), Object::Sound(b)) => {
                a.volume = tween(a.volume, b.volume, pct);
                a.panning = tween(a.panning, b.panning, pct);
            }
            (Object::Entity(a), Object::Entity(b)) => {
                a.local_space = Space::tween(&a.local_space, &b.local_space, pct, spin);
                a.animation_time = tween(a.animation_time, b.animation_time, pct);
            }
            (Object::Variable(a), Object::Variable(b)) => {
                a.value = a.value.tween(&b.value, pct);
            }
            _ => {}
        }
    }
}
