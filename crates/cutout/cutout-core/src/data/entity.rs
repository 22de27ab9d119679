//! Entity (rig) records: character maps, per-object metadata, variables.

use hashbrown::HashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::data::animation::Animation;
use crate::json::{as_float, load_float, load_int, load_string, make_array};
use crate::math::tween;

/// Runtime value of an entity variable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VarValue {
    Int(i32),
    Float(f64),
    String(String),
}

impl VarValue {
    /// Numbers become floats, strings stay strings; anything else is `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<VarValue> {
        match value {
            serde_json::Value::Number(n) => n.as_f64().map(VarValue::Float),
            serde_json::Value::String(s) => Some(VarValue::String(s.clone())),
            _ => None,
        }
    }

    /// Numeric view; unparsable strings read as 0.
    pub fn as_f64(&self) -> f64 {
        match self {
            VarValue::Int(i) => *i as f64,
            VarValue::Float(f) => *f,
            VarValue::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        }
    }

    /// Numeric kinds interpolate; strings hold the left value.
    pub fn tween(&self, other: &VarValue, pct: f64) -> VarValue {
        match self {
            VarValue::Int(a) => VarValue::Int(tween(*a as f64, other.as_f64(), pct) as i32),
            VarValue::Float(a) => VarValue::Float(tween(*a, other.as_f64(), pct)),
            VarValue::String(_) => self.clone(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarType {
    Int,
    Float,
    String,
}

impl VarType {
    /// Coerce a value into this type.
    pub fn coerce(&self, value: &VarValue) -> VarValue {
        match self {
            VarType::Int => VarValue::Int(value.as_f64() as i32),
            VarType::Float => VarValue::Float(value.as_f64()),
            VarType::String => match value {
                VarValue::String(s) => VarValue::String(s.clone()),
                VarValue::Int(i) => VarValue::String(i.to_string()),
                VarValue::Float(f) => VarValue::String(f.to_string()),
            },
        }
    }
}

/// Named, typed variable with its default value.
#[derive(Clone, Debug, PartialEq)]
pub struct VarDef {
    pub id: i32,
    pub name: String,
    pub kind: VarType,
    pub default_value: VarValue,
}

impl VarDef {
    pub fn load(json: &serde_json::Value) -> Self {
        let id = load_int(json, "id", -1);
        let name = load_string(json, "name", "");
        let type_name = load_string(json, "type", "");
        let (kind, default_value) = match type_name.as_str() {
            "int" => (
                VarType::Int,
                VarValue::Int(load_int(json, "default_value", 0)),
            ),
            "float" => (
                VarType::Float,
                VarValue::Float(load_float(json, "default_value", 0.0)),
            ),
            "string" => (
                VarType::String,
                VarValue::String(load_string(json, "default_value", "")),
            ),
            other => {
                log::warn!("var_def '{name}' has unknown type '{other}', treating as string");
                (
                    VarType::String,
                    VarValue::String(load_string(json, "default_value", "")),
                )
            }
        };
        Self {
            id,
            name,
            kind,
            default_value,
        }
    }
}

/// Variable definitions, indexed by position (varlines refer to them by index).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VarDefs {
    pub defs: Vec<VarDef>,
}

impl VarDefs {
    /// Accepts both the array form and the `{ "i": [...] }` form.
    pub fn load(json: Option<&serde_json::Value>) -> Self {
        let items: Vec<&serde_json::Value> = match json {
            Some(serde_json::Value::Array(items)) => items.iter().collect(),
            Some(obj @ serde_json::Value::Object(_)) => make_array(obj, "i"),
            _ => Vec::new(),
        };
        Self {
            defs: items.into_iter().map(VarDef::load).collect(),
        }
    }

    pub fn get(&self, index: i32) -> Option<&VarDef> {
        usize::try_from(index).ok().and_then(|i| self.defs.get(i))
    }
}

/// One folder/file substitution of a character map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapInstruction {
    pub folder_index: i32,
    pub file_index: i32,
    pub target_folder_index: i32,
    pub target_file_index: i32,
}

impl MapInstruction {
    pub fn load(json: &serde_json::Value) -> Self {
        Self {
            folder_index: load_int(json, "folder", -1),
            file_index: load_int(json, "file", -1),
            target_folder_index: load_int(json, "target_folder", -1),
            target_file_index: load_int(json, "target_file", -1),
        }
    }
}

/// Named costume/palette swap applied to resolved sprites.
#[derive(Clone, Debug, PartialEq)]
pub struct CharacterMap {
    pub id: i32,
    pub name: String,
    pub instructions: Vec<MapInstruction>,
}

impl CharacterMap {
    pub fn load(json: &serde_json::Value) -> Self {
        Self {
            id: load_int(json, "id", -1),
            name: load_string(json, "name", ""),
            instructions: make_array(json, "map")
                .into_iter()
                .map(MapInstruction::load)
                .collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteFrame {
    pub folder_index: i32,
    pub file_index: i32,
}

/// Kind-specific part of [`ObjInfo`].
#[derive(Clone, Debug, PartialEq)]
pub enum ObjInfoKind {
    Sprite { frames: Vec<SpriteFrame> },
    Bone { w: f64, h: f64 },
    Box { w: f64, h: f64 },
    /// Kinds without static metadata, and unknown kinds.
    Generic { kind: String },
}

/// Static per-name metadata of an entity's objects.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjInfo {
    pub id: i32,
    pub name: String,
    pub var_defs: VarDefs,
    pub kind: ObjInfoKind,
}

impl ObjInfo {
    pub fn load(json: &serde_json::Value) -> Self {
        let type_name = load_string(json, "type", "");
        let kind = match type_name.as_str() {
            "sprite" => ObjInfoKind::Sprite {
                frames: make_array(json, "frames")
                    .into_iter()
                    .map(|f| SpriteFrame {
                        folder_index: load_int(f, "folder", -1),
                        file_index: load_int(f, "file", -1),
                    })
                    .collect(),
            },
            "bone" => ObjInfoKind::Bone {
                w: load_float(json, "w", 0.0),
                h: load_float(json, "h", 0.0),
            },
            "box" => ObjInfoKind::Box {
                w: load_float(json, "w", 0.0),
                h: load_float(json, "h", 0.0),
            },
            "point" | "sound" | "entity" | "variable" => ObjInfoKind::Generic { kind: type_name },
            other => {
                log::warn!("obj_info has unknown type '{other}', keeping a generic record");
                ObjInfoKind::Generic { kind: type_name }
            }
        };
        Self {
            id: load_int(json, "id", -1),
            name: load_string(json, "name", ""),
            var_defs: VarDefs::load(json.get("var_defs")),
            kind,
        }
    }

    /// Width/height for bone and box infos.
    pub fn size(&self) -> Option<(f64, f64)> {
        match &self.kind {
            ObjInfoKind::Bone { w, h } | ObjInfoKind::Box { w, h } => Some((*w, *h)),
            ObjInfoKind::Sprite { .. } | ObjInfoKind::Generic { .. } => None,
        }
    }
}

/// One animatable rig.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub id: i32,
    pub name: String,
    pub character_maps: IndexMap<String, CharacterMap>,
    pub var_defs: VarDefs,
    pub obj_infos: HashMap<String, ObjInfo>,
    /// Animations in document order; the first is the default.
    pub animations: IndexMap<String, Animation>,
}

impl Entity {
    pub fn load(json: &serde_json::Value) -> Self {
        let character_maps = make_array(json, "character_map")
            .into_iter()
            .map(CharacterMap::load)
            .map(|m| (m.name.clone(), m))
            .collect();
        let obj_infos = make_array(json, "obj_info")
            .into_iter()
            .map(ObjInfo::load)
            .map(|o| (o.name.clone(), o))
            .collect();
        let animations = make_array(json, "animation")
            .into_iter()
            .map(Animation::load)
            .map(|a| (a.name.clone(), a))
            .collect();
        Self {
            id: load_int(json, "id", -1),
            name: load_string(json, "name", ""),
            character_maps,
            var_defs: VarDefs::load(json.get("var_defs")),
            obj_infos,
            animations,
        }
    }

    /// Animation name at `index` in document order.
    pub fn animation_key(&self, index: i32) -> Option<&str> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.animations.get_index(i))
            .map(|(k, _)| k.as_str())
    }
}

/// Parse a varline/keyframe scalar: numbers (or numeric strings) are
/// floats, other strings stay strings.
pub(crate) fn load_var_value(json: &serde_json::Value, key: &str) -> Option<VarValue> {
    match json.get(key) {
        Some(serde_json::Value::String(s)) => Some(VarValue::String(s.clone())),
        Some(v) => as_float(v).map(VarValue::Float),
        None => None,
    }
}
