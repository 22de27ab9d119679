//! Animation records: the mainline, per-object timelines, and the discrete
//! tracks (soundlines, eventlines, tagline, varlines).

use serde::{Deserialize, Serialize};

use crate::curve::Curve;
use crate::data::entity::{load_var_value, VarValue};
use crate::data::keyframe::{sort_by_time, Keyframe};
use crate::data::object::{Object, ObjectKind, SoundObject};
use crate::json::{load_int, load_string, make_array};

/// Keyframe times are integral milliseconds in the document.
fn load_time(json: &serde_json::Value) -> f64 {
    load_int(json, "time", 0) as f64
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Looping {
    #[default]
    True,
    False,
    PingPong,
}

impl Looping {
    /// Accepts `"true"`, `"false"`, `"ping_pong"` or a JSON boolean.
    pub fn load(json: &serde_json::Value) -> Looping {
        match json.get("looping") {
            Some(serde_json::Value::Bool(false)) => Looping::False,
            Some(serde_json::Value::String(s)) => match s.as_str() {
                "false" => Looping::False,
                "ping_pong" => Looping::PingPong,
                _ => Looping::True,
            },
            _ => Looping::True,
        }
    }
}

/// Mainline pointer to a timeline keyframe. Bone refs leave `z_index` at 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ref {
    pub id: i32,
    /// Index into the same keyframe's bone refs, or -1.
    pub parent_index: i32,
    pub timeline_index: i32,
    pub keyframe_index: i32,
    pub z_index: i32,
}

impl Ref {
    pub fn load(json: &serde_json::Value) -> Self {
        Self {
            id: load_int(json, "id", -1),
            parent_index: load_int(json, "parent", -1),
            timeline_index: load_int(json, "timeline", -1),
            keyframe_index: load_int(json, "key", -1),
            z_index: load_int(json, "z_index", 0),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MainlineKeyframe {
    pub id: i32,
    pub time: f64,
    pub curve: Curve,
    /// Sorted by id so parents precede children.
    pub bone_refs: Vec<Ref>,
    pub object_refs: Vec<Ref>,
}

impl MainlineKeyframe {
    pub fn load(json: &serde_json::Value) -> Self {
        let mut bone_refs: Vec<Ref> = make_array(json, "bone_ref").into_iter().map(Ref::load).collect();
        bone_refs.sort_by_key(|r| r.id);
        let mut object_refs: Vec<Ref> =
            make_array(json, "object_ref").into_iter().map(Ref::load).collect();
        object_refs.sort_by_key(|r| r.id);
        Self {
            id: load_int(json, "id", -1),
            time: load_time(json),
            curve: Curve::load(json),
            bone_refs,
            object_refs,
        }
    }
}

impl Keyframe for MainlineKeyframe {
    fn time(&self) -> f64 {
        self.time
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mainline {
    pub keys: Vec<MainlineKeyframe>,
}

impl Mainline {
    pub fn load(json: Option<&serde_json::Value>) -> Self {
        let mut keys: Vec<MainlineKeyframe> = json
            .map(|j| make_array(j, "key").into_iter().map(MainlineKeyframe::load).collect())
            .unwrap_or_default();
        sort_by_time(&mut keys);
        Self { keys }
    }
}

/// Declared `object_type` of a timeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimelineKind {
    Object(ObjectKind),
    /// Kept so timeline indexes stay aligned; carries no keyframes.
    Unknown(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimelineKeyframe {
    pub id: i32,
    pub time: f64,
    /// Rotation direction towards the next keyframe: 1, -1, or 0 to hold.
    pub spin: i32,
    pub curve: Curve,
    pub object: Object,
}

impl TimelineKeyframe {
    pub fn load(kind: ObjectKind, json: &serde_json::Value) -> Self {
        // bone payloads live under "bone", everything else under "object"
        let (primary, secondary) = match kind {
            ObjectKind::Bone => ("bone", "object"),
            _ => ("object", "bone"),
        };
        let empty = serde_json::Value::Object(serde_json::Map::new());
        let payload = json
            .get(primary)
            .or_else(|| json.get(secondary))
            .unwrap_or(&empty);
        Self {
            id: load_int(json, "id", -1),
            time: load_time(json),
            spin: load_int(json, "spin", 1),
            curve: Curve::load(json),
            object: Object::load(kind, payload),
        }
    }
}

impl Keyframe for TimelineKeyframe {
    fn time(&self) -> f64 {
        self.time
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    pub id: i32,
    pub name: String,
    pub object_index: i32,
    pub kind: TimelineKind,
    pub keys: Vec<TimelineKeyframe>,
    pub meta: Option<Meta>,
}

impl Timeline {
    pub fn load(json: &serde_json::Value) -> Self {
        let name = load_string(json, "name", "");
        let type_name = load_string(json, "object_type", "sprite");
        let (kind, mut keys) = match ObjectKind::parse(&type_name) {
            Some(object_kind) => (
                TimelineKind::Object(object_kind),
                make_array(json, "key")
                    .into_iter()
                    .map(|k| TimelineKeyframe::load(object_kind, k))
                    .collect(),
            ),
            None => {
                log::warn!("timeline '{name}' has unknown object_type '{type_name}', skipping its keys");
                (TimelineKind::Unknown(type_name), Vec::new())
            }
        };
        sort_by_time(&mut keys);
        Self {
            id: load_int(json, "id", -1),
            name,
            object_index: load_int(json, "obj", -1),
            kind,
            keys,
            meta: json.get("meta").map(Meta::load),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SoundlineKeyframe {
    pub id: i32,
    pub time: f64,
    pub sound: SoundObject,
}

impl Keyframe for SoundlineKeyframe {
    fn time(&self) -> f64 {
        self.time
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Soundline {
    pub id: i32,
    pub name: String,
    pub keys: Vec<SoundlineKeyframe>,
}

impl Soundline {
    pub fn load(json: &serde_json::Value) -> Self {
        let mut keys: Vec<SoundlineKeyframe> = make_array(json, "key")
            .into_iter()
            .map(|k| SoundlineKeyframe {
                id: load_int(k, "id", -1),
                time: load_time(k),
                sound: k
                    .get("object")
                    .map(SoundObject::load)
                    .unwrap_or_else(|| SoundObject::load(&serde_json::Value::Null)),
            })
            .collect();
        sort_by_time(&mut keys);
        Self {
            id: load_int(json, "id", -1),
            name: load_string(json, "name", ""),
            keys,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EventlineKeyframe {
    pub id: i32,
    pub time: f64,
}

impl Keyframe for EventlineKeyframe {
    fn time(&self) -> f64 {
        self.time
    }
}

/// Named trigger track; crossing a key fires the line's name.
#[derive(Clone, Debug, PartialEq)]
pub struct Eventline {
    pub id: i32,
    pub name: String,
    pub keys: Vec<EventlineKeyframe>,
}

impl Eventline {
    pub fn load(json: &serde_json::Value) -> Self {
        let mut keys: Vec<EventlineKeyframe> = make_array(json, "key")
            .into_iter()
            .map(|k| EventlineKeyframe {
                id: load_int(k, "id", -1),
                time: load_time(k),
            })
            .collect();
        sort_by_time(&mut keys);
        Self {
            id: load_int(json, "id", -1),
            name: load_string(json, "name", ""),
            keys,
        }
    }
}

/// Reference into the project's tag definitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tag {
    pub id: i32,
    pub tag_def_index: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TaglineKeyframe {
    pub id: i32,
    pub time: f64,
    pub tags: Vec<Tag>,
}

impl Keyframe for TaglineKeyframe {
    fn time(&self) -> f64 {
        self.time
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tagline {
    pub keys: Vec<TaglineKeyframe>,
}

impl Tagline {
    pub fn load(json: &serde_json::Value) -> Self {
        let mut keys: Vec<TaglineKeyframe> = make_array(json, "key")
            .into_iter()
            .map(|k| TaglineKeyframe {
                id: load_int(k, "id", -1),
                time: load_time(k),
                tags: make_array(k, "tag")
                    .into_iter()
                    .map(|t| Tag {
                        id: load_int(t, "id", -1),
                        tag_def_index: load_int(t, "t", -1),
                    })
                    .collect(),
            })
            .collect();
        sort_by_time(&mut keys);
        Self { keys }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VarlineKeyframe {
    pub id: i32,
    pub time: f64,
    /// `None` when the document held neither a number nor a string.
    pub value: Option<VarValue>,
}

impl Keyframe for VarlineKeyframe {
    fn time(&self) -> f64 {
        self.time
    }
}

/// Keyed values of one variable definition.
#[derive(Clone, Debug, PartialEq)]
pub struct Varline {
    pub id: i32,
    pub var_def_index: i32,
    pub keys: Vec<VarlineKeyframe>,
}

impl Varline {
    pub fn load(json: &serde_json::Value) -> Self {
        let mut keys: Vec<VarlineKeyframe> = make_array(json, "key")
            .into_iter()
            .map(|k| VarlineKeyframe {
                id: load_int(k, "id", -1),
                time: load_time(k),
                value: load_var_value(k, "val"),
            })
            .collect();
        sort_by_time(&mut keys);
        Self {
            id: load_int(json, "id", -1),
            var_def_index: load_int(json, "def", -1),
            keys,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Meta {
    pub tagline: Tagline,
    pub varlines: Vec<Varline>,
}

impl Meta {
    pub fn load(json: &serde_json::Value) -> Self {
        let tagline = json.get("tagline").map(Tagline::load).unwrap_or_default();
        // some exporters spell it "valline"
        let key = if json.get("varline").is_some() {
            "varline"
        } else {
            "valline"
        };
        let varlines = make_array(json, key).into_iter().map(Varline::load).collect();
        Self { tagline, varlines }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    pub id: i32,
    pub name: String,
    pub length: f64,
    pub looping: Looping,
    pub loop_to: f64,
    pub mainline: Mainline,
    pub timelines: Vec<Timeline>,
    pub soundlines: Vec<Soundline>,
    pub eventlines: Vec<Eventline>,
    pub meta: Option<Meta>,
    pub min_time: f64,
    pub max_time: f64,
}

impl Animation {
    pub fn load(json: &serde_json::Value) -> Self {
        let length = load_int(json, "length", 0) as f64;
        Self {
            id: load_int(json, "id", -1),
            name: load_string(json, "name", ""),
            length,
            looping: Looping::load(json),
            loop_to: load_int(json, "loop_to", 0) as f64,
            mainline: Mainline::load(json.get("mainline")),
            timelines: make_array(json, "timeline").into_iter().map(Timeline::load).collect(),
            soundlines: make_array(json, "soundline").into_iter().map(Soundline::load).collect(),
            eventlines: make_array(json, "eventline").into_iter().map(Eventline::load).collect(),
            meta: json.get("meta").map(Meta::load),
            min_time: 0.0,
            max_time: length,
        }
    }

    pub fn timeline(&self, index: i32) -> Option<&Timeline> {
        usize::try_from(index).ok().and_then(|i| self.timelines.get(i))
    }
}
