//! Immutable in-memory model of one parsed project.
//!
//! Built once by [`Data::load`] (usually through [`crate::load_project`])
//! and then shared read-only, typically behind an `Arc`, by any number of
//! [`crate::Pose`] instances.

pub mod animation;
pub mod entity;
pub mod keyframe;
pub mod object;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::json::{load_float, load_int, load_string, make_array};
use crate::math::Vector;

pub use animation::{
    Animation, Eventline, EventlineKeyframe, Looping, Mainline, MainlineKeyframe, Meta, Ref,
    Soundline, SoundlineKeyframe, Tag, Tagline, TaglineKeyframe, Timeline, TimelineKeyframe,
    TimelineKind, Varline, VarlineKeyframe,
};
pub use entity::{
    CharacterMap, Entity, MapInstruction, ObjInfo, ObjInfoKind, SpriteFrame, VarDef, VarDefs,
    VarType, VarValue,
};
pub use keyframe::{find, Keyframe};
pub use object::{
    BoneObject, BoxObject, EntityObject, Object, ObjectKind, PointObject, SoundObject,
    SpriteObject, VariableObject,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageFile {
    pub id: i32,
    pub name: String,
    pub width: f64,
    pub height: f64,
    /// Normalized anchor, already in this crate's Y-up convention.
    pub pivot: Vector,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SoundFile {
    pub id: i32,
    pub name: String,
}

/// Asset reference. Anything not typed `sound` is an image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum File {
    Image(ImageFile),
    Sound(SoundFile),
}

impl File {
    pub fn load(json: &serde_json::Value) -> File {
        let id = load_int(json, "id", -1);
        let name = load_string(json, "name", "");
        match load_string(json, "type", "image").as_str() {
            "sound" => File::Sound(SoundFile { id, name }),
            other => {
                if other != "image" {
                    log::warn!("file '{name}' has unknown type '{other}', loading as image");
                }
                File::Image(ImageFile {
                    id,
                    name,
                    width: load_int(json, "width", 0) as f64,
                    height: load_int(json, "height", 0) as f64,
                    pivot: Vector::new(
                        load_float(json, "pivot_x", 0.0),
                        load_float(json, "pivot_y", 0.0),
                    ),
                })
            }
        }
    }

    pub fn name(&self) -> &str {
        match self {
            File::Image(f) => &f.name,
            File::Sound(f) => &f.name,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Folder {
    pub id: i32,
    pub name: String,
    pub files: Vec<File>,
}

impl Folder {
    pub fn load(json: &serde_json::Value) -> Self {
        Self {
            id: load_int(json, "id", -1),
            name: load_string(json, "name", ""),
            files: make_array(json, "file").into_iter().map(File::load).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagDef {
    pub id: i32,
    pub name: String,
}

/// One parsed project.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Data {
    pub scon_version: String,
    pub generator: String,
    pub generator_version: String,
    pub folders: Vec<Folder>,
    pub tag_defs: Vec<TagDef>,
    /// Entities by name, in document order.
    pub entities: IndexMap<String, Entity>,
}

impl Data {
    /// Build the model from an already normalized document. Never fails;
    /// missing or mistyped fields take their defaults.
    pub fn load(json: &serde_json::Value) -> Data {
        let mut data = Data {
            scon_version: load_string(json, "scon_version", ""),
            generator: load_string(json, "generator", ""),
            generator_version: load_string(json, "generator_version", ""),
            folders: make_array(json, "folder").into_iter().map(Folder::load).collect(),
            tag_defs: make_array(json, "tag_list")
                .into_iter()
                .map(|t| TagDef {
                    id: load_int(t, "id", -1),
                    name: load_string(t, "name", ""),
                })
                .collect(),
            entities: make_array(json, "entity")
                .into_iter()
                .map(Entity::load)
                .map(|e| (e.name.clone(), e))
                .collect(),
        };
        data.patch_default_pivots();
        data
    }

    /// Give sprite keyframes without an explicit pivot the pivot of the
    /// image they show, so resolution never consults files for it.
    fn patch_default_pivots(&mut self) {
        let folders = &self.folders;
        for entity in self.entities.values_mut() {
            for animation in entity.animations.values_mut() {
                for timeline in &mut animation.timelines {
                    for key in &mut timeline.keys {
                        let Object::Sprite(sprite) = &mut key.object else {
                            continue;
                        };
                        if !sprite.default_pivot {
                            continue;
                        }
                        if let Some(File::Image(image)) =
                            file_at(folders, sprite.folder_index, sprite.file_index)
                        {
                            sprite.pivot = image.pivot;
                        }
                    }
                }
            }
        }
    }

    pub fn entity(&self, key: &str) -> Option<&Entity> {
        self.entities.get(key)
    }

    /// Entity name at `index` in document order.
    pub fn entity_key(&self, index: i32) -> Option<&str> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.entities.get_index(i))
            .map(|(k, _)| k.as_str())
    }

    pub fn entity_keys(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    pub fn anim(&self, entity_key: &str, anim_key: &str) -> Option<&Animation> {
        self.entity(entity_key)?.animations.get(anim_key)
    }

    /// Animation names of an entity; empty for unknown entities.
    pub fn anim_keys<'a>(&'a self, entity_key: &str) -> impl Iterator<Item = &'a str> {
        self.entity(entity_key)
            .into_iter()
            .flat_map(|e| e.animations.keys().map(String::as_str))
    }

    pub fn file(&self, folder_index: i32, file_index: i32) -> Option<&File> {
        file_at(&self.folders, folder_index, file_index)
    }

    pub fn tag_def(&self, index: i32) -> Option<&TagDef> {
        usize::try_from(index).ok().and_then(|i| self.tag_defs.get(i))
    }
}

fn file_at(folders: &[Folder], folder_index: i32, file_index: i32) -> Option<&File> {
    let folder = folders.get(usize::try_from(folder_index).ok()?)?;
    folder.files.get(usize::try_from(file_index).ok()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_pivot_comes_from_file() {
        let doc = json!({
            "folder": [{ "id": 0, "file": [
                { "id": 0, "name": "a.png", "width": 10, "height": 20, "pivot_x": 0.25, "pivot_y": 0.75 }
            ]}],
            "entity": { "name": "e", "animation": {
                "name": "a", "length": 100,
                "timeline": { "object_type": "sprite", "key": [
                    { "time": 0, "object": { "folder": 0, "file": 0 } },
                    { "time": 50, "object": { "folder": 0, "file": 0, "pivot_x": 0, "pivot_y": 0 } },
                    { "time": 60, "object": { "folder": 3, "file": 0 } }
                ]}
            }}
        });
        let data = Data::load(&doc);
        let timeline = &data.anim("e", "a").expect("anim").timelines[0];
        let pivots: Vec<Vector> = timeline
            .keys
            .iter()
            .map(|k| match &k.object {
                Object::Sprite(s) => s.pivot,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(pivots[0], Vector::new(0.25, 0.75));
        assert_eq!(pivots[1], Vector::new(0.0, 0.0));
        assert_eq!(pivots[2], Vector::new(0.0, 0.0));
    }

    #[test]
    fn lookups_tolerate_bad_indexes() {
        let data = Data::load(&json!({
            "folder": { "file": { "type": "sound", "name": "step.wav" } },
            "entity": [{ "name": "first" }, { "name": "second" }]
        }));
        assert_eq!(data.file(0, 0).map(File::name), Some("step.wav"));
        assert!(data.file(-1, 0).is_none());
        assert!(data.file(0, 5).is_none());
        assert_eq!(data.entity_key(1), Some("second"));
        assert_eq!(data.entity_key(2), None);
        assert_eq!(data.anim_keys("missing").count(), 0);
    }
}
