//! Per-instance playback state bound to one shared [`Data`].
//!
//! A pose is a lazy cursor: [`Pose::advance`] and the setters only record
//! what changed and mark the pose dirty; [`Pose::resolve`] integrates time
//! and recomputes every output in one pass. Outputs live in arrays that are
//! truncated and overwritten in place across resolves.

mod strike;

use std::sync::Arc;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::data::{Animation, BoneObject, Data, Entity, Object, VarValue};
use crate::math::wrap;

/// A resolved bone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseBone {
    /// Name of the driving timeline.
    pub name: String,
    /// Index into the resolved bones, or -1.
    pub parent_index: i32,
    pub bone: BoneObject,
}

/// A resolved object of any kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseObject {
    pub name: String,
    /// Index into the resolved bones, or -1.
    pub parent_index: i32,
    /// Draw order from the mainline reference.
    pub z_index: i32,
    pub object: Object,
}

/// A sound whose soundline keyframe was crossed by the last resolve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FiredSound {
    /// Name of the referenced sound file.
    pub name: String,
    pub volume: f64,
    pub panning: f64,
}

/// Playback cursor and resolved output of one rig instance.
#[derive(Debug)]
pub struct Pose {
    data: Arc<Data>,
    config: Config,
    /// Nesting level; 0 for a host-created pose.
    depth: usize,

    entity_key: String,
    character_map_keys: Vec<String>,
    anim_key: String,
    time: f64,
    elapsed_time: f64,
    dirty: bool,

    bones: Vec<PoseBone>,
    objects: Vec<PoseObject>,
    /// Child poses of entity objects, by object slot.
    sub_poses: Vec<Option<Box<Pose>>>,
    /// The depth guard already warned for this pose.
    depth_warned: bool,
    sounds: Vec<FiredSound>,
    events: Vec<String>,
    tags: Vec<String>,
    vars: HashMap<String, VarValue>,
}

impl Pose {
    pub fn new(data: Arc<Data>, config: Config) -> Self {
        Self::with_depth(data, config, 0)
    }

    fn with_depth(data: Arc<Data>, config: Config, depth: usize) -> Self {
        let bones = Vec::with_capacity(config.bone_capacity);
        let objects = Vec::with_capacity(config.object_capacity);
        Self {
            data,
            config,
            depth,
            entity_key: String::new(),
            character_map_keys: Vec::new(),
            anim_key: String::new(),
            time: 0.0,
            elapsed_time: 0.0,
            dirty: true,
            bones,
            objects,
            sub_poses: Vec::new(),
            depth_warned: false,
            sounds: Vec::new(),
            events: Vec::new(),
            tags: Vec::new(),
            vars: HashMap::new(),
        }
    }

    pub fn data(&self) -> &Arc<Data> {
        &self.data
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ---------- entity / animation selection ----------

    pub fn entity_keys(&self) -> impl Iterator<Item = &str> {
        self.data.entity_keys()
    }

    pub fn entity_key(&self) -> &str {
        &self.entity_key
    }

    pub fn cur_entity(&self) -> Option<&Entity> {
        self.data.entity(&self.entity_key)
    }

    /// Switch rigs. Clears the animation, time and resolved outputs.
    pub fn set_entity(&mut self, key: &str) {
        if self.entity_key == key {
            return;
        }
        self.entity_key = key.to_string();
        self.anim_key.clear();
        self.time = 0.0;
        self.dirty = true;
        self.bones.clear();
        self.objects.clear();
        self.sub_poses.clear();
    }

    /// Animation names of the current entity.
    pub fn anim_keys(&self) -> impl Iterator<Item = &str> {
        self.data.anim_keys(&self.entity_key)
    }

    pub fn anim_key(&self) -> &str {
        &self.anim_key
    }

    pub fn cur_anim(&self) -> Option<&Animation> {
        self.data.anim(&self.entity_key, &self.anim_key)
    }

    /// Length of the current animation; 0 when there is none.
    pub fn cur_anim_length(&self) -> f64 {
        self.cur_anim().map(|a| a.length).unwrap_or(0.0)
    }

    /// Switch animations, keeping the current time wrapped into the new
    /// animation's range and dropping pending elapsed time.
    pub fn set_anim(&mut self, key: &str) {
        if self.anim_key == key {
            return;
        }
        self.anim_key = key.to_string();
        if let Some((min, max)) = self.cur_anim().map(|a| (a.min_time, a.max_time)) {
            self.time = wrap(self.time, min, max);
        } else {
            log::debug!("entity '{}' has no animation '{key}'", self.entity_key);
        }
        self.elapsed_time = 0.0;
        self.dirty = true;
    }

    // ---------- time ----------

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Jump to `time` (wrapped). A jump never fires events.
    pub fn set_time(&mut self, time: f64) {
        let time = match self.cur_anim() {
            Some(anim) => wrap(time, anim.min_time, anim.max_time),
            None => time,
        };
        if self.time != time {
            self.time = time;
            self.elapsed_time = 0.0;
            self.dirty = true;
        }
    }

    /// Accumulate `dt`; integration happens in the next resolve. Negative
    /// steps play backward.
    pub fn advance(&mut self, dt: f64) {
        self.elapsed_time += dt;
        self.dirty = true;
    }

    /// Time accumulated since the last resolve.
    pub fn pending_elapsed(&self) -> f64 {
        self.elapsed_time
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // ---------- character maps ----------

    pub fn character_map_keys(&self) -> &[String] {
        &self.character_map_keys
    }

    /// Replace the active character maps, applied in the given order.
    pub fn set_character_maps<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.character_map_keys = keys.into_iter().map(Into::into).collect();
        self.dirty = true;
    }

    pub fn add_character_map(&mut self, key: &str) {
        if !self.character_map_keys.iter().any(|k| k == key) {
            self.character_map_keys.push(key.to_string());
            self.dirty = true;
        }
    }

    pub fn remove_character_map(&mut self, key: &str) {
        let before = self.character_map_keys.len();
        self.character_map_keys.retain(|k| k != key);
        if self.character_map_keys.len() != before {
            self.dirty = true;
        }
    }

    pub fn clear_character_maps(&mut self) {
        if !self.character_map_keys.is_empty() {
            self.character_map_keys.clear();
            self.dirty = true;
        }
    }

    // ---------- outputs ----------

    pub fn bones(&self) -> &[PoseBone] {
        &self.bones
    }

    pub fn objects(&self) -> &[PoseObject] {
        &self.objects
    }

    /// Sounds fired by the last resolve.
    pub fn sounds(&self) -> &[FiredSound] {
        &self.sounds
    }

    /// Eventline names fired by the last resolve.
    pub fn events(&self) -> &[String] {
        &self.events
    }

    /// Active tag names, sorted. Replaced whenever a tagline key fires.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn vars(&self) -> &HashMap<String, VarValue> {
        &self.vars
    }

    pub fn var(&self, name: &str) -> Option<&VarValue> {
        self.vars.get(name)
    }

    /// Child pose driven by the entity object in slot `object_index`.
    pub fn sub_pose(&self, object_index: usize) -> Option<&Pose> {
        self.sub_poses.get(object_index)?.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_pose() -> Pose {
        Pose::new(Arc::new(Data::default()), Config::default())
    }

    #[test]
    fn starts_dirty_and_unbound() {
        let pose = empty_pose();
        assert!(pose.is_dirty());
        assert_eq!(pose.entity_key(), "");
        assert_eq!(pose.cur_anim_length(), 0.0);
        assert!(pose.bones().is_empty());
    }

    #[test]
    fn advance_only_accumulates() {
        let mut pose = empty_pose();
        pose.advance(10.0);
        pose.advance(-4.0);
        assert_eq!(pose.time(), 0.0);
        assert_eq!(pose.pending_elapsed(), 6.0);
    }

    #[test]
    fn character_map_changes_mark_dirty() {
        let mut pose = empty_pose();
        pose.resolve().unwrap();
        assert!(!pose.is_dirty());
        pose.add_character_map("red");
        assert!(pose.is_dirty());
        pose.resolve().unwrap();
        pose.add_character_map("red");
        assert!(!pose.is_dirty());
        pose.remove_character_map("blue");
        assert!(!pose.is_dirty());
        pose.remove_character_map("red");
        assert!(pose.is_dirty());
        assert!(pose.character_map_keys().is_empty());
    }

    #[test]
    fn set_entity_resets_cursor() {
        let mut pose = empty_pose();
        pose.set_time(250.0);
        pose.set_anim("walk");
        pose.set_entity("hero");
        assert_eq!(pose.anim_key(), "");
        assert_eq!(pose.time(), 0.0);
        pose.resolve().unwrap();
        pose.set_entity("hero");
        assert!(!pose.is_dirty());
    }
}
