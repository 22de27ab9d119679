//! The resolve pass: time integration, mainline/timeline sampling, world
//! space composition, sub-entities, then discrete tracks.

use std::sync::Arc;

use super::{FiredSound, Pose, PoseBone, PoseObject};
use crate::data::{
    find, Animation, Data, Entity, ObjInfo, Object, Ref, Tagline, Timeline, TimelineKeyframe,
    TimelineKind, VarType, VarValue, Varline,
};
use crate::error::CutoutError;
use crate::math::{tween, wrap, Space};
use crate::window::EventWindow;
use crate::Result;

impl Pose {
    /// Integrate pending time and recompute every output. No-op unless
    /// something changed since the last call.
    ///
    /// Missing entities, animations and assets resolve to nothing. A
    /// mainline reference to an unknown timeline kind, or past the end of
    /// the timeline/keyframe arrays, aborts with an error.
    pub fn resolve(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        self.dirty = false;
        // fired outputs describe this step only, even when it resolves nothing
        self.sounds.clear();
        self.events.clear();

        let data = Arc::clone(&self.data);
        let Some(entity) = data.entity(&self.entity_key) else {
            log::debug!("pose has no entity '{}' to resolve", self.entity_key);
            self.time += self.elapsed_time;
            self.elapsed_time = 0.0;
            return Ok(());
        };

        for def in &entity.var_defs.defs {
            if !self.vars.contains_key(&def.name) {
                self.vars.insert(def.name.clone(), def.default_value.clone());
            }
        }

        let prev_time = self.time;
        let elapsed = self.elapsed_time;
        self.time += elapsed;
        self.elapsed_time = 0.0;

        let Some(anim) = entity.animations.get(&self.anim_key) else {
            log::debug!(
                "entity '{}' has no animation '{}' to resolve",
                self.entity_key,
                self.anim_key
            );
            return Ok(());
        };

        let wrapped_min = elapsed < 0.0 && self.time <= anim.min_time;
        let wrapped_max = elapsed > 0.0 && self.time >= anim.max_time;
        self.time = wrap(self.time, anim.min_time, anim.max_time);
        let window = EventWindow {
            prev_time,
            time: self.time,
            elapsed,
            wrapped: wrapped_min || wrapped_max,
            min_time: anim.min_time,
            max_time: anim.max_time,
        };

        if let Some((key_index, mainline_time)) = mainline_cursor(anim, self.time) {
            let key = &anim.mainline.keys[key_index];
            self.resolve_bones(anim, &key.bone_refs, mainline_time)?;
            self.resolve_objects(anim, &key.object_refs, mainline_time)?;
            self.apply_character_maps(entity);
            self.resolve_object_world_spaces(entity);
            self.resolve_sub_poses(&data)?;
        }

        self.fire_sounds(&data, anim, &window);
        self.fire_events(anim, &window);
        if let Some(meta) = &anim.meta {
            self.fire_tags(&data, &meta.tagline, &window);
            self.update_vars(entity, anim, &meta.varlines);
        }
        Ok(())
    }

    fn resolve_bones(&mut self, anim: &Animation, refs: &[Ref], mainline_time: f64) -> Result<()> {
        self.bones.truncate(refs.len());
        for (index, bone_ref) in refs.iter().enumerate() {
            let (timeline, key1, key2, pct) = bracket(anim, bone_ref, mainline_time)?;
            let (Object::Bone(a), Object::Bone(b)) = (&key1.object, &key2.object) else {
                return Err(CutoutError::BrokenReference {
                    animation: anim.name.clone(),
                    what: "bone timeline",
                    index: bone_ref.timeline_index,
                });
            };
            let local_space = Space::tween(&a.local_space, &b.local_space, pct, key1.spin);
            if index == self.bones.len() {
                self.bones.push(PoseBone::default());
            }
            let slot = &mut self.bones[index];
            slot.name.clone_from(&timeline.name);
            slot.parent_index = bone_ref.parent_index;
            slot.bone.local_space = local_space;
        }

        // refs are id-sorted, so a well-formed parent is already resolved
        for index in 0..self.bones.len() {
            let parent = usize::try_from(self.bones[index].parent_index)
                .ok()
                .filter(|&p| p < index);
            let local = self.bones[index].bone.local_space;
            self.bones[index].bone.world_space = match parent {
                Some(p) => Space::combine(&self.bones[p].bone.world_space, &local),
                None => local,
            };
        }
        Ok(())
    }

    fn resolve_objects(
        &mut self,
        anim: &Animation,
        refs: &[Ref],
        mainline_time: f64,
    ) -> Result<()> {
        self.objects.truncate(refs.len());
        self.sub_poses.truncate(refs.len());
        for (index, object_ref) in refs.iter().enumerate() {
            let (timeline, key1, key2, pct) = bracket(anim, object_ref, mainline_time)?;
            let mut object = key1.object.clone();
            object.tween(&key2.object, pct, key1.spin);
            match self.objects.get_mut(index) {
                Some(slot) => {
                    slot.name.clone_from(&timeline.name);
                    slot.parent_index = object_ref.parent_index;
                    slot.z_index = object_ref.z_index;
                    slot.object = object;
                }
                None => self.objects.push(PoseObject {
                    name: timeline.name.clone(),
                    parent_index: object_ref.parent_index,
                    z_index: object_ref.z_index,
                    object,
                }),
            }
        }
        Ok(())
    }

    fn apply_character_maps(&mut self, entity: &Entity) {
        for key in &self.character_map_keys {
            let Some(map) = entity.character_maps.get(key) else {
                log::debug!("entity '{}' has no character map '{key}'", entity.name);
                continue;
            };
            for instruction in &map.instructions {
                for slot in &mut self.objects {
                    match &mut slot.object {
                        Object::Sprite(sprite) => {
                            if sprite.folder_index == instruction.folder_index
                                && sprite.file_index == instruction.file_index
                            {
                                sprite.folder_index = instruction.target_folder_index;
                                sprite.file_index = instruction.target_file_index;
                            }
                        }
                        Object::Bone(_)
                        | Object::Box(_)
                        | Object::Point(_)
                        | Object::Sound(_)
                        | Object::Entity(_)
                        | Object::Variable(_) => {}
                    }
                }
            }
        }
    }

    fn resolve_object_world_spaces(&mut self, entity: &Entity) {
        let bones = &self.bones;
        for slot in &mut self.objects {
            let parent = usize::try_from(slot.parent_index)
                .ok()
                .and_then(|i| bones.get(i))
                .map(|b| b.bone.world_space);
            let attach = |local: &Space| match &parent {
                Some(p) => Space::combine(p, local),
                None => *local,
            };
            match &mut slot.object {
                Object::Sprite(o) => o.world_space = attach(&o.local_space),
                Object::Bone(o) => o.world_space = attach(&o.local_space),
                Object::Box(o) => {
                    o.world_space = attach(&o.local_space);
                    // boxes anchor at their center, not their pivot
                    if let Some((w, h)) = entity.obj_infos.get(&slot.name).and_then(ObjInfo::size) {
                        o.world_space
                            .translate((0.5 - o.pivot.x) * w, (0.5 - o.pivot.y) * h);
                    }
                }
                Object::Point(o) => o.world_space = attach(&o.local_space),
                Object::Entity(o) => o.world_space = attach(&o.local_space),
                Object::Sound(_) | Object::Variable(_) => {}
            }
        }
    }

    fn resolve_sub_poses(&mut self, data: &Arc<Data>) -> Result<()> {
        self.sub_poses.resize_with(self.objects.len(), || None);
        let depth = self.depth + 1;
        for index in 0..self.objects.len() {
            let Object::Entity(entity_object) = &self.objects[index].object else {
                self.sub_poses[index] = None;
                continue;
            };
            let (entity_index, animation_index, fraction) = (
                entity_object.entity_index,
                entity_object.animation_index,
                entity_object.animation_time,
            );
            if depth > self.config.max_sub_entity_depth {
                if self.depth_warned {
                    log::debug!("sub-entity '{}' skipped", self.objects[index].name);
                } else {
                    log::warn!(
                        "sub-entity '{}' exceeds nesting depth {}, skipped",
                        self.objects[index].name,
                        self.config.max_sub_entity_depth
                    );
                    self.depth_warned = true;
                }
                continue;
            }
            let Some(sub_entity_key) = data.entity_key(entity_index) else {
                log::debug!("sub-entity index {entity_index} not available");
                continue;
            };

            let config = &self.config;
            let sub = self.sub_poses[index]
                .get_or_insert_with(|| Box::new(Pose::with_depth(Arc::clone(data), config.clone(), depth)));
            if sub.entity_key() != sub_entity_key {
                sub.set_entity(sub_entity_key);
            }
            let Some(sub_anim_key) = data
                .entity(sub_entity_key)
                .and_then(|e| e.animation_key(animation_index))
            else {
                log::debug!("sub-entity '{sub_entity_key}' has no animation {animation_index}");
                continue;
            };
            if sub.anim_key() != sub_anim_key {
                sub.set_anim(sub_anim_key);
                let sub_time = fraction * sub.cur_anim_length();
                sub.set_time(sub_time);
            } else {
                let sub_time = fraction * sub.cur_anim_length();
                let dt = sub_time - sub.time();
                sub.advance(dt);
            }
            sub.resolve()?;
        }
        Ok(())
    }

    fn fire_sounds(&mut self, data: &Data, anim: &Animation, window: &EventWindow) {
        for soundline in &anim.soundlines {
            for key in soundline.keys.iter().filter(|k| window.contains(k.time)) {
                let sound = &key.sound;
                let Some(file) = data.file(sound.folder_index, sound.file_index) else {
                    log::debug!(
                        "soundline '{}' refers to missing file {}/{}",
                        soundline.name,
                        sound.folder_index,
                        sound.file_index
                    );
                    continue;
                };
                self.sounds.push(FiredSound {
                    name: file.name().to_string(),
                    volume: sound.volume,
                    panning: sound.panning,
                });
            }
        }
    }

    fn fire_events(&mut self, anim: &Animation, window: &EventWindow) {
        for eventline in &anim.eventlines {
            for _ in eventline.keys.iter().filter(|k| window.contains(k.time)) {
                self.events.push(eventline.name.clone());
            }
        }
    }

    fn fire_tags(&mut self, data: &Data, tagline: &Tagline, window: &EventWindow) {
        for key in tagline.keys.iter().filter(|k| window.contains(k.time)) {
            self.tags.clear();
            self.tags.extend(
                key.tags
                    .iter()
                    .filter_map(|t| data.tag_def(t.tag_def_index))
                    .map(|def| def.name.clone()),
            );
            self.tags.sort();
        }
    }

    /// Varlines are sampled at the current time on every resolve.
    fn update_vars(&mut self, entity: &Entity, anim: &Animation, varlines: &[Varline]) {
        for varline in varlines {
            let Some(def) = entity.var_defs.get(varline.var_def_index) else {
                log::debug!("varline refers to missing var_def {}", varline.var_def_index);
                continue;
            };
            let keys = &varline.keys;
            let Some(index1) = find(keys, self.time) else {
                continue;
            };
            let key1 = &keys[index1];
            let key2 = &keys[(index1 + 1) % keys.len()];
            let pct = progress(key1.time, key2.time, anim.length, self.time);

            let left = key1.value.as_ref().map(VarValue::as_f64).unwrap_or(0.0);
            let right = key2.value.as_ref().map(VarValue::as_f64).unwrap_or(0.0);
            let value = match def.kind {
                VarType::Int => VarValue::Int(tween(left, right, pct) as i32),
                VarType::Float => VarValue::Float(tween(left, right, pct)),
                VarType::String => match &key1.value {
                    Some(v) => def.kind.coerce(v),
                    None => def.default_value.clone(),
                },
            };
            match self.vars.get_mut(&def.name) {
                Some(slot) => *slot = value,
                None => {
                    self.vars.insert(def.name.clone(), value);
                }
            }
        }
    }
}

/// Linear progress of `time` between two keyframe times. A right key
/// before the left one wraps to the end of the animation.
fn progress(time1: f64, time2: f64, length: f64, time: f64) -> f64 {
    let time2 = if time2 < time1 { length } else { time2 };
    if time1 != time2 {
        (time - time1) / (time2 - time1)
    } else {
        0.0
    }
}

/// Active mainline keyframe and the eased mainline time used to sample
/// timelines. Before the first key, the first key holds.
fn mainline_cursor(anim: &Animation, time: f64) -> Option<(usize, f64)> {
    let keys = &anim.mainline.keys;
    let first = keys.first()?;
    let Some(index1) = find(keys, time) else {
        return Some((0, first.time));
    };
    let key1 = &keys[index1];
    let key2 = &keys[(index1 + 1) % keys.len()];
    let time2 = if key2.time < key1.time {
        anim.length
    } else {
        key2.time
    };
    if key1.time == time2 {
        return Some((index1, time));
    }
    let pct = key1.curve.evaluate((time - key1.time) / (time2 - key1.time));
    Some((index1, tween(key1.time, time2, pct)))
}

/// Timeline, keyframe pair and eased progress for one mainline reference.
fn bracket<'a>(
    anim: &'a Animation,
    r: &Ref,
    mainline_time: f64,
) -> Result<(&'a Timeline, &'a TimelineKeyframe, &'a TimelineKeyframe, f64)> {
    let timeline = anim
        .timeline(r.timeline_index)
        .ok_or_else(|| CutoutError::BrokenReference {
            animation: anim.name.clone(),
            what: "timeline",
            index: r.timeline_index,
        })?;
    if let TimelineKind::Unknown(kind) = &timeline.kind {
        return Err(CutoutError::UnsupportedObjectKind {
            timeline: timeline.name.clone(),
            kind: kind.clone(),
        });
    }
    let keys = &timeline.keys;
    let index1 = usize::try_from(r.keyframe_index)
        .ok()
        .filter(|&i| i < keys.len())
        .ok_or_else(|| CutoutError::BrokenReference {
            animation: anim.name.clone(),
            what: "keyframe",
            index: r.keyframe_index,
        })?;
    let key1 = &keys[index1];
    let key2 = &keys[(index1 + 1) % keys.len()];
    let pct = key1
        .curve
        .evaluate(progress(key1.time, key2.time, anim.length, mainline_time));
    Ok((timeline, key1, key2, pct))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_wraps_to_length() {
        assert_eq!(progress(0.0, 100.0, 400.0, 50.0), 0.5);
        assert_eq!(progress(300.0, 0.0, 400.0, 350.0), 0.5);
        assert_eq!(progress(100.0, 100.0, 400.0, 150.0), 0.0);
    }

    #[test]
    fn depth_guard_flags_the_pose_once() {
        let mut doc = serde_json::json!({ "entity": { "name": "e", "animation": {
            "name": "a", "length": 100,
            "mainline": { "key": { "time": 0, "object_ref": { "id": 0, "timeline": 0, "key": 0 } } },
            "timeline": { "name": "self", "object_type": "entity",
                "key": { "time": 0, "object": { "entity": 0, "animation": 0 } } }
        }}});
        let config = crate::Config {
            max_sub_entity_depth: 1,
            ..crate::Config::default()
        };
        let data = crate::load_project(&mut doc, &config).unwrap();
        let mut pose = Pose::new(Arc::new(data), config);
        pose.set_entity("e");
        pose.set_anim("a");
        pose.resolve().unwrap();
        assert!(!pose.depth_warned);
        let sub = pose.sub_poses[0].as_ref().unwrap();
        assert!(sub.depth_warned);
        assert!(sub.sub_poses[0].is_none());

        pose.advance(10.0);
        pose.resolve().unwrap();
        let sub = pose.sub_poses[0].as_ref().unwrap();
        assert!(sub.depth_warned);
        assert!(sub.sub_poses[0].is_none());
    }
}
