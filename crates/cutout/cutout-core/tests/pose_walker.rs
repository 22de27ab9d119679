use std::f64::consts::{FRAC_PI_4, SQRT_2};
use std::sync::Arc;

use cutout_core::{parse_project_json, Config, FiredSound, Object, Pose, Space, VarValue};

fn approx(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn approx_at(space: &Space, x: f64, y: f64) {
    approx(space.position.x, x, 1e-9);
    approx(space.position.y, y, 1e-9);
}

fn mk_pose(anim: &str) -> Pose {
    let json = cutout_test_fixtures::projects::json("walker").expect("load walker fixture");
    let config = Config::default();
    let data = parse_project_json(&json, &config).expect("parse walker fixture");
    let mut pose = Pose::new(Arc::new(data), config);
    pose.set_entity("walker");
    pose.set_anim(anim);
    pose
}

fn world(pose: &Pose, index: usize) -> Space {
    *pose.objects()[index]
        .object
        .world_space()
        .expect("spatial object")
}

fn file_of(pose: &Pose, index: usize) -> (i32, i32) {
    match &pose.objects()[index].object {
        Object::Sprite(s) => (s.folder_index, s.file_index),
        other => panic!("object {index} is not a sprite: {other:?}"),
    }
}

#[test]
fn resolves_bone_hierarchy_mid_segment() {
    let mut pose = mk_pose("walk");
    pose.advance(250.0);
    pose.resolve().expect("resolve");
    approx(pose.time(), 250.0, 1e-12);

    let bones = pose.bones();
    assert_eq!(bones.len(), 2);
    assert_eq!(bones[0].name, "root");
    assert_eq!(bones[1].name, "arm");
    assert_eq!(bones[1].parent_index, 0);
    approx_at(&bones[0].bone.world_space, 50.0, 0.0);
    approx_at(&bones[1].bone.world_space, 60.0, 0.0);
    // spin -1 from 0 to -90° passes through -45°
    approx(bones[1].bone.world_space.rotation.rad, -FRAC_PI_4, 1e-9);
}

#[test]
fn resolves_objects_against_their_bones() {
    let mut pose = mk_pose("walk");
    pose.advance(250.0);
    pose.resolve().expect("resolve");

    let names: Vec<&str> = pose.objects().iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, ["torso", "hitbox", "hand", "sleeve"]);
    let z: Vec<i32> = pose.objects().iter().map(|o| o.z_index).collect();
    assert_eq!(z, [0, 1, 2, 3]);

    let Object::Sprite(torso) = &pose.objects()[0].object else {
        panic!("torso is a sprite");
    };
    approx_at(&torso.world_space, 50.0, 30.0);
    approx(torso.pivot.x, 0.5, 1e-12);
    approx(torso.pivot.y, 0.75, 1e-12);
    approx(torso.alpha, 0.75, 1e-12);
    assert_eq!(file_of(&pose, 0), (0, 0));

    // boxes are re-anchored at their center using obj_info size
    let hitbox = world(&pose, 1);
    approx_at(&hitbox, 60.0 + 15.0 * SQRT_2, -5.0 * SQRT_2);
    approx(hitbox.rotation.rad, -FRAC_PI_4, 1e-9);

    approx_at(&world(&pose, 2), 60.0 + 25.0 * SQRT_2, -25.0 * SQRT_2);
}

#[test]
fn mainline_wraps_back_to_first_key() {
    let mut pose = mk_pose("walk");
    pose.advance(750.0);
    pose.resolve().expect("resolve");
    // last mainline key blends towards the first across the loop seam
    approx_at(&pose.bones()[0].bone.world_space, 50.0, 0.0);
}

#[test]
fn resolve_is_a_no_op_until_something_changes() {
    let mut pose = mk_pose("walk");
    pose.advance(250.0);
    pose.resolve().expect("resolve");
    assert!(!pose.is_dirty());
    assert_eq!(pose.events(), ["step"]);

    pose.resolve().expect("resolve again");
    assert_eq!(pose.events(), ["step"]);
    approx(pose.time(), 250.0, 1e-12);

    pose.advance(0.0);
    assert!(pose.is_dirty());
    pose.resolve().expect("zero step");
    assert!(pose.events().is_empty());
}

#[test]
fn character_maps_swap_sprite_files() {
    let mut pose = mk_pose("walk");
    pose.advance(250.0);
    pose.resolve().expect("resolve");

    pose.set_character_maps(["red"]);
    pose.resolve().expect("red");
    assert_eq!(file_of(&pose, 0), (1, 0));
    assert_eq!(file_of(&pose, 3), (1, 1));

    pose.set_character_maps(["blue"]);
    pose.resolve().expect("blue");
    assert_eq!(file_of(&pose, 0), (1, 2));
    assert_eq!(file_of(&pose, 3), (0, 1));

    // maps apply in order; blue finds nothing left to swap
    pose.set_character_maps(["red", "blue"]);
    pose.resolve().expect("red+blue");
    assert_eq!(file_of(&pose, 0), (1, 0));

    pose.remove_character_map("red");
    assert_eq!(pose.character_map_keys(), ["blue"]);
    pose.add_character_map("missing");
    pose.resolve().expect("unknown map is skipped");
    assert_eq!(file_of(&pose, 0), (1, 2));

    pose.clear_character_maps();
    pose.resolve().expect("cleared");
    assert_eq!(file_of(&pose, 0), (0, 0));
}

#[test]
fn fires_sounds_events_tags_and_samples_vars() {
    let mut pose = mk_pose("walk");
    pose.advance(250.0);
    pose.resolve().expect("resolve");

    assert_eq!(pose.events(), ["step"]);
    assert_eq!(
        pose.sounds(),
        [FiredSound {
            name: "sfx/step.wav".into(),
            volume: 0.8,
            panning: -0.5,
        }]
    );
    assert!(pose.tags().is_empty());
    match pose.var("speed") {
        Some(VarValue::Float(v)) => approx(*v, 2.0, 1e-9),
        other => panic!("speed: {other:?}"),
    }
    assert_eq!(pose.var("combo"), Some(&VarValue::Int(1)));
    assert_eq!(pose.var("mood"), Some(&VarValue::String("calm".into())));

    pose.advance(300.0);
    pose.resolve().expect("resolve to 550");
    assert!(pose.events().is_empty());
    assert!(pose.sounds().is_empty());
    assert_eq!(pose.tags(), ["attacking"]);
    match pose.var("speed") {
        Some(VarValue::Float(v)) => approx(*v, 2.8, 1e-9),
        other => panic!("speed: {other:?}"),
    }
    assert_eq!(pose.var("combo"), Some(&VarValue::Int(2)));
    assert_eq!(pose.var("mood"), Some(&VarValue::String("angry".into())));

    // 550 -> 1050 wraps to 50 and sweeps both sides of the seam
    pose.advance(500.0);
    pose.resolve().expect("resolve across loop");
    approx(pose.time(), 50.0, 1e-9);
    assert_eq!(pose.events(), ["step", "loop"]);
    assert_eq!(pose.sounds().len(), 1);
    assert_eq!(pose.sounds()[0].volume, 1.0);
    assert_eq!(pose.sounds()[0].panning, 0.0);
    assert_eq!(pose.tags(), ["airborne", "grounded"]);
    assert_eq!(pose.var("combo"), Some(&VarValue::Int(0)));
}

#[test]
fn vars_start_from_their_defaults() {
    let mut pose = mk_pose("idle");
    pose.resolve().expect("resolve");
    // idle has no varlines, so defaults stand
    assert_eq!(pose.var("speed"), Some(&VarValue::Float(1.5)));
    assert_eq!(pose.var("combo"), Some(&VarValue::Int(0)));
    assert_eq!(pose.vars().len(), 3);
}

#[test]
fn switching_animation_wraps_time_and_fires_nothing() {
    let mut pose = mk_pose("walk");
    pose.advance(900.0);
    pose.resolve().expect("resolve walk");
    assert_eq!(pose.objects().len(), 4);

    pose.set_anim("idle");
    approx(pose.time(), 100.0, 1e-12);
    approx(pose.cur_anim_length(), 800.0, 1e-12);
    pose.resolve().expect("resolve idle");
    assert!(pose.events().is_empty());
    assert!(pose.sounds().is_empty());
    assert!(pose.objects().is_empty());
    assert_eq!(pose.bones().len(), 1);
    approx_at(&pose.bones()[0].bone.world_space, 5.0, 5.0);
}

#[test]
fn set_time_jumps_without_events() {
    let mut pose = mk_pose("walk");
    pose.set_time(1250.0);
    approx(pose.time(), 250.0, 1e-12);
    pose.resolve().expect("resolve");
    assert!(pose.events().is_empty());
    approx_at(&pose.bones()[0].bone.world_space, 50.0, 0.0);
}

#[test]
fn unknown_selection_resolves_to_nothing() {
    let mut pose = mk_pose("walk");
    pose.set_anim("run");
    pose.advance(100.0);
    pose.resolve().expect("missing animation is not an error");
    assert!(pose.bones().is_empty());
    assert!(pose.events().is_empty());

    pose.set_entity("ghost");
    assert_eq!(pose.anim_key(), "");
    pose.advance(40.0);
    pose.resolve().expect("missing entity is not an error");
    approx(pose.time(), 40.0, 1e-12);
    assert_eq!(pose.entity_keys().collect::<Vec<_>>(), ["walker"]);
    assert_eq!(pose.anim_keys().count(), 0);
}
