use std::sync::Arc;

use serde_json::{json, Value};

use cutout_core::{load_project, Config, Pose};

/// One entity "e" with animation "a" (and an empty "b") and one eventline
/// per key time, named `t<time>`.
fn mk_doc(length: u32, times: &[u32]) -> Value {
    let eventlines: Vec<Value> = times
        .iter()
        .enumerate()
        .map(|(i, t)| {
            json!({ "id": i, "name": format!("t{t}"), "key": [{ "id": 0, "time": t }] })
        })
        .collect();
    json!({
        "entity": {
            "name": "e",
            "animation": [
                {
                    "name": "a",
                    "length": length,
                    "mainline": { "key": { "id": 0, "time": 0 } },
                    "eventline": eventlines
                },
                { "name": "b", "length": 400, "mainline": { "key": { "id": 0, "time": 0 } } }
            ]
        }
    })
}

fn mk_pose(length: u32, times: &[u32]) -> Pose {
    let config = Config::default();
    let mut doc = mk_doc(length, times);
    let data = load_project(&mut doc, &config).expect("load inline project");
    let mut pose = Pose::new(Arc::new(data), config);
    pose.set_entity("e");
    pose.set_anim("a");
    pose
}

fn step(pose: &mut Pose, dt: f64) -> Vec<String> {
    pose.advance(dt);
    pose.resolve().expect("resolve");
    pose.events().to_vec()
}

#[test]
fn forward_steps_fire_once_inside_the_step() {
    let mut pose = mk_pose(1000, &[500]);
    assert!(step(&mut pose, 300.0).is_empty());
    assert_eq!(step(&mut pose, 300.0), ["t500"]);
    assert!(step(&mut pose, 300.0).is_empty());
}

#[test]
fn step_end_is_inclusive_and_start_exclusive() {
    let mut pose = mk_pose(1000, &[300]);
    assert_eq!(step(&mut pose, 300.0), ["t300"]);
    assert!(step(&mut pose, 100.0).is_empty());
}

/// it should fire every key exactly once per loop, however the loop is sliced
#[test]
fn full_loop_fires_every_key_once() {
    let times = [0, 1, 250, 500, 999, 1000];
    let mut partitions: Vec<Vec<u32>> = vec![vec![1000], vec![300, 300, 300, 100]];
    let mut rng = fastrand::Rng::with_seed(2024);
    for _ in 0..20 {
        let mut left = 1000;
        let mut parts = Vec::new();
        while left > 0 {
            let dt = rng.u32(1..=left.min(180));
            parts.push(dt);
            left -= dt;
        }
        partitions.push(parts);
    }

    for parts in partitions {
        let mut pose = mk_pose(1000, &times);
        let mut fired: Vec<String> = Vec::new();
        for dt in &parts {
            fired.extend(step(&mut pose, f64::from(*dt)));
        }
        fired.sort();
        let mut expected: Vec<String> = times.iter().map(|t| format!("t{t}")).collect();
        expected.sort();
        assert_eq!(fired, expected, "partition {parts:?}");
        assert_eq!(pose.time(), 0.0);
    }
}

#[test]
fn backward_playback_fires_keys_behind() {
    let mut pose = mk_pose(1000, &[100, 300, 500, 950]);
    pose.set_time(600.0);
    pose.resolve().expect("jump");
    assert!(pose.events().is_empty());

    // [300, 600)
    assert_eq!(step(&mut pose, -300.0), ["t300", "t500"]);
    // 300 -> -100 wraps to 900: [0, 300) and [900, 1000]
    assert_eq!(step(&mut pose, -400.0), ["t100", "t950"]);
    assert_eq!(pose.time(), 900.0);
}

#[test]
fn zero_step_fires_nothing() {
    let mut pose = mk_pose(1000, &[0, 500]);
    assert!(step(&mut pose, 0.0).is_empty());
    pose.set_time(500.0);
    assert!(step(&mut pose, 0.0).is_empty());
}

#[test]
fn switching_animation_drops_pending_time() {
    let mut pose = mk_pose(1000, &[100, 500]);
    pose.advance(600.0);
    pose.set_anim("b");
    pose.resolve().expect("resolve b");
    assert!(pose.events().is_empty());
    assert_eq!(pose.time(), 0.0);

    pose.set_anim("a");
    assert_eq!(step(&mut pose, 200.0), ["t100"]);
}

#[test]
fn events_clear_on_the_next_step() {
    let mut pose = mk_pose(1000, &[100]);
    assert_eq!(step(&mut pose, 150.0), ["t100"]);
    assert!(step(&mut pose, 10.0).is_empty());
}

#[test]
fn unknown_animation_reports_nothing_fired() {
    let mut pose = mk_pose(1000, &[100]);
    assert_eq!(step(&mut pose, 150.0), ["t100"]);

    pose.set_anim("missing");
    assert!(step(&mut pose, 16.0).is_empty());
    assert!(pose.sounds().is_empty());
    assert_eq!(pose.time(), 166.0);

    pose.set_anim("a");
    pose.set_time(50.0);
    assert_eq!(step(&mut pose, 100.0), ["t100"]);
    pose.set_entity("nobody");
    assert!(step(&mut pose, 16.0).is_empty());
}

#[test]
fn backward_whole_loops_land_on_the_start() {
    let mut pose = mk_pose(1000, &[500]);
    pose.set_time(300.0);
    pose.resolve().expect("jump");
    step(&mut pose, -1300.0);
    assert_eq!(pose.time(), 0.0);
    assert!(pose.time() < pose.cur_anim_length());
}
