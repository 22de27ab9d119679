//! One-time coordinate fix-up of a raw project document.
//!
//! Exported documents are Y-down with clockwise angles. Before a document
//! is loaded its file pivots, keyframe Y positions and angles are rewritten
//! into this crate's Y-up, counter-clockwise convention. The rewrite marks
//! the document so that running it again changes nothing.

use serde_json::Value;

use crate::config::Config;
use crate::json::{as_float, load_float, load_string};

/// Marker field set on the document root once normalized.
pub const NORMALIZED_MARKER: &str = "is_validated";

/// Whether `doc` already carries the normalization marker.
pub fn is_normalized(doc: &Value) -> bool {
    matches!(doc.get(NORMALIZED_MARKER), Some(Value::Bool(true)))
}

/// Rewrite `doc` in place. Returns `false` (and leaves it untouched) when
/// it was already normalized or is not an object.
pub fn normalize_document(doc: &mut Value, config: &Config) -> bool {
    if !doc.is_object() || is_normalized(doc) {
        return false;
    }

    for_each_mut(doc, "folder", |folder| {
        for_each_mut(folder, "file", |file| {
            if load_string(file, "type", "image") == "sound" {
                return;
            }
            // an absent pivot_y reads as 0 like any other, so it flips too
            let pivot_y = load_float(file, "pivot_y", 0.0);
            set_number(file, "pivot_y", 1.0 - pivot_y);
        });
    });

    let mirror_bone_angle = config.mirror_bone_angle;
    for_each_mut(doc, "entity", |entity| {
        for_each_mut(entity, "animation", |animation| {
            for_each_mut(animation, "timeline", |timeline| {
                for_each_mut(timeline, "key", |key| {
                    if let Some(object) = key.get_mut("object") {
                        negate(object, "angle");
                        negate(object, "y");
                    } else if let Some(bone) = key.get_mut("bone") {
                        if mirror_bone_angle {
                            negate(bone, "angle");
                        }
                        negate(bone, "y");
                    }
                });
            });
        });
    });

    if let Value::Object(root) = doc {
        root.insert(NORMALIZED_MARKER.to_string(), Value::Bool(true));
    }
    log::debug!("normalized project document");
    true
}

/// Visit a child field as a list: each array element, or a lone object.
fn for_each_mut(json: &mut Value, key: &str, mut f: impl FnMut(&mut Value)) {
    match json.get_mut(key) {
        Some(Value::Array(items)) => items.iter_mut().for_each(f),
        Some(item @ Value::Object(_)) => f(item),
        _ => {}
    }
}

fn negate(json: &mut Value, key: &str) {
    if let Some(value) = json.get(key).and_then(as_float) {
        set_number(json, key, -value);
    }
}

fn set_number(json: &mut Value, key: &str, value: f64) {
    if let (Value::Object(map), Some(number)) = (json, serde_json::Number::from_f64(value)) {
        map.insert(key.to_string(), Value::Number(number));
    }
}
