//! Cutout Core: runtime for 2D cutout (skeletal) animation projects.
//!
//! Loading turns a JSON project document into an immutable [`Data`] model.
//! A [`Pose`] plays one entity of that model: each frame the host calls
//! [`Pose::advance`] and [`Pose::resolve`], then reads world-space bones
//! and objects plus the sounds, events, tags and variables the step crossed.
//!
//! ```no_run
//! use std::sync::Arc;
//! use cutout_core::{parse_project_json, Config, Pose};
//!
//! # fn main() -> cutout_core::Result<()> {
//! let config = Config::default();
//! let data = Arc::new(parse_project_json(r#"{ "entity": [] }"#, &config)?);
//! let mut pose = Pose::new(data, config);
//! pose.set_entity("hero");
//! pose.set_anim("walk");
//! pose.advance(16.0);
//! pose.resolve()?;
//! for object in pose.objects() {
//!     println!("{} {:?}", object.name, object.object.world_space());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod curve;
pub mod data;
pub mod error;
pub mod json;
pub mod math;
pub mod normalize;
pub mod pose;
pub mod store;
pub mod window;

pub use config::Config;
pub use curve::{Curve, CurveType};
pub use data::{
    find, Animation, Data, Entity, File, Folder, Keyframe, Object, ObjectKind, Timeline,
    TimelineKind, VarValue,
};
pub use error::CutoutError;
pub use math::{Angle, Space, Vector};
pub use normalize::{is_normalized, normalize_document};
pub use pose::{FiredSound, Pose, PoseBone, PoseObject};
pub use store::ProjectStore;
pub use window::EventWindow;

pub type Result<T> = core::result::Result<T, CutoutError>;

/// Normalize `doc` in place (once) and build the model from it.
pub fn load_project(doc: &mut serde_json::Value, config: &Config) -> Result<Data> {
    if !doc.is_object() {
        return Err(CutoutError::InvalidDocument {
            found: json::type_name(doc),
        });
    }
    normalize_document(doc, config);
    Ok(Data::load(doc))
}

/// Parse, normalize and load a project from JSON text.
pub fn parse_project_json(text: &str, config: &Config) -> Result<Data> {
    let mut doc: serde_json::Value = serde_json::from_str(text)?;
    load_project(&mut doc, config)
}
