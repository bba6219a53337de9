//! Wakefield library - interactive ocean scene with floating story buoys

pub mod anim;
pub mod assets;
pub mod boat;
pub mod buoy;
pub mod camera;
pub mod cli;
pub mod content;
pub mod input;
pub mod ocean;
pub mod params;
pub mod rendering;
pub mod scene;
pub mod trail;
pub mod ui;
