pub mod camera;
pub mod capabilities;
pub mod config;
pub mod constants;
pub mod cursor;
pub mod error;
pub mod morph;
pub mod motion;
pub mod noise;
pub mod particles;
pub mod pingpong;
pub mod schedule;
pub mod scroll;
pub mod section;
pub mod shadergen;
pub mod store;
pub mod uniforms;
pub mod velocity;

pub static PARTICLES_WGSL: &str = include_str!("../shaders/particles.wgsl");
pub static VELOCITY_WGSL: &str = include_str!("../shaders/velocity.wgsl");
pub static COMPOSITE_WGSL: &str = include_str!("../shaders/composite.wgsl");
pub static MORPH_WGSL: &str = include_str!("../shaders/morph.wgsl");

pub use camera::*;
pub use capabilities::*;
pub use config::*;
pub use constants::*;
pub use cursor::*;
pub use error::*;
pub use morph::{KeyframeSet, MorphDriver, MorphMode, Segment};
pub use noise::*;
pub use particles::*;
pub use pingpong::*;
pub use schedule::*;
pub use scroll::*;
pub use section::*;
pub use shadergen::*;
pub use store::*;
pub use uniforms::*;
pub use velocity::*;
