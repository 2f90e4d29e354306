pub mod helpers;
pub mod morph;
pub mod noise;
pub mod particles;
pub(crate) mod post;
pub mod state;
pub mod targets;
pub mod velocity_field;

pub use state::{FrameInputs, GpuState};
