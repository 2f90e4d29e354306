//! Tuning constants for the animation layer.
//!
//! Values here are the numeric contracts that feed shader uniforms (decay
//! rates, smoothing coefficients, clamp limits). Presentation-only values that
//! callers may want to change at runtime are mirrored in `SceneConfig`.

// Scroll velocity smoothing
pub const SCROLL_ACCUM_KEEP: f32 = 0.7; // accumulator = acc*keep + raw*(1-keep)
pub const SCROLL_DISPLAY_BLEND: f32 = 0.15; // smoothed += (acc - smoothed) * blend
pub const SCROLL_VELOCITY_NORM: f32 = 800.0; // px/s mapped to velocity 1.0
pub const SCROLL_DECAY_KEEP: f32 = 0.92; // per idle frame accumulator decay
pub const SCROLL_DECAY_BLEND: f32 = 0.1; // idle re-blend of the display value
pub const SCROLL_SETTLE_EPSILON: f32 = 0.5; // px/s below which velocity reads as 0

// Calm factor
pub const CALM_SCROLL_WEIGHT: f32 = 0.7;
pub const CALM_SECTION_WEIGHT: f32 = 0.05;
pub const CALM_MAX: f32 = 0.9; // hard ceiling
pub const CALM_RENDER_SMOOTHING: f32 = 0.02; // renderer-side pursuit per frame

// Section transition ramp (fraction of intra-section progress)
pub const TRANSITION_RAMP: f32 = 0.15;

// Cursor spring
pub const CURSOR_STIFFNESS: f32 = 0.06;
pub const CURSOR_DAMPING: f32 = 0.75;
pub const CURSOR_WORLD_HALF_HEIGHT: f32 = 8.0; // world units at the viewport edge

// Velocity field
pub const POINTER_VELOCITY_KEEP: f32 = 0.8; // v = v*keep + raw*(1-keep)
pub const FIELD_DECAY: f32 = 0.95; // previous frame contribution in the paint pass
pub const FIELD_HI_DIVISOR: u32 = 4;
pub const FIELD_LO_DIVISOR: u32 = 8;
pub const BRUSH_RADIUS: f32 = 0.08; // uv units
pub const BRUSH_SOFTNESS: f32 = 0.06; // soft edge width beyond the radius
pub const BLUR_CENTER: f32 = 0.25;
pub const BLUR_EDGE: f32 = 0.125;
pub const BLUR_CORNER: f32 = 0.0625;

// Particle field
pub const PARTICLE_COUNT: usize = 1800;
pub const PARTICLE_SEED: u64 = 42;
pub const FIELD_RADIUS: f32 = 14.0; // outer radius of the particle disc
pub const CLEAR_RADIUS: f32 = 3.0; // sparse zone around the text column
pub const EDGE_BIAS: f32 = 0.55; // exponent < 1 pushes samples outward
pub const FIELD_DEPTH: f32 = 6.0; // z spread
pub const NODE_TYPE_COUNT: u32 = 3;
pub const NEIGHBORS_PER_PARTICLE: usize = 3;
pub const CONNECTION_DISTANCE: f32 = 2.2;
pub const MAX_CONNECTIONS: usize = 2400;

// Motion shaping
pub const CURSOR_FIELD_RADIUS: f32 = 4.0; // swirl falloff radius (world units)
pub const CENTER_CALM_RADIUS: f32 = 6.0; // particles inside move markedly less
pub const CENTER_MOTION_FLOOR: f32 = 0.25; // motion multiplier at the very centre

// Camera
pub const CAMERA_SMOOTHING: f32 = 0.03;
pub const CAMERA_PARALLAX: f32 = 0.35; // world units per unit of cursor (scaled by 1/8)
pub const CAMERA_FOVY_DEG: f32 = 55.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 200.0;

// Morph renderer
pub const MORPH_PARTICLE_COUNT: usize = 6000;
pub const MORPH_SPEED: f32 = 2.5; // pursuit rate per second
pub const MORPH_SNAP_EPSILON: f32 = 1e-3;
pub const MORPH_OSCILLATOR_PERIOD_SEC: f32 = 8.0; // time per keyframe hop
pub const MORPH_BRANCH_CHAIN_MAX: usize = 8; // above this, emit indexed lookup

// Blue noise
pub const BLUE_NOISE_SIZE: u32 = 64;
pub const GOLDEN_ANGLE: f32 = 2.399_963_2; // pi * (3 - sqrt(5))

// Distortion composite
pub const DISTORTION_STRENGTH: f32 = 0.035;
pub const JITTER_STRENGTH: f32 = 0.004;
