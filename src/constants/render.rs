//! Projection and rasterization constants.

/// Default viewport width (one ray per column)
pub const RENDER_DEFAULT_WIDTH: u32 = 800;
/// Default viewport height
pub const RENDER_DEFAULT_HEIGHT: u32 = 600;
/// Default horizontal field of view (60 degrees)
pub const RENDER_DEFAULT_FOV: f32 = std::f32::consts::FRAC_PI_3;
/// Distance at which walls fade to black
pub const RENDER_SHADE_DISTANCE: f32 = 20.0;
/// Wall slab height at distance 1, as a fraction of the viewport height
pub const RENDER_WALL_HEIGHT_SCALE: f32 = 1.0;
/// Enemy sprite size at distance 1, as a fraction of the viewport height
pub const RENDER_SPRITE_SCALE: f32 = 0.6;
/// Projectile sprite size at distance 1, as a fraction of the viewport height
pub const RENDER_PROJECTILE_SCALE: f32 = 0.04;
/// Sprites beyond this distance are not drawn
pub const RENDER_MAX_SPRITE_DISTANCE: f32 = 20.0;
/// Smallest depth used for projection, avoids division by zero at a wall face
pub const RENDER_MIN_DEPTH: f32 = 1e-3;
