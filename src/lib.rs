//! Tilt Maze - simulation core of a tilt-controlled physics maze
//!
//! Core modules:
//! - `sim`: Deterministic simulation (level parsing, physics, contact rules)
//! - `platform`: Input-sampling handoff from device threads to the tick
//! - `settings`: Level list, input mode and campaign configuration

pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::{CampaignEnd, InputMode, LevelEntry, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use std::f32::consts::PI;

    /// Fixed simulation timestep (one step per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Level grid cell size in world units
    pub const CELL_SIZE: f32 = 64.0;
    /// Offset from a cell corner to its center
    pub const HALF_CELL: f32 = CELL_SIZE / 2.0;
    /// Visual footprint of every obstacle sprite (square)
    pub const OBSTACLE_FOOTPRINT: f32 = 64.0;

    /// Player ball radius
    pub const PLAYER_RADIUS: f32 = 24.0;
    /// Velocity damping per second
    pub const LINEAR_DAMPING: f32 = 0.5;
    /// Bounce factor against walls
    pub const WALL_RESTITUTION: f32 = 0.2;
    /// Speed cap so a single step can never skip a wall
    pub const MAX_PLAYER_SPEED: f32 = 3000.0;
    /// Maximum substeps per physics step
    pub const MAX_SUBSTEPS: u32 = 16;
    /// Longest physics step; at top speed each substep stays under half a radius
    pub const MAX_STEP_DT: f32 = 0.05;

    /// Gravity signal is in metres/s², the world is in points
    pub const POINTS_PER_METER: f32 = 150.0;
    /// Pointer offset (points) per unit of gravity
    pub const POINTER_GRAVITY_DIVISOR: f32 = 100.0;
    /// Accelerometer reading to gravity
    pub const TILT_GRAVITY_SCALE: f32 = 50.0;

    /// Shrink + rotate into a vortex
    pub const DEATH_DURATION: f32 = 0.25;
    /// Player glides onto the finish before the level swaps
    pub const FINISH_DURATION: f32 = 0.25;
    /// Teleport node lockout after use
    pub const TELEPORT_COOLDOWN: f32 = 1.0;
    /// Scale the dying player shrinks to (never exactly zero)
    pub const DEATH_MIN_SCALE: f32 = 0.0001;

    /// Vortex spin: +π every time unit
    pub const VORTEX_SPIN_RATE: f32 = PI;
    /// Teleport spin: -π every 4 time units
    pub const TELEPORT_SPIN_RATE: f32 = -PI / 4.0;

    /// Spawn point used when the settings do not name one
    pub const DEFAULT_SPAWN: (f32, f32) = (96.0, 672.0);
}

/// World position of the center of a grid cell
#[inline]
pub fn cell_center(row: usize, column: usize) -> Vec2 {
    Vec2::new(
        consts::CELL_SIZE * column as f32 + consts::HALF_CELL,
        consts::CELL_SIZE * row as f32 + consts::HALF_CELL,
    )
}

/// Progress of a timed transition, clamped to [0, 1]
#[inline]
pub fn progress(elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        1.0
    } else {
        (elapsed / duration).clamp(0.0, 1.0)
    }
}
