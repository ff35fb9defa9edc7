//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (by entity ID)
//! - No rendering or device dependencies

pub mod category;
pub mod collision;
pub mod gravity;
pub mod level;
pub mod obstacle;
pub mod physics;
pub mod progression;
pub mod state;
pub mod tick;

pub use category::CollisionCategory;
pub use collision::{CollisionResult, circle_rect_collision, circles_overlap};
pub use gravity::{GravitySource, PointerGravity, TiltGravity};
pub use level::{
    DirLevelSource, LevelError, LevelSource, MalformedReason, MemoryLevelSource, Placement, Tile,
    parse_level,
};
pub use obstacle::{Activation, Collider, ColliderMode, Obstacle, TeleportPair, spawn_obstacle};
pub use physics::{BodyMode, Contact, PhysicsWorld, Player};
pub use progression::{advance_level, load_level};
pub use state::{GameEvent, GamePhase, GameState, RemovalReason, TeleportTiming};
pub use tick::{TickInput, tick};
