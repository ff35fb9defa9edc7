//! Player rigid body and the physics world it moves in
//!
//! Obstacles never move. Only the player integrates, is pushed out of solid
//! colliders, and reports sensor overlaps once per entry.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::category::CollisionCategory;
use super::collision::{
    bounce_velocity, circle_circle_collision, circle_rect_collision, circles_overlap,
};
use super::obstacle::{Collider, ColliderMode, Obstacle};
use crate::consts::*;

/// How the player body is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyMode {
    /// Integrated under gravity and blocked by walls
    Dynamic,
    /// Position set by a scripted move (teleport hop); senses nothing
    Scripted,
    /// No motion and no contacts
    Frozen,
}

/// The player ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub alive: bool,
    pub body: BodyMode,
    pub category: CollisionCategory,
    pub contact_mask: CollisionCategory,
    pub collision_mask: CollisionCategory,
    pub linear_damping: f32,
    /// Visual scale (1 = full size)
    pub scale: f32,
    /// Visual rotation (radians); the body itself never rotates
    pub rotation: f32,
    /// Visual opacity
    pub alpha: f32,
}

impl Player {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius: PLAYER_RADIUS,
            alive: true,
            body: BodyMode::Dynamic,
            category: CollisionCategory::PLAYER,
            contact_mask: CollisionCategory::MASK_PLAYER_CONTACT,
            collision_mask: CollisionCategory::MASK_PLAYER_COLLISION,
            linear_damping: LINEAR_DAMPING,
            scale: 1.0,
            rotation: 0.0,
            alpha: 1.0,
        }
    }
}

/// Player entered a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub player_id: u32,
    pub obstacle_id: u32,
}

/// The simulated world: one obstacle set and at most one player
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhysicsWorld {
    /// Current gravity (metres/s²)
    pub gravity: Vec2,
    /// Sorted by id
    obstacles: Vec<Obstacle>,
    player: Option<Player>,
    /// Sensors the player currently overlaps
    touching: BTreeSet<u32>,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn obstacle(&self, id: u32) -> Option<&Obstacle> {
        self.obstacles
            .binary_search_by_key(&id, |o| o.id)
            .ok()
            .map(|i| &self.obstacles[i])
    }

    pub fn obstacle_mut(&mut self, id: u32) -> Option<&mut Obstacle> {
        self.obstacles
            .binary_search_by_key(&id, |o| o.id)
            .ok()
            .map(|i| &mut self.obstacles[i])
    }

    /// Attach a level's obstacle set. The world must be empty.
    pub fn attach_obstacles(&mut self, mut obstacles: Vec<Obstacle>) {
        debug_assert!(self.obstacles.is_empty(), "previous level still attached");
        obstacles.sort_by_key(|o| o.id);
        self.obstacles = obstacles;
        self.touching.clear();
    }

    /// Detach everything, returning what was removed
    pub fn detach_all(&mut self) -> (Vec<Obstacle>, Option<Player>) {
        self.touching.clear();
        (std::mem::take(&mut self.obstacles), self.player.take())
    }

    pub fn remove_obstacle(&mut self, id: u32) -> Option<Obstacle> {
        let index = self.obstacles.binary_search_by_key(&id, |o| o.id).ok()?;
        self.touching.remove(&id);
        Some(self.obstacles.remove(index))
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }

    /// Insert a fresh player, replacing none
    pub fn spawn_player(&mut self, player: Player) {
        debug_assert!(self.player.is_none(), "player already alive");
        self.touching.clear();
        self.player = Some(player);
    }

    pub fn take_player(&mut self) -> Option<Player> {
        self.touching.clear();
        self.player.take()
    }

    /// Advance the player one step and report new sensor entries.
    /// `dt` is clamped to `MAX_STEP_DT`.
    pub fn step(&mut self, dt: f32) -> Vec<Contact> {
        let dt = dt.min(MAX_STEP_DT);
        let Self {
            gravity,
            obstacles,
            player,
            touching,
        } = self;

        let Some(player) = player.as_mut() else {
            return Vec::new();
        };

        // Overlap tracking is left untouched so arrival counts as a fresh entry
        match player.body {
            BodyMode::Frozen | BodyMode::Scripted => return Vec::new(),
            BodyMode::Dynamic => integrate(player, *gravity, dt, obstacles),
        }

        detect_contacts(player, obstacles, touching)
    }
}

fn integrate(player: &mut Player, gravity: Vec2, dt: f32, obstacles: &[Obstacle]) {
    player.vel += gravity * POINTS_PER_METER * dt;
    player.vel *= 1.0 / (1.0 + dt * player.linear_damping);
    player.vel = player.vel.clamp_length_max(MAX_PLAYER_SPEED);

    // Never move more than half a radius per substep
    let travel = player.vel.length() * dt;
    let substeps = ((travel / (player.radius * 0.5)).ceil() as u32).clamp(1, MAX_SUBSTEPS);
    let sub_dt = dt / substeps as f32;

    for _ in 0..substeps {
        player.pos += player.vel * sub_dt;
        resolve_solids(player, obstacles);
    }
}

fn resolve_solids(player: &mut Player, obstacles: &[Obstacle]) {
    for obstacle in obstacles {
        if obstacle.mode != ColliderMode::Solid
            || !player.collision_mask.intersects(obstacle.category)
        {
            continue;
        }

        let result = match obstacle.collider {
            Collider::Rect { half_extents } => {
                circle_rect_collision(player.pos, player.radius, obstacle.pos, half_extents)
            }
            Collider::Circle { radius } => {
                circle_circle_collision(player.pos, player.radius, obstacle.pos, radius)
            }
        };

        if result.hit {
            player.pos += result.normal * result.penetration;
            player.vel = bounce_velocity(player.vel, result.normal, WALL_RESTITUTION);
        }
    }
}

fn detect_contacts(
    player: &Player,
    obstacles: &[Obstacle],
    touching: &mut BTreeSet<u32>,
) -> Vec<Contact> {
    let mut contacts = Vec::new();
    let mut overlapping = BTreeSet::new();

    for obstacle in obstacles {
        if !obstacle.is_sensor() {
            continue;
        }
        let reports = player.contact_mask.intersects(obstacle.category)
            || obstacle.contact_mask.intersects(player.category);
        if !reports {
            continue;
        }

        let overlaps = match obstacle.collider {
            Collider::Circle { radius } => {
                circles_overlap(player.pos, player.radius, obstacle.pos, radius)
            }
            Collider::Rect { half_extents } => {
                circle_rect_collision(player.pos, player.radius, obstacle.pos, half_extents).hit
            }
        };
        if !overlaps {
            continue;
        }

        overlapping.insert(obstacle.id);
        if !touching.contains(&obstacle.id) {
            contacts.push(Contact {
                player_id: player.id,
                obstacle_id: obstacle.id,
            });
        }
    }

    *touching = overlapping;
    contacts
}
