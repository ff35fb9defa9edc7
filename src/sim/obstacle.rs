//! Obstacles built from level placements
//!
//! Walls are solid rectangles with no contact reporting. Everything else is a
//! circular sensor that reports the player and never pushes or gets pushed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::category::CollisionCategory;
use super::level::{Placement, Tile};
use crate::consts::{OBSTACLE_FOOTPRINT, TELEPORT_SPIN_RATE, VORTEX_SPIN_RATE};

/// Collision shape, centered on the owner's position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Collider {
    Rect { half_extents: Vec2 },
    Circle { radius: f32 },
}

/// Whether a collider blocks motion or only detects overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColliderMode {
    Solid,
    Sensor,
}

/// Teleport node readiness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Activation {
    #[default]
    Active,
    /// Just used; contacts are ignored until reactivated
    CoolingDown,
    /// Cooldown finished
    ActiveAgain,
}

impl Activation {
    pub fn is_ready(&self) -> bool {
        !matches!(self, Activation::CoolingDown)
    }
}

/// A static, physics-backed level object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: Tile,
    pub pos: Vec2,
    pub collider: Collider,
    pub mode: ColliderMode,
    pub category: CollisionCategory,
    /// Categories this obstacle reports contacts with
    pub contact_mask: CollisionCategory,
    /// Categories this obstacle physically blocks
    pub collision_mask: CollisionCategory,
    /// Continuous rotation hint for the presentation layer (radians/sec)
    pub spin_rate: Option<f32>,
    #[serde(default)]
    pub activation: Activation,
}

impl Obstacle {
    pub fn is_sensor(&self) -> bool {
        self.mode == ColliderMode::Sensor
    }
}

/// Build the obstacle for a placement. Empty cells produce nothing.
pub fn spawn_obstacle(id: u32, placement: &Placement) -> Option<Obstacle> {
    let pos = placement.position();
    let sensor_radius = OBSTACLE_FOOTPRINT / 2.0;

    let (category, spin_rate) = match placement.tile {
        Tile::Empty => return None,
        Tile::Wall => {
            return Some(Obstacle {
                id,
                kind: Tile::Wall,
                pos,
                collider: Collider::Rect {
                    half_extents: Vec2::splat(OBSTACLE_FOOTPRINT / 2.0),
                },
                mode: ColliderMode::Solid,
                category: CollisionCategory::WALL,
                contact_mask: CollisionCategory::NONE,
                collision_mask: CollisionCategory::ALL,
                spin_rate: None,
                activation: Activation::Active,
            });
        }
        Tile::Vortex => (CollisionCategory::VORTEX, Some(VORTEX_SPIN_RATE)),
        Tile::Star => (CollisionCategory::STAR, None),
        Tile::Finish => (CollisionCategory::FINISH, None),
        Tile::TeleportA | Tile::TeleportB => {
            (CollisionCategory::TELEPORT, Some(TELEPORT_SPIN_RATE))
        }
    };

    Some(Obstacle {
        id,
        kind: placement.tile,
        pos,
        collider: Collider::Circle {
            radius: sensor_radius,
        },
        mode: ColliderMode::Sensor,
        category,
        contact_mask: CollisionCategory::PLAYER,
        collision_mask: CollisionCategory::NONE,
        spin_rate,
        activation: Activation::Active,
    })
}

/// Two linked teleport nodes of one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeleportPair {
    pub a: u32,
    pub b: u32,
}

impl TeleportPair {
    pub fn contains(&self, id: u32) -> bool {
        self.a == id || self.b == id
    }

    /// The other member of the pair
    pub fn partner_of(&self, id: u32) -> Option<u32> {
        if id == self.a {
            Some(self.b)
        } else if id == self.b {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Pair the i-th A node with the i-th B node in placement order
pub fn pair_teleports(obstacles: &[Obstacle]) -> Vec<TeleportPair> {
    let a_nodes: Vec<u32> = obstacles
        .iter()
        .filter(|o| o.kind == Tile::TeleportA)
        .map(|o| o.id)
        .collect();
    let b_nodes: Vec<u32> = obstacles
        .iter()
        .filter(|o| o.kind == Tile::TeleportB)
        .map(|o| o.id)
        .collect();

    if a_nodes.len() != b_nodes.len() {
        log::warn!(
            "Unmatched teleport endpoints ({} A, {} B); extras are inert",
            a_nodes.len(),
            b_nodes.len()
        );
    }

    a_nodes
        .into_iter()
        .zip(b_nodes)
        .map(|(a, b)| TeleportPair { a, b })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(tile: Tile) -> Placement {
        Placement {
            tile,
            row: 2,
            column: 3,
        }
    }

    #[test]
    fn test_wall_is_solid_rect() {
        let wall = spawn_obstacle(1, &placement(Tile::Wall)).unwrap();
        assert_eq!(wall.mode, ColliderMode::Solid);
        assert_eq!(wall.category, CollisionCategory::WALL);
        assert!(wall.contact_mask.is_empty());
        assert_eq!(
            wall.collider,
            Collider::Rect {
                half_extents: Vec2::splat(32.0)
            }
        );
        assert_eq!(wall.pos, Vec2::new(224.0, 160.0));
    }

    #[test]
    fn test_sensors() {
        let cases = [
            (Tile::Vortex, CollisionCategory::VORTEX, Some(VORTEX_SPIN_RATE)),
            (Tile::Star, CollisionCategory::STAR, None),
            (Tile::Finish, CollisionCategory::FINISH, None),
            (Tile::TeleportA, CollisionCategory::TELEPORT, Some(TELEPORT_SPIN_RATE)),
            (Tile::TeleportB, CollisionCategory::TELEPORT, Some(TELEPORT_SPIN_RATE)),
        ];
        for (tile, category, spin) in cases {
            let obstacle = spawn_obstacle(7, &placement(tile)).unwrap();
            assert!(obstacle.is_sensor());
            assert_eq!(obstacle.kind, tile);
            assert_eq!(obstacle.category, category);
            assert_eq!(obstacle.contact_mask, CollisionCategory::PLAYER);
            assert!(obstacle.collision_mask.is_empty());
            assert_eq!(obstacle.collider, Collider::Circle { radius: 32.0 });
            assert_eq!(obstacle.spin_rate, spin);
        }
    }

    #[test]
    fn test_empty_spawns_nothing() {
        assert!(spawn_obstacle(1, &placement(Tile::Empty)).is_none());
    }

    #[test]
    fn test_pairing() {
        let obstacles: Vec<Obstacle> = [Tile::TeleportB, Tile::Wall, Tile::TeleportA, Tile::TeleportA]
            .iter()
            .enumerate()
            .filter_map(|(i, &tile)| spawn_obstacle(i as u32 + 1, &placement(tile)))
            .collect();
        let pairs = pair_teleports(&obstacles);
        assert_eq!(pairs, vec![TeleportPair { a: 3, b: 1 }]);
        assert_eq!(pairs[0].partner_of(3), Some(1));
        assert_eq!(pairs[0].partner_of(1), Some(3));
        assert_eq!(pairs[0].partner_of(4), None);
    }

    #[test]
    fn test_activation_readiness() {
        assert!(Activation::Active.is_ready());
        assert!(!Activation::CoolingDown.is_ready());
        assert!(Activation::ActiveAgain.is_ready());
    }
}
