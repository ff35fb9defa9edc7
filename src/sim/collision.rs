//! Collision detection and response for the maze
//!
//! The player is a circle; walls are axis-aligned squares; every sensor is a
//! circle. Tiles are axis aligned so no rotation is ever involved.

use glam::Vec2;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest point on the obstacle (if hit)
    pub point: Vec2,
    /// Surface normal pointing from the obstacle toward the circle center
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a circle against an axis-aligned rectangle
pub fn circle_rect_collision(
    center: Vec2,
    radius: f32,
    rect_center: Vec2,
    half_extents: Vec2,
) -> CollisionResult {
    let min = rect_center - half_extents;
    let max = rect_center + half_extents;
    let closest = center.clamp(min, max);
    let offset = center - closest;
    let dist = offset.length();

    if dist >= radius {
        return CollisionResult::miss();
    }

    if dist > 1e-5 {
        return CollisionResult {
            hit: true,
            point: closest,
            normal: offset / dist,
            penetration: radius - dist,
        };
    }

    // Center is inside the rectangle - push out along the shallowest axis
    let local = center - rect_center;
    let overlap_x = half_extents.x - local.x.abs();
    let overlap_y = half_extents.y - local.y.abs();
    let (normal, penetration) = if overlap_x < overlap_y {
        (Vec2::new(sign_or_one(local.x), 0.0), overlap_x + radius)
    } else {
        (Vec2::new(0.0, sign_or_one(local.y)), overlap_y + radius)
    };

    CollisionResult {
        hit: true,
        point: closest,
        normal,
        penetration,
    }
}

#[inline]
fn sign_or_one(v: f32) -> f32 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

/// Check a circle against a solid circle
///
/// No shipped tile is a solid circle; this backs the generic `Collider::Circle`
/// path in the solid pass.
pub fn circle_circle_collision(
    center: Vec2,
    radius: f32,
    other_center: Vec2,
    other_radius: f32,
) -> CollisionResult {
    let offset = center - other_center;
    let dist = offset.length();
    let reach = radius + other_radius;

    if dist >= reach {
        return CollisionResult::miss();
    }

    let normal = if dist > 1e-5 { offset / dist } else { Vec2::Y };
    CollisionResult {
        hit: true,
        point: other_center + normal * other_radius,
        normal,
        penetration: reach - dist,
    }
}

/// Whether two circles touch or overlap
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    a.distance_squared(b) < reach * reach
}

/// Remove the velocity component driving into a surface, with bounce
///
/// v' = v - (1 + e)(v·n)n when moving into the surface, unchanged otherwise
#[inline]
pub fn bounce_velocity(velocity: Vec2, normal: Vec2, restitution: f32) -> Vec2 {
    let into = velocity.dot(normal);
    if into >= 0.0 {
        return velocity;
    }
    velocity - (1.0 + restitution) * into * normal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_rect_side_hit() {
        // Wall at (100, 100), 64x64; circle touching its right face
        let result = circle_rect_collision(
            Vec2::new(150.0, 100.0),
            24.0,
            Vec2::new(100.0, 100.0),
            Vec2::splat(32.0),
        );
        assert!(result.hit);
        assert!((result.normal - Vec2::X).length() < 0.001);
        assert!((result.penetration - 6.0).abs() < 0.001);
        assert!((result.point - Vec2::new(132.0, 100.0)).length() < 0.001);
    }

    #[test]
    fn test_circle_rect_corner_miss() {
        // Diagonal from the corner, farther than the radius
        let result = circle_rect_collision(
            Vec2::new(152.0, 152.0),
            24.0,
            Vec2::new(100.0, 100.0),
            Vec2::splat(32.0),
        );
        assert!(!result.hit);
    }

    #[test]
    fn test_circle_center_inside_rect() {
        let result = circle_rect_collision(
            Vec2::new(90.0, 128.0),
            24.0,
            Vec2::new(100.0, 100.0),
            Vec2::splat(32.0),
        );
        assert!(result.hit);
        // Closest face is the top one
        assert_eq!(result.normal, Vec2::Y);
        assert!((result.penetration - 28.0).abs() < 0.001);
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 24.0, Vec2::new(50.0, 0.0), 32.0));
        assert!(!circles_overlap(Vec2::ZERO, 24.0, Vec2::new(56.0, 0.0), 32.0));
    }

    #[test]
    fn test_circle_circle_push_out() {
        let result = circle_circle_collision(Vec2::new(40.0, 0.0), 24.0, Vec2::ZERO, 32.0);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::X);
        assert!((result.penetration - 16.0).abs() < 0.001);

        let miss = circle_circle_collision(Vec2::new(60.0, 0.0), 24.0, Vec2::ZERO, 32.0);
        assert!(!miss.hit);
    }

    #[test]
    fn test_bounce_velocity() {
        // Moving left into a wall whose normal points right
        let bounced = bounce_velocity(Vec2::new(-100.0, 10.0), Vec2::X, 0.2);
        assert!((bounced.x - 20.0).abs() < 0.001);
        assert!((bounced.y - 10.0).abs() < 0.001);

        // Moving away is untouched
        let away = bounce_velocity(Vec2::new(100.0, 0.0), Vec2::X, 0.2);
        assert_eq!(away, Vec2::new(100.0, 0.0));
    }
}
