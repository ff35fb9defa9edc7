//! Gravity from directional input
//!
//! Two interchangeable strategies. Either returns `None` when it has no
//! signal, in which case the world keeps its previous gravity.

use glam::Vec2;

use super::tick::TickInput;
use crate::consts::{POINTER_GRAVITY_DIVISOR, TILT_GRAVITY_SCALE};
use crate::settings::InputMode;

pub trait GravitySource {
    /// New gravity (metres/s²) for this tick, or `None` to hold the last one
    fn sample(&self, input: &TickInput, player_pos: Vec2) -> Option<Vec2>;
}

/// Pulls the player toward the engaged pointer
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerGravity;

impl GravitySource for PointerGravity {
    fn sample(&self, input: &TickInput, player_pos: Vec2) -> Option<Vec2> {
        input
            .pointer
            .map(|pointer| (pointer - player_pos) / POINTER_GRAVITY_DIVISOR)
    }
}

/// Device tilt; axes are swapped and X negated for landscape orientation
#[derive(Debug, Clone, Copy, Default)]
pub struct TiltGravity;

impl GravitySource for TiltGravity {
    fn sample(&self, input: &TickInput, _player_pos: Vec2) -> Option<Vec2> {
        input
            .tilt
            .map(|tilt| Vec2::new(tilt.y * -TILT_GRAVITY_SCALE, tilt.x * TILT_GRAVITY_SCALE))
    }
}

static POINTER: PointerGravity = PointerGravity;
static TILT: TiltGravity = TiltGravity;

/// Strategy for a configured input mode
pub fn source_for(mode: InputMode) -> &'static dyn GravitySource {
    match mode {
        InputMode::Pointer => &POINTER,
        InputMode::Tilt => &TILT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_offset() {
        let input = TickInput {
            pointer: Some(Vec2::new(300.0, 100.0)),
            ..Default::default()
        };
        let gravity = PointerGravity.sample(&input, Vec2::new(100.0, 300.0));
        assert_eq!(gravity, Some(Vec2::new(2.0, -2.0)));
    }

    #[test]
    fn test_pointer_released_holds() {
        let input = TickInput::default();
        assert_eq!(PointerGravity.sample(&input, Vec2::ZERO), None);
    }

    #[test]
    fn test_tilt_axes() {
        let input = TickInput {
            tilt: Some(Vec2::new(0.2, -0.4)),
            ..Default::default()
        };
        let gravity = TiltGravity.sample(&input, Vec2::ZERO).unwrap();
        assert!((gravity.x - 20.0).abs() < 0.001);
        assert!((gravity.y - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_source_for_mode() {
        let input = TickInput {
            pointer: Some(Vec2::new(100.0, 0.0)),
            tilt: Some(Vec2::new(1.0, 0.0)),
        };
        assert_eq!(
            source_for(InputMode::Pointer).sample(&input, Vec2::ZERO),
            Some(Vec2::new(1.0, 0.0))
        );
        assert_eq!(
            source_for(InputMode::Tilt).sample(&input, Vec2::ZERO),
            Some(Vec2::new(0.0, 50.0))
        );
    }
}
