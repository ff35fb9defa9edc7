//! Directional input handoff
//!
//! `SharedTilt` is written by an accelerometer thread and read once per tick.
//! Last value wins; neither side ever blocks.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec2;

use crate::sim::TickInput;

/// No sample yet (both halves NaN)
const EMPTY: u64 = u64::MAX;

/// Latest tilt reading shared between a sampling thread and the tick
#[derive(Debug, Clone)]
pub struct SharedTilt {
    bits: Arc<AtomicU64>,
}

impl Default for SharedTilt {
    fn default() -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(EMPTY)),
        }
    }
}

impl SharedTilt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a reading (x, y)
    pub fn store(&self, tilt: Vec2) {
        let packed = ((tilt.x.to_bits() as u64) << 32) | tilt.y.to_bits() as u64;
        self.bits.store(packed, Ordering::Relaxed);
    }

    /// Most recent reading, `None` before the first one
    pub fn load(&self) -> Option<Vec2> {
        let packed = self.bits.load(Ordering::Relaxed);
        if packed == EMPTY {
            return None;
        }
        let x = f32::from_bits((packed >> 32) as u32);
        let y = f32::from_bits(packed as u32);
        Some(Vec2::new(x, y))
    }
}

/// Tracks the engaged touch/mouse position
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    position: Option<Vec2>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch_began(&mut self, pos: Vec2) {
        self.position = Some(pos);
    }

    pub fn touch_moved(&mut self, pos: Vec2) {
        self.position = Some(pos);
    }

    pub fn touch_ended(&mut self) {
        self.position = None;
    }

    pub fn position(&self) -> Option<Vec2> {
        self.position
    }
}

/// Snapshot both signals for one tick
pub fn sample_input(pointer: &PointerTracker, tilt: &SharedTilt) -> TickInput {
    TickInput {
        pointer: pointer.position(),
        tilt: tilt.load(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_tilt_empty_then_latest() {
        let tilt = SharedTilt::new();
        assert_eq!(tilt.load(), None);

        tilt.store(Vec2::new(0.25, -0.5));
        tilt.store(Vec2::new(-0.75, 1.0));
        assert_eq!(tilt.load(), Some(Vec2::new(-0.75, 1.0)));
    }

    #[test]
    fn test_tilt_across_threads() {
        let tilt = SharedTilt::new();
        let producer = tilt.clone();
        thread::spawn(move || {
            for i in 0..100 {
                producer.store(Vec2::new(i as f32, -(i as f32)));
            }
        })
        .join()
        .unwrap();
        assert_eq!(tilt.load(), Some(Vec2::new(99.0, -99.0)));
    }

    #[test]
    fn test_pointer_lifecycle() {
        let mut pointer = PointerTracker::new();
        assert_eq!(pointer.position(), None);
        pointer.touch_began(Vec2::new(10.0, 20.0));
        pointer.touch_moved(Vec2::new(30.0, 40.0));
        assert_eq!(pointer.position(), Some(Vec2::new(30.0, 40.0)));
        pointer.touch_ended();
        assert_eq!(pointer.position(), None);
    }

    #[test]
    fn test_sample_input() {
        let mut pointer = PointerTracker::new();
        let tilt = SharedTilt::new();
        pointer.touch_began(Vec2::new(5.0, 5.0));
        tilt.store(Vec2::new(0.1, 0.2));
        let input = sample_input(&pointer, &tilt);
        assert_eq!(input.pointer, Some(Vec2::new(5.0, 5.0)));
        assert_eq!(input.tilt, Some(Vec2::new(0.1, 0.2)));
    }
}
