//! Collision category bits.
//!
//! Every body carries one category bit plus two masks: which categories
//! physically block it and which categories it reports contacts against.
//! Both teleport endpoints share one bit; they are told apart by kind.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CollisionCategory(pub u32);

impl CollisionCategory {
    /// Matches nothing.
    pub const NONE: Self = Self(0);

    /// The player ball.
    pub const PLAYER: Self = Self(1);

    /// Solid maze wall.
    pub const WALL: Self = Self(2);

    /// Collectible star.
    pub const STAR: Self = Self(4);

    /// Hazard that kills the player.
    pub const VORTEX: Self = Self(8);

    /// Level exit.
    pub const FINISH: Self = Self(16);

    /// Either teleport endpoint.
    pub const TELEPORT: Self = Self(32);

    /// Matches everything.
    pub const ALL: Self = Self(u32::MAX);

    /// What the player reports contacts against.
    pub const MASK_PLAYER_CONTACT: Self = Self(
        Self::STAR.0 | Self::VORTEX.0 | Self::FINISH.0 | Self::TELEPORT.0,
    );

    /// What physically stops the player.
    pub const MASK_PLAYER_COLLISION: Self = Self::WALL;

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for CollisionCategory {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for CollisionCategory {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}
