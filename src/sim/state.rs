//! Game state and core simulation types
//!
//! `GameState` is the whole simulation context. The tick loop owns it and
//! passes it to every operation; nothing lives in globals.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::level::{LevelError, LevelSource, Tile};
use super::obstacle::TeleportPair;
use super::physics::{Player, PhysicsWorld};
use super::progression;
use crate::progress;
use crate::settings::{CampaignEnd, InputMode, LevelEntry, Settings};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Player is live and contacts are processed
    Playing,
    /// Player is being swallowed by a vortex; respawn when the timer runs out
    Dying { elapsed: f32, from: Vec2, vortex: Vec2 },
    /// Player glides onto the finish; next level loads when the timer runs out
    Transitioning { elapsed: f32, from: Vec2, finish: Vec2 },
    /// Last level finished with `CampaignEnd::Stop`
    Complete,
}

/// Fade-out / move / fade-in durations of one teleport hop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeleportTiming {
    pub fade_out: f32,
    pub travel: f32,
    pub fade_in: f32,
}

impl TeleportTiming {
    /// Entering an A node
    pub const A_TO_B: Self = Self {
        fade_out: 0.1,
        travel: 0.4,
        fade_in: 0.1,
    };

    /// Entering a B node
    pub const B_TO_A: Self = Self {
        fade_out: 0.05,
        travel: 0.06,
        fade_in: 0.2,
    };

    pub fn total(&self) -> f32 {
        self.fade_out + self.travel + self.fade_in
    }
}

/// A teleport hop in progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeleportTransit {
    pub from: Vec2,
    pub to: Vec2,
    pub timing: TeleportTiming,
    pub elapsed: f32,
}

impl TeleportTransit {
    pub fn new(from: Vec2, to: Vec2, timing: TeleportTiming) -> Self {
        Self {
            from,
            to,
            timing,
            elapsed: 0.0,
        }
    }

    /// Position and opacity at the current elapsed time
    pub fn sample(&self) -> (Vec2, f32) {
        let TeleportTiming {
            fade_out,
            travel,
            fade_in,
        } = self.timing;
        let t = self.elapsed;

        if t < fade_out {
            (self.from, 1.0 - progress(t, fade_out))
        } else if t < fade_out + travel {
            let along = progress(t - fade_out, travel);
            (self.from.lerp(self.to, along), 0.0)
        } else {
            (self.to, progress(t - fade_out - travel, fade_in))
        }
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.timing.total()
    }
}

/// A teleport node waiting to be re-enabled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cooldown {
    pub obstacle_id: u32,
    /// Simulation time (seconds) at which the node is ready again
    pub ready_at: f64,
}

/// The attached level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelInfo {
    pub index: usize,
    pub name: String,
    pub spawn: Vec2,
    pub teleport_pairs: Vec<TeleportPair>,
}

impl LevelInfo {
    pub fn pair_for(&self, obstacle_id: u32) -> Option<&TeleportPair> {
        self.teleport_pairs.iter().find(|p| p.contains(obstacle_id))
    }
}

/// Why an obstacle left the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalReason {
    /// Star picked up (presentation plays the collect effect)
    Collected,
    LevelUnloaded,
}

/// Notifications for the presentation layer, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelLoaded { index: usize, name: String },
    ObstacleSpawned {
        id: u32,
        kind: Tile,
        pos: Vec2,
        spin_rate: Option<f32>,
    },
    ObstacleRemoved { id: u32, reason: RemovalReason },
    PlayerSpawned { id: u32, pos: Vec2 },
    PlayerDestroyed { id: u32 },
    PlayerDying { id: u32, vortex: Vec2 },
    TeleportStarted {
        from: Vec2,
        to: Vec2,
        timing: TeleportTiming,
    },
    TeleportReady { id: u32 },
    ScoreChanged { score: i64, delta: i64 },
    LevelCompleted { index: usize },
    CampaignComplete,
}

/// Complete simulation context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Score (no floor, no ceiling)
    pub score: i64,
    /// Current phase
    pub phase: GamePhase,
    /// Obstacles, player and gravity
    pub world: PhysicsWorld,
    /// Level currently attached
    pub level: LevelInfo,
    /// Gravity input strategy
    pub input_mode: InputMode,
    /// Campaign, in play order
    pub levels: Vec<LevelEntry>,
    pub campaign_end: CampaignEnd,
    /// Simulation clock (seconds)
    pub time: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Teleport hop in progress
    pub transit: Option<TeleportTransit>,
    /// Pending teleport reactivations
    pub cooldowns: Vec<Cooldown>,
    #[serde(skip)]
    events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Build the simulation and load the first level
    pub fn new(settings: &Settings, source: &dyn LevelSource) -> Result<Self, LevelError> {
        let mut state = Self {
            score: 0,
            phase: GamePhase::Playing,
            world: PhysicsWorld::new(),
            level: LevelInfo::default(),
            input_mode: settings.input_mode,
            levels: settings.levels.clone(),
            campaign_end: settings.on_campaign_end,
            time: 0.0,
            time_ticks: 0,
            transit: None,
            cooldowns: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        };

        progression::load_level(&mut state, 0, source)?;
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn player(&self) -> Option<&Player> {
        self.world.player()
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Apply a score change and notify
    pub fn add_score(&mut self, delta: i64) {
        self.score += delta;
        self.emit(GameEvent::ScoreChanged {
            score: self.score,
            delta,
        });
    }

    /// Create a fresh player at the level's spawn point
    pub fn spawn_player(&mut self) {
        let id = self.next_entity_id();
        let pos = self.level.spawn;
        self.world.spawn_player(Player::new(id, pos));
        self.emit(GameEvent::PlayerSpawned { id, pos });
    }

    /// Remove the player from the world
    pub fn destroy_player(&mut self) {
        if let Some(player) = self.world.take_player() {
            self.emit(GameEvent::PlayerDestroyed { id: player.id });
        }
    }
}
