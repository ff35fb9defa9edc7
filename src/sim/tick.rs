//! Fixed timestep simulation tick
//!
//! Order within a tick: sample gravity → step physics → dispatch contacts →
//! update score and phase. Timed transitions (death, finish, teleport
//! cooldown) are polled here every tick.

use std::f32::consts::PI;

use glam::Vec2;

use super::gravity;
use super::level::{LevelError, LevelSource, Tile};
use super::obstacle::Activation;
use super::physics::{BodyMode, Contact};
use super::progression;
use super::state::{
    Cooldown, GameEvent, GamePhase, GameState, RemovalReason, TeleportTiming, TeleportTransit,
};
use crate::consts::*;
use crate::progress;

/// Directional input for a single tick (last sampled values)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Engaged pointer in world units, `None` while released
    pub pointer: Option<Vec2>,
    /// Latest accelerometer reading (x, y), `None` before the first sample
    pub tilt: Option<Vec2>,
}

/// Advance the game state by one fixed timestep.
///
/// `dt` is meant to be `SIM_DT`. The physics step clamps anything above
/// `MAX_STEP_DT` so an oversized step cannot carry the player through a wall.
///
/// Only the level swap at the end of a finish transition can fail; the state
/// then stays in `Transitioning` and the swap is retried next tick.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    source: &dyn LevelSource,
    dt: f32,
) -> Result<(), LevelError> {
    if state.phase == GamePhase::Complete {
        return Ok(());
    }

    state.time_ticks += 1;
    state.time += dt as f64;
    process_cooldowns(state);

    match state.phase {
        GamePhase::Playing => {
            if let Some(player_pos) = state.player().map(|p| p.pos) {
                let strategy = gravity::source_for(state.input_mode);
                if let Some(gravity) = strategy.sample(input, player_pos) {
                    state.world.gravity = gravity;
                }
            }

            advance_transit(state, dt);

            let contacts = state.world.step(dt);
            for contact in contacts {
                if !state.is_playing() {
                    log::debug!("Ignoring contact with {} after phase change", contact.obstacle_id);
                    break;
                }
                handle_contact(state, contact);
            }
        }
        GamePhase::Dying { .. } => advance_dying(state, dt),
        GamePhase::Transitioning { .. } => advance_finish(state, dt, source)?,
        GamePhase::Complete => {}
    }

    Ok(())
}

/// Dispatch one contact by the sensor's kind
fn handle_contact(state: &mut GameState, contact: Contact) {
    if state.player().map(|p| p.id) != Some(contact.player_id) {
        return;
    }
    // Already removed earlier this tick
    let Some(obstacle) = state.world.obstacle(contact.obstacle_id) else {
        return;
    };
    let (id, kind, pos) = (obstacle.id, obstacle.kind, obstacle.pos);

    match kind {
        Tile::Star => collect_star(state, id),
        Tile::Vortex => enter_vortex(state, pos),
        Tile::Finish => reach_finish(state, pos),
        kind if kind.is_teleport() => enter_teleport(state, id, kind),
        _ => {}
    }
}

fn collect_star(state: &mut GameState, id: u32) {
    if state.world.remove_obstacle(id).is_none() {
        return;
    }
    state.emit(GameEvent::ObstacleRemoved {
        id,
        reason: RemovalReason::Collected,
    });
    state.add_score(1);
}

fn enter_vortex(state: &mut GameState, vortex: Vec2) {
    let Some(player) = state.world.player_mut() else {
        return;
    };
    player.body = BodyMode::Frozen;
    player.alive = false;
    player.alpha = 1.0;
    let (id, from) = (player.id, player.pos);

    state.transit = None;
    state.phase = GamePhase::Dying {
        elapsed: 0.0,
        from,
        vortex,
    };
    state.add_score(-1);
    log::debug!("Player {} fell into vortex at {}", id, vortex);
    state.emit(GameEvent::PlayerDying { id, vortex });
}

fn enter_teleport(state: &mut GameState, id: u32, kind: Tile) {
    let Some(partner_id) = state.level.pair_for(id).and_then(|p| p.partner_of(id)) else {
        log::debug!("Teleport {} has no partner", id);
        return;
    };
    let Some(node) = state.world.obstacle(id) else {
        return;
    };
    if !node.activation.is_ready() {
        log::debug!("Teleport {} cooling down", id);
        return;
    }
    let Some(destination) = state.world.obstacle(partner_id).map(|o| o.pos) else {
        return;
    };

    // Lock both ends so arriving on the partner cannot bounce straight back
    let ready_at = state.time + TELEPORT_COOLDOWN as f64;
    for node_id in [id, partner_id] {
        if let Some(node) = state.world.obstacle_mut(node_id) {
            node.activation = Activation::CoolingDown;
        }
        state.cooldowns.retain(|c| c.obstacle_id != node_id);
        state.cooldowns.push(Cooldown {
            obstacle_id: node_id,
            ready_at,
        });
    }

    let timing = match kind {
        Tile::TeleportA => TeleportTiming::A_TO_B,
        _ => TeleportTiming::B_TO_A,
    };
    let Some(player) = state.world.player_mut() else {
        return;
    };
    player.body = BodyMode::Scripted;
    let from = player.pos;

    log::debug!("Teleport {} -> {} ({} -> {})", id, partner_id, from, destination);
    state.transit = Some(TeleportTransit::new(from, destination, timing));
    state.emit(GameEvent::TeleportStarted {
        from,
        to: destination,
        timing,
    });
}

fn reach_finish(state: &mut GameState, finish: Vec2) {
    let Some(player) = state.world.player_mut() else {
        return;
    };
    player.body = BodyMode::Frozen;
    player.alpha = 1.0;
    let from = player.pos;

    state.transit = None;
    state.phase = GamePhase::Transitioning {
        elapsed: 0.0,
        from,
        finish,
    };
    log::info!("Level {} ({}) complete", state.level.index + 1, state.level.name);
    state.emit(GameEvent::LevelCompleted {
        index: state.level.index,
    });
}

/// Move the player along an active teleport hop. The in-between positions are
/// visual only; the body senses nothing until it lands on the partner node.
fn advance_transit(state: &mut GameState, dt: f32) {
    let Some(mut transit) = state.transit else {
        return;
    };
    transit.elapsed += dt;
    let done = transit.is_done();
    let (pos, alpha) = transit.sample();

    if let Some(player) = state.world.player_mut() {
        player.pos = pos;
        player.alpha = alpha;
        if done {
            player.pos = transit.to;
            player.body = BodyMode::Dynamic;
            player.alpha = 1.0;
        }
    }
    state.transit = if done { None } else { Some(transit) };
}

/// Shrink and spin into the vortex, then respawn
fn advance_dying(state: &mut GameState, dt: f32) {
    let GamePhase::Dying {
        elapsed,
        from,
        vortex,
    } = state.phase
    else {
        return;
    };
    let elapsed = elapsed + dt;
    let t = progress(elapsed, DEATH_DURATION);

    if let Some(player) = state.world.player_mut() {
        player.pos = from.lerp(vortex, t);
        player.scale = 1.0 + (DEATH_MIN_SCALE - 1.0) * t;
        player.rotation = -PI * t;
    }

    if elapsed < DEATH_DURATION {
        state.phase = GamePhase::Dying {
            elapsed,
            from,
            vortex,
        };
        return;
    }

    state.destroy_player();
    state.spawn_player();
    state.phase = GamePhase::Playing;
    log::debug!("Respawned at {}", state.level.spawn);
}

/// Glide onto the finish, then swap in the next level
fn advance_finish(
    state: &mut GameState,
    dt: f32,
    source: &dyn LevelSource,
) -> Result<(), LevelError> {
    let GamePhase::Transitioning {
        elapsed,
        from,
        finish,
    } = state.phase
    else {
        return Ok(());
    };
    let retrying = elapsed >= FINISH_DURATION;
    let elapsed = (elapsed + dt).min(FINISH_DURATION);
    state.phase = GamePhase::Transitioning {
        elapsed,
        from,
        finish,
    };

    if let Some(player) = state.world.player_mut() {
        player.pos = from.lerp(finish, progress(elapsed, FINISH_DURATION));
    }

    if elapsed < FINISH_DURATION {
        return Ok(());
    }

    progression::advance_level(state, source).inspect_err(|err| {
        log::log!(
            load_failure_level(retrying),
            "Could not start next level: {}",
            err
        )
    })
}

/// Report the first failed level swap loudly, quieter on every retry
fn load_failure_level(retrying: bool) -> log::Level {
    if retrying {
        log::Level::Debug
    } else {
        log::Level::Error
    }
}

/// Re-enable teleport nodes whose lockout has run out
fn process_cooldowns(state: &mut GameState) {
    if state.cooldowns.is_empty() {
        return;
    }
    let now = state.time;
    let (due, pending): (Vec<Cooldown>, Vec<Cooldown>) = std::mem::take(&mut state.cooldowns)
        .into_iter()
        .partition(|c| c.ready_at <= now);
    state.cooldowns = pending;

    for cooldown in due {
        match state.world.obstacle_mut(cooldown.obstacle_id) {
            Some(node) => {
                node.activation = Activation::ActiveAgain;
                state.emit(GameEvent::TeleportReady {
                    id: cooldown.obstacle_id,
                });
            }
            None => log::debug!("Dropping cooldown for missing teleport {}", cooldown.obstacle_id),
        }
    }
}
