//! Level loading and advancing
//!
//! A level is parsed and built completely before anything in the world is
//! touched, so a bad map leaves the current state intact.

use super::level::{LevelError, LevelSource, Tile, parse_level};
use super::obstacle::{Obstacle, pair_teleports, spawn_obstacle};
use super::state::{GameEvent, GamePhase, GameState, LevelInfo, RemovalReason};
use crate::settings::CampaignEnd;

/// Index of the level after `current`, or `None` when the campaign is over
pub fn next_level_index(current: usize, level_count: usize, end: CampaignEnd) -> Option<usize> {
    if current + 1 < level_count {
        Some(current + 1)
    } else {
        match end {
            CampaignEnd::Loop if level_count > 0 => Some(0),
            _ => None,
        }
    }
}

/// Replace whatever is attached with level `index` and a fresh player.
/// Score is untouched.
pub fn load_level(
    state: &mut GameState,
    index: usize,
    source: &dyn LevelSource,
) -> Result<(), LevelError> {
    let entry = state
        .levels
        .get(index)
        .cloned()
        .ok_or_else(|| LevelError::NotFound {
            name: format!("#{}", index + 1),
        })?;

    let text = source.read_level(&entry.name)?;
    let placements = parse_level(&entry.name, &text)?;

    let obstacles: Vec<Obstacle> = placements
        .iter()
        .filter(|p| p.tile != Tile::Empty)
        .filter_map(|p| spawn_obstacle(state.next_entity_id(), p))
        .collect();
    let teleport_pairs = pair_teleports(&obstacles);

    unload_level(state);

    for obstacle in &obstacles {
        state.emit(GameEvent::ObstacleSpawned {
            id: obstacle.id,
            kind: obstacle.kind,
            pos: obstacle.pos,
            spin_rate: obstacle.spin_rate,
        });
    }
    let obstacle_count = obstacles.len();
    state.world.attach_obstacles(obstacles);

    state.level = LevelInfo {
        index,
        name: entry.name.clone(),
        spawn: entry.spawn_point(),
        teleport_pairs,
    };
    state.spawn_player();
    state.phase = GamePhase::Playing;

    log::info!(
        "Loaded level {} ({}): {} obstacles, {} teleport pairs",
        index + 1,
        entry.name,
        obstacle_count,
        state.level.teleport_pairs.len()
    );
    state.emit(GameEvent::LevelLoaded {
        index,
        name: entry.name,
    });
    Ok(())
}

/// Move on from a finished level
pub fn advance_level(state: &mut GameState, source: &dyn LevelSource) -> Result<(), LevelError> {
    let current = state.level.index;
    match next_level_index(current, state.levels.len(), state.campaign_end) {
        Some(next) => load_level(state, next, source),
        None => {
            unload_level(state);
            state.phase = GamePhase::Complete;
            log::info!("Campaign complete with score {}", state.score);
            state.emit(GameEvent::CampaignComplete);
            Ok(())
        }
    }
}

/// Detach the obstacle set and player, dropping anything scheduled against them
fn unload_level(state: &mut GameState) {
    let (obstacles, player) = state.world.detach_all();
    for obstacle in obstacles {
        state.emit(GameEvent::ObstacleRemoved {
            id: obstacle.id,
            reason: RemovalReason::LevelUnloaded,
        });
    }
    if let Some(player) = player {
        state.emit(GameEvent::PlayerDestroyed { id: player.id });
    }
    if !state.cooldowns.is_empty() {
        log::debug!("Dropping {} pending teleport cooldowns", state.cooldowns.len());
    }
    state.cooldowns.clear();
    state.transit = None;
    state.level.teleport_pairs.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{LevelEntry, Settings};
    use crate::sim::level::MemoryLevelSource;
    use glam::Vec2;

    fn settings(end: CampaignEnd) -> Settings {
        Settings {
            levels: vec![
                LevelEntry::new("one", Vec2::new(96.0, 96.0)),
                LevelEntry::new("two", Vec2::new(160.0, 96.0)),
            ],
            on_campaign_end: end,
            ..Settings::default()
        }
    }

    fn source() -> MemoryLevelSource {
        MemoryLevelSource::new()
            .with_level("one", "xxxxx\nx s x\nx  fx\nxxxxx")
            .with_level("two", "xxxxxx\nxt  Tx\nx  vfx\nxxxxxx")
    }

    fn layout(state: &GameState) -> Vec<(Tile, Vec2)> {
        state
            .world
            .obstacles()
            .iter()
            .map(|o| (o.kind, o.pos))
            .collect()
    }

    #[test]
    fn test_next_level_index() {
        assert_eq!(next_level_index(0, 2, CampaignEnd::Loop), Some(1));
        assert_eq!(next_level_index(1, 2, CampaignEnd::Loop), Some(0));
        assert_eq!(next_level_index(1, 2, CampaignEnd::Stop), None);
        assert_eq!(next_level_index(0, 1, CampaignEnd::Stop), None);
    }

    #[test]
    fn test_initial_load() {
        let state = GameState::new(&settings(CampaignEnd::Loop), &source()).unwrap();
        assert_eq!(state.level.index, 0);
        assert_eq!(state.world.obstacles().len(), 16);
        assert_eq!(state.player().unwrap().pos, Vec2::new(96.0, 96.0));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_advance_swaps_obstacles_and_keeps_score() {
        let mut state = GameState::new(&settings(CampaignEnd::Loop), &source()).unwrap();
        state.score = 7;
        let old_ids: Vec<u32> = state.world.obstacles().iter().map(|o| o.id).collect();
        state.drain_events();

        advance_level(&mut state, &source()).unwrap();

        assert_eq!(state.score, 7);
        assert_eq!(state.level.index, 1);
        assert_eq!(state.level.teleport_pairs.len(), 1);
        assert!(state.world.obstacles().iter().all(|o| !old_ids.contains(&o.id)));
        assert_eq!(state.player().unwrap().pos, Vec2::new(160.0, 96.0));

        let events = state.drain_events();
        let removed = events
            .iter()
            .filter(|e| matches!(e, GameEvent::ObstacleRemoved { reason: RemovalReason::LevelUnloaded, .. }))
            .count();
        assert_eq!(removed, old_ids.len());
        assert!(events.contains(&GameEvent::LevelLoaded {
            index: 1,
            name: "two".to_string()
        }));
    }

    #[test]
    fn test_reload_is_identical() {
        let mut state = GameState::new(&settings(CampaignEnd::Loop), &source()).unwrap();
        let first = layout(&state);
        advance_level(&mut state, &source()).unwrap();
        advance_level(&mut state, &source()).unwrap();
        assert_eq!(state.level.index, 0);
        assert_eq!(layout(&state), first);
    }

    #[test]
    fn test_stop_at_end() {
        let mut state = GameState::new(&settings(CampaignEnd::Stop), &source()).unwrap();
        advance_level(&mut state, &source()).unwrap();
        advance_level(&mut state, &source()).unwrap();
        assert_eq!(state.phase, GamePhase::Complete);
        assert!(state.player().is_none());
        assert!(state.world.obstacles().is_empty());
        assert!(state.drain_events().contains(&GameEvent::CampaignComplete));
    }

    #[test]
    fn test_malformed_next_level_leaves_state_intact() {
        let mut state = GameState::new(&settings(CampaignEnd::Loop), &source()).unwrap();
        let before = layout(&state);
        let broken = source().with_level("two", "xxq");

        let err = advance_level(&mut state, &broken).unwrap_err();
        assert!(matches!(err, LevelError::Malformed { .. }));
        assert_eq!(layout(&state), before);
        assert_eq!(state.level.index, 0);
        assert!(state.player().is_some());
    }

    #[test]
    fn test_missing_level() {
        let only_one = MemoryLevelSource::new().with_level("one", "x");
        let mut state = GameState::new(&settings(CampaignEnd::Loop), &only_one).unwrap();
        assert!(matches!(
            advance_level(&mut state, &only_one),
            Err(LevelError::NotFound { .. })
        ));
        assert!(matches!(
            load_level(&mut state, 5, &only_one),
            Err(LevelError::NotFound { .. })
        ));
    }

    #[test]
    fn test_new_fails_on_missing_first_level() {
        let empty = MemoryLevelSource::new();
        assert!(GameState::new(&settings(CampaignEnd::Loop), &empty).is_err());
    }
}
