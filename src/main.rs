//! Tilt Maze - headless native runner
//!
//! Drives the simulation with a fixed timestep and logs the event stream a
//! presentation layer would consume. Tilt readings come from a simulated
//! accelerometer thread; pointer mode traces a circle around the spawn.
//!
//! Usage: `tilt-maze [settings.json] [--seconds N] [--dump]`

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use tilt_maze::consts::SIM_DT;
use tilt_maze::platform::input::{PointerTracker, SharedTilt, sample_input};
use tilt_maze::sim::{DirLevelSource, GameEvent, GamePhase, GameState, tick};
use tilt_maze::{InputMode, Settings};

/// Cap on ticks run for a single slow frame
const MAX_TICKS_PER_FRAME: u32 = 8;
/// Accelerometer sample period
const TILT_SAMPLE_PERIOD: Duration = Duration::from_millis(10);
const FRAME_PERIOD: Duration = Duration::from_millis(16);

struct Args {
    settings_path: PathBuf,
    seconds: f32,
    dump: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        settings_path: PathBuf::from("settings.json"),
        seconds: 30.0,
        dump: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--dump" => args.dump = true,
            "--seconds" => match iter.next().and_then(|s| s.parse().ok()) {
                Some(seconds) => args.seconds = seconds,
                None => log::warn!("--seconds needs a number, keeping {}", args.seconds),
            },
            path => args.settings_path = PathBuf::from(path),
        }
    }
    args
}

/// Simulated accelerometer: a slow random walk in [-1, 1]
fn spawn_tilt_sampler(tilt: SharedTilt, running: Arc<AtomicBool>, seed: u64) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut reading = Vec2::ZERO;
        while running.load(Ordering::Relaxed) {
            let nudge = Vec2::new(rng.random_range(-0.05..0.05), rng.random_range(-0.05..0.05));
            reading = (reading + nudge).clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
            tilt.store(reading);
            thread::sleep(TILT_SAMPLE_PERIOD);
        }
    })
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::ObstacleSpawned { .. } | GameEvent::ObstacleRemoved { .. } => {
            log::trace!("{:?}", event)
        }
        GameEvent::LevelLoaded { index, name } => log::info!("Level {} ({}) ready", index + 1, name),
        GameEvent::ScoreChanged { score, delta } => log::info!("Score {} ({:+})", score, delta),
        GameEvent::CampaignComplete => log::info!("Campaign complete"),
        other => log::debug!("{:?}", other),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Tilt Maze (headless) starting...");

    let args = parse_args();
    let settings = Settings::load_from(&args.settings_path);
    let source = DirLevelSource::new(settings.level_dir.clone());

    let mut state = match GameState::new(&settings, &source) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("Failed to load first level: {}", err);
            std::process::exit(1);
        }
    };

    let tilt = SharedTilt::new();
    let running = Arc::new(AtomicBool::new(true));
    let sampler = match settings.input_mode {
        InputMode::Tilt => {
            let seed = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            log::info!("Tilt sampler seed {}", seed);
            Some(spawn_tilt_sampler(tilt.clone(), Arc::clone(&running), seed))
        }
        InputMode::Pointer => None,
    };
    let mut pointer = PointerTracker::new();

    let start = Instant::now();
    let mut last = start;
    let mut accumulator = 0.0f32;

    while start.elapsed().as_secs_f32() < args.seconds && state.phase != GamePhase::Complete {
        let now = Instant::now();
        let dt = (now - last).as_secs_f32().min(0.1);
        last = now;
        accumulator += dt;

        if settings.input_mode == InputMode::Pointer {
            if let Some(player) = state.player() {
                let angle = start.elapsed().as_secs_f32();
                let target = player.pos + Vec2::from_angle(angle) * 200.0;
                match pointer.position() {
                    Some(_) => pointer.touch_moved(target),
                    None => pointer.touch_began(target),
                }
            } else {
                pointer.touch_ended();
            }
        }

        let mut ticks = 0;
        while accumulator >= SIM_DT && ticks < MAX_TICKS_PER_FRAME {
            let input = sample_input(&pointer, &tilt);
            if let Err(err) = tick(&mut state, &input, &source, SIM_DT) {
                log::error!("Tick failed: {}", err);
            }
            accumulator -= SIM_DT;
            ticks += 1;
        }

        for event in state.drain_events() {
            log_event(&event);
        }

        thread::sleep(FRAME_PERIOD);
    }

    running.store(false, Ordering::Relaxed);
    if let Some(handle) = sampler {
        if handle.join().is_err() {
            log::warn!("Tilt sampler panicked");
        }
    }

    log::info!(
        "Stopped after {:.1}s of sim time, level {}, score {}",
        state.time,
        state.level.index + 1,
        state.score
    );

    if args.dump {
        match serde_json::to_string_pretty(&state) {
            Ok(json) => println!("{}", json),
            Err(err) => log::error!("Failed to serialize state: {}", err),
        }
    }
}
