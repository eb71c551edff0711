//! # Aether Drifter Headless Driver
//!
//! Runs the full game loop without a window, flown by a scripted autopilot.
//! Useful for soak runs and for watching the streaming and economy logs.
//!
//! ## CRITICAL REQUIREMENTS
//! - NO GPU
//! - NO WINDOW
//!
//! ## Usage
//!
//! ```bash
//! drifter_headless [config.toml] [--seconds N]
//!
//! # More detail
//! RUST_LOG=debug drifter_headless --seconds 30
//! ```
//!
//! The autopilot mines the nearest asteroid in laser range, chases nearby
//! drops, flies home when the hold is full, sells, buys the cheapest
//! affordable upgrade and heads back out.

use std::f32::consts::PI;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use drifter::render::CountingRenderer;
use drifter::{Action, DrifterConfig, DrifterError, DrifterResult, FramePacer, GameEvent, GameLoop, InputHandle, SimulationContext};
use drifter_core::{EntityKind, Vec2};
use drifter_economy::{FileSaveStore, SaveStore};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Default run length.
const DEFAULT_SECONDS: f64 = 10.0;

/// Drops closer than this are worth chasing.
const DROP_CHASE_RADIUS: f32 = 400.0;

/// Command line.
#[derive(Debug)]
struct Args {
    config: Option<PathBuf>,
    duration: Duration,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> DrifterResult<Args> {
    let mut config = None;
    let mut seconds = DEFAULT_SECONDS;
    while let Some(arg) = args.next() {
        if arg == "--seconds" {
            let value = args
                .next()
                .ok_or_else(|| DrifterError::Config("--seconds needs a value".into()))?;
            seconds = value
                .parse::<f64>()
                .ok()
                .filter(|s| s.is_finite() && *s > 0.0)
                .ok_or_else(|| DrifterError::Config(format!("invalid --seconds value: {value}")))?;
        } else if config.is_none() {
            config = Some(PathBuf::from(arg));
        } else {
            return Err(DrifterError::Config(format!("unexpected argument: {arg}")));
        }
    }
    Ok(Args {
        config,
        duration: Duration::from_secs_f64(seconds),
    })
}

/// Wraps an angle into `(-PI, PI]`.
fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}

/// Scripted pilot. Turns its wanted actions into press/release events.
#[derive(Debug, Default)]
struct Autopilot {
    held: Vec<Action>,
}

impl Autopilot {
    fn plan(sim: &SimulationContext) -> Vec<Action> {
        let Some(ship) = sim.player() else {
            return Vec::new();
        };
        let stats = sim.state.player;

        let steer_to = |target: Vec2, actions: &mut Vec<Action>| {
            let offset = target - ship.pos;
            let turn = wrap_angle(offset.y.atan2(offset.x) - ship.angle);
            if turn > stats.turn_speed {
                actions.push(Action::TurnRight);
            } else if turn < -stats.turn_speed {
                actions.push(Action::TurnLeft);
            }
            turn.abs()
        };

        let mut actions = Vec::new();

        if !sim.state.has_cargo_space() {
            if sim.in_docking_range() {
                actions.push(Action::Interact);
            } else if steer_to(Vec2::ZERO, &mut actions) < PI / 4.0 {
                actions.push(Action::ThrustForward);
            }
            return actions;
        }

        let nearest = |kind: EntityKind| {
            sim.entities
                .iter()
                .filter(|e| e.kind == kind && !e.is_removed())
                .map(|e| (e.pos, e.pos.distance(ship.pos)))
                .min_by(|a, b| a.1.total_cmp(&b.1))
        };

        match nearest(EntityKind::Asteroid) {
            Some((rock, distance)) if distance < stats.laser_range => {
                let heading = Vec2::from_angle(ship.angle);
                let aligned = heading.dot((rock - ship.pos).normalize_or_zero()) >= sim.config().laser_cone;
                steer_to(rock, &mut actions);
                if aligned {
                    actions.push(Action::FireLaser);
                }
            }
            _ => {
                let target = match nearest(EntityKind::Resource) {
                    Some((drop, distance)) if distance < DROP_CHASE_RADIUS => drop,
                    _ => nearest(EntityKind::Asteroid).map_or(ship.pos + Vec2::from_angle(ship.angle), |(rock, _)| rock),
                };
                if steer_to(target, &mut actions) < PI / 4.0 {
                    actions.push(Action::ThrustForward);
                }
            }
        }
        actions
    }

    fn apply(&mut self, input: &InputHandle, mut wanted: Vec<Action>) {
        // Interact is a tap: press and release in the same frame.
        if let Some(index) = wanted.iter().position(|&a| a == Action::Interact) {
            wanted.swap_remove(index);
            input.press(Action::Interact);
            input.release(Action::Interact);
        }
        for &action in &self.held {
            if !wanted.contains(&action) {
                input.release(action);
            }
        }
        for &action in &wanted {
            if !self.held.contains(&action) {
                input.press(action);
            }
        }
        self.held = wanted;
    }

    /// Sells, buys the cheapest affordable upgrade and leaves.
    fn visit_station(&mut self, game: &mut GameLoop, input: &InputHandle) -> DrifterResult<()> {
        self.apply(input, Vec::new());

        let sale = game.sell_all()?;
        info!(message = %sale.message, "station");

        let cheapest = game
            .upgrade_catalogue()
            .into_iter()
            .filter(|offer| offer.affordable)
            .min_by_key(|offer| offer.next_cost);
        if let Some(offer) = cheapest {
            let purchase = game.purchase_upgrade(&offer.id)?;
            info!(message = %purchase.message, "station");
        }

        game.undock()?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct RunSummary {
    destroyed: u64,
    drops: u64,
    dockings: u64,
    notices: u64,
}

impl RunSummary {
    fn observe(&mut self, event: &GameEvent) {
        match event {
            GameEvent::AsteroidDestroyed { drops, resource, .. } => {
                self.destroyed += 1;
                self.drops += u64::from(*drops);
                debug!(?resource, drops, "asteroid destroyed");
            }
            GameEvent::DockingChanged { docked: true } => self.dockings += 1,
            GameEvent::Notice(_) => self.notices += 1,
            GameEvent::DockingChanged { docked: false } | GameEvent::StateChanged(_) => {}
        }
    }
}

fn run(args: Args) -> DrifterResult<()> {
    let config = match &args.config {
        Some(path) => DrifterConfig::from_toml_file(path)?,
        None => DrifterConfig::default(),
    };
    let save_path = config.save_path.clone().unwrap_or_else(FileSaveStore::default_path);
    info!(save = %save_path.display(), seconds = args.duration.as_secs_f64(), "starting headless run");

    let store: Arc<dyn SaveStore> = Arc::new(FileSaveStore::new(save_path));
    let mut pacer = FramePacer::new(config.game_loop.target_fps);
    let mut game = GameLoop::new(config.game_loop, config.simulation, config.economy, store)?;

    let input = game.input_handle();
    let events = game.events();
    let mut autopilot = Autopilot::default();
    let mut renderer = CountingRenderer::default();
    let mut summary = RunSummary::default();

    let deadline = Instant::now() + args.duration;
    pacer.tick();
    while Instant::now() < deadline {
        let elapsed = pacer.tick();
        game.advance(elapsed)?;

        for event in events.drain() {
            summary.observe(&event);
        }

        if game.is_docked() {
            autopilot.visit_station(&mut game, &input)?;
        } else {
            autopilot.apply(&input, Autopilot::plan(game.simulation()));
        }

        game.render(&mut renderer);
        pacer.wait();
    }

    game.shutdown();
    game.stats().log_summary();

    let state = game.state();
    let position = renderer.last.as_ref().and_then(|frame| frame.position_readout);
    info!(
        frames = renderer.frames,
        destroyed = summary.destroyed,
        drops = summary.drops,
        dockings = summary.dockings,
        notices = summary.notices,
        credits = state.inventory.credits,
        cargo = state.inventory.total_held(),
        ?position,
        dropped_events = game.dropped_events(),
        saves = game.save_stats().written,
        "headless run complete"
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let result = parse_args(std::env::args().skip(1)).and_then(run);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "headless run failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> DrifterResult<Args> {
        parse_args(list.iter().map(|s| (*s).to_owned()))
    }

    #[test]
    fn test_parse_defaults() {
        let parsed = args(&[]).unwrap();
        assert!(parsed.config.is_none());
        assert_eq!(parsed.duration, Duration::from_secs(10));
    }

    #[test]
    fn test_parse_config_and_seconds() {
        let parsed = args(&["game.toml", "--seconds", "2.5"]).unwrap();
        assert_eq!(parsed.config, Some(PathBuf::from("game.toml")));
        assert_eq!(parsed.duration, Duration::from_millis(2500));
    }

    #[test]
    fn test_parse_rejects_bad_seconds() {
        assert!(args(&["--seconds"]).is_err());
        assert!(args(&["--seconds", "-1"]).is_err());
        assert!(args(&["a.toml", "b.toml"]).is_err());
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
        assert!((wrap_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-5);
        assert!((wrap_angle(0.25) - 0.25).abs() < 1e-6);
    }
}
