//! # Aether Drifter Game Loop
//!
//! The loop driver owns the simulation context, the input queue, the event
//! bus and the save writer. An external clock calls [`GameLoop::advance`]
//! once per frame:
//!
//! ```text
//! Frame N:
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. BEGIN FRAME                                                      │
//! │    ├─ Clamp dt to max_dt                                            │
//! │    └─ Drain queued input into InputState                            │
//! │                                                                     │
//! │ 2. DOCKING                                                          │
//! │    └─ Interact pressed? try_dock -> heal, park, save, notify        │
//! │                                                                     │
//! │ 3. SIMULATION TICK (skipped while docked)                           │
//! │    └─ SimulationContext::step -> StateChanged / AsteroidDestroyed   │
//! │                                                                     │
//! │ 4. TIMERS                                                           │
//! │    ├─ Age the on-screen notice                                      │
//! │    └─ Autosave every autosave_interval_secs (to the writer thread)  │
//! │                                                                     │
//! │ 5. END FRAME                                                        │
//! │    └─ Record frame stats                                            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rendering is pull-based: call [`GameLoop::render`] after `advance`.
//! Timers run on wall-clock time; the tick itself uses the clamped `dt`.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use drifter_core::Vec2;
use drifter_economy::{EconomyConfig, GameState, SaveStore};
use drifter_procedural::WorldSeed;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{DrifterError, DrifterResult};
use crate::events::{EventBus, EventReceiver, EventSender, GameEvent, DEFAULT_EVENT_CAPACITY};
use crate::input::{InputHandle, InputQueue, InputState};
use crate::notices::{NoticeBoard, DEFAULT_NOTICE_TTL};
use crate::render::{RenderFrame, SceneRenderer};
use crate::save_writer::{SaveWriter, SaveWriterStats};
use crate::simulation::{SimConfig, SimulationContext, MAX_TICK_DT};

/// Target frame time for 60 FPS.
pub const TARGET_FRAME_TIME: Duration = Duration::from_micros(16_666);

/// Purpose tag for deriving the effects RNG seed from the world seed.
const EFFECTS_RNG_PURPOSE: u64 = 0x5EED_EFFE;

/// Configuration for the game loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameLoopConfig {
    /// View size in pixels.
    pub viewport: Vec2,
    /// Largest dt handed to a tick.
    pub max_dt: f32,
    /// Seconds between autosaves.
    pub autosave_interval_secs: f32,
    /// Seconds a notice stays on screen.
    pub notice_ttl_secs: f32,
    /// Target frames per second.
    pub target_fps: u32,
    /// Event channel capacity.
    pub event_capacity: usize,
    /// World seed. 0 is the classic field.
    pub world_seed: u64,
}

impl Default for GameLoopConfig {
    fn default() -> Self {
        Self {
            viewport: Vec2::new(1280.0, 720.0),
            max_dt: MAX_TICK_DT,
            autosave_interval_secs: 5.0,
            notice_ttl_secs: DEFAULT_NOTICE_TTL,
            target_fps: 60,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            world_seed: 0,
        }
    }
}

impl GameLoopConfig {
    /// Frame budget for the target frame rate.
    #[must_use]
    pub fn frame_budget(&self) -> Duration {
        if self.target_fps == 0 {
            return TARGET_FRAME_TIME;
        }
        Duration::from_secs(1) / self.target_fps
    }
}

/// Frame timing statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    /// Frame number.
    pub frame: u64,
    /// Wall time since the previous frame, in microseconds.
    pub frame_us: u64,
    /// Time spent inside `advance`, in microseconds.
    pub work_us: u64,
    /// dt handed to the tick, after clamping.
    pub dt: f32,
    /// True if the simulation ticked (not docked, player present).
    pub ticked: bool,
    /// Events published this frame.
    pub events_emitted: u32,
}

/// Accumulator for frame statistics.
#[derive(Clone, Debug)]
pub struct FrameStatsAccumulator {
    /// Total frames recorded.
    pub frames_recorded: u64,
    /// Sum of frame times.
    pub frame_us_sum: u64,
    /// Sum of work times.
    pub work_us_sum: u64,
    /// Min frame time.
    pub min_frame_us: u64,
    /// Max frame time.
    pub max_frame_us: u64,
    /// Frames that exceeded budget.
    pub frames_over_budget: u64,
    budget_us: u64,
}

impl FrameStatsAccumulator {
    /// Creates an accumulator against the 60 FPS budget.
    #[must_use]
    pub fn new() -> Self {
        Self::with_budget(TARGET_FRAME_TIME)
    }

    /// Creates an accumulator against a custom frame budget.
    #[must_use]
    pub fn with_budget(budget: Duration) -> Self {
        Self {
            frames_recorded: 0,
            frame_us_sum: 0,
            work_us_sum: 0,
            min_frame_us: u64::MAX,
            max_frame_us: 0,
            frames_over_budget: 0,
            budget_us: budget.as_micros() as u64,
        }
    }

    /// Records a frame's statistics.
    pub fn record(&mut self, stats: FrameStats) {
        self.frames_recorded += 1;
        self.frame_us_sum += stats.frame_us;
        self.work_us_sum += stats.work_us;
        self.min_frame_us = self.min_frame_us.min(stats.frame_us);
        self.max_frame_us = self.max_frame_us.max(stats.frame_us);

        if stats.frame_us > self.budget_us {
            self.frames_over_budget += 1;
        }
    }

    /// Returns average frame time in milliseconds.
    #[must_use]
    pub fn avg_frame_ms(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        (self.frame_us_sum as f64 / self.frames_recorded as f64) / 1000.0
    }

    /// Returns average time spent in `advance`, in milliseconds.
    #[must_use]
    pub fn avg_work_ms(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        (self.work_us_sum as f64 / self.frames_recorded as f64) / 1000.0
    }

    /// Returns average FPS.
    #[must_use]
    pub fn avg_fps(&self) -> f64 {
        let avg_ms = self.avg_frame_ms();
        if avg_ms <= 0.0 {
            return 0.0;
        }
        1000.0 / avg_ms
    }

    /// Returns the fraction of frames over budget.
    #[must_use]
    pub fn over_budget_ratio(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        self.frames_over_budget as f64 / self.frames_recorded as f64
    }

    /// Logs a summary of the statistics.
    pub fn log_summary(&self) {
        if self.frames_recorded == 0 {
            info!("no frames recorded");
            return;
        }
        info!(
            frames = self.frames_recorded,
            avg_frame_ms = format_args!("{:.3}", self.avg_frame_ms()),
            avg_fps = format_args!("{:.1}", self.avg_fps()),
            avg_work_ms = format_args!("{:.3}", self.avg_work_ms()),
            min_frame_ms = format_args!("{:.3}", self.min_frame_us as f64 / 1000.0),
            max_frame_ms = format_args!("{:.3}", self.max_frame_us as f64 / 1000.0),
            over_budget = self.frames_over_budget,
            over_budget_pct = format_args!("{:.1}", self.over_budget_ratio() * 100.0),
            "frame statistics"
        );
    }
}

impl Default for FrameStatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Sleeps away the unused part of each frame budget.
#[derive(Clone, Debug)]
pub struct FramePacer {
    budget: Duration,
    frame_start: Instant,
}

impl FramePacer {
    /// Creates a pacer for `target_fps` (60 if zero).
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let budget = if target_fps == 0 {
            TARGET_FRAME_TIME
        } else {
            Duration::from_secs(1) / target_fps
        };
        Self {
            budget,
            frame_start: Instant::now(),
        }
    }

    /// The per-frame budget.
    #[inline]
    #[must_use]
    pub const fn budget(&self) -> Duration {
        self.budget
    }

    /// Starts a new frame. Returns the time since the previous start.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.frame_start);
        self.frame_start = now;
        elapsed
    }

    /// Sleeps until the current frame's budget is used up.
    pub fn wait(&self) {
        if let Some(rest) = self.budget.checked_sub(self.frame_start.elapsed()) {
            thread::sleep(rest);
        }
    }
}

/// The main game loop orchestrator.
pub struct GameLoop {
    /// Entities, particles and game state.
    sim: SimulationContext,
    /// Resource and upgrade tables.
    economy: EconomyConfig,
    /// Configuration.
    config: GameLoopConfig,
    /// Background persistence.
    writer: SaveWriter,
    /// Presentation events.
    events: EventBus,
    publisher: EventSender,
    /// Input transitions from handlers.
    input: InputQueue,
    input_state: InputState,
    /// The notice on screen.
    notices: NoticeBoard,
    docked: bool,
    running: bool,
    /// Frame counter.
    frame_count: u64,
    autosave_timer: f32,
    events_this_frame: u32,
    /// Accumulated frame statistics.
    stats_accumulator: FrameStatsAccumulator,
}

impl GameLoop {
    /// Loads the save and starts the writer thread.
    ///
    /// The player spawns at the saved position. A `StateChanged` snapshot is
    /// published so the HUD starts with the loaded state.
    ///
    /// # Errors
    ///
    /// - [`DrifterError::Economy`] if the economy tables are invalid
    /// - [`DrifterError::Io`] if the writer thread cannot be started
    pub fn new(
        config: GameLoopConfig,
        sim_config: SimConfig,
        economy: EconomyConfig,
        store: Arc<dyn SaveStore>,
    ) -> DrifterResult<Self> {
        economy.validate()?;
        let state = store.load(&GameState::new(&economy));
        let writer = SaveWriter::spawn(store)?;

        let world_seed = WorldSeed::new(config.world_seed);
        let rng_seed = world_seed.derive(EFFECTS_RNG_PURPOSE).value();
        let sim = SimulationContext::new(state, sim_config, world_seed, config.viewport, rng_seed);

        let events = EventBus::new(config.event_capacity);
        let publisher = events.sender();

        info!(
            credits = sim.state.inventory.credits,
            cargo = sim.state.inventory.total_held(),
            "game loop ready"
        );

        let mut game_loop = Self {
            sim,
            economy,
            notices: NoticeBoard::new(config.notice_ttl_secs),
            stats_accumulator: FrameStatsAccumulator::with_budget(config.frame_budget()),
            config,
            writer,
            events,
            publisher,
            input: InputQueue::new(),
            input_state: InputState::default(),
            docked: false,
            running: true,
            frame_count: 0,
            autosave_timer: 0.0,
            events_this_frame: 0,
        };
        game_loop.publish_state();
        Ok(game_loop)
    }

    /// Runs one frame.
    ///
    /// # Errors
    ///
    /// [`DrifterError::AlreadyShutDown`] after [`shutdown`](Self::shutdown).
    pub fn advance(&mut self, elapsed: Duration) -> DrifterResult<FrameStats> {
        if !self.running {
            return Err(DrifterError::AlreadyShutDown);
        }
        let started = Instant::now();
        let wall = elapsed.as_secs_f32();
        let dt = wall.min(self.config.max_dt);
        self.events_this_frame = 0;

        self.input_state.drain_from(&self.input);

        if self.input_state.take_interact() && !self.docked && self.sim.try_dock() {
            self.enter_station();
        }

        let mut ticked = false;
        if !self.docked {
            let report = self.sim.step(self.input_state.snapshot(), dt);
            ticked = !report.player_missing;
            for destroyed in &report.destroyed {
                self.publish(GameEvent::AsteroidDestroyed {
                    id: destroyed.id,
                    resource: destroyed.resource,
                    drops: destroyed.drops,
                });
            }
            if report.state_changed() {
                self.publish_state();
            }
        }

        self.notices.expire(wall);

        self.autosave_timer += wall;
        if self.autosave_timer >= self.config.autosave_interval_secs {
            self.autosave_timer = 0.0;
            self.sim.sync_position();
            self.writer.submit(self.sim.state.clone());
            debug!(frame = self.frame_count, "autosave queued");
        }

        let stats = FrameStats {
            frame: self.frame_count,
            frame_us: elapsed.as_micros() as u64,
            work_us: started.elapsed().as_micros() as u64,
            dt,
            ticked,
            events_emitted: self.events_this_frame,
        };
        self.frame_count += 1;
        self.stats_accumulator.record(stats);
        Ok(stats)
    }

    /// Builds the current frame and hands it to `renderer`.
    pub fn render(&self, renderer: &mut dyn SceneRenderer) {
        renderer.draw(&self.render_frame());
    }

    /// The current frame's geometry.
    #[must_use]
    pub fn render_frame(&self) -> RenderFrame {
        RenderFrame::build(&self.sim, &self.economy)
    }

    /// Saves a final snapshot, stops the writer and refuses further frames.
    ///
    /// Idempotent.
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        if !self.docked {
            self.sim.sync_position();
        }
        self.writer.submit(self.sim.state.clone());
        self.writer.shutdown();
        info!(frames = self.frame_count, saves = self.writer.stats().written, "game loop shut down");
    }

    /// A receiver for presentation events.
    #[must_use]
    pub fn events(&self) -> EventReceiver {
        self.events.receiver()
    }

    /// Events dropped because the presentation layer fell behind.
    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.events.dropped_count()
    }

    /// A handle for input handlers.
    #[must_use]
    pub fn input_handle(&self) -> InputHandle {
        self.input.handle()
    }

    /// The persistent state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.sim.state
    }

    /// The economy tables.
    #[must_use]
    pub fn economy(&self) -> &EconomyConfig {
        &self.economy
    }

    /// The simulation context.
    #[must_use]
    pub fn simulation(&self) -> &SimulationContext {
        &self.sim
    }

    /// Mutable access to the simulation, for scripted scenarios.
    pub fn simulation_mut(&mut self) -> &mut SimulationContext {
        &mut self.sim
    }

    /// True while the station menu is open.
    #[inline]
    #[must_use]
    pub const fn is_docked(&self) -> bool {
        self.docked
    }

    /// True until [`shutdown`](Self::shutdown).
    #[inline]
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// The notice on screen, if any.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notices.current()
    }

    /// Returns the current frame count.
    #[inline]
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Returns the accumulated statistics.
    #[must_use]
    pub const fn stats(&self) -> &FrameStatsAccumulator {
        &self.stats_accumulator
    }

    /// Save writer counters.
    #[must_use]
    pub fn save_stats(&self) -> SaveWriterStats {
        self.writer.stats()
    }

    fn publish(&mut self, event: GameEvent) {
        if self.publisher.send(event) {
            self.events_this_frame += 1;
        }
    }

    fn publish_state(&mut self) {
        self.publish(GameEvent::StateChanged(Box::new(self.sim.state.clone())));
    }

    fn enter_station(&mut self) {
        self.docked = true;
        self.input_state.clear();
        if !self.writer.submit(self.sim.state.clone()) {
            warn!("dock save not queued");
        }
        self.publish_state();
        self.publish(GameEvent::DockingChanged { docked: true });
    }

    /// Mutable state and tables for a station action.
    pub(crate) fn station_access(&mut self) -> DrifterResult<(&mut GameState, &EconomyConfig)> {
        if !self.running {
            return Err(DrifterError::AlreadyShutDown);
        }
        if !self.docked {
            return Err(DrifterError::NotDocked);
        }
        Ok((&mut self.sim.state, &self.economy))
    }

    /// Persists the state and publishes a snapshot.
    pub(crate) fn commit_state(&mut self) {
        self.writer.submit(self.sim.state.clone());
        self.publish_state();
    }

    /// Shows `message` and publishes it.
    pub(crate) fn post_notice(&mut self, message: &str) {
        self.notices.post(message);
        self.publish(GameEvent::Notice(message.to_owned()));
    }

    /// Closes the station menu and resumes the simulation.
    pub(crate) fn leave_station(&mut self) {
        self.docked = false;
        self.publish(GameEvent::DockingChanged { docked: false });
        info!("undocked");
    }
}

impl Drop for GameLoop {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drifter_economy::MemorySaveStore;

    use crate::input::Action;

    const FRAME: Duration = Duration::from_micros(16_666);

    fn game_loop(store: Arc<MemorySaveStore>) -> GameLoop {
        GameLoop::new(
            GameLoopConfig::default(),
            SimConfig::default(),
            EconomyConfig::default(),
            store,
        )
        .unwrap()
    }

    #[test]
    fn test_game_loop_creation() {
        let game_loop = game_loop(Arc::new(MemorySaveStore::new()));
        assert_eq!(game_loop.frame_count(), 0);
        assert!(!game_loop.is_docked());
        // Initial HUD snapshot.
        let events = game_loop.events().drain();
        assert!(matches!(events.as_slice(), [GameEvent::StateChanged(_)]));
    }

    #[test]
    fn test_frame_cycle() {
        let mut game_loop = game_loop(Arc::new(MemorySaveStore::new()));
        let stats = game_loop.advance(FRAME).unwrap();
        assert_eq!(stats.frame, 0);
        assert!(stats.ticked);
        assert_eq!(game_loop.frame_count(), 1);
        assert_eq!(game_loop.stats().frames_recorded, 1);
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut game_loop = game_loop(Arc::new(MemorySaveStore::new()));
        let stats = game_loop.advance(Duration::from_secs(3)).unwrap();
        assert!((stats.dt - 0.1).abs() < 1e-6);
        assert_eq!(game_loop.stats().frames_over_budget, 1);
    }

    #[test]
    fn test_autosave_every_interval() {
        let store = Arc::new(MemorySaveStore::new());
        let mut game_loop = game_loop(store.clone());
        for _ in 0..11 {
            game_loop.advance(Duration::from_millis(500)).unwrap();
        }
        assert_eq!(game_loop.save_stats().submitted, 1);
        game_loop.shutdown();
        assert_eq!(game_loop.save_stats().submitted, 2);
        assert!(store.save_count() >= 1);
    }

    #[test]
    fn test_interact_out_of_range_does_not_dock() {
        let mut game_loop = game_loop(Arc::new(MemorySaveStore::new()));
        if let Some(index) = game_loop.simulation().player_index() {
            game_loop.simulation_mut().entities[index].pos = Vec2::new(500.0, 0.0);
        }
        game_loop.input_handle().press(Action::Interact);
        game_loop.advance(FRAME).unwrap();
        assert!(!game_loop.is_docked());
    }

    #[test]
    fn test_docked_loop_suspends_simulation() {
        let mut game_loop = game_loop(Arc::new(MemorySaveStore::new()));
        game_loop.input_handle().press(Action::Interact);
        let stats = game_loop.advance(FRAME).unwrap();
        assert!(game_loop.is_docked());
        assert!(!stats.ticked);

        game_loop.input_handle().press(Action::ThrustForward);
        game_loop.advance(FRAME).unwrap();
        let pos = game_loop.simulation().player().map(|p| p.pos);
        assert_eq!(pos, Some(Vec2::new(0.0, -80.0)));
    }

    #[test]
    fn test_advance_after_shutdown() {
        let mut game_loop = game_loop(Arc::new(MemorySaveStore::new()));
        game_loop.shutdown();
        game_loop.shutdown();
        assert!(!game_loop.is_running());
        assert!(matches!(game_loop.advance(FRAME), Err(DrifterError::AlreadyShutDown)));
    }

    #[test]
    fn test_stats_accumulator() {
        let mut acc = FrameStatsAccumulator::new();

        for i in 0..100 {
            acc.record(FrameStats {
                frame: i,
                frame_us: 10_000 + (i * 100),
                work_us: 2_000,
                dt: 0.016,
                ticked: true,
                events_emitted: 0,
            });
        }

        assert_eq!(acc.frames_recorded, 100);
        assert!(acc.avg_fps() > 50.0);
        assert!(acc.avg_fps() < 100.0);
        assert_eq!(acc.min_frame_us, 10_000);
        assert_eq!(acc.max_frame_us, 19_900);
        // 16_700 and up exceed the 16_666 budget.
        assert_eq!(acc.frames_over_budget, 33);
    }

    #[test]
    fn test_frame_pacer_budget() {
        assert_eq!(FramePacer::new(50).budget(), Duration::from_millis(20));
        assert_eq!(FramePacer::new(0).budget(), TARGET_FRAME_TIME);
        let mut pacer = FramePacer::new(1000);
        pacer.tick();
        pacer.wait();
        assert!(pacer.tick() >= Duration::from_millis(1));
    }
}
