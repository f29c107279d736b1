//! Session controller.
//!
//! Turns commands and scheduler frames into engine calls. Every engine mutation is followed,
//! in the same call, by a fresh snapshot pushed to the presenter.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::indicators::Indicators;
use crate::input::{Command, KeyCode, KeyDisposition, SessionPhase, route_key};
use crate::scheduler::{FrameScheduler, ScheduleHandle};
use crate::sim::{Direction, SessionStatus, SimError, Simulation};
use crate::snapshot::{RenderSnapshot, read_snapshot};
use crate::speed::SpeedMultiplier;
use crate::stats::StatsStore;

/// Receives what the player should see.
pub trait Presenter {
    fn render(&mut self, snapshot: &RenderSnapshot);
    fn update_indicators(&mut self, indicators: &Indicators);
}

/// Result of one scheduler tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The engine was paused; nothing was stepped and the loop stopped.
    Skipped,
    Continued(ScheduleHandle),
    Ended(SessionStatus),
}

pub struct Session<S, P, T> {
    sim: S,
    presenter: P,
    stats: T,
    scheduler: FrameScheduler,
    speed: SpeedMultiplier,
    base_fps: u32,
    phase: SessionPhase,
    high_score: u32,
}

impl<S, P, T> Session<S, P, T>
where
    S: Simulation,
    P: Presenter,
    T: StatsStore,
{
    pub fn new(sim: S, presenter: P, stats: T, config: &GameConfig) -> Self {
        let high_score = stats.high_score();
        Self {
            sim,
            presenter,
            stats,
            scheduler: FrameScheduler::new(),
            speed: SpeedMultiplier::new(config.initial_speed, config.min_speed, config.max_speed),
            base_fps: config.base_fps,
            phase: SessionPhase::Idle,
            high_score,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn speed(&self) -> &SpeedMultiplier {
        &self.speed
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn sim(&self) -> &S {
        &self.sim
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn stats(&self) -> &T {
        &self.stats
    }

    pub fn tick_delay(&self) -> Duration {
        self.speed.tick_delay(self.base_fps)
    }

    /// Next time the host loop must wake to poll the scheduler.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.deadline()
    }

    /// Starts a new round. Ignored unless idle; returns whether a round was started.
    pub fn start(&mut self, now: Instant) -> Result<bool, SimError> {
        if self.phase != SessionPhase::Idle {
            debug!(phase = ?self.phase, "start ignored");
            return Ok(false);
        }

        let locked = self.indicators(&read_snapshot(&self.sim)?).starting();
        self.presenter.update_indicators(&locked);

        if let Err(err) = self.sim.reset().and_then(|()| self.sim.start()) {
            warn!(%err, "engine refused to start");
            self.refresh_indicators()?;
            return Err(err);
        }

        self.scheduler.cancel();
        self.phase = SessionPhase::Running;
        self.scheduler.schedule(now, self.tick_delay());
        info!(speed = self.speed.value(), "session started");
        self.redraw()?;
        Ok(true)
    }

    pub fn toggle_pause_resume(&mut self, now: Instant) -> Result<(), SimError> {
        match self.phase {
            SessionPhase::Running => {
                self.sim.pause()?;
                self.scheduler.cancel();
                self.phase = SessionPhase::Paused;
            }
            SessionPhase::Paused => {
                self.sim.resume()?;
                self.phase = SessionPhase::Running;
                self.scheduler.schedule(now, self.tick_delay());
            }
            SessionPhase::Idle => {
                debug!("pause toggle ignored while idle");
                return Ok(());
            }
        }
        self.refresh_indicators()
    }

    /// The primary control: pause or resume a live round, otherwise start one.
    pub fn primary_action(&mut self, now: Instant) -> Result<(), SimError> {
        match self.phase {
            SessionPhase::Running | SessionPhase::Paused => self.toggle_pause_resume(now),
            SessionPhase::Idle => self.start(now).map(|_| ()),
        }
    }

    /// Forwards a heading change while running. The engine decides whether it is legal.
    pub fn change_direction(&mut self, direction: Direction) -> Result<(), SimError> {
        if self.phase != SessionPhase::Running {
            debug!(?direction, phase = ?self.phase, "direction ignored");
            return Ok(());
        }
        self.sim.change_direction(direction)?;
        self.redraw()
    }

    /// Changes the speed multiplier. A running loop uses it from its next scheduled tick.
    pub fn adjust_speed(&mut self, delta: i32) -> Result<(), SimError> {
        if self.speed.adjust(delta) {
            debug!(speed = self.speed.value(), "speed changed");
        }
        self.refresh_indicators()
    }

    pub fn dispatch(&mut self, command: Command, now: Instant) -> Result<(), SimError> {
        match command {
            Command::ChangeDirection(d) => self.change_direction(d),
            Command::TogglePause => self.toggle_pause_resume(now),
            Command::PrimaryAction => self.primary_action(now),
            Command::SpeedUp => self.adjust_speed(1),
            Command::SpeedDown => self.adjust_speed(-1),
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, now: Instant) -> Result<KeyDisposition, SimError> {
        let disposition = route_key(key, self.phase);
        if let Some(command) = disposition.command() {
            self.dispatch(command, now)?;
        }
        Ok(disposition)
    }

    /// Advances the scheduler's delay stage. True means the host should request a frame.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.scheduler.poll(now)
    }

    /// Runs the pending tick if the scheduler was waiting for this frame.
    pub fn on_animation_frame(&mut self, now: Instant) -> Result<Option<TickOutcome>, SimError> {
        match self.scheduler.on_animation_frame() {
            Some(_) => self.on_tick(now).map(Some),
            None => Ok(None),
        }
    }

    pub fn on_tick(&mut self, now: Instant) -> Result<TickOutcome, SimError> {
        // A pause may have landed after this tick was scheduled.
        if self.sim.status() == SessionStatus::Paused {
            self.scheduler.cancel();
            debug!("tick skipped while paused");
            return Ok(TickOutcome::Skipped);
        }

        self.sim.step()?;
        let snapshot = read_snapshot(&self.sim)?;
        self.presenter.render(&snapshot);

        let outcome = if snapshot.status.is_terminal() {
            self.scheduler.cancel();
            self.phase = SessionPhase::Idle;
            let new_high = self.stats.record_game_end(snapshot.points);
            self.high_score = self.high_score.max(snapshot.points);
            info!(status = ?snapshot.status, points = snapshot.points, new_high, "session ended");
            TickOutcome::Ended(snapshot.status)
        } else {
            TickOutcome::Continued(self.scheduler.schedule(now, self.tick_delay()))
        };

        let indicators = self.indicators(&snapshot);
        self.presenter.update_indicators(&indicators);
        Ok(outcome)
    }

    /// Re-reads the engine and repaints both the board and the indicators.
    pub fn redraw(&mut self) -> Result<(), SimError> {
        let snapshot = read_snapshot(&self.sim)?;
        self.presenter.render(&snapshot);
        let indicators = self.indicators(&snapshot);
        self.presenter.update_indicators(&indicators);
        Ok(())
    }

    fn refresh_indicators(&mut self) -> Result<(), SimError> {
        let snapshot = read_snapshot(&self.sim)?;
        let indicators = self.indicators(&snapshot);
        self.presenter.update_indicators(&indicators);
        Ok(())
    }

    fn indicators(&self, snapshot: &RenderSnapshot) -> Indicators {
        Indicators::derive(snapshot, &self.speed, self.high_score)
    }
}
