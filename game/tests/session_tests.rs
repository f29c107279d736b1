use std::cell::Cell;
use std::time::{Duration, Instant};

use snake_game::config::GameConfig;
use snake_game::indicators::Indicators;
use snake_game::input::{Command, KeyCode, KeyDisposition, SessionPhase};
use snake_game::jungle::JungleSim;
use snake_game::session::{Presenter, Session, TickOutcome};
use snake_game::sim::{CellView, Direction, SessionStatus, SimError, Simulation};
use snake_game::snapshot::RenderSnapshot;
use snake_game::stats::{GameStorage, MemoryStore, StatsStore};

/// Engine double that records every mutating call.
#[derive(Debug)]
struct FakeSim {
    width: u32,
    cells: Vec<u32>,
    status: SessionStatus,
    points: u32,
    direction: Option<Direction>,
    /// Status the next `step` lands in while playing.
    after_step: SessionStatus,
    fail_reset: bool,
    calls: Vec<&'static str>,
}

impl FakeSim {
    fn new() -> Self {
        Self {
            width: 10,
            cells: vec![12, 11, 10],
            status: SessionStatus::NotStarted,
            points: 0,
            direction: None,
            after_step: SessionStatus::Playing,
            fail_reset: false,
            calls: Vec::new(),
        }
    }

    fn count(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }
}

impl Simulation for FakeSim {
    fn create(width: u32, spawn_index: u32) -> Result<Self, SimError> {
        Ok(Self {
            width,
            cells: vec![spawn_index],
            ..Self::new()
        })
    }

    fn start(&mut self) -> Result<(), SimError> {
        self.calls.push("start");
        self.status = SessionStatus::Playing;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), SimError> {
        self.calls.push("pause");
        self.status = SessionStatus::Paused;
        Ok(())
    }

    fn resume(&mut self) -> Result<(), SimError> {
        self.calls.push("resume");
        self.status = SessionStatus::Playing;
        Ok(())
    }

    fn reset(&mut self) -> Result<(), SimError> {
        self.calls.push("reset");
        if self.fail_reset {
            return Err(SimError::NotInitialized);
        }
        self.status = SessionStatus::NotStarted;
        self.points = 0;
        Ok(())
    }

    fn step(&mut self) -> Result<(), SimError> {
        self.calls.push("step");
        if self.status == SessionStatus::Playing {
            self.status = self.after_step;
            self.points += 1;
        }
        Ok(())
    }

    fn change_direction(&mut self, direction: Direction) -> Result<(), SimError> {
        self.calls.push("change_direction");
        self.direction = Some(direction);
        Ok(())
    }

    fn status(&self) -> SessionStatus {
        self.status
    }

    fn points(&self) -> u32 {
        self.points
    }

    fn jungle_width(&self) -> u32 {
        self.width
    }

    fn food_cell(&self) -> u32 {
        42
    }

    fn snake_length(&self) -> usize {
        self.cells.len()
    }

    fn snake_cells(&self) -> CellView<'_> {
        CellView::new(bytemuck::cast_slice(&self.cells), 0)
    }

    fn snake_direction(&self) -> Option<Direction> {
        self.direction
    }
}

#[derive(Debug, Default)]
struct RecordingPresenter {
    renders: Vec<RenderSnapshot>,
    indicators: Vec<Indicators>,
}

impl RecordingPresenter {
    fn last_indicators(&self) -> &Indicators {
        self.indicators.last().expect("indicators were pushed")
    }
}

impl Presenter for RecordingPresenter {
    fn render(&mut self, snapshot: &RenderSnapshot) {
        self.renders.push(snapshot.clone());
    }

    fn update_indicators(&mut self, indicators: &Indicators) {
        self.indicators.push(indicators.clone());
    }
}

/// Stats double that counts how often the high score is read.
#[derive(Debug, Default)]
struct CountingStats {
    high_score: u32,
    games: u32,
    reads: Cell<u32>,
}

impl StatsStore for CountingStats {
    fn high_score(&self) -> u32 {
        self.reads.set(self.reads.get() + 1);
        self.high_score
    }

    fn games_played(&self) -> u32 {
        self.games
    }

    fn last_played(&self) -> chrono::DateTime<chrono::Utc> {
        chrono::DateTime::<chrono::Utc>::default()
    }

    fn record_game_end(&mut self, score: u32) -> bool {
        self.games += 1;
        let new_high = score > self.high_score;
        self.high_score = self.high_score.max(score);
        new_high
    }

    fn clear_stats(&mut self) {
        self.high_score = 0;
        self.games = 0;
    }
}

type TestSession<S> = Session<S, RecordingPresenter, GameStorage<MemoryStore>>;

fn session_with<S: Simulation>(sim: S) -> TestSession<S> {
    Session::new(
        sim,
        RecordingPresenter::default(),
        GameStorage::new(MemoryStore::default()),
        &GameConfig::default(),
    )
}

#[test]
fn start_resets_then_starts_and_arms_one_tick() {
    let mut session = session_with(FakeSim::new());
    let t0 = Instant::now();

    assert!(session.start(t0).expect("start"));

    assert_eq!(session.sim().calls, vec!["reset", "start"]);
    assert_eq!(session.phase(), SessionPhase::Running);
    assert_eq!(session.scheduler().issued(), 1);
    assert_eq!(
        session.next_deadline(),
        Some(t0 + Duration::from_millis(250))
    );

    let presenter = session.presenter();
    assert!(!presenter.indicators[0].primary_enabled);
    assert_eq!(presenter.indicators[0].status_text, "Starting...");
    let last = presenter.last_indicators();
    assert_eq!(last.status_text, "Playing");
    assert_eq!(last.primary_label, "Pause");
    assert_eq!(presenter.renders.len(), 1);
}

#[test]
fn start_while_running_keeps_a_single_tick_chain() {
    let mut session = session_with(FakeSim::new());
    let t0 = Instant::now();
    session.start(t0).expect("start");

    assert!(!session.start(t0).expect("second start"));
    assert_eq!(session.sim().count("reset"), 1);
    assert_eq!(session.scheduler().issued(), 1);
    assert!(session.scheduler().is_active());
}

#[test]
fn directions_are_ignored_unless_running() {
    let mut session = session_with(FakeSim::new());
    let t0 = Instant::now();

    session
        .change_direction(Direction::Up)
        .expect("idle direction");
    assert_eq!(session.sim().count("change_direction"), 0);

    session.start(t0).expect("start");
    session.toggle_pause_resume(t0).expect("pause");
    let renders_before = session.presenter().renders.len();
    session
        .change_direction(Direction::Left)
        .expect("paused direction");
    assert_eq!(session.sim().count("change_direction"), 0);
    assert_eq!(session.presenter().renders.len(), renders_before);
}

#[test]
fn direction_change_while_running_is_forwarded_and_redrawn() {
    let mut session = session_with(FakeSim::new());
    session.start(Instant::now()).expect("start");
    let renders_before = session.presenter().renders.len();

    session
        .change_direction(Direction::Down)
        .expect("direction");

    assert_eq!(session.sim().count("change_direction"), 1);
    assert_eq!(session.presenter().renders.len(), renders_before + 1);
    assert_eq!(
        session.presenter().renders.last().map(|s| s.snake_direction),
        Some(Some(Direction::Down))
    );
}

#[test]
fn pause_cancels_the_loop_and_resume_rearms_it() {
    let mut session = session_with(FakeSim::new());
    let t0 = Instant::now();
    session.start(t0).expect("start");

    session.toggle_pause_resume(t0).expect("pause");
    assert_eq!(session.phase(), SessionPhase::Paused);
    assert!(!session.scheduler().is_active());
    assert_eq!(session.presenter().last_indicators().primary_label, "Resume");

    let t1 = t0 + Duration::from_secs(3);
    session.toggle_pause_resume(t1).expect("resume");
    assert_eq!(session.phase(), SessionPhase::Running);
    assert_eq!(session.next_deadline(), Some(t1 + Duration::from_millis(250)));
    assert_eq!(session.presenter().last_indicators().primary_label, "Pause");
}

#[test]
fn tick_while_engine_paused_mutates_nothing() {
    let mut session = session_with(FakeSim::new());
    let t0 = Instant::now();
    session.start(t0).expect("start");
    session.toggle_pause_resume(t0).expect("pause");
    let calls_before = session.sim().calls.len();
    let renders_before = session.presenter().renders.len();

    let outcome = session.on_tick(t0).expect("tick");

    assert_eq!(outcome, TickOutcome::Skipped);
    assert_eq!(session.sim().calls.len(), calls_before);
    assert_eq!(session.presenter().renders.len(), renders_before);
    assert!(!session.scheduler().is_active());
}

#[test]
fn first_frame_after_delay_steps_exactly_once() {
    let mut session = session_with(FakeSim::new());
    let t0 = Instant::now();
    session.start(t0).expect("start");

    assert!(!session.poll(t0 + Duration::from_millis(100)));
    assert_eq!(session.on_animation_frame(t0).expect("early frame"), None);
    assert_eq!(session.sim().count("step"), 0);

    let due = t0 + Duration::from_millis(250);
    assert!(session.poll(due));
    let outcome = session.on_animation_frame(due).expect("frame");

    assert!(matches!(outcome, Some(TickOutcome::Continued(_))));
    assert_eq!(session.sim().count("step"), 1);
    assert_eq!(session.next_deadline(), Some(due + Duration::from_millis(250)));
}

#[test]
fn pause_between_delay_and_frame_drops_the_tick() {
    let mut session = session_with(FakeSim::new());
    let t0 = Instant::now();
    session.start(t0).expect("start");

    let due = t0 + Duration::from_millis(250);
    assert!(session.poll(due));
    session.toggle_pause_resume(due).expect("pause");

    assert_eq!(session.on_animation_frame(due).expect("frame"), None);
    assert_eq!(session.sim().count("step"), 0);
}

#[test]
fn losing_ends_the_loop_and_records_the_game() {
    let mut sim = FakeSim::new();
    sim.after_step = SessionStatus::Lost;
    let mut session = session_with(sim);
    let t0 = Instant::now();
    session.start(t0).expect("start");

    let outcome = session.on_tick(t0).expect("tick");

    assert_eq!(outcome, TickOutcome::Ended(SessionStatus::Lost));
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(!session.scheduler().is_active());
    assert_eq!(session.stats().games_played(), 1);
    assert_eq!(session.stats().high_score(), 1);

    let last = session.presenter().last_indicators();
    assert_eq!(last.status_text, "Game Over");
    assert_eq!(last.primary_label, "Play Again");
    assert!(last.primary_enabled);
    assert_eq!(last.best_text, "1");
}

#[test]
fn winning_allows_play_again() {
    let mut sim = FakeSim::new();
    sim.after_step = SessionStatus::Won;
    let mut session = session_with(sim);
    let t0 = Instant::now();
    session.start(t0).expect("start");
    session.on_tick(t0).expect("tick");

    assert_eq!(session.presenter().last_indicators().status_text, "You Won!");
    session
        .dispatch(Command::PrimaryAction, t0)
        .expect("play again");
    assert_eq!(session.sim().count("reset"), 2);
    assert_eq!(session.phase(), SessionPhase::Running);
}

#[test]
fn speed_up_ten_times_clamps_at_max() {
    let mut session = session_with(FakeSim::new());
    for _ in 0..10 {
        session.adjust_speed(1).expect("speed up");
    }

    assert_eq!(session.speed().value(), 5);
    assert_eq!(session.tick_delay(), Duration::from_millis(50));
    let last = session.presenter().last_indicators();
    assert_eq!(last.speed_text, "Speed: 5x");
    assert!(!last.speed_up_enabled);
    assert!(last.speed_down_enabled);
}

#[test]
fn speed_change_applies_from_the_next_tick() {
    let mut session = session_with(FakeSim::new());
    let t0 = Instant::now();
    session.start(t0).expect("start");
    session.adjust_speed(1).expect("speed up");

    // The pending tick keeps the deadline it was armed with.
    assert_eq!(session.next_deadline(), Some(t0 + Duration::from_millis(250)));

    let due = t0 + Duration::from_millis(250);
    session.poll(due);
    session.on_animation_frame(due).expect("frame");
    assert_eq!(session.next_deadline(), Some(due + Duration::from_millis(125)));
}

#[test]
fn keys_route_by_phase() {
    let mut session = session_with(FakeSim::new());
    let t0 = Instant::now();

    let idle_arrow = session.handle_key(KeyCode::ArrowUp, t0).expect("key");
    assert_eq!(idle_arrow, KeyDisposition::PassThrough);
    let idle_space = session.handle_key(KeyCode::Space, t0).expect("key");
    assert_eq!(idle_space, KeyDisposition::PassThrough);
    assert!(session.sim().calls.is_empty());

    session.start(t0).expect("start");
    let arrow = session.handle_key(KeyCode::ArrowLeft, t0).expect("key");
    assert!(arrow.suppresses_default());
    assert_eq!(session.sim().direction, Some(Direction::Left));

    session.handle_key(KeyCode::Space, t0).expect("key");
    assert_eq!(session.phase(), SessionPhase::Paused);
    session.handle_key(KeyCode::Space, t0).expect("key");
    assert_eq!(session.phase(), SessionPhase::Running);
}

#[test]
fn jungle_round_starts_and_moves_one_cell_per_tick() {
    let sim = JungleSim::create(20, 0).expect("jungle");
    let mut session = session_with(sim);
    session.redraw().expect("initial redraw");

    let first = session.presenter().renders[0].clone();
    assert_eq!(first.jungle_width, 20);
    assert_eq!(first.head(), Some(0));
    assert_eq!(first.status, SessionStatus::NotStarted);
    assert_eq!(
        session.presenter().last_indicators().status_text,
        "Press Play to Start"
    );

    let t0 = Instant::now();
    session.start(t0).expect("start");
    let started = session.presenter().renders.last().cloned().expect("render");
    assert_eq!(started.status, SessionStatus::Playing);
    assert_eq!(started.snake_cells.len(), 3);
    let head = started.head().expect("head");

    session.on_tick(t0).expect("tick");
    let moved = session.presenter().renders.last().cloned().expect("render");
    let (col, row) = started.cell_coords(head);
    assert_eq!(moved.cell_coords(moved.head().expect("head")), ((col + 1) % 20, row));
    assert!(moved.status == SessionStatus::Playing);
}

#[test]
fn failed_engine_start_leaves_the_session_idle_and_unlocked() {
    let mut sim = FakeSim::new();
    sim.fail_reset = true;
    let mut session = session_with(sim);

    let result = session.start(Instant::now());

    assert_eq!(result, Err(SimError::NotInitialized));
    assert_eq!(session.sim().count("start"), 0);
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(!session.scheduler().is_active());
    let last = session.presenter().last_indicators();
    assert!(last.primary_enabled);
    assert_eq!(last.primary_label, "Play");
    assert_eq!(last.status_text, "Press Play to Start");
}

#[test]
fn high_score_is_read_once_and_tracked_across_ticks() {
    let stats = CountingStats {
        high_score: 3,
        ..CountingStats::default()
    };
    let mut session = Session::new(
        FakeSim::new(),
        RecordingPresenter::default(),
        stats,
        &GameConfig::default(),
    );
    let t0 = Instant::now();
    session.start(t0).expect("start");
    for _ in 0..5 {
        session.on_tick(t0).expect("tick");
    }
    assert_eq!(session.presenter().last_indicators().best_text, "5");
    assert_eq!(session.stats().reads.get(), 1);
}
