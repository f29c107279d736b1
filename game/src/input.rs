//! Keyboard and button routing.
//!
//! Routing is a pure function of the key and the session phase; the session itself decides
//! nothing here.

use crate::sim::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Space,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Other,
}

/// On-screen controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Primary,
    SpeedDown,
    SpeedUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ChangeDirection(Direction),
    TogglePause,
    PrimaryAction,
    SpeedUp,
    SpeedDown,
}

/// The session's own view of whether a loop is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Running,
    Paused,
}

/// What happened to a key event. Consumed keys must not trigger the host's default action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    Consumed(Command),
    PassThrough,
}

impl KeyDisposition {
    pub fn command(self) -> Option<Command> {
        match self {
            KeyDisposition::Consumed(cmd) => Some(cmd),
            KeyDisposition::PassThrough => None,
        }
    }

    pub fn suppresses_default(self) -> bool {
        matches!(self, KeyDisposition::Consumed(_))
    }
}

pub fn key_direction(key: KeyCode) -> Option<Direction> {
    match key {
        KeyCode::ArrowUp => Some(Direction::Up),
        KeyCode::ArrowDown => Some(Direction::Down),
        KeyCode::ArrowLeft => Some(Direction::Left),
        KeyCode::ArrowRight => Some(Direction::Right),
        _ => None,
    }
}

pub fn route_key(key: KeyCode, phase: SessionPhase) -> KeyDisposition {
    match (key, phase) {
        (KeyCode::Space, SessionPhase::Running | SessionPhase::Paused) => {
            KeyDisposition::Consumed(Command::TogglePause)
        }
        (_, SessionPhase::Running) => match key_direction(key) {
            Some(d) => KeyDisposition::Consumed(Command::ChangeDirection(d)),
            None => KeyDisposition::PassThrough,
        },
        _ => KeyDisposition::PassThrough,
    }
}

pub fn route_control(control: Control) -> Command {
    match control {
        Control::Primary => Command::PrimaryAction,
        Control::SpeedDown => Command::SpeedDown,
        Control::SpeedUp => Command::SpeedUp,
    }
}
