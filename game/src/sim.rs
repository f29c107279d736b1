//! The engine handle: the only way the client touches the grid simulation.
//!
//! Any backend that implements [`Simulation`] can be driven by the session controller, whether
//! it runs in-process (see [`crate::jungle::JungleSim`]), behind an FFI boundary, or remotely.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    NotStarted,
    Playing,
    Paused,
    Won,
    Lost,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Won | SessionStatus::Lost)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("simulation is not initialized")]
    NotInitialized,
    #[error("grid width {0} is too small")]
    InvalidGrid(u32),
    #[error("spawn cell {spawn} is outside a grid of {size} cells")]
    InvalidSpawn { spawn: u32, size: u32 },
    #[error("cell buffer too short: need {needed} bytes at offset {offset}, have {available}")]
    CellBufferOutOfBounds {
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("simulation backend failed: {0}")]
    Backend(String),
}

/// Read-only view over the engine's linear snake-cell storage for one frame.
///
/// The view borrows the engine, so it cannot outlive the next mutation; callers re-acquire it
/// for every read.
#[derive(Debug, Clone, Copy)]
pub struct CellView<'a> {
    memory: &'a [u8],
    offset: usize,
}

impl<'a> CellView<'a> {
    pub fn new(memory: &'a [u8], offset: usize) -> Self {
        Self { memory, offset }
    }

    /// Reads `count` consecutive native-endian `u32` cell indices starting at the view offset.
    pub fn read(&self, count: usize) -> Result<Vec<u32>, SimError> {
        let needed = count.saturating_mul(4);
        let bytes = self
            .offset
            .checked_add(needed)
            .and_then(|end| self.memory.get(self.offset..end))
            .ok_or(SimError::CellBufferOutOfBounds {
                offset: self.offset,
                needed,
                available: self.memory.len(),
            })?;
        Ok(bytes
            .chunks_exact(4)
            .map(bytemuck::pod_read_unaligned::<u32>)
            .collect())
    }
}

pub trait Simulation {
    fn create(width: u32, spawn_index: u32) -> Result<Self, SimError>
    where
        Self: Sized;

    fn start(&mut self) -> Result<(), SimError>;
    fn pause(&mut self) -> Result<(), SimError>;
    fn resume(&mut self) -> Result<(), SimError>;
    fn reset(&mut self) -> Result<(), SimError>;
    fn step(&mut self) -> Result<(), SimError>;
    /// Requests a new heading. The engine decides whether to accept it.
    fn change_direction(&mut self, direction: Direction) -> Result<(), SimError>;

    fn status(&self) -> SessionStatus;
    fn points(&self) -> u32;
    fn jungle_width(&self) -> u32;
    fn food_cell(&self) -> u32;
    fn snake_length(&self) -> usize;
    fn snake_cells(&self) -> CellView<'_>;
    /// `None` when the backend reports a heading the client does not recognize.
    fn snake_direction(&self) -> Option<Direction>;
}
