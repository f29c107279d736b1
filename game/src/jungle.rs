//! In-process simulation backend.
//!
//! The jungle is a square grid that wraps at every edge. The snake spawns three cells long,
//! heading right, and grows by one cell per food eaten. Running into its own body loses; filling
//! the whole grid wins.

use crate::sim::{CellView, Direction, SessionStatus, SimError, Simulation};

pub const SPAWN_LENGTH: u32 = 3;

#[derive(Debug, Clone)]
pub struct JungleSim {
    width: u32,
    size: u32,
    body: Vec<u32>,
    direction: Direction,
    next_cell: Option<u32>,
    food_cell: u32,
    status: SessionStatus,
    points: u32,
    rng: Rng,
}

impl JungleSim {
    pub fn with_seed(width: u32, spawn_index: u32, seed: u64) -> Result<Self, SimError> {
        if width < 2 {
            return Err(SimError::InvalidGrid(width));
        }
        let size = width
            .checked_mul(width)
            .ok_or(SimError::InvalidGrid(width))?;
        if spawn_index >= size {
            return Err(SimError::InvalidSpawn {
                spawn: spawn_index,
                size,
            });
        }

        let mut sim = Self {
            width,
            size,
            body: spawn_body(width, spawn_index),
            direction: Direction::Right,
            next_cell: None,
            food_cell: 0,
            status: SessionStatus::NotStarted,
            points: 0,
            rng: Rng::new(seed),
        };
        sim.place_food();
        Ok(sim)
    }

    /// Picks a spawn cell the way `reset` does, for callers that want a random first round.
    pub fn random_spawn(width: u32, seed: u64) -> u32 {
        let size = width.saturating_mul(width).max(1);
        Rng::new(seed).next_u32() % size
    }

    pub fn body(&self) -> &[u32] {
        &self.body
    }

    pub fn head(&self) -> u32 {
        self.body[0]
    }

    /// Places food on a uniformly random free cell. A full grid keeps the old food cell.
    fn place_food(&mut self) {
        let free: Vec<u32> = (0..self.size).filter(|c| !self.body.contains(c)).collect();
        if free.is_empty() {
            return;
        }
        let pick = self.rng.next_u32() as usize % free.len();
        self.food_cell = free[pick];
    }

    fn next_cell_towards(&self, direction: Direction) -> u32 {
        let head = self.head();
        let (width, size) = (self.width, self.size);
        let row_start = head - head % width;
        match direction {
            Direction::Up if head < width => size - width + head,
            Direction::Up => head - width,
            Direction::Down if head + width >= size => head + width - size,
            Direction::Down => head + width,
            Direction::Left if head == row_start => row_start + width - 1,
            Direction::Left => head - 1,
            Direction::Right if head == row_start + width - 1 => row_start,
            Direction::Right => head + 1,
        }
    }

    fn advance(&mut self) {
        let old_tail = self.body[self.body.len() - 1];
        let new_head = self
            .next_cell
            .take()
            .unwrap_or_else(|| self.next_cell_towards(self.direction));

        // The tail moves out of the way this step, so it is not a collision.
        if self.body[..self.body.len() - 1].contains(&new_head) {
            self.status = SessionStatus::Lost;
            return;
        }

        self.body.rotate_right(1);
        self.body[0] = new_head;

        if new_head != self.food_cell {
            return;
        }
        self.points += 1;
        self.body.push(old_tail);
        if self.body.len() as u32 == self.size {
            self.status = SessionStatus::Won;
            return;
        }
        self.place_food();
    }
}

/// Head at `spawn`, remaining cells to its left, wrapping within the spawn row.
fn spawn_body(width: u32, spawn: u32) -> Vec<u32> {
    let row_start = spawn - spawn % width;
    let col = spawn % width;
    (0..SPAWN_LENGTH.min(width))
        .map(|i| row_start + (col + width - i) % width)
        .collect()
}

impl Simulation for JungleSim {
    fn create(width: u32, spawn_index: u32) -> Result<Self, SimError> {
        let seed = 0x5eed_0000_0000_0000 ^ (u64::from(width) << 32) ^ u64::from(spawn_index);
        Self::with_seed(width, spawn_index, seed)
    }

    fn start(&mut self) -> Result<(), SimError> {
        if self.status == SessionStatus::NotStarted {
            self.status = SessionStatus::Playing;
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<(), SimError> {
        if self.status == SessionStatus::Playing {
            self.status = SessionStatus::Paused;
        }
        Ok(())
    }

    fn resume(&mut self) -> Result<(), SimError> {
        if self.status == SessionStatus::Paused {
            self.status = SessionStatus::Playing;
        }
        Ok(())
    }

    fn reset(&mut self) -> Result<(), SimError> {
        let spawn = self.rng.next_u32() % self.size;
        self.body = spawn_body(self.width, spawn);
        self.direction = Direction::Right;
        self.next_cell = None;
        self.status = SessionStatus::NotStarted;
        self.points = 0;
        self.place_food();
        Ok(())
    }

    fn step(&mut self) -> Result<(), SimError> {
        match self.status {
            SessionStatus::Playing => self.advance(),
            SessionStatus::Paused => {}
            _ => self.status = SessionStatus::NotStarted,
        }
        Ok(())
    }

    fn change_direction(&mut self, direction: Direction) -> Result<(), SimError> {
        let next = self.next_cell_towards(direction);
        // Turning back into the neck is not a legal move.
        if self.body.get(1) == Some(&next) {
            return Ok(());
        }
        self.next_cell = Some(next);
        self.direction = direction;
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
        self.food_cell
    }

    fn snake_length(&self) -> usize {
        self.body.len()
    }

    fn snake_cells(&self) -> CellView<'_> {
        CellView::new(bytemuck::cast_slice(&self.body), 0)
    }

    fn snake_direction(&self) -> Option<Direction> {
        Some(self.direction)
    }
}

/// xorshift64* generator; deterministic per seed.
#[derive(Debug, Clone)]
struct Rng {
    state: u64,
}

impl Rng {
    fn new(seed: u64) -> Self {
        let seed = if seed == 0 {
            0x9E37_79B9_7F4A_7C15
        } else {
            seed
        };
        Self { state: seed }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        (x.wrapping_mul(0x2545_F491_4F6C_DD1D) >> 32) as u32
    }
}
