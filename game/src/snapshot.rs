use crate::sim::{Direction, SessionStatus, SimError, Simulation};

/// Everything needed to paint one frame, copied out of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSnapshot {
    pub jungle_width: u32,
    /// Head first.
    pub snake_cells: Vec<u32>,
    pub snake_direction: Option<Direction>,
    pub food_cell: u32,
    pub points: u32,
    pub status: SessionStatus,
}

impl RenderSnapshot {
    /// Grid coordinate `(column, row)` of a linear cell index.
    pub fn cell_coords(&self, cell: u32) -> (u32, u32) {
        let width = self.jungle_width.max(1);
        (cell % width, cell / width)
    }

    pub fn head(&self) -> Option<u32> {
        self.snake_cells.first().copied()
    }
}

/// Reads one snapshot from the engine.
///
/// Only query methods are called, so this can run any number of times between steps.
pub fn read_snapshot<S: Simulation + ?Sized>(sim: &S) -> Result<RenderSnapshot, SimError> {
    let jungle_width = sim.jungle_width();
    let len = sim.snake_length();
    let snake_cells = sim.snake_cells().read(len)?;
    let snake_direction = sim.snake_direction();
    let food_cell = sim.food_cell();
    let points = sim.points();
    let status = sim.status();

    Ok(RenderSnapshot {
        jungle_width,
        snake_cells,
        snake_direction,
        food_cell,
        points,
        status,
    })
}
