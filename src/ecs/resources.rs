use bracket_geometry::prelude::Point;

use crate::data::monsters::HostileKind;
use crate::map::{COLS, Grid, ROWS};

/// Snapshot of what a hostile may step onto this tick.
#[derive(Clone)]
pub struct MovementContext {
    pub player_point: Point,
    walkable: Vec<bool>,
}

impl MovementContext {
    pub fn from_grid(grid: &Grid, player_point: Point) -> Self {
        let walkable = grid
            .points()
            .map(|point| grid.is_passable(point))
            .collect::<Vec<bool>>();
        Self {
            player_point,
            walkable,
        }
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < COLS && point.y >= 0 && point.y < ROWS
    }

    pub fn is_walkable(&self, point: Point) -> bool {
        if !self.in_bounds(point) {
            return false;
        }
        let idx = (point.y * COLS + point.x) as usize;
        self.walkable.get(idx).copied().unwrap_or(false)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub kind: HostileKind,
    pub from: Point,
    pub to: Point,
}

#[derive(Default)]
pub struct StepLog {
    pub steps: Vec<Step>,
}
