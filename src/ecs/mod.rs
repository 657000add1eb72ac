pub mod components;
pub mod resources;
pub mod systems;

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use specs::prelude::{
    Builder, Dispatcher, DispatcherBuilder, Entity, Join, World as SpecsWorld, WorldExt,
};
use tracing::{debug, trace};

use crate::{
    data::{self, LevelId, monsters::HostileKind},
    error::ControllerError,
    map::{Cell, Facing, Grid},
};

use self::{
    components::{GridPosition, Heading, Hostile},
    resources::{MovementContext, StepLog},
    systems::WanderSystem,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HostileSnapshot {
    pub kind: HostileKind,
    pub point: Point,
    pub facing: Facing,
}

/// Owns the guardians and the Warden of the current level.
pub struct MonsterController {
    specs_world: SpecsWorld,
    dispatcher: Dispatcher<'static, 'static>,
    warden: Option<Entity>,
    pub ticks: u64,
}

impl MonsterController {
    pub fn new(rng: RandomNumberGenerator) -> Self {
        let mut specs_world = SpecsWorld::new();
        specs_world.register::<GridPosition>();
        specs_world.register::<Heading>();
        specs_world.register::<Hostile>();
        specs_world.insert(rng);
        specs_world.insert(StepLog::default());
        let dispatcher = DispatcherBuilder::new()
            .with(WanderSystem, "wander", &[])
            .build();

        Self {
            specs_world,
            dispatcher,
            warden: None,
            ticks: 0,
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(RandomNumberGenerator::seeded(seed))
    }

    /// Drops every hostile and respawns them from the level template, marking
    /// them on `grid` unless an item or the exit is drawn there.
    pub fn reset_for_level(&mut self, level: LevelId, grid: &mut Grid) {
        self.specs_world.delete_all();
        self.specs_world.maintain();
        self.warden = None;

        let template = data::template(level);
        let guardians = template.find_all(Cell::Monster);
        let wardens = template.find_all(Cell::Warden);
        let spawns = guardians
            .iter()
            .map(|point| (HostileKind::Guardian, *point))
            .chain(wardens.iter().take(1).map(|point| (HostileKind::Warden, *point)));

        for (order, (kind, point)) in spawns.enumerate() {
            let entity = self
                .specs_world
                .create_entity()
                .with(GridPosition { point })
                .with(Heading(Facing::Down))
                .with(Hostile {
                    kind,
                    order: order as u32,
                })
                .build();
            if kind == HostileKind::Warden {
                self.warden = Some(entity);
            }
            if grid.cell_at(point).is_some_and(|cell| !cell.hides_hostiles()) {
                grid.set_cell(point, kind.marker());
            }
        }

        debug!(
            level = level.number(),
            guardians = guardians.len(),
            warden = self.warden.is_some(),
            "hostiles_spawned"
        );
    }

    /// Advances every hostile one random step and redraws the moved markers.
    /// Returns how many hostiles moved.
    pub fn tick(&mut self, grid: &mut Grid, player: Point) -> Result<usize, ControllerError> {
        for hostile in self.hostiles() {
            if !grid.in_bounds(hostile.point) {
                return Err(ControllerError::OutOfBounds {
                    kind: hostile.kind,
                    point: hostile.point,
                });
            }
        }

        self.specs_world
            .insert(MovementContext::from_grid(grid, player));
        self.dispatcher.dispatch(&self.specs_world);
        self.specs_world.maintain();
        self.ticks = self.ticks.wrapping_add(1);

        let steps = std::mem::take(&mut self.specs_world.write_resource::<StepLog>().steps);
        for step in &steps {
            let marker = step.kind.marker();
            let from = grid.cell_at(step.from).ok_or(ControllerError::OutOfBounds {
                kind: step.kind,
                point: step.from,
            })?;
            if from == marker {
                grid.set_cell(step.from, Cell::Floor);
            }
            let to = grid.cell_at(step.to).ok_or(ControllerError::OutOfBounds {
                kind: step.kind,
                point: step.to,
            })?;
            if !to.hides_hostiles() {
                grid.set_cell(step.to, marker);
            }
        }

        trace!(tick = self.ticks, moved = steps.len(), "hostiles_advanced");
        Ok(steps.len())
    }

    pub fn is_occupied_by_monster(&self, point: Point) -> bool {
        let positions = self.specs_world.read_component::<GridPosition>();
        (&positions).join().any(|pos| pos.point == point)
    }

    pub fn is_trap(grid: &Grid, point: Point) -> bool {
        grid.is_trap(point)
    }

    pub fn boss_alive(&self) -> bool {
        self.warden.is_some()
    }

    pub fn boss_position(&self) -> Option<Point> {
        let warden = self.warden?;
        let positions = self.specs_world.read_component::<GridPosition>();
        positions.get(warden).map(|pos| pos.point)
    }

    /// Removes the Warden and clears its marker from `grid`.
    pub fn kill_boss(&mut self, grid: &mut Grid) {
        let Some(warden) = self.warden.take() else {
            return;
        };
        let point = {
            let positions = self.specs_world.read_component::<GridPosition>();
            positions.get(warden).map(|pos| pos.point)
        };
        if let Some(point) = point {
            if grid.cell_at(point) == Some(Cell::Warden) {
                grid.set_cell(point, Cell::Floor);
            }
        }
        let _ = self.specs_world.delete_entity(warden);
        self.specs_world.maintain();
    }

    /// Living hostiles in spawn order: guardians first, then the Warden.
    pub fn hostiles(&self) -> Vec<HostileSnapshot> {
        let entities = self.specs_world.entities();
        let hostiles = self.specs_world.read_component::<Hostile>();
        let positions = self.specs_world.read_component::<GridPosition>();
        let headings = self.specs_world.read_component::<Heading>();
        let mut roster = (&entities, &hostiles, &positions)
            .join()
            .map(|(entity, hostile, pos)| {
                let facing = headings.get(entity).map(|h| h.0).unwrap_or_default();
                (
                    hostile.order,
                    HostileSnapshot {
                        kind: hostile.kind,
                        point: pos.point,
                        facing,
                    },
                )
            })
            .collect::<Vec<_>>();
        roster.sort_by_key(|(order, _)| *order);
        roster.into_iter().map(|(_, snapshot)| snapshot).collect()
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, index: usize, point: Point) {
        let entities = self.specs_world.entities();
        let hostiles = self.specs_world.read_component::<Hostile>();
        let mut positions = self.specs_world.write_component::<GridPosition>();
        for (_, hostile, pos) in (&entities, &hostiles, &mut positions).join() {
            if hostile.order as usize == index {
                pos.point = point;
            }
        }
    }
}
