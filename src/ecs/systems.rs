use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use specs::prelude::*;

use super::{
    components::{GridPosition, Heading, Hostile},
    resources::{MovementContext, Step, StepLog},
};
use crate::map::CARDINALS;

/// One uniformly random cardinal step per hostile per tick. Blocked steps
/// leave the hostile where it is.
#[derive(Default)]
pub struct WanderSystem;

impl<'a> System<'a> for WanderSystem {
    type SystemData = (
        Entities<'a>,
        ReadStorage<'a, Hostile>,
        WriteStorage<'a, GridPosition>,
        WriteStorage<'a, Heading>,
        ReadExpect<'a, MovementContext>,
        WriteExpect<'a, RandomNumberGenerator>,
        WriteExpect<'a, StepLog>,
    );

    fn run(
        &mut self,
        (entities, hostiles, mut positions, mut headings, movement, mut rng, mut log): Self::SystemData,
    ) {
        let mut roster = (&entities, &hostiles)
            .join()
            .map(|(entity, hostile)| (entity, *hostile))
            .collect::<Vec<_>>();
        roster.sort_by_key(|(_, hostile)| hostile.order);

        let mut occupied = roster
            .iter()
            .filter_map(|(entity, _)| positions.get(*entity).map(|pos| (*entity, pos.point)))
            .collect::<Vec<(Entity, Point)>>();

        for (entity, hostile) in roster {
            let Some(pos) = positions.get_mut(entity) else {
                continue;
            };
            let dir = CARDINALS[rng.range(0, CARDINALS.len() as i32) as usize];
            let target = dir.step(pos.point);
            if !movement.is_walkable(target)
                || target == movement.player_point
                || occupied.iter().any(|(_, point)| *point == target)
            {
                continue;
            }

            let from = pos.point;
            pos.point = target;
            if let Some(heading) = headings.get_mut(entity) {
                heading.0 = dir.facing();
            }
            for slot in occupied.iter_mut().filter(|(other, _)| *other == entity) {
                slot.1 = target;
            }
            log.steps.push(Step {
                kind: hostile.kind,
                from,
                to: target,
            });
        }
    }
}
