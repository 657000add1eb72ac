use bracket_geometry::prelude::Point;
use specs::prelude::{Component, VecStorage};

use crate::data::monsters::HostileKind;
use crate::map::Facing;

#[derive(Clone, Debug)]
pub struct GridPosition {
    pub point: Point,
}

impl Component for GridPosition {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug, Default)]
pub struct Heading(pub Facing);

impl Component for Heading {
    type Storage = VecStorage<Self>;
}

/// `order` is the spawn order; guardians move first, then the Warden.
#[derive(Copy, Clone, Debug)]
pub struct Hostile {
    pub kind: HostileKind,
    pub order: u32,
}

impl Component for Hostile {
    type Storage = VecStorage<Self>;
}
