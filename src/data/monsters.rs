use bracket_terminal::prelude::RGB;

use crate::data::LevelId;
use crate::map::Cell;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HostileKind {
    Guardian,
    Warden,
}

impl HostileKind {
    pub fn from_cell(cell: Cell) -> Option<Self> {
        match cell {
            Cell::Monster => Some(HostileKind::Guardian),
            Cell::Warden => Some(HostileKind::Warden),
            _ => None,
        }
    }

    pub fn marker(self) -> Cell {
        match self {
            HostileKind::Guardian => Cell::Monster,
            HostileKind::Warden => Cell::Warden,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HostileKind::Guardian => "Guardian",
            HostileKind::Warden => "Warden",
        }
    }

    /// Guardians take the colour of the level they haunt.
    pub fn color(self, level: LevelId) -> RGB {
        match (self, level.number()) {
            (HostileKind::Warden, _) => RGB::from_u8(160, 40, 160),
            (HostileKind::Guardian, 1) => RGB::from_u8(230, 50, 50),
            (HostileKind::Guardian, 2) => RGB::from_u8(20, 140, 20),
            (HostileKind::Guardian, _) => RGB::from_u8(0, 150, 255),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_round_trip_through_cells() {
        for kind in [HostileKind::Guardian, HostileKind::Warden] {
            assert_eq!(HostileKind::from_cell(kind.marker()), Some(kind));
        }
        assert_eq!(HostileKind::from_cell(Cell::Floor), None);
    }
}
