pub mod layouts;
pub mod monsters;

use std::fmt;

use bracket_geometry::prelude::Point;

use crate::map::{Grid, ObjectiveItem};

pub const LEVEL_COUNT: u8 = 4;

/// A level number known to be in `1..=LEVEL_COUNT`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LevelId(u8);

impl LevelId {
    pub const FIRST: LevelId = LevelId(1);
    pub const FINAL: LevelId = LevelId(LEVEL_COUNT);

    pub fn new(number: u8) -> Option<Self> {
        (1..=LEVEL_COUNT).contains(&number).then_some(Self(number))
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn is_final(self) -> bool {
        self == Self::FINAL
    }

    pub fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    pub fn all() -> impl Iterator<Item = LevelId> {
        (1..=LEVEL_COUNT).map(LevelId)
    }

    pub fn spec(self) -> &'static LevelSpec {
        &LEVELS[(self.0 - 1) as usize]
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug)]
pub struct LevelSpec {
    pub title: &'static str,
    pub objective: &'static str,
    pub item: ObjectiveItem,
    pub sage: Point,
    pub layout: &'static [&'static str; 10],
    pub decorations: usize,
    pub sage_first: &'static str,
    pub sage_repeat: &'static str,
}

impl LevelSpec {
    pub fn sage_line(&self, stage: u32) -> &'static str {
        if stage <= 1 {
            self.sage_first
        } else {
            self.sage_repeat
        }
    }
}

static LEVELS: [LevelSpec; LEVEL_COUNT as usize] = [
    LevelSpec {
        title: "Level 1: The Cursed Labyrinth",
        objective: "Find the Crystal of Eternity.",
        item: ObjectiveItem::Crystal,
        sage: Point { x: 2, y: 2 },
        layout: &layouts::LEVEL_ONE,
        decorations: 5,
        sage_first: "Sage: The Crystal lies deep within. Beware the guardians!",
        sage_repeat: "Sage: Hurry, the curse grows!",
    },
    LevelSpec {
        title: "Level 2: Enchanted Forest",
        objective: "Seal the Ancient Altar.",
        item: ObjectiveItem::AltarSeal,
        sage: Point { x: 4, y: 5 },
        layout: &layouts::LEVEL_TWO,
        decorations: 10,
        sage_first: "Sage: Seal the altar to weaken the curse.",
        sage_repeat: "Sage: The forest hides many eyes.",
    },
    LevelSpec {
        title: "Level 3: Celestial Ruins",
        objective: "Place the Celestial Spire.",
        item: ObjectiveItem::Spire,
        sage: Point { x: 5, y: 6 },
        layout: &layouts::LEVEL_THREE,
        decorations: 8,
        sage_first: "Sage: The Spire awaits your crystal!",
        sage_repeat: "Sage: The stars align for you.",
    },
    LevelSpec {
        title: "Level 4: Warden's Vault (FINAL BOSS)",
        objective: "Steal the Warden's Heart and escape!",
        item: ObjectiveItem::Heart,
        sage: Point { x: 4, y: 5 },
        layout: &layouts::LEVEL_FOUR,
        decorations: 6,
        sage_first: "Sage: The Warden's Heart is the key to ending the curse!",
        sage_repeat: "Sage: Defeat the Warden and escape!",
    },
];

/// A fresh copy of the level's layout, hostiles and all.
pub fn template(level: LevelId) -> Grid {
    Grid::from_rows(level.spec().layout)
        .expect("built-in layouts are 10x10 and use known cell codes")
}

pub fn sage_position(level: LevelId) -> Point {
    level.spec().sage
}

pub const PLAYER_START: Point = Point { x: 1, y: 1 };
