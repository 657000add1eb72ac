//! Grid model for the labyrinth.
//!
//! Positions use `bracket_geometry::Point` with `x` as the column and `y` as
//! the row, so `(row, col)` in save files and level tables maps to
//! `Point::new(col, row)`.

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;

pub const ROWS: i32 = 10;
pub const COLS: i32 = 10;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ObjectiveItem {
    Crystal,
    AltarSeal,
    Spire,
    Heart,
}

impl ObjectiveItem {
    pub const fn glyph(self) -> char {
        match self {
            ObjectiveItem::Crystal => 'A',
            ObjectiveItem::AltarSeal => 'S',
            ObjectiveItem::Spire => 'C',
            ObjectiveItem::Heart => 'H',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectiveItem::Crystal => "Crystal of Eternity",
            ObjectiveItem::AltarSeal => "Ancient Altar Seal",
            ObjectiveItem::Spire => "Celestial Spire",
            ObjectiveItem::Heart => "Warden's Heart",
        }
    }
}

/// Every cell kind the labyrinth understands. Save files and level layouts
/// carry these as single characters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Floor,
    Wall,
    Hedge,
    Decoration,
    Item(ObjectiveItem),
    Exit,
    Sage,
    Player,
    Monster,
    Warden,
    Trap,
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Wall
    }
}

impl Cell {
    pub const fn glyph(self) -> char {
        match self {
            Cell::Floor => '.',
            Cell::Wall => '#',
            Cell::Hedge => 'W',
            Cell::Decoration => 'T',
            Cell::Item(item) => item.glyph(),
            Cell::Exit => 'E',
            Cell::Sage => 'G',
            Cell::Player => 'P',
            Cell::Monster => 'M',
            Cell::Warden => 'B',
            Cell::Trap => 'X',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        let cell = match glyph {
            '.' => Cell::Floor,
            '#' => Cell::Wall,
            'W' => Cell::Hedge,
            'T' => Cell::Decoration,
            'A' => Cell::Item(ObjectiveItem::Crystal),
            'S' => Cell::Item(ObjectiveItem::AltarSeal),
            'C' => Cell::Item(ObjectiveItem::Spire),
            'H' => Cell::Item(ObjectiveItem::Heart),
            'E' => Cell::Exit,
            'G' => Cell::Sage,
            'P' => Cell::Player,
            'M' => Cell::Monster,
            'B' => Cell::Warden,
            'X' => Cell::Trap,
            _ => return None,
        };
        Some(cell)
    }

    /// Walls, hedges and the sage stop both the player and hostiles.
    pub fn blocks_move(self) -> bool {
        matches!(self, Cell::Wall | Cell::Hedge | Cell::Sage)
    }

    /// Items and the exit are drawn over any hostile standing on them.
    pub fn hides_hostiles(self) -> bool {
        matches!(self, Cell::Item(_) | Cell::Exit)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Facing {
    Up,
    Right,
    Down,
    Left,
}

impl Default for Facing {
    fn default() -> Self {
        Facing::Down
    }
}

impl Facing {
    pub const fn index(self) -> u8 {
        match self {
            Facing::Up => 0,
            Facing::Right => 1,
            Facing::Down => 2,
            Facing::Left => 3,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Facing::Up),
            1 => Some(Facing::Right),
            2 => Some(Facing::Down),
            3 => Some(Facing::Left),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

/// Order matches `Facing::index`, which is what the random walk draws from.
pub const CARDINALS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

impl Direction {
    pub fn delta(self) -> Point {
        match self {
            Direction::North => Point::new(0, -1),
            Direction::East => Point::new(1, 0),
            Direction::South => Point::new(0, 1),
            Direction::West => Point::new(-1, 0),
        }
    }

    pub fn facing(self) -> Facing {
        match self {
            Direction::North => Facing::Up,
            Direction::East => Facing::Right,
            Direction::South => Facing::Down,
            Direction::West => Facing::Left,
        }
    }

    pub fn step(self, from: Point) -> Point {
        let delta = self.delta();
        Point::new(from.x + delta.x, from.y + delta.y)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Cell>,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            cells: vec![Cell::default(); (ROWS * COLS) as usize],
        }
    }
}

impl Grid {
    /// Builds a grid from `ROWS` strings of `COLS` cell codes. Returns `None`
    /// for a wrong shape or an unknown code.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Option<Self> {
        if rows.len() != ROWS as usize {
            return None;
        }
        let mut cells = Vec::with_capacity((ROWS * COLS) as usize);
        for row in rows {
            let row = row.as_ref();
            if row.chars().count() != COLS as usize {
                return None;
            }
            for glyph in row.chars() {
                cells.push(Cell::from_glyph(glyph)?);
            }
        }
        Some(Self { cells })
    }

    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .chunks(COLS as usize)
            .map(|row| row.iter().map(|cell| cell.glyph()).collect())
            .collect()
    }

    fn idx(&self, point: Point) -> Option<usize> {
        if self.in_bounds(point) {
            Some((point.y * COLS + point.x) as usize)
        } else {
            None
        }
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < COLS && point.y >= 0 && point.y < ROWS
    }

    pub fn cell_at(&self, point: Point) -> Option<Cell> {
        self.idx(point).map(|idx| self.cells[idx])
    }

    pub fn set_cell(&mut self, point: Point, cell: Cell) {
        if let Some(idx) = self.idx(point) {
            self.cells[idx] = cell;
        }
    }

    /// In bounds and not a wall, hedge or sage.
    pub fn is_passable(&self, point: Point) -> bool {
        self.cell_at(point).is_some_and(|cell| !cell.blocks_move())
    }

    pub fn is_trap(&self, point: Point) -> bool {
        self.cell_at(point) == Some(Cell::Trap)
    }

    pub fn points(&self) -> impl Iterator<Item = Point> {
        (0..ROWS).flat_map(|y| (0..COLS).map(move |x| Point::new(x, y)))
    }

    pub fn find_all(&self, cell: Cell) -> Vec<Point> {
        self.points()
            .filter(|point| self.cell_at(*point) == Some(cell))
            .collect()
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|c| **c == cell).count()
    }

    /// Overwrites up to `count` distinct floor cells with decorations.
    pub fn scatter_decorations(&mut self, rng: &mut RandomNumberGenerator, count: usize) {
        let mut floor = self.find_all(Cell::Floor);
        for _ in 0..count {
            if floor.is_empty() {
                break;
            }
            let idx = rng.range(0, floor.len() as i32) as usize;
            let point = floor.swap_remove(idx);
            self.set_cell(point, Cell::Decoration);
        }
    }
}
