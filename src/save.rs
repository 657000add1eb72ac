//! Line-oriented save file.
//!
//! ```text
//! <level>
//! <row>,<col>,<facing>
//! <has item: true|false>
//! 0
//! <hostile count>
//! <row>,<col>,2            (one per hostile)
//! <ROWS lines of COLS cell codes>
//! Saved Game
//! ```
//!
//! Hostile lines are parsed but a load regenerates hostiles from the level
//! template, so only the level and the item flag are carried over.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::Lines;

use bracket_geometry::prelude::Point;

use crate::data::LevelId;
use crate::error::SaveError;
use crate::map::{COLS, Cell, Facing, Grid, ROWS};

pub const SAVE_TRAILER: &str = "Saved Game";
const SAGE_PLACEHOLDER: u32 = 0;
const HOSTILE_FACING: u8 = 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveRecord {
    pub level: LevelId,
    pub player: Point,
    pub facing: Facing,
    pub has_item: bool,
    pub hostiles: Vec<Point>,
    pub grid: Grid,
}

impl SaveRecord {
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", self.level));
        out.push_str(&format!(
            "{},{},{}\n",
            self.player.y,
            self.player.x,
            self.facing.index()
        ));
        out.push_str(&format!("{}\n", self.has_item));
        out.push_str(&format!("{SAGE_PLACEHOLDER}\n"));
        out.push_str(&format!("{}\n", self.hostiles.len()));
        for point in &self.hostiles {
            out.push_str(&format!("{},{},{HOSTILE_FACING}\n", point.y, point.x));
        }
        for row in self.grid.to_rows() {
            out.push_str(&row);
            out.push('\n');
        }
        out.push_str(SAVE_TRAILER);
        out.push('\n');
        out
    }

    pub fn parse(text: &str) -> Result<Self, SaveError> {
        let mut lines = text.lines();

        let level_line = next_line(&mut lines, "level")?;
        let level_number: u32 = parse_field(level_line, "level")?;
        let level = u8::try_from(level_number)
            .ok()
            .and_then(LevelId::new)
            .ok_or(SaveError::InvalidLevel(level_number))?;

        let player_line = next_line(&mut lines, "player position")?;
        let (player_row, player_col, facing) = parse_triple(player_line, "player position")?;
        let facing = u8::try_from(facing)
            .ok()
            .and_then(Facing::from_index)
            .ok_or_else(|| malformed("player facing", player_line))?;

        let item_line = next_line(&mut lines, "item flag")?;
        let has_item = match item_line.trim().to_ascii_lowercase().as_str() {
            "true" => true,
            "false" => false,
            _ => return Err(malformed("item flag", item_line)),
        };

        let _sage_stage: u32 = parse_field(next_line(&mut lines, "sage stage")?, "sage stage")?;

        let count: usize = parse_field(next_line(&mut lines, "hostile count")?, "hostile count")?;
        let mut hostiles = Vec::with_capacity(count.min((ROWS * COLS) as usize));
        for _ in 0..count {
            let line = next_line(&mut lines, "hostile position")?;
            let (row, col, _) = parse_triple(line, "hostile position")?;
            hostiles.push(Point::new(col, row));
        }

        let mut rows = Vec::with_capacity(ROWS as usize);
        for found in 0..ROWS as usize {
            let Some(line) = lines.next() else {
                return Err(SaveError::TruncatedGrid {
                    expected: ROWS as usize,
                    found,
                });
            };
            rows.push(line.trim_end_matches('\r').to_string());
        }
        let grid = Grid::from_rows(&rows).ok_or_else(|| bad_row(&rows))?;

        Ok(Self {
            level,
            player: Point::new(player_col, player_row),
            facing,
            has_item,
            hostiles,
            grid,
        })
    }
}

fn next_line<'a>(lines: &mut Lines<'a>, what: &'static str) -> Result<&'a str, SaveError> {
    lines.next().ok_or(SaveError::MissingLine(what))
}

fn malformed(field: &'static str, value: &str) -> SaveError {
    SaveError::Malformed {
        field,
        value: value.to_string(),
    }
}

fn parse_field<T: std::str::FromStr>(line: &str, field: &'static str) -> Result<T, SaveError> {
    line.trim().parse().map_err(|_| malformed(field, line))
}

fn parse_triple(line: &str, field: &'static str) -> Result<(i32, i32, i32), SaveError> {
    let parts = line
        .split(',')
        .map(|part| part.trim().parse::<i32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| malformed(field, line))?;
    match parts.as_slice() {
        [a, b, c] => Ok((*a, *b, *c)),
        _ => Err(malformed(field, line)),
    }
}

fn bad_row(rows: &[String]) -> SaveError {
    let (row, line) = rows
        .iter()
        .enumerate()
        .find(|(_, line)| {
            line.chars().count() != COLS as usize
                || line.chars().any(|glyph| Cell::from_glyph(glyph).is_none())
        })
        .map(|(row, line)| (row, line.clone()))
        .unwrap_or_default();
    SaveError::BadGridRow { row, line }
}

/// A save file on disk.
#[derive(Clone, Debug)]
pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Writes beside the target and renames over it, so a failed write never
    /// leaves a half-written save behind.
    pub fn write(&self, record: &SaveRecord) -> Result<(), SaveError> {
        write_text_atomic(&self.path, &record.to_text())?;
        Ok(())
    }

    pub fn read(&self) -> Result<SaveRecord, SaveError> {
        let text = fs::read_to_string(&self.path)?;
        SaveRecord::parse(&text)
    }
}

fn write_text_atomic(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = temp_path_for(path);
    fs::write(&tmp_path, text)?;
    if let Err(error) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("maze_save.txt");
    let tmp_name = format!("{file_name}.tmp");
    match path.parent() {
        Some(parent) => parent.join(tmp_name),
        None => PathBuf::from(tmp_name),
    }
}
