//! The game session: one player walking one level at a time.
//!
//! Everything that mutates the grid goes through `GameSession`, either from
//! a command (`apply`) or from the monster clock (`advance`). Both run on the
//! caller's thread, so a move and a tick never interleave.

#[cfg(test)]
mod tests;

use std::path::PathBuf;
use std::time::Duration;

use bracket_geometry::prelude::Point;
use bracket_pathfinding::prelude::DistanceAlg;
use bracket_random::prelude::RandomNumberGenerator;
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::{
    audio::Cue,
    config::Config,
    data::{self, LevelId, PLAYER_START},
    ecs::MonsterController,
    map::{Cell, Direction, Facing, Grid},
    narrative::Narrative,
    save::{SaveRecord, SaveStore},
    timing::{GlowPulse, Ticker},
};

pub const ITEM_FOUND_OBJECTIVE: &str = "Find the exit to win!";
pub const HELP_TEXT: &str =
    "Controls:\nWASD / Arrows: Move\nSPACE: Interact\nP: Pause\nV: Save\nL: Load\nH: Help";
const GLOW_RADIUS: f32 = 2.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Menu,
    Playing,
    Paused,
    Won,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Interact,
    Save,
    Load,
    Help,
    Pause,
    Resume,
    QuitToMenu,
    NewGame,
    Continue,
    Quit,
}

/// Modal messages the shell shows until the player dismisses them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Defeat,
    Help,
    Saved,
    SaveFailed(String),
    Loaded(LevelId),
    LoadFailed(String),
    NoSave,
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Notice::Defeat => "Defeat",
            Notice::Help => "Help",
            Notice::Saved | Notice::SaveFailed(_) => "Save",
            Notice::Loaded(_) | Notice::LoadFailed(_) | Notice::NoSave => "Load",
        }
    }

    pub fn body(&self) -> String {
        match self {
            Notice::Defeat => "Game Over! You were caught.".to_string(),
            Notice::Help => HELP_TEXT.to_string(),
            Notice::Saved => "Game saved successfully!".to_string(),
            Notice::SaveFailed(reason) => format!("Error saving: {reason}"),
            Notice::Loaded(level) => format!("Game loaded. Level: {level}"),
            Notice::LoadFailed(reason) => format!("Load failed: {reason}"),
            Notice::NoSave => "No saved game to resume.".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub point: Point,
    pub facing: Facing,
    pub has_item: bool,
    pub level: LevelId,
    pub sage_stage: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            point: PLAYER_START,
            facing: Facing::Down,
            has_item: false,
            level: LevelId::FIRST,
            sage_stage: 0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SessionOptions {
    pub seed: Option<u64>,
    pub tick_interval: Duration,
    pub pulse_interval: Duration,
    pub speech_duration: Duration,
    pub save_path: PathBuf,
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        Self {
            seed: config.seed,
            tick_interval: config.tick_interval(),
            pulse_interval: config.pulse_interval(),
            speech_duration: config.speech_duration(),
            save_path: config.save_path.clone(),
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

pub struct GameSession {
    phase: Phase,
    grid: Grid,
    player: Player,
    objective: String,
    monsters: MonsterController,
    narrative: Narrative,
    store: SaveStore,
    rng: RandomNumberGenerator,
    monster_clock: Ticker,
    pulse_clock: Ticker,
    glow: GlowPulse,
    item_nearby: bool,
    clock: Duration,
    speech_duration: Duration,
    cues: SmallVec<[Cue; 8]>,
    notice: Option<Notice>,
    quit_requested: bool,
}

impl GameSession {
    pub fn new(options: SessionOptions) -> Self {
        let (monsters, rng) = match options.seed {
            Some(seed) => (
                MonsterController::seeded(seed),
                RandomNumberGenerator::seeded(seed.wrapping_add(1)),
            ),
            None => (
                MonsterController::new(RandomNumberGenerator::new()),
                RandomNumberGenerator::new(),
            ),
        };
        Self {
            phase: Phase::Menu,
            grid: Grid::default(),
            player: Player::default(),
            objective: LevelId::FIRST.spec().objective.to_string(),
            monsters,
            narrative: Narrative::default(),
            store: SaveStore::new(options.save_path),
            rng,
            monster_clock: Ticker::new(options.tick_interval),
            pulse_clock: Ticker::new(options.pulse_interval),
            glow: GlowPulse::default(),
            item_nearby: false,
            clock: Duration::ZERO,
            speech_duration: options.speech_duration,
            cues: SmallVec::new(),
            notice: None,
            quit_requested: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn level(&self) -> LevelId {
        self.player.level
    }

    pub fn objective(&self) -> &str {
        &self.objective
    }

    pub fn narrative(&self) -> &Narrative {
        &self.narrative
    }

    pub fn monsters(&self) -> &MonsterController {
        &self.monsters
    }

    pub fn glow(&self) -> f32 {
        self.glow.alpha
    }

    pub fn item_nearby(&self) -> bool {
        self.item_nearby
    }

    pub fn speech(&self) -> Option<&str> {
        self.narrative.active_message(self.clock)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn has_save(&self) -> bool {
        self.store.exists()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn tick_interval(&self) -> Duration {
        self.monster_clock.interval()
    }

    pub fn drain_cues(&mut self) -> SmallVec<[Cue; 8]> {
        std::mem::take(&mut self.cues)
    }

    /// Runs one command. Anything not meaningful in the current phase, or
    /// issued while a notice is up, is ignored.
    pub fn apply(&mut self, command: Command) {
        if self.notice.is_some() {
            return;
        }
        match (self.phase, command) {
            (Phase::Menu, Command::NewGame) => self.start_new_game(),
            (Phase::Menu, Command::Continue) => self.continue_saved(),
            (Phase::Menu, Command::Quit) => self.quit_requested = true,
            (Phase::Playing, Command::Move(direction)) => self.move_player(direction),
            (Phase::Playing, Command::Interact) => self.interact(),
            (Phase::Playing, Command::Save) => self.save_game(),
            (Phase::Playing, Command::Load) => {
                self.load_game();
            }
            (Phase::Playing, Command::Help) => self.notice = Some(Notice::Help),
            (Phase::Playing, Command::Pause) => self.pause(),
            (Phase::Paused, Command::Resume) => self.resume(),
            (Phase::Playing | Phase::Paused | Phase::Won, Command::QuitToMenu) => {
                self.quit_to_menu()
            }
            (phase, command) => debug!(?phase, ?command, "command_ignored"),
        }
    }

    /// Feeds elapsed wall time to the clocks. Returns the number of monster
    /// ticks that ran.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.clock = self.clock.saturating_add(elapsed);
        self.narrative.expire(self.clock);
        if self.notice.is_some() || self.phase != Phase::Playing {
            return 0;
        }

        let due = self.monster_clock.advance(elapsed);
        let mut ran = 0;
        for _ in 0..due {
            if self.phase != Phase::Playing {
                break;
            }
            self.tick();
            ran += 1;
        }

        if self.phase == Phase::Playing {
            for _ in 0..self.pulse_clock.advance(elapsed) {
                self.glow.step();
            }
        }
        ran
    }

    pub fn start_new_game(&mut self) {
        self.load_level(LevelId::FIRST);
        self.enter_playing();
        info!("new_game_started");
    }

    fn continue_saved(&mut self) {
        if !self.store.exists() {
            self.notice = Some(Notice::NoSave);
            return;
        }
        if self.load_game() {
            self.enter_playing();
        }
    }

    pub fn pause(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        self.phase = Phase::Paused;
        self.stop_clocks();
        info!(level = self.player.level.number(), "paused");
    }

    pub fn resume(&mut self) {
        if self.phase != Phase::Paused {
            return;
        }
        self.enter_playing();
        info!(level = self.player.level.number(), "resumed");
    }

    pub fn quit_to_menu(&mut self) {
        self.stop_clocks();
        self.phase = Phase::Menu;
    }

    fn enter_playing(&mut self) {
        self.phase = Phase::Playing;
        self.monster_clock.start();
        self.pulse_clock.start();
    }

    fn stop_clocks(&mut self) {
        self.monster_clock.stop();
        self.pulse_clock.stop();
    }

    /// Replaces the whole level: fresh grid, player at the start, item flag
    /// and sage dialogue reset, hostiles respawned.
    pub fn load_level(&mut self, level: LevelId) {
        let spec = level.spec();
        self.grid = data::template(level);
        self.player = Player {
            level,
            ..Player::default()
        };
        self.grid.set_cell(self.player.point, Cell::Player);
        self.objective = spec.objective.to_string();
        self.narrative.append_line(format!("=== {} ===", spec.title));
        self.narrative.append_line(spec.objective);
        self.grid.scatter_decorations(&mut self.rng, spec.decorations);
        self.monsters.reset_for_level(level, &mut self.grid);
        self.item_nearby = false;
        info!(level = level.number(), title = spec.title, "level_loaded");
    }

    pub fn move_player(&mut self, direction: Direction) {
        if self.phase != Phase::Playing {
            return;
        }
        let target = direction.step(self.player.point);
        let Some(cell) = self.grid.cell_at(target) else {
            return;
        };
        if cell.blocks_move() {
            return;
        }

        let level = self.player.level;
        let item = level.spec().item;
        if cell == Cell::Item(item) && !self.player.has_item {
            self.player.has_item = true;
            self.grid.set_cell(target, Cell::Floor);
            self.narrative
                .append_line(format!("You acquired the {}!", item.as_str()));
            self.objective = ITEM_FOUND_OBJECTIVE.to_string();
            self.cues.push(Cue::Pickup);
            info!(level = level.number(), item = item.as_str(), "item_collected");
        }

        if cell == Cell::Exit {
            if self.player.has_item {
                match level.next() {
                    Some(next) if !level.is_final() => self.load_level(next),
                    _ => self.win(),
                }
            } else {
                self.narrative
                    .append_line(format!("Exit is sealed without the {}.", item.as_str()));
                self.cues.push(Cue::Locked);
            }
            return;
        }

        if self.monsters.is_occupied_by_monster(target)
            || MonsterController::is_trap(&self.grid, target)
        {
            self.lose();
            return;
        }

        if self.grid.cell_at(self.player.point) == Some(Cell::Player) {
            self.grid.set_cell(self.player.point, Cell::Floor);
        }
        self.player.point = target;
        self.player.facing = direction.facing();
        self.grid.set_cell(target, Cell::Player);
        if self.monsters.is_occupied_by_monster(target) {
            self.lose();
            return;
        }
        self.check_proximity();
    }

    pub fn interact(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        let level = self.player.level;
        let spec = level.spec();
        if adjacent(self.player.point, data::sage_position(level)) {
            self.cues.push(Cue::Sage);
            self.player.sage_stage += 1;
            let line = spec.sage_line(self.player.sage_stage);
            self.narrative
                .show_transient_message(line, self.speech_duration, self.clock);
            self.narrative.append_line(line);
            return;
        }

        if level.is_final() {
            if let Some(warden) = self.monsters.boss_position() {
                if adjacent(self.player.point, warden) {
                    if self.player.has_item {
                        self.monsters.kill_boss(&mut self.grid);
                        self.narrative
                            .append_line("Warden defeated! The curse is broken!");
                        self.cues.push(Cue::BossDefeat);
                        info!("warden_defeated");
                    } else {
                        self.narrative.append_line(format!(
                            "You need the {} to challenge the Warden!",
                            spec.item.as_str()
                        ));
                        self.cues.push(Cue::Locked);
                    }
                    return;
                }
            }
        }
        self.narrative.append_line("Nothing to interact with.");
    }

    /// One monster tick: hostiles wander, then proximity and collision are
    /// re-checked. A controller fault is logged and ends the tick early.
    pub fn tick(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        if let Err(error) = self.monsters.tick(&mut self.grid, self.player.point) {
            warn!(%error, "monster_tick_failed");
            self.narrative
                .append_line(format!("Error moving monsters: {error}"));
            return;
        }
        self.check_proximity();
        if self.monsters.is_occupied_by_monster(self.player.point) {
            self.lose();
        }
    }

    /// Raises the glow cue while the uncollected item is within two cells.
    pub fn check_proximity(&mut self) {
        let item = Cell::Item(self.player.level.spec().item);
        let origin = self.player.point;
        self.item_nearby = !self.player.has_item
            && self
                .grid
                .find_all(item)
                .into_iter()
                .any(|point| DistanceAlg::Chebyshev.distance2d(origin, point) <= GLOW_RADIUS);
        if self.item_nearby {
            self.cues.push(Cue::Glow);
        }
    }

    fn win(&mut self) {
        self.stop_clocks();
        self.phase = Phase::Won;
        self.narrative
            .append_line("You escaped the Warden's Vault. The curse is shattered!");
        self.cues.push(Cue::Win);
        info!("game_won");
    }

    fn lose(&mut self) {
        self.cues.push(Cue::Lose);
        self.narrative.append_line("You were caught.");
        self.notice = Some(Notice::Defeat);
        self.quit_to_menu();
        info!(level = self.player.level.number(), "game_lost");
    }

    pub fn save_game(&mut self) {
        let record = SaveRecord {
            level: self.player.level,
            player: self.player.point,
            facing: self.player.facing,
            has_item: self.player.has_item,
            hostiles: self
                .monsters
                .hostiles()
                .into_iter()
                .map(|hostile| hostile.point)
                .collect(),
            grid: self.grid.clone(),
        };
        match self.store.write(&record) {
            Ok(()) => {
                info!(path = %self.store.path().display(), "save_written");
                self.notice = Some(Notice::Saved);
            }
            Err(error) => {
                warn!(path = %self.store.path().display(), %error, "save_failed");
                self.notice = Some(Notice::SaveFailed(error.to_string()));
            }
        }
    }

    /// Restores the level and item flag from disk. On failure nothing
    /// changes except the notice.
    pub fn load_game(&mut self) -> bool {
        let record = match self.store.read() {
            Ok(record) => record,
            Err(error) => {
                warn!(path = %self.store.path().display(), %error, "load_failed");
                self.notice = Some(Notice::LoadFailed(error.to_string()));
                return false;
            }
        };

        self.load_level(record.level);
        self.player.has_item = record.has_item;
        if record.has_item {
            self.objective = ITEM_FOUND_OBJECTIVE.to_string();
        }
        self.narrative
            .append_line(format!("Game loaded. Level: {}.", record.level));
        self.notice = Some(Notice::Loaded(record.level));
        info!(
            level = record.level.number(),
            has_item = record.has_item,
            skipped_hostiles = record.hostiles.len(),
            "save_loaded"
        );
        true
    }
}

fn adjacent(a: Point, b: Point) -> bool {
    a != b && DistanceAlg::Chebyshev.distance2d(a, b) <= 1.0
}
