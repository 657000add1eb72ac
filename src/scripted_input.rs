//! Headless replay of a key script.
//!
//! One character per key press. Blank lines and lines starting with `#` are
//! skipped. A space or `_` is the interact key, `!` is Enter.

use bracket_terminal::prelude::VirtualKeyCode;
use std::{fmt::Write as _, fs, io, path::Path};
use tracing::{debug, warn};

use crate::audio::CueSink;
use crate::input::command_for_key;
use crate::session::GameSession;

pub struct ScriptedInput {
    script_commands: Vec<VirtualKeyCode>,
    current_command_index: usize,
}

impl ScriptedInput {
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    pub fn parse(text: &str) -> Self {
        let mut script_commands = Vec::new();
        for line in text.lines() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            for char_code in line.chars() {
                match char_to_virtualkeycode(char_code) {
                    Some(key) => script_commands.push(key),
                    None => warn!(key = %char_code.escape_debug(), "unknown_script_key"),
                }
            }
        }

        Self {
            script_commands,
            current_command_index: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.script_commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.script_commands.is_empty()
    }

    pub fn next_key(&mut self) -> Option<VirtualKeyCode> {
        let key = self.script_commands.get(self.current_command_index).copied()?;
        self.current_command_index += 1;
        Some(key)
    }
}

fn char_to_virtualkeycode(c: char) -> Option<VirtualKeyCode> {
    match c {
        'w' | 'W' => Some(VirtualKeyCode::W),
        'a' | 'A' => Some(VirtualKeyCode::A),
        's' | 'S' => Some(VirtualKeyCode::S),
        'd' | 'D' => Some(VirtualKeyCode::D),
        ' ' | '_' => Some(VirtualKeyCode::Space),
        'v' | 'V' => Some(VirtualKeyCode::V),
        'l' | 'L' => Some(VirtualKeyCode::L),
        'h' | 'H' => Some(VirtualKeyCode::H),
        'p' | 'P' => Some(VirtualKeyCode::P),
        'n' | 'N' => Some(VirtualKeyCode::N),
        'r' | 'R' => Some(VirtualKeyCode::R),
        'q' | 'Q' => Some(VirtualKeyCode::Q),
        '!' => Some(VirtualKeyCode::Return),
        '\x1B' => Some(VirtualKeyCode::Escape),
        _ => None,
    }
}

/// Starts a game if none is running, then feeds every key followed by one
/// monster tick. A key pressed while a notice is up only dismisses it.
/// Returns the number of keys consumed.
pub fn replay(session: &mut GameSession, script: &mut ScriptedInput, sink: &mut impl CueSink) -> usize {
    if session.phase() == crate::session::Phase::Menu {
        session.start_new_game();
    }
    let interval = session.tick_interval();
    let mut consumed = 0;
    while let Some(key) = script.next_key() {
        consumed += 1;
        if session.notice().is_some() {
            session.dismiss_notice();
        } else if let Some(command) = command_for_key(session.phase(), key, session.has_save()) {
            debug!(?key, ?command, "script_command");
            session.apply(command);
        }
        session.advance(interval);
        for cue in session.drain_cues() {
            sink.play(cue);
        }
        if session.quit_requested() {
            break;
        }
    }
    consumed
}

pub fn summary(session: &GameSession) -> String {
    let player = session.player();
    let mut out = String::new();
    let _ = writeln!(out, "phase: {:?}", session.phase());
    let _ = writeln!(out, "level: {}", session.level());
    let _ = writeln!(
        out,
        "player: {},{} facing {:?}",
        player.point.y, player.point.x, player.facing
    );
    let _ = writeln!(out, "has_item: {}", player.has_item);
    if let Some(notice) = session.notice() {
        let _ = writeln!(out, "notice: {}", notice.body().replace('\n', " / "));
    }
    for row in session.grid().to_rows() {
        let _ = writeln!(out, "{row}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingSink;
    use crate::session::{Notice, Phase, SessionOptions};
    use bracket_geometry::prelude::Point;

    fn session(dir: &tempfile::TempDir) -> GameSession {
        GameSession::new(SessionOptions {
            seed: Some(5),
            save_path: dir.path().join("maze_save.txt"),
            ..SessionOptions::default()
        })
    }

    #[test]
    fn comments_and_unknown_keys_are_skipped() {
        let mut script = ScriptedInput::parse("# walk east\n\ndz?d\r\n _\n");
        assert_eq!(script.len(), 4);
        assert_eq!(script.next_key(), Some(VirtualKeyCode::D));
        assert_eq!(script.next_key(), Some(VirtualKeyCode::D));
        assert_eq!(script.next_key(), Some(VirtualKeyCode::Space));
        assert_eq!(script.next_key(), Some(VirtualKeyCode::Space));
        assert_eq!(script.next_key(), None);
    }

    #[test]
    fn replay_moves_the_player() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir);
        let mut sink = RecordingSink::default();
        let mut script = ScriptedInput::parse("dd\n");
        assert_eq!(replay(&mut session, &mut script, &mut sink), 2);
        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(session.player().point, Point::new(2, 1));
        assert_eq!(session.monsters().ticks, 2);

        let text = summary(&session);
        assert!(text.contains("phase: Playing"));
        assert!(text.contains("level: 1"));
        assert!(text.contains("player: 1,2 facing Right"));
    }

    #[test]
    fn replay_into_a_trap_ends_on_the_menu() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir);
        let mut sink = RecordingSink::default();
        let mut script = ScriptedInput::parse("ssdsss\n");
        replay(&mut session, &mut script, &mut sink);
        assert_eq!(session.phase(), Phase::Menu);
        assert_eq!(session.notice(), Some(&Notice::Defeat));
        assert!(sink.played.contains(&"lose"));
        assert!(summary(&session).contains("Game Over! You were caught."));
    }
}
