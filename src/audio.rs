use std::io::Write;

use tracing::debug;

/// Named one-shot sound events raised by the session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    Pickup,
    Locked,
    Sage,
    Glow,
    BossDefeat,
    Win,
    Lose,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Pickup => "pickup",
            Cue::Locked => "locked",
            Cue::Sage => "sage",
            Cue::Glow => "glow",
            Cue::BossDefeat => "boss_defeat",
            Cue::Win => "win",
            Cue::Lose => "lose",
        }
    }

    /// Ambient cues repeat every tick and are not worth a bell.
    pub fn is_ambient(&self) -> bool {
        matches!(self, Cue::Glow)
    }
}

/// Fire-and-forget playback. Implementations swallow their own failures.
pub trait CueSink {
    fn play(&mut self, cue: Cue);
}

/// Rings the terminal bell for non-ambient cues.
pub struct TerminalBell {
    enabled: bool,
}

impl TerminalBell {
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl CueSink for TerminalBell {
    fn play(&mut self, cue: Cue) {
        debug!(cue = cue.as_str(), "cue");
        if !self.enabled || cue.is_ambient() {
            return;
        }
        let mut err = std::io::stderr();
        let _ = err.write_all(b"\x07").and_then(|_| err.flush());
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub played: Vec<&'static str>,
}

impl CueSink for RecordingSink {
    fn play(&mut self, cue: Cue) {
        self.played.push(cue.as_str());
    }
}
