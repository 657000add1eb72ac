use std::time::Duration;

/// Most ticks a single `advance` will run; any further backlog is dropped.
pub const MAX_TICKS_PER_ADVANCE: u32 = 4;

/// Fixed-interval tick source fed by frame time. Stopping discards whatever
/// time had accumulated, so nothing is replayed on restart.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    accumulator: Duration,
    running: bool,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: if interval.is_zero() {
                Duration::from_millis(1)
            } else {
                interval
            },
            accumulator: Duration::ZERO,
            running: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = Duration::ZERO;
    }

    /// Number of ticks due after `elapsed` more time.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.running {
            return 0;
        }
        self.accumulator = self.accumulator.saturating_add(elapsed);
        let mut due = 0u32;
        while self.accumulator >= self.interval && due < MAX_TICKS_PER_ADVANCE {
            self.accumulator = self.accumulator.saturating_sub(self.interval);
            due += 1;
        }
        if self.accumulator >= self.interval {
            self.accumulator = Duration::ZERO;
        }
        due
    }
}

/// Cosmetic value bouncing between `GLOW_MIN` and `GLOW_MAX`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowPulse {
    pub alpha: f32,
    rising: bool,
}

pub const GLOW_MIN: f32 = 0.3;
pub const GLOW_MAX: f32 = 0.9;
const GLOW_STEP: f32 = 0.07;

impl Default for GlowPulse {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            rising: true,
        }
    }
}

impl GlowPulse {
    pub fn step(&mut self) {
        if self.rising {
            self.alpha += GLOW_STEP;
        } else {
            self.alpha -= GLOW_STEP;
        }
        if self.alpha >= GLOW_MAX {
            self.rising = false;
        }
        if self.alpha <= GLOW_MIN {
            self.rising = true;
        }
    }
}
