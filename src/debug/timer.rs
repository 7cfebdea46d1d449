use instant::Instant;

/// Which phase of the simulation tick is being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TickPhase {
    Spawn = 0,
    Carrots = 1,
    Villagers = 2,
    Particles = 3,
}

impl TickPhase {
    pub const ALL: [TickPhase; 4] = [Self::Spawn, Self::Carrots, Self::Villagers, Self::Particles];

    pub fn label(self) -> &'static str {
        match self {
            Self::Spawn => "Spawn",
            Self::Carrots => "Carrots",
            Self::Villagers => "Villagers",
            Self::Particles => "Particles",
        }
    }
}

/// Per-phase timing with exponential moving average smoothing.
pub struct TickTimers {
    /// EMA-smoothed duration in microseconds per phase.
    pub durations_us: [f64; 4],
    start: Instant,
}

const EMA_ALPHA: f64 = 0.1;

impl TickTimers {
    pub fn new() -> Self {
        Self {
            durations_us: [0.0; 4],
            start: Instant::now(),
        }
    }

    /// Call before a phase runs.
    pub fn begin(&mut self) {
        self.start = Instant::now();
    }

    /// Call after a phase finishes. Records elapsed time for `phase`.
    pub fn end(&mut self, phase: TickPhase) {
        let elapsed_us = self.start.elapsed().as_secs_f64() * 1_000_000.0;
        let idx = phase as usize;
        self.durations_us[idx] =
            self.durations_us[idx] * (1.0 - EMA_ALPHA) + elapsed_us * EMA_ALPHA;
    }

    pub fn phase_us(&self, phase: TickPhase) -> f64 {
        self.durations_us[phase as usize]
    }

    /// One-line summary for the log.
    pub fn summary(&self) -> String {
        TickPhase::ALL
            .iter()
            .map(|p| format!("{} {:.1}us", p.label(), self.phase_us(*p)))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl Default for TickTimers {
    fn default() -> Self {
        Self::new()
    }
}
