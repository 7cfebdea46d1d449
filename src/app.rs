use std::path::PathBuf;
use std::time::Duration;

use instant::Instant;

use crate::config::SimConfig;
use crate::render::FrameInstances;
use crate::simulation::Simulation;

/// Target simulation tick rate (seconds per tick).
const TICK_RATE: f64 = 1.0 / 60.0;
/// Max accumulated time before we clamp (prevents spiral of death).
const MAX_ACCUMULATOR: f64 = 0.25;
/// How often to log stats (seconds).
const STATS_LOG_INTERVAL: f64 = 5.0;

// ---------------------------------------------------------------------------
// Tick timing
// ---------------------------------------------------------------------------

struct TickStats {
    last_log_time: Instant,
    ticks_since_log: u64,
}

impl TickStats {
    fn new() -> Self {
        Self {
            last_log_time: Instant::now(),
            ticks_since_log: 0,
        }
    }

    fn record(&mut self, ticks: u64, sim: &Simulation) {
        self.ticks_since_log += ticks;

        let elapsed = self.last_log_time.elapsed().as_secs_f64();
        if elapsed >= STATS_LOG_INTERVAL {
            let tps = self.ticks_since_log as f64 / elapsed;
            log::info!(
                "TPS: {:.0} | tick {} | {}",
                tps,
                sim.tick_count(),
                sim.census()
            );
            log::debug!("Phases: {}", sim.timers().summary());
            self.last_log_time = Instant::now();
            self.ticks_since_log = 0;
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Headless driver: wall clock in, fixed ticks out.
struct App {
    sim: Simulation,
    frame: FrameInstances,

    // Fixed timestep
    last_frame_time: Option<Instant>,
    accumulator: f64,
    /// Stop after this many ticks (0 = run forever).
    run_ticks: u64,

    stats: TickStats,
}

impl App {
    fn new(sim: Simulation) -> Self {
        let run_ticks = sim.config().run_ticks;
        Self {
            sim,
            frame: FrameInstances::new(),
            last_frame_time: None,
            accumulator: 0.0,
            run_ticks,
            stats: TickStats::new(),
        }
    }

    fn finished(&self) -> bool {
        self.run_ticks != 0 && self.sim.tick_count() >= self.run_ticks
    }

    /// Run fixed-timestep simulation ticks. Returns how many ran.
    fn run_fixed_update(&mut self, dt: f64) -> u64 {
        self.accumulator += dt;

        if self.accumulator > MAX_ACCUMULATOR {
            self.accumulator = MAX_ACCUMULATOR;
        }

        let mut ticks = 0;
        while self.accumulator >= TICK_RATE && !self.finished() {
            self.sim.tick();
            self.accumulator -= TICK_RATE;
            ticks += 1;
        }
        ticks
    }

    fn frame(&mut self) {
        let now = Instant::now();
        let dt = match self.last_frame_time {
            Some(last) => now.duration_since(last).as_secs_f64(),
            None => 0.0,
        };
        self.last_frame_time = Some(now);

        let ticks = self.run_fixed_update(dt);
        if ticks > 0 {
            self.sim.build_instances(&mut self.frame);
        }
        self.stats.record(ticks, &self.sim);

        for event in self.sim.take_events() {
            log::trace!("{event:?}");
        }
    }

    fn run(&mut self) {
        while !self.finished() {
            self.frame();
            std::thread::sleep(Duration::from_secs_f64(TICK_RATE));
        }
        log::info!(
            "Finished after {} ticks | {}",
            self.sim.tick_count(),
            self.sim.census()
        );
    }
}

/// Entry point: `villagers [config.json]`.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            SimConfig::load(&path)?
        }
        None => SimConfig::default(),
    };

    let sim = Simulation::from_config(config)?;
    let mut app = App::new(sim);
    app.run();
    Ok(())
}
