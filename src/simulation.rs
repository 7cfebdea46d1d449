//! Tick orchestration and external commands.

use std::path::Path;

use crate::carrot::{Carrot, Carrots};
use crate::config::SimConfig;
use crate::debug::timer::{TickPhase, TickTimers};
use crate::debug::Census;
use crate::ecs::components::{AgeClass, Tile};
use crate::ecs::systems::{update_villager, TickContext};
use crate::error::{Result, SimError};
use crate::events::{EventLog, SimEvent, Stamped};
use crate::grid::{Cell, Grid};
use crate::map;
use crate::particles::ParticleSystem;
use crate::projection::{IsoProjection, Projection};
use crate::render::{instance, FrameInstances};
use crate::spatial::Peer;
use crate::villager::{spawn_villager, Placement};

/// A request from outside the tick loop, applied between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Add one adult at a random free cell.
    AddVillager,
    /// Drop every villager and carrot and respawn the starting population.
    Reset,
    /// Add one carrot at a random walkable cell, unless at the cap.
    AddCarrot,
}

pub struct Simulation {
    config: SimConfig,
    grid: Grid,
    projection: Box<dyn Projection>,
    world: hecs::World,
    /// Update order. Spawn order, newborns at the end.
    roster: Vec<hecs::Entity>,
    carrots: Carrots,
    particles: ParticleSystem,
    rng: fastrand::Rng,
    events: EventLog,
    peers: Vec<Peer>,
    spawn_timer: u32,
    tick: u64,
    timers: TickTimers,
}

impl Simulation {
    /// Build a simulation on `grid` and spawn the starting population.
    pub fn new(config: SimConfig, grid: Grid) -> Result<Self> {
        config.validate()?;
        check_grid(&grid)?;
        let rng = fastrand::Rng::with_seed(config.seed);
        Ok(Self::with_rng(config, grid, rng))
    }

    /// Validate `config`, then load its map (or generate the island) with
    /// the seeded RNG so the whole run replays from the seed.
    pub fn from_config(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = fastrand::Rng::with_seed(config.seed);
        let grid = map::load_or_island(config.map_path.as_deref(), &mut rng);
        check_grid(&grid)?;
        Ok(Self::with_rng(config, grid, rng))
    }

    fn with_rng(config: SimConfig, grid: Grid, rng: fastrand::Rng) -> Self {
        let projection = Box::new(IsoProjection::new(config.tile_scale, config.origin()));
        let mut sim = Self {
            carrots: Carrots::new(config.max_carrots),
            config,
            grid,
            projection,
            world: hecs::World::new(),
            roster: Vec::new(),
            particles: ParticleSystem::new(),
            rng,
            events: EventLog::new(),
            peers: Vec::new(),
            spawn_timer: 0,
            tick: 0,
            timers: TickTimers::new(),
        };
        sim.spawn_initial();
        log::info!(
            "Simulation ready: {}x{} map, {} walkable cells, {} villagers",
            sim.grid.rows(),
            sim.grid.cols(),
            sim.grid.walkable_count(),
            sim.roster.len(),
        );
        sim
    }

    /// Convenience for hosts that only have a config path.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_config(SimConfig::load(path)?)
    }

    fn spawn_initial(&mut self) {
        for _ in 0..self.config.initial_villagers {
            self.add_villager();
        }
    }

    /// Advance one tick: carrot spawning, carrot animation, every villager in
    /// roster order, then particles.
    pub fn tick(&mut self) {
        self.tick += 1;
        self.events.set_tick(self.tick);

        self.timers.begin();
        self.spawn_timer += 1;
        if self.spawn_timer >= self.config.carrot_spawn_interval && !self.carrots.is_full() {
            self.spawn_timer = 0;
            self.spawn_carrot();
        }
        self.timers.end(TickPhase::Spawn);

        self.timers.begin();
        self.carrots.update();
        self.timers.end(TickPhase::Carrots);

        self.timers.begin();
        // Newborns appended during the loop wait until next tick.
        let order = self.roster.clone();
        let mut ctx = TickContext {
            world: &mut self.world,
            roster: &mut self.roster,
            grid: &self.grid,
            projection: &*self.projection,
            config: &self.config,
            carrots: &mut self.carrots,
            particles: &mut self.particles,
            rng: &mut self.rng,
            events: &mut self.events,
            peers: &mut self.peers,
        };
        for entity in order {
            update_villager(&mut ctx, entity);
        }
        self.timers.end(TickPhase::Villagers);

        self.timers.begin();
        self.particles.update();
        self.timers.end(TickPhase::Particles);
    }

    /// Run `n` ticks back to back.
    pub fn run(&mut self, n: u64) {
        for _ in 0..n {
            self.tick();
        }
    }

    pub fn apply(&mut self, command: Command) {
        log::debug!("Applying {command:?}");
        match command {
            Command::AddVillager => {
                self.add_villager();
            }
            Command::Reset => self.reset(),
            Command::AddCarrot => {
                self.add_carrot();
            }
        }
    }

    /// Add one adult at a random free cell.
    pub fn add_villager(&mut self) -> hecs::Entity {
        self.spawn(AgeClass::Adult, Placement::Random)
    }

    /// Add a villager on a specific cell.
    pub fn spawn_villager_at(&mut self, age: AgeClass, cell: Cell) -> hecs::Entity {
        self.spawn(age, Placement::At(cell))
    }

    fn spawn(&mut self, age: AgeClass, placement: Placement) -> hecs::Entity {
        let entity = spawn_villager(
            &mut self.world,
            &self.grid,
            &*self.projection,
            &self.config,
            &mut self.rng,
            age,
            placement,
        );
        self.roster.push(entity);
        let cell = self
            .world
            .get::<&Tile>(entity)
            .map(|t| t.0)
            .unwrap_or_else(|_| self.grid.center());
        self.events.emit(SimEvent::VillagerAdded {
            villager: entity,
            cell,
        });
        entity
    }

    /// Clear villagers and carrots and respawn the starting population.
    /// Particles in flight finish on their own.
    pub fn reset(&mut self) {
        self.world.clear();
        self.roster.clear();
        self.peers.clear();
        self.carrots.clear();
        self.spawn_initial();
        self.events.emit(SimEvent::Reset {
            population: self.roster.len(),
        });
    }

    /// Add a carrot at a random walkable cell. False at the cap or when no
    /// cell was found.
    pub fn add_carrot(&mut self) -> bool {
        if self.carrots.is_full() {
            log::debug!("Carrot cap {} reached", self.carrots.cap());
            return false;
        }
        self.spawn_carrot().is_some()
    }

    /// Place a carrot on `cell` regardless of the cap.
    pub fn add_carrot_at(&mut self, cell: Cell) -> Carrot {
        let carrot = self.carrots.insert(cell);
        self.events.emit(SimEvent::CarrotSpawned {
            carrot: carrot.id,
            cell,
        });
        carrot
    }

    fn spawn_carrot(&mut self) -> Option<Carrot> {
        let carrot = self.carrots.spawn(&self.grid, &mut self.rng);
        match carrot {
            Some(c) => self.events.emit(SimEvent::CarrotSpawned {
                carrot: c.id,
                cell: c.cell,
            }),
            None => log::debug!("No walkable cell found for a carrot"),
        }
        carrot
    }

    pub fn census(&self) -> Census {
        Census::take(&self.world, &self.roster, &self.carrots, &self.grid)
    }

    /// Events since the last call.
    pub fn take_events(&mut self) -> Vec<SimEvent> {
        self.events.take()
    }

    pub fn recent_events(&self) -> impl Iterator<Item = &Stamped> {
        self.events.recent()
    }

    /// Refill `frame` with this tick's draw lists.
    pub fn build_instances(&self, frame: &mut FrameInstances) {
        instance::build_villagers(&self.world, &self.roster, &mut frame.villagers);
        instance::build_carrots(self.carrots.iter(), &*self.projection, &mut frame.carrots);
        frame.particles.clear();
        self.particles.build_instances(&mut frame.particles);
    }

    pub fn world(&self) -> &hecs::World {
        &self.world
    }

    /// Direct component access for hosts and test setups.
    pub fn world_mut(&mut self) -> &mut hecs::World {
        &mut self.world
    }

    pub fn roster(&self) -> &[hecs::Entity] {
        &self.roster
    }

    pub fn carrots(&self) -> &Carrots {
        &self.carrots
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn projection(&self) -> &dyn Projection {
        &*self.projection
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn timers(&self) -> &TickTimers {
        &self.timers
    }
}

/// Villagers must always stand on walkable ground, so a map without any is
/// unusable.
fn check_grid(grid: &Grid) -> Result<()> {
    if grid.walkable_count() == 0 {
        return Err(SimError::NoWalkableCells);
    }
    Ok(())
}
