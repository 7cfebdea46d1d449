//! Hand-built tick context for system unit tests.

use glam::Vec2;

use crate::carrot::Carrots;
use crate::config::SimConfig;
use crate::ecs::components::{AgeClass, Inventory};
use crate::ecs::systems::TickContext;
use crate::events::EventLog;
use crate::grid::{Cell, Grid};
use crate::particles::ParticleSystem;
use crate::projection::IsoProjection;
use crate::spatial::Peer;
use crate::villager::{spawn_villager, Placement};

pub struct Harness {
    pub world: hecs::World,
    pub roster: Vec<hecs::Entity>,
    pub grid: Grid,
    pub projection: IsoProjection,
    pub config: SimConfig,
    pub carrots: Carrots,
    pub particles: ParticleSystem,
    pub rng: fastrand::Rng,
    pub events: EventLog,
    pub peers: Vec<Peer>,
}

impl Harness {
    pub fn new(grid: Grid) -> Self {
        let config = SimConfig::default();
        Self {
            world: hecs::World::new(),
            roster: Vec::new(),
            grid,
            projection: IsoProjection::new(100.0, Vec2::ZERO),
            carrots: Carrots::new(config.max_carrots),
            config,
            particles: ParticleSystem::new(),
            rng: fastrand::Rng::with_seed(7),
            events: EventLog::new(),
            peers: Vec::new(),
        }
    }

    pub fn spawn(&mut self, age: AgeClass, cell: Cell) -> hecs::Entity {
        let e = spawn_villager(
            &mut self.world,
            &self.grid,
            &self.projection,
            &self.config,
            &mut self.rng,
            age,
            Placement::At(cell),
        );
        self.roster.push(e);
        e
    }

    pub fn set_carrots(&mut self, entity: hecs::Entity, n: u32) {
        self.world.get::<&mut Inventory>(entity).unwrap().carrots = n;
    }

    pub fn ctx(&mut self) -> TickContext<'_> {
        TickContext {
            world: &mut self.world,
            roster: &mut self.roster,
            grid: &self.grid,
            projection: &self.projection,
            config: &self.config,
            carrots: &mut self.carrots,
            particles: &mut self.particles,
            rng: &mut self.rng,
            events: &mut self.events,
            peers: &mut self.peers,
        }
    }
}
