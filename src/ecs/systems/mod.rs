pub mod behavior;
pub mod forage;
pub mod movement;
pub mod reproduction;
pub mod spatial;
pub mod steering;

use crate::carrot::Carrots;
use crate::config::SimConfig;
use crate::ecs::components::{Mind, Mating, Motion};
use crate::events::EventLog;
use crate::grid::Grid;
use crate::particles::ParticleSystem;
use crate::projection::Projection;
use crate::spatial::Peer;

/// Everything a villager update may read or mutate, borrowed from the
/// simulation for the duration of one tick.
pub struct TickContext<'a> {
    pub world: &'a mut hecs::World,
    /// Population in update order. Newborns are appended here.
    pub roster: &'a mut Vec<hecs::Entity>,
    pub grid: &'a Grid,
    pub projection: &'a dyn Projection,
    pub config: &'a SimConfig,
    pub carrots: &'a mut Carrots,
    pub particles: &'a mut ParticleSystem,
    pub rng: &'a mut fastrand::Rng,
    pub events: &'a mut EventLog,
    /// Reusable peer snapshot buffer.
    pub peers: &'a mut Vec<Peer>,
}

impl TickContext<'_> {
    /// Refresh the peer snapshot so it reflects all updates so far this tick.
    pub fn refresh_peers(&mut self) {
        spatial::rebuild(&*self.world, self.roster.as_slice(), &mut *self.peers);
    }

    /// Schedule the next decision `lo..=hi` ticks from now.
    pub fn reschedule(&mut self, entity: hecs::Entity, lo: i32, hi: i32) {
        let timer = self.rng.i32(lo..=hi);
        if let Ok(mut mind) = self.world.get::<&mut Mind>(entity) {
            mind.timer = timer;
        }
    }
}

/// Run one villager's full update for this tick.
///
/// Order: cooldown, carrot pickup, then either movement or (when paused)
/// the decision procedure.
pub fn update_villager(ctx: &mut TickContext, entity: hecs::Entity) {
    if let Ok(mut mating) = ctx.world.get::<&mut Mating>(entity) {
        mating.cooldown = mating.cooldown.saturating_sub(1);
    } else {
        return;
    }

    forage::consume_carrots(ctx, entity);

    let moving = ctx
        .world
        .get::<&Motion>(entity)
        .map(|m| m.moving)
        .unwrap_or(false);

    if moving {
        if movement::advance(ctx, entity) {
            reproduction::on_arrival(ctx, entity);
        }
    } else {
        behavior::think(ctx, entity);
    }
}
