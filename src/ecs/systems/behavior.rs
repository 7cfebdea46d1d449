use crate::ecs::components::*;
use crate::ecs::systems::movement::{begin_move, move_to_tile};
use crate::ecs::systems::steering::step_toward;
use crate::ecs::systems::{forage, reproduction, TickContext};
use crate::events::CancelReason;
use crate::spatial::nearest_mate;
use crate::villager::animation::Sway;

/// Blocked steps toward a partner before the pairing is dropped.
pub const REPRODUCTION_STUCK_LIMIT: u32 = 10;

/// Paused villager: count down, and decide once the timer runs out.
pub fn think(ctx: &mut TickContext, entity: hecs::Entity) {
    let (state, timer) = match ctx.world.get::<&mut Mind>(entity) {
        Ok(mut mind) => {
            mind.timer -= 1;
            (mind.state, mind.timer)
        }
        Err(_) => return,
    };
    if timer > 0 {
        return;
    }

    if state == BehaviorState::Pause {
        decide(ctx, entity);
    }

    // Still standing after deciding: stand up straight.
    if let Ok((mind, motion, sway)) = ctx
        .world
        .query_one_mut::<(&Mind, &Motion, &mut Sway)>(entity)
    {
        if mind.state == BehaviorState::Pause && !motion.moving {
            sway.settle();
        }
    }
}

/// Strict priority: reproduction, then foraging, then wandering.
fn decide(ctx: &mut TickContext, entity: hecs::Entity) {
    let Ok(mating) = ctx.world.get::<&Mating>(entity).map(|m| *m) else {
        return;
    };

    if mating.state == ReproductionState::Seeking {
        pursue_partner(ctx, entity, mating.partner);
        return;
    }

    if reproduction::can_reproduce_entity(ctx.world, entity) && seek_partner(ctx, entity) {
        return;
    }

    if !forage::forage(ctx, entity) {
        wander(ctx, entity);
    }
}

/// Pair with the nearest available mate and step toward it. Returns false
/// when nobody is available.
fn seek_partner(ctx: &mut TickContext, entity: hecs::Entity) -> bool {
    let Ok(cell) = ctx.world.get::<&Tile>(entity).map(|t| t.0) else {
        return false;
    };
    ctx.refresh_peers();
    let Some((partner, partner_cell)) =
        nearest_mate(ctx.peers.as_slice(), entity, cell).map(|p| (p.entity, p.cell))
    else {
        return false;
    };

    reproduction::pair(ctx, entity, partner);
    if !step_toward(ctx, entity, Some(partner_cell)) {
        ctx.reschedule(entity, 10, 20);
    }
    true
}

fn pursue_partner(ctx: &mut TickContext, entity: hecs::Entity, partner: Option<hecs::Entity>) {
    let valid = partner.filter(|&p| {
        reproduction::still_paired(ctx.world, entity, p)
            && reproduction::still_paired(ctx.world, p, entity)
    });
    let Some(partner) = valid else {
        reproduction::cancel(ctx, entity, CancelReason::PartnerUnavailable);
        ctx.reschedule(entity, 10, 30);
        return;
    };

    let (Ok(mine), Ok(theirs)) = (
        ctx.world.get::<&Tile>(entity).map(|t| t.0),
        ctx.world.get::<&Tile>(partner).map(|t| t.0),
    ) else {
        return;
    };

    if mine.manhattan(theirs) <= reproduction::REPRODUCTION_RANGE {
        if reproduction::try_reproduce(ctx, entity, partner) {
            return;
        }
        if !step_toward(ctx, entity, Some(theirs)) {
            ctx.reschedule(entity, 5, 15);
        }
        return;
    }

    if step_toward(ctx, entity, Some(theirs)) {
        if let Ok(mut m) = ctx.world.get::<&mut Mating>(entity) {
            m.stuck = 0;
        }
        return;
    }

    let stuck = match ctx.world.get::<&mut Mating>(entity) {
        Ok(mut m) => {
            m.stuck += 1;
            m.stuck
        }
        Err(_) => return,
    };
    if stuck >= REPRODUCTION_STUCK_LIMIT {
        reproduction::cancel(ctx, entity, CancelReason::Blocked);
        ctx.reschedule(entity, 30, 60);
    } else {
        ctx.reschedule(entity, 10, 20);
    }
}

fn wander(ctx: &mut TickContext, entity: hecs::Entity) {
    let Ok(cell) = ctx.world.get::<&Tile>(entity).map(|t| t.0) else {
        return;
    };
    let options = ctx.grid.walkable_neighbours(cell);
    if options.is_empty() {
        ctx.reschedule(entity, 30, 60);
        return;
    }
    let pick = options[ctx.rng.usize(0..options.len())];
    if move_to_tile(ctx, entity, pick) {
        begin_move(ctx, entity, 30, 90);
    } else {
        ctx.reschedule(entity, 15, 30);
    }
}
