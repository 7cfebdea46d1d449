use glam::Vec2;

use crate::ecs::components::*;
use crate::ecs::systems::TickContext;
use crate::events::{CancelReason, SimEvent};
use crate::villager::{spawn_villager, Placement};

/// Carrots each parent spends on a baby.
pub const REPRODUCTION_COST: u32 = 5;
/// Ticks before a parent may pair again.
pub const REPRODUCTION_COOLDOWN: u32 = 300;
/// Max Manhattan distance between partners for reproduction to happen.
pub const REPRODUCTION_RANGE: u32 = 2;
/// Hearts released on a successful reproduction.
const HEART_COUNT: usize = 15;

/// Adult, can pay for a baby, and off cooldown. Ignores pairing state.
pub fn is_fertile(body: &Body, inv: &Inventory, mating: &Mating) -> bool {
    body.age == AgeClass::Adult && inv.carrots >= REPRODUCTION_COST && mating.cooldown == 0
}

/// Fertile and not already paired.
pub fn can_reproduce(body: &Body, inv: &Inventory, mating: &Mating) -> bool {
    is_fertile(body, inv, mating) && mating.state == ReproductionState::None
}

fn fertile(world: &mut hecs::World, entity: hecs::Entity) -> bool {
    world
        .query_one_mut::<(&Body, &Inventory, &Mating)>(entity)
        .map(|(b, i, m)| is_fertile(b, i, m))
        .unwrap_or(false)
}

pub fn can_reproduce_entity(world: &mut hecs::World, entity: hecs::Entity) -> bool {
    world
        .query_one_mut::<(&Body, &Inventory, &Mating)>(entity)
        .map(|(b, i, m)| can_reproduce(b, i, m))
        .unwrap_or(false)
}

/// The link `entity -> partner` is intact: partner still exists, is still
/// fertile, is seeking, and points back at `entity`.
pub fn still_paired(world: &mut hecs::World, entity: hecs::Entity, partner: hecs::Entity) -> bool {
    if partner == entity || !world.contains(partner) {
        return false;
    }
    let linked = world
        .get::<&Mating>(partner)
        .map(|m| m.state == ReproductionState::Seeking && m.partner == Some(entity))
        .unwrap_or(false);
    linked && fertile(world, partner)
}

/// Link two villagers symmetrically.
pub fn pair(ctx: &mut TickContext, a: hecs::Entity, b: hecs::Entity) {
    for (me, other) in [(a, b), (b, a)] {
        if let Ok(mut m) = ctx.world.get::<&mut Mating>(me) {
            m.state = ReproductionState::Seeking;
            m.partner = Some(other);
            m.stuck = 0;
        }
        if let Ok(mut mind) = ctx.world.get::<&mut Mind>(me) {
            mind.carrot = None;
            mind.forage_stuck = 0;
        }
    }
    ctx.events.emit(SimEvent::Paired { a, b });
}

/// Clear `entity`'s pairing, and its partner's if the partner still points
/// back. Both sides are cleared within the same call.
pub fn cancel(ctx: &mut TickContext, entity: hecs::Entity, reason: CancelReason) {
    let partner = ctx
        .world
        .get::<&Mating>(entity)
        .ok()
        .and_then(|m| m.partner);

    if let Ok(mut m) = ctx.world.get::<&mut Mating>(entity) {
        m.clear();
    }
    if let Some(p) = partner {
        if let Ok(mut pm) = ctx.world.get::<&mut Mating>(p) {
            if pm.partner == Some(entity) {
                pm.clear();
            }
        }
    }
    ctx.events.emit(SimEvent::PairingCancelled {
        villager: entity,
        partner,
        reason,
    });
}

/// Reproduce if the two partners are within range.
///
/// On success both parents pay, enter cooldown and unpair, hearts burst at
/// their midpoint, and a baby appears on one parent's cell. The baby joins
/// the roster but is not updated until the next tick. Too far apart (or
/// unable to pay) changes nothing.
pub fn try_reproduce(ctx: &mut TickContext, a: hecs::Entity, b: hecs::Entity) -> bool {
    let (Ok(ta), Ok(tb)) = (
        ctx.world.get::<&Tile>(a).map(|t| t.0),
        ctx.world.get::<&Tile>(b).map(|t| t.0),
    ) else {
        return false;
    };
    if ta.manhattan(tb) > REPRODUCTION_RANGE {
        return false;
    }
    if !fertile(ctx.world, a) || !fertile(ctx.world, b) {
        return false;
    }

    let center = |world: &hecs::World, e: hecs::Entity| -> Vec2 {
        let pos = world.get::<&Motion>(e).map(|m| m.pos).unwrap_or(Vec2::ZERO);
        let size = world.get::<&Body>(e).map(|b| b.size).unwrap_or(Vec2::ZERO);
        pos + size * 0.5
    };
    let midpoint = (center(&*ctx.world, a) + center(&*ctx.world, b)) * 0.5;
    ctx.particles.burst_hearts(midpoint, HEART_COUNT, ctx.rng);

    for parent in [a, b] {
        if let Ok((inv, mating)) = ctx.world.query_one_mut::<(&mut Inventory, &mut Mating)>(parent) {
            inv.carrots -= REPRODUCTION_COST;
            mating.cooldown = REPRODUCTION_COOLDOWN;
            mating.clear();
        }
    }

    let cell = if ctx.rng.bool() { ta } else { tb };
    let baby = spawn_villager(
        ctx.world,
        ctx.grid,
        ctx.projection,
        ctx.config,
        ctx.rng,
        AgeClass::Baby,
        Placement::At(cell),
    );
    ctx.roster.push(baby);
    ctx.events.emit(SimEvent::Born {
        baby,
        parents: (a, b),
        cell,
        population: ctx.roster.len(),
    });
    true
}

/// A seeking villager that just finished a step tries to close the deal.
pub fn on_arrival(ctx: &mut TickContext, entity: hecs::Entity) {
    let Ok(mating) = ctx.world.get::<&Mating>(entity).map(|m| *m) else {
        return;
    };
    if mating.state != ReproductionState::Seeking {
        return;
    }
    if let Some(partner) = mating.partner {
        if still_paired(ctx.world, entity, partner) {
            try_reproduce(ctx, entity, partner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Cell, Grid, Terrain};
    use crate::testing::Harness;

    fn fertile_pair(h: &mut Harness, ca: Cell, cb: Cell) -> (hecs::Entity, hecs::Entity) {
        let a = h.spawn(AgeClass::Adult, ca);
        let b = h.spawn(AgeClass::Adult, cb);
        h.set_carrots(a, 6);
        h.set_carrots(b, 5);
        (a, b)
    }

    #[test]
    fn pairing_is_symmetric() {
        let mut h = Harness::new(Grid::filled(5, 5, Terrain::Grass));
        let (a, b) = fertile_pair(&mut h, Cell::new(0, 0), Cell::new(4, 4));
        let mut ctx = h.ctx();
        pair(&mut ctx, a, b);
        assert_eq!(ctx.world.get::<&Mating>(a).unwrap().partner, Some(b));
        assert_eq!(ctx.world.get::<&Mating>(b).unwrap().partner, Some(a));
        assert!(still_paired(ctx.world, a, b));
        assert!(still_paired(ctx.world, b, a));
    }

    #[test]
    fn cancel_clears_both_sides() {
        let mut h = Harness::new(Grid::filled(5, 5, Terrain::Grass));
        let (a, b) = fertile_pair(&mut h, Cell::new(0, 0), Cell::new(4, 4));
        let mut ctx = h.ctx();
        pair(&mut ctx, a, b);
        cancel(&mut ctx, b, CancelReason::Blocked);
        for e in [a, b] {
            let m = *ctx.world.get::<&Mating>(e).unwrap();
            assert_eq!(m.state, ReproductionState::None);
            assert_eq!(m.partner, None);
        }
    }

    #[test]
    fn too_far_changes_nothing() {
        let mut h = Harness::new(Grid::filled(5, 5, Terrain::Grass));
        let (a, b) = fertile_pair(&mut h, Cell::new(0, 0), Cell::new(0, 3));
        let mut ctx = h.ctx();
        pair(&mut ctx, a, b);
        assert!(!try_reproduce(&mut ctx, a, b));
        assert_eq!(ctx.roster.len(), 2);
        assert_eq!(ctx.world.get::<&Inventory>(a).unwrap().carrots, 6);
        assert!(still_paired(ctx.world, a, b));
    }

    #[test]
    fn reproduction_pays_and_spawns_baby() {
        let mut h = Harness::new(Grid::filled(5, 5, Terrain::Grass));
        let (a, b) = fertile_pair(&mut h, Cell::new(1, 1), Cell::new(2, 2));
        let mut ctx = h.ctx();
        pair(&mut ctx, a, b);
        assert!(try_reproduce(&mut ctx, a, b));

        assert_eq!(ctx.roster.len(), 3);
        assert_eq!(ctx.world.get::<&Inventory>(a).unwrap().carrots, 1);
        assert_eq!(ctx.world.get::<&Inventory>(b).unwrap().carrots, 0);
        for e in [a, b] {
            let m = *ctx.world.get::<&Mating>(e).unwrap();
            assert_eq!(m.cooldown, REPRODUCTION_COOLDOWN);
            assert_eq!(m.state, ReproductionState::None);
            assert_eq!(m.partner, None);
        }

        let baby = ctx.roster[2];
        assert_eq!(ctx.world.get::<&Body>(baby).unwrap().age, AgeClass::Baby);
        let cell = ctx.world.get::<&Tile>(baby).unwrap().0;
        assert!(cell == Cell::new(1, 1) || cell == Cell::new(2, 2));
        assert_eq!(ctx.particles.count(), HEART_COUNT);
    }

    #[test]
    fn cannot_reproduce_without_carrots() {
        let mut h = Harness::new(Grid::filled(5, 5, Terrain::Grass));
        let (a, b) = fertile_pair(&mut h, Cell::new(1, 1), Cell::new(1, 2));
        h.set_carrots(b, 4);
        let mut ctx = h.ctx();
        assert!(!try_reproduce(&mut ctx, a, b));
        assert_eq!(ctx.world.get::<&Inventory>(b).unwrap().carrots, 4);
        assert_eq!(ctx.roster.len(), 2);
    }

    #[test]
    fn babies_and_cooldown_block_eligibility() {
        let mut h = Harness::new(Grid::filled(5, 5, Terrain::Grass));
        let baby = h.spawn(AgeClass::Baby, Cell::new(0, 0));
        h.set_carrots(baby, 9);
        let adult = h.spawn(AgeClass::Adult, Cell::new(1, 1));
        h.set_carrots(adult, 5);
        h.world.get::<&mut Mating>(adult).unwrap().cooldown = 1;
        assert!(!can_reproduce_entity(&mut h.world, baby));
        assert!(!can_reproduce_entity(&mut h.world, adult));
    }

    #[test]
    fn seeking_villager_reproduces_when_its_step_lands() {
        use crate::ecs::systems::movement::{begin_move, move_to_tile};
        use crate::ecs::systems::update_villager;

        let mut h = Harness::new(Grid::filled(5, 5, Terrain::Grass));
        let (a, b) = fertile_pair(&mut h, Cell::new(2, 0), Cell::new(2, 3));
        h.set_carrots(a, 5);
        let mut ctx = h.ctx();
        pair(&mut ctx, a, b);
        assert!(move_to_tile(&mut ctx, a, Cell::new(2, 1)));
        begin_move(&mut ctx, a, 0, 0);

        for _ in 0..1000 {
            update_villager(&mut ctx, a);
            if !ctx.world.get::<&Motion>(a).unwrap().moving {
                break;
            }
        }

        assert_eq!(ctx.world.get::<&Tile>(a).unwrap().0, Cell::new(2, 1));
        assert_eq!(ctx.roster.len(), 3);
        for e in [a, b] {
            assert_eq!(ctx.world.get::<&Inventory>(e).unwrap().carrots, 0);
            let m = *ctx.world.get::<&Mating>(e).unwrap();
            assert_eq!(m.cooldown, REPRODUCTION_COOLDOWN);
            assert_eq!(m.state, ReproductionState::None);
        }
        let events = ctx.events.take();
        assert!(events.iter().any(|e| matches!(e, SimEvent::Born { .. })));
    }
}
