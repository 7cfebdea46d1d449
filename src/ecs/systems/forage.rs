use crate::ecs::components::*;
use crate::ecs::systems::steering::step_toward;
use crate::ecs::systems::TickContext;
use crate::events::SimEvent;
use crate::projection::{foot, from_foot};

/// Carrots a baby must eat to grow up.
pub const GROWTH_THRESHOLD: u32 = 3;
/// Blocked steps before a carrot target is abandoned.
pub const FORAGE_STUCK_LIMIT: u32 = 5;

/// Eat every carrot on the villager's current cell.
///
/// Uses the authoritative cell, so a villager mid-step still eats what is on
/// the cell it is leaving. Each carrot is removed exactly once.
pub fn consume_carrots(ctx: &mut TickContext, entity: hecs::Entity) {
    let Ok(cell) = ctx.world.get::<&Tile>(entity).map(|t| t.0) else {
        return;
    };
    let eaten = ctx.carrots.take_at(cell);
    for carrot in eaten {
        let Ok((inv, mind, body)) = ctx
            .world
            .query_one_mut::<(&mut Inventory, &mut Mind, &mut Body)>(entity)
        else {
            return;
        };
        inv.carrots += 1;
        mind.carrot = None;
        mind.forage_stuck = 0;
        let total = inv.carrots;

        let mut grew = false;
        if body.age == AgeClass::Baby {
            body.growth += 1;
            grew = body.growth >= GROWTH_THRESHOLD;
        }

        ctx.events.emit(SimEvent::CarrotEaten {
            villager: entity,
            carrot: carrot.id,
            total,
        });
        if grew {
            grow_up(ctx, entity);
        }
    }
}

/// Baby to adult. The body is resized around its feet so the villager does
/// not visibly jump, whether resting or mid-step.
pub fn grow_up(ctx: &mut TickContext, entity: hecs::Entity) {
    let adult = ctx.config.adult_size();
    let Ok((body, motion)) = ctx
        .world
        .query_one_mut::<(&mut Body, &mut Motion)>(entity)
    else {
        return;
    };
    if body.age == AgeClass::Adult {
        return;
    }
    let feet = foot(motion.pos, body.size);
    body.age = AgeClass::Adult;
    body.size = adult;
    motion.pos = from_foot(feet, adult);
    ctx.events.emit(SimEvent::GrewUp { villager: entity });
}

/// Pursue the nearest carrot. Returns false when there is nothing to forage,
/// leaving the decision to the caller.
pub fn forage(ctx: &mut TickContext, entity: hecs::Entity) -> bool {
    let Ok((cell, mut target)) = ctx
        .world
        .query_one_mut::<(&Tile, &Mind)>(entity)
        .map(|(t, m)| (t.0, m.carrot))
    else {
        return false;
    };

    if target.is_none() {
        target = ctx.carrots.nearest(cell).map(|c| c.id);
        if let Some(id) = target {
            set_target(ctx, entity, Some(id));
            log::trace!("{entity:?} heading for carrot {id:?}");
        }
    }
    let Some(id) = target else {
        return false;
    };

    let Some(goal) = ctx.carrots.get(id).map(|c| c.cell) else {
        set_target(ctx, entity, None);
        ctx.reschedule(entity, 10, 30);
        return true;
    };

    if step_toward(ctx, entity, Some(goal)) {
        if let Ok(mut mind) = ctx.world.get::<&mut Mind>(entity) {
            mind.forage_stuck = 0;
        }
        return true;
    }

    let stuck = match ctx.world.get::<&mut Mind>(entity) {
        Ok(mut mind) => {
            mind.forage_stuck += 1;
            mind.forage_stuck
        }
        Err(_) => return true,
    };
    if stuck >= FORAGE_STUCK_LIMIT {
        set_target(ctx, entity, None);
        ctx.reschedule(entity, 10, 30);
    } else {
        ctx.reschedule(entity, 5, 15);
    }
    true
}

fn set_target(ctx: &mut TickContext, entity: hecs::Entity, target: Option<crate::carrot::CarrotId>) {
    if let Ok(mut mind) = ctx.world.get::<&mut Mind>(entity) {
        mind.carrot = target;
        mind.forage_stuck = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::systems::update_villager;
    use crate::grid::{Cell, Grid, Terrain};
    use crate::testing::Harness;

    #[test]
    fn eating_counts_once_per_carrot() {
        let mut h = Harness::new(Grid::filled(3, 3, Terrain::Grass));
        let a = h.spawn(AgeClass::Adult, Cell::new(1, 1));
        h.carrots.insert(Cell::new(1, 1));
        h.carrots.insert(Cell::new(0, 0));
        let mut ctx = h.ctx();
        consume_carrots(&mut ctx, a);
        consume_carrots(&mut ctx, a);
        assert_eq!(ctx.world.get::<&Inventory>(a).unwrap().carrots, 1);
        assert_eq!(ctx.carrots.len(), 1);
    }

    #[test]
    fn baby_grows_on_third_carrot() {
        let mut h = Harness::new(Grid::filled(3, 3, Terrain::Grass));
        let baby = h.spawn(AgeClass::Baby, Cell::new(1, 1));
        let feet_before = {
            let motion = *h.world.get::<&Motion>(baby).unwrap();
            let body = *h.world.get::<&Body>(baby).unwrap();
            foot(motion.pos, body.size)
        };

        for n in 1..=3 {
            h.carrots.insert(Cell::new(1, 1));
            let mut ctx = h.ctx();
            consume_carrots(&mut ctx, baby);
            let body = *ctx.world.get::<&Body>(baby).unwrap();
            if n < GROWTH_THRESHOLD {
                assert_eq!(body.age, AgeClass::Baby, "grew after {n} carrots");
            } else {
                assert_eq!(body.age, AgeClass::Adult);
            }
        }

        let motion = *h.world.get::<&Motion>(baby).unwrap();
        let body = *h.world.get::<&Body>(baby).unwrap();
        assert_eq!(body.size, h.config.adult_size());
        assert!((foot(motion.pos, body.size) - feet_before).length() < 1e-3);
    }

    #[test]
    fn vanished_target_is_dropped() {
        let mut h = Harness::new(Grid::filled(5, 5, Terrain::Grass));
        let a = h.spawn(AgeClass::Adult, Cell::new(0, 0));
        let carrot = h.carrots.insert(Cell::new(4, 4));
        h.world.get::<&mut Mind>(a).unwrap().carrot = Some(carrot.id);
        h.carrots.take_at(Cell::new(4, 4));
        let mut ctx = h.ctx();
        assert!(forage(&mut ctx, a));
        assert_eq!(ctx.world.get::<&Mind>(a).unwrap().carrot, None);
    }

    #[test]
    fn unreachable_target_is_abandoned() {
        // Villager boxed in by water, carrot on the far side.
        let cells = "GWG\nWWG\nGGG"
            .lines()
            .flat_map(|l| l.chars().map(|c| Terrain::from_char(c).unwrap()))
            .collect();
        let mut h = Harness::new(Grid::from_cells(3, 3, cells).unwrap());
        let a = h.spawn(AgeClass::Adult, Cell::new(0, 0));
        h.carrots.insert(Cell::new(2, 2));
        let mut ctx = h.ctx();
        for _ in 0..FORAGE_STUCK_LIMIT - 1 {
            assert!(forage(&mut ctx, a));
            assert!(ctx.world.get::<&Mind>(a).unwrap().carrot.is_some());
        }
        assert!(forage(&mut ctx, a));
        let mind = *ctx.world.get::<&Mind>(a).unwrap();
        assert_eq!(mind.carrot, None);
        assert_eq!(mind.forage_stuck, 0);
        assert_eq!(ctx.carrots.len(), 1);
    }

    #[test]
    fn villager_walks_to_nearest_carrot_and_eats_it() {
        let mut h = Harness::new(Grid::filled(6, 6, Terrain::Grass));
        let a = h.spawn(AgeClass::Adult, Cell::new(0, 0));
        h.carrots.insert(Cell::new(5, 5));
        let near = h.carrots.insert(Cell::new(3, 4));

        let mut ctx = h.ctx();
        let mut first_target = None;
        for _ in 0..5000 {
            update_villager(&mut ctx, a);
            if first_target.is_none() {
                first_target = ctx.world.get::<&Mind>(a).unwrap().carrot;
            }
            if !ctx.carrots.contains(near.id) {
                break;
            }
        }
        assert_eq!(first_target, Some(near.id));
        assert!(!ctx.carrots.contains(near.id));
        assert!(ctx.world.get::<&Inventory>(a).unwrap().carrots >= 1);
    }
}
