use crate::ecs::components::{BehaviorState, Body, Facing, Mind, Motion, Tile};
use crate::ecs::systems::TickContext;
use crate::grid::Cell;
use crate::spatial;
use crate::villager::animation::Sway;

/// Post-arrival pause range (ticks).
const ARRIVAL_PAUSE: (i32, i32) = (15, 60);

/// Begin moving toward an adjacent `target`.
///
/// Rejected without touching any state when the cell is not walkable, another
/// villager is resting on it, or another villager is already walking into it.
/// Villagers walking out of the cell do not block it. On success the caller
/// owns the behavior transition (see [`begin_move`]).
pub fn move_to_tile(ctx: &mut TickContext, entity: hecs::Entity, target: Cell) -> bool {
    if !ctx.grid.is_walkable(target) {
        return false;
    }
    ctx.refresh_peers();
    if spatial::is_claimed(ctx.peers.as_slice(), entity, target) {
        return false;
    }

    let Ok((tile, motion, facing)) = ctx
        .world
        .query_one_mut::<(&Tile, &mut Motion, &mut Facing)>(entity)
    else {
        return false;
    };

    let from = tile.0;
    motion.target = target;
    motion.moving = true;

    // +col or -row faces right; -col or +row faces left.
    if target.col > from.col || target.row < from.row {
        *facing = Facing::Right;
    } else if target.col < from.col || target.row > from.row {
        *facing = Facing::Left;
    }
    true
}

/// Mark an accepted move in the behavior state. The timer only matters if
/// the move is somehow abandoned; arrival overwrites it.
pub fn begin_move(ctx: &mut TickContext, entity: hecs::Entity, lo: i32, hi: i32) {
    let timer = ctx.rng.i32(lo..=hi);
    if let Ok(mut mind) = ctx.world.get::<&mut Mind>(entity) {
        mind.state = BehaviorState::Move;
        mind.timer = timer;
    }
}

/// Slide toward the target cell's anchor at fixed speed. Returns true on the
/// tick the villager arrives.
pub fn advance(ctx: &mut TickContext, entity: hecs::Entity) -> bool {
    let projection = ctx.projection;
    let Ok((tile, motion, body, mind, sway)) = ctx
        .world
        .query_one_mut::<(&mut Tile, &mut Motion, &Body, &mut Mind, &mut Sway)>(entity)
    else {
        return false;
    };

    sway.step();

    let goal = projection.anchor(motion.target, body.size);
    let delta = goal - motion.pos;
    let distance = delta.length();

    if distance > motion.speed {
        motion.pos += delta / distance * motion.speed;
        return false;
    }

    motion.pos = goal;
    tile.0 = motion.target;
    motion.moving = false;
    mind.state = BehaviorState::Pause;
    mind.timer = ctx.rng.i32(ARRIVAL_PAUSE.0..=ARRIVAL_PAUSE.1);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::AgeClass;
    use crate::grid::{Grid, Terrain};
    use crate::testing::Harness;

    #[test]
    fn move_rejected_onto_resting_villager() {
        let mut h = Harness::new(Grid::filled(3, 3, Terrain::Grass));
        let a = h.spawn(AgeClass::Adult, Cell::new(1, 1));
        h.spawn(AgeClass::Adult, Cell::new(1, 2));
        let mut ctx = h.ctx();
        assert!(!move_to_tile(&mut ctx, a, Cell::new(1, 2)));
        assert!(!ctx.world.get::<&Motion>(a).unwrap().moving);
        assert!(move_to_tile(&mut ctx, a, Cell::new(0, 1)));
    }

    #[test]
    fn move_rejected_onto_unwalkable() {
        let mut grid_cells = vec![Terrain::Grass; 4];
        grid_cells[1] = Terrain::Tree;
        let mut h = Harness::new(Grid::from_cells(2, 2, grid_cells).unwrap());
        let a = h.spawn(AgeClass::Adult, Cell::new(0, 0));
        let mut ctx = h.ctx();
        assert!(!move_to_tile(&mut ctx, a, Cell::new(0, 1)));
    }

    #[test]
    fn facing_follows_direction() {
        let mut h = Harness::new(Grid::filled(3, 3, Terrain::Grass));
        let a = h.spawn(AgeClass::Adult, Cell::new(1, 1));
        let mut ctx = h.ctx();
        assert!(move_to_tile(&mut ctx, a, Cell::new(1, 2)));
        assert_eq!(*ctx.world.get::<&Facing>(a).unwrap(), Facing::Right);
        ctx.world.get::<&mut Motion>(a).unwrap().moving = false;
        assert!(move_to_tile(&mut ctx, a, Cell::new(2, 1)));
        assert_eq!(*ctx.world.get::<&Facing>(a).unwrap(), Facing::Left);
    }

    #[test]
    fn advance_arrives_and_pauses() {
        let mut h = Harness::new(Grid::filled(3, 3, Terrain::Grass));
        let a = h.spawn(AgeClass::Adult, Cell::new(1, 1));
        let mut ctx = h.ctx();
        assert!(move_to_tile(&mut ctx, a, Cell::new(2, 2)));
        begin_move(&mut ctx, a, 30, 60);

        let mut ticks = 0;
        while !advance(&mut ctx, a) {
            ticks += 1;
            assert!(ticks < 1000, "never arrived");
            // Authoritative cell holds until arrival.
            assert_eq!(ctx.world.get::<&Tile>(a).unwrap().0, Cell::new(1, 1));
        }
        assert_eq!(ctx.world.get::<&Tile>(a).unwrap().0, Cell::new(2, 2));
        let mind = *ctx.world.get::<&Mind>(a).unwrap();
        assert_eq!(mind.state, BehaviorState::Pause);
        assert!((15..=60).contains(&mind.timer));
        assert!(!ctx.world.get::<&Motion>(a).unwrap().moving);
    }
}
