use crate::ecs::components::Tile;
use crate::ecs::systems::movement::{begin_move, move_to_tile};
use crate::ecs::systems::TickContext;
use crate::grid::{Cell, Grid};

/// Chance a goal-directed step is replaced by a random one.
pub const NOISE_CHANCE: f32 = 0.1;
/// Pause range after a random (noise) step is accepted.
const NOISE_STEP_TIMER: (i32, i32) = (20, 40);
/// Pause range after the planned step is accepted.
const PLANNED_STEP_TIMER: (i32, i32) = (30, 60);

/// Greedy single-cell step from `from` toward `to`.
///
/// Tries the direct (possibly diagonal) step, then row-only, then col-only,
/// taking the first walkable one. `None` when already there or every
/// candidate is blocked. Occupancy is not considered here.
pub fn greedy_step(grid: &Grid, from: Cell, to: Cell) -> Option<Cell> {
    let dr = (to.row - from.row).signum();
    let dc = (to.col - from.col).signum();
    if dr == 0 && dc == 0 {
        return None;
    }

    let direct = from.offset(dr, dc);
    if grid.is_walkable(direct) {
        return Some(direct);
    }

    let mut fallbacks = [None, None];
    if dr != 0 {
        fallbacks[0] = Some(from.offset(dr, 0));
    }
    if dc != 0 {
        fallbacks[1] = Some(from.offset(0, dc));
    }
    fallbacks.into_iter().flatten().find(|&c| grid.is_walkable(c))
}

/// Take one step toward `goal`, with a small chance of stepping to a random
/// walkable neighbour instead. Returns true when a move began.
///
/// If the random step is rejected the planned step is still attempted.
pub fn step_toward(ctx: &mut TickContext, entity: hecs::Entity, goal: Option<Cell>) -> bool {
    let Ok(from) = ctx.world.get::<&Tile>(entity).map(|t| t.0) else {
        return false;
    };

    if ctx.rng.f32() < NOISE_CHANCE {
        let options = ctx.grid.walkable_neighbours(from);
        if !options.is_empty() {
            let pick = options[ctx.rng.usize(0..options.len())];
            if move_to_tile(ctx, entity, pick) {
                begin_move(ctx, entity, NOISE_STEP_TIMER.0, NOISE_STEP_TIMER.1);
                return true;
            }
        }
    }

    let Some(next) = goal.and_then(|g| greedy_step(ctx.grid, from, g)) else {
        return false;
    };
    if move_to_tile(ctx, entity, next) {
        begin_move(ctx, entity, PLANNED_STEP_TIMER.0, PLANNED_STEP_TIMER.1);
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Terrain;

    fn grid(rows: &[&str]) -> Grid {
        let cells = rows
            .iter()
            .flat_map(|r| r.chars().map(|c| Terrain::from_char(c).unwrap_or(Terrain::Empty)))
            .collect();
        Grid::from_cells(rows.len(), rows[0].len(), cells).unwrap()
    }

    #[test]
    fn takes_diagonal_when_open() {
        let g = grid(&["GGG", "GGG", "GGG"]);
        assert_eq!(greedy_step(&g, Cell::new(0, 0), Cell::new(2, 2)), Some(Cell::new(1, 1)));
    }

    #[test]
    fn falls_back_to_row_then_col() {
        let g = grid(&["GGG", "GTG", "GGG"]);
        assert_eq!(greedy_step(&g, Cell::new(0, 0), Cell::new(2, 2)), Some(Cell::new(1, 0)));

        let g = grid(&["GGG", "WTG", "GGG"]);
        assert_eq!(greedy_step(&g, Cell::new(0, 0), Cell::new(2, 2)), Some(Cell::new(0, 1)));
    }

    #[test]
    fn fails_when_boxed_in() {
        let g = grid(&["GWG", "WTG", "GGG"]);
        assert_eq!(greedy_step(&g, Cell::new(0, 0), Cell::new(2, 2)), None);
    }

    #[test]
    fn orthogonal_target_steps_straight() {
        let g = grid(&["GGGG"]);
        assert_eq!(greedy_step(&g, Cell::new(0, 0), Cell::new(0, 3)), Some(Cell::new(0, 1)));
        assert_eq!(greedy_step(&g, Cell::new(0, 2), Cell::new(0, 2)), None);
    }

    #[test]
    fn blocked_step_leaves_villager_untouched() {
        use crate::ecs::components::{AgeClass, Mind, Motion};
        use crate::testing::Harness;

        let mut h = Harness::new(grid(&["GW", "WW"]));
        let a = h.spawn(AgeClass::Adult, Cell::new(0, 0));
        let before = *h.world.get::<&Mind>(a).unwrap();
        let mut ctx = h.ctx();
        for _ in 0..50 {
            assert!(!step_toward(&mut ctx, a, Some(Cell::new(1, 1))));
        }
        let after = *ctx.world.get::<&Mind>(a).unwrap();
        assert_eq!(after.timer, before.timer);
        assert!(!ctx.world.get::<&Motion>(a).unwrap().moving);
    }
}
