pub mod animation;

use crate::config::SimConfig;
use crate::ecs::components::*;
use crate::grid::{Cell, Grid};
use crate::projection::Projection;
use animation::Sway;

/// Placement attempts before falling back to the map centre.
const PLACEMENT_ATTEMPTS: u32 = 100;
/// Initial decision timer is drawn from `0..=MAX_INITIAL_TIMER`.
const MAX_INITIAL_TIMER: i32 = 60;

/// Where a new villager should appear.
#[derive(Debug, Clone, Copy)]
pub enum Placement {
    /// A random walkable cell no other villager stands on.
    Random,
    /// Exactly this cell (newborns appear on a parent's cell).
    At(Cell),
}

/// Spawn one villager and return its entity. The caller appends it to the
/// roster.
pub fn spawn_villager(
    world: &mut hecs::World,
    grid: &Grid,
    projection: &dyn Projection,
    config: &SimConfig,
    rng: &mut fastrand::Rng,
    age: AgeClass,
    placement: Placement,
) -> hecs::Entity {
    let cell = match placement {
        Placement::At(cell) => cell,
        Placement::Random => place_randomly(world, grid, rng),
    };
    let size = match age {
        AgeClass::Adult => config.adult_size(),
        AgeClass::Baby => config.baby_size(),
    };

    world.spawn((
        Tile(cell),
        Motion {
            target: cell,
            moving: false,
            pos: projection.anchor(cell, size),
            speed: config.villager_speed,
        },
        Body {
            age,
            growth: 0,
            size,
        },
        Inventory::default(),
        Mating::idle(),
        Mind {
            state: BehaviorState::Pause,
            timer: rng.i32(0..=MAX_INITIAL_TIMER),
            carrot: None,
            forage_stuck: 0,
        },
        Facing::Left,
        Sway::default(),
    ))
}

fn place_randomly(world: &hecs::World, grid: &Grid, rng: &mut fastrand::Rng) -> Cell {
    let taken: Vec<Cell> = world.query::<&Tile>().iter().map(|(_, t)| t.0).collect();
    if let Some(cell) = grid.sample_walkable(rng, PLACEMENT_ATTEMPTS, |c| !taken.contains(&c)) {
        return cell;
    }

    log::warn!("No free walkable tile found, placing villager at the map centre");
    let center = grid.center();
    if grid.is_walkable(center) {
        center
    } else {
        grid.first_walkable().unwrap_or_else(|| {
            log::error!("Map has no walkable cell, villager placed on impassable ground");
            center
        })
    }
}
