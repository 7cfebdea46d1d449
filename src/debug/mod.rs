pub mod ring;
pub mod timer;

use std::fmt;

use crate::carrot::Carrots;
use crate::ecs::components::{AgeClass, Body, Inventory, Mating};
use crate::ecs::systems::reproduction;
use crate::grid::Grid;

/// Point-in-time population summary, for logs and host overlays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Census {
    pub adults: usize,
    pub babies: usize,
    pub carrots: usize,
    pub carrot_cap: usize,
    /// Carrots currently held across all villagers.
    pub carrots_collected: u32,
    /// Villagers that would look for a mate at their next decision.
    pub ready_to_reproduce: usize,
    pub map_rows: usize,
    pub map_cols: usize,
}

impl Census {
    pub fn take(world: &hecs::World, roster: &[hecs::Entity], carrots: &Carrots, grid: &Grid) -> Self {
        let mut census = Self {
            carrots: carrots.len(),
            carrot_cap: carrots.cap(),
            map_rows: grid.rows(),
            map_cols: grid.cols(),
            ..Self::default()
        };
        for &e in roster {
            let Ok(mut q) = world.query_one::<(&Body, &Inventory, &Mating)>(e) else {
                continue;
            };
            let Some((body, inv, mating)) = q.get() else {
                continue;
            };
            match body.age {
                AgeClass::Adult => census.adults += 1,
                AgeClass::Baby => census.babies += 1,
            }
            census.carrots_collected += inv.carrots;
            if reproduction::can_reproduce(body, inv, mating) {
                census.ready_to_reproduce += 1;
            }
        }
        census
    }

    pub fn population(&self) -> usize {
        self.adults + self.babies
    }
}

impl fmt::Display for Census {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "villagers: {} ({} adults, {} babies) | carrots: {}/{} | held: {} | ready: {} | map {}x{}",
            self.population(),
            self.adults,
            self.babies,
            self.carrots,
            self.carrot_cap,
            self.carrots_collected,
            self.ready_to_reproduce,
            self.map_rows,
            self.map_cols,
        )
    }
}
