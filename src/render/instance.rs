use glam::Vec2;

use crate::carrot::{Carrot, CarrotId};
use crate::ecs::components::{AgeClass, Body, Facing, Motion, Tile};
use crate::grid::Cell;
use crate::projection::Projection;
use crate::villager::animation::Sway;

/// Carrot sprite size in pixels.
pub const CARROT_SIZE: Vec2 = Vec2::new(30.0, 30.0);

/// Per-villager draw data for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VillagerInstance {
    pub entity: hecs::Entity,
    pub cell: Cell,
    /// Top-left of the sprite in screen pixels.
    pub position: Vec2,
    pub size: Vec2,
    /// Mirror the sprite horizontally.
    pub flip: bool,
    pub age: AgeClass,
    /// Sway tilt in degrees.
    pub tilt: f32,
    /// Painter's order key, smaller draws first.
    pub depth: i32,
}

impl VillagerInstance {
    pub fn from_components(
        entity: hecs::Entity,
        tile: &Tile,
        motion: &Motion,
        body: &Body,
        facing: &Facing,
        sway: &Sway,
    ) -> Self {
        Self {
            entity,
            cell: tile.0,
            position: motion.pos,
            size: body.size,
            flip: *facing == Facing::Left,
            age: body.age,
            tilt: sway.angle,
            depth: tile.0.depth(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarrotInstance {
    pub id: CarrotId,
    pub cell: Cell,
    /// Top-left including the bob offset.
    pub position: Vec2,
}

impl CarrotInstance {
    pub fn from_carrot(carrot: &Carrot, projection: &dyn Projection) -> Self {
        let base = projection.anchor(carrot.cell, CARROT_SIZE);
        Self {
            id: carrot.id,
            cell: carrot.cell,
            position: base + Vec2::new(0.0, carrot.bob_offset()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleInstance {
    pub position: Vec2,
    pub remaining_life: u32,
    /// 1.0 at birth fading to 0.0 at expiry.
    pub alpha: f32,
}

/// Fill `buf` with villagers in painter's order. Villagers on the same
/// depth keep roster order.
pub fn build_villagers(world: &hecs::World, roster: &[hecs::Entity], buf: &mut Vec<VillagerInstance>) {
    buf.clear();
    for &entity in roster {
        let Ok(mut q) = world.query_one::<(&Tile, &Motion, &Body, &Facing, &Sway)>(entity) else {
            continue;
        };
        if let Some((tile, motion, body, facing, sway)) = q.get() {
            buf.push(VillagerInstance::from_components(
                entity, tile, motion, body, facing, sway,
            ));
        }
    }
    buf.sort_by_key(|v| v.depth);
}

pub fn build_carrots<'a>(
    carrots: impl IntoIterator<Item = &'a Carrot>,
    projection: &dyn Projection,
    buf: &mut Vec<CarrotInstance>,
) {
    buf.clear();
    buf.extend(
        carrots
            .into_iter()
            .map(|c| CarrotInstance::from_carrot(c, projection)),
    );
}
