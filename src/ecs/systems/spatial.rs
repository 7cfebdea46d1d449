use crate::ecs::components::{Body, Inventory, Mating, Motion, Tile};
use crate::ecs::systems::reproduction::is_fertile;
use crate::spatial::Peer;

/// Rebuild the peer snapshot from current villager state, in roster order.
pub fn rebuild(world: &hecs::World, roster: &[hecs::Entity], peers: &mut Vec<Peer>) {
    peers.clear();
    for &entity in roster {
        let Ok(mut q) = world.query_one::<(&Tile, &Motion, &Body, &Inventory, &Mating)>(entity)
        else {
            continue;
        };
        if let Some((tile, motion, body, inv, mating)) = q.get() {
            peers.push(Peer {
                entity,
                cell: tile.0,
                moving: motion.moving,
                target: motion.target,
                fertile: is_fertile(body, inv, mating),
                mating: mating.state,
            });
        }
    }
}
