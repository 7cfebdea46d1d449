use crate::ecs::components::ReproductionState;
use crate::grid::Cell;

/// Snapshot of a villager's state for neighbour queries.
/// Rebuilt from the ECS right before a decision so it reflects every update
/// made earlier in the same tick.
#[derive(Debug, Clone, Copy)]
pub struct Peer {
    pub entity: hecs::Entity,
    pub cell: Cell,
    pub moving: bool,
    /// Destination while moving, the current cell otherwise.
    pub target: Cell,
    /// Adult, enough carrots, cooldown elapsed.
    pub fertile: bool,
    pub mating: ReproductionState,
}

impl Peer {
    /// Ready to start a new pairing.
    pub fn available_mate(&self) -> bool {
        self.fertile && self.mating == ReproductionState::None
    }
}

/// Nearest available mate to `from` by Manhattan distance, skipping `me`.
/// Peers are in roster order, so ties go to the earlier villager.
pub fn nearest_mate(peers: &[Peer], me: hecs::Entity, from: Cell) -> Option<&Peer> {
    let mut best: Option<(&Peer, u32)> = None;
    for p in peers {
        if p.entity == me || !p.available_mate() {
            continue;
        }
        let d = from.manhattan(p.cell);
        if best.map_or(true, |(_, bd)| d < bd) {
            best = Some((p, d));
        }
    }
    best.map(|(p, _)| p)
}

/// True when some villager other than `me` is resting on `cell` or already
/// walking into it. Villagers walking away from `cell` do not block it.
///
/// Stricter than checking resting villagers alone: an in-flight target is
/// reserved too, so two villagers can never come to rest on the same cell.
pub fn is_claimed(peers: &[Peer], me: hecs::Entity, cell: Cell) -> bool {
    peers.iter().any(|p| {
        p.entity != me && ((!p.moving && p.cell == cell) || (p.moving && p.target == cell))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(world: &mut hecs::World, cell: Cell, fertile: bool) -> Peer {
        Peer {
            entity: world.spawn(()),
            cell,
            moving: false,
            target: cell,
            fertile,
            mating: ReproductionState::None,
        }
    }

    #[test]
    fn nearest_mate_skips_self_and_infertile() {
        let mut world = hecs::World::new();
        let me = peer(&mut world, Cell::new(0, 0), true);
        let close_but_infertile = peer(&mut world, Cell::new(0, 1), false);
        let far = peer(&mut world, Cell::new(3, 3), true);
        let peers = [me, close_but_infertile, far];
        let found = nearest_mate(&peers, me.entity, me.cell).map(|p| p.entity);
        assert_eq!(found, Some(far.entity));
    }

    #[test]
    fn nearest_mate_ties_go_to_roster_order() {
        let mut world = hecs::World::new();
        let me = peer(&mut world, Cell::new(2, 2), true);
        let first = peer(&mut world, Cell::new(2, 4), true);
        let second = peer(&mut world, Cell::new(4, 2), true);
        let peers = [me, first, second];
        assert_eq!(
            nearest_mate(&peers, me.entity, me.cell).map(|p| p.entity),
            Some(first.entity)
        );
    }

    #[test]
    fn walking_away_does_not_claim() {
        let mut world = hecs::World::new();
        let me = peer(&mut world, Cell::new(0, 0), false);
        let mut leaving = peer(&mut world, Cell::new(0, 1), false);
        leaving.moving = true;
        leaving.target = Cell::new(0, 2);
        let peers = [me, leaving];
        assert!(!is_claimed(&peers, me.entity, Cell::new(0, 1)));
        assert!(is_claimed(&peers, me.entity, Cell::new(0, 2)));
    }
}
