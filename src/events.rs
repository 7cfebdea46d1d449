//! Structured notifications for notable simulation transitions.
//!
//! Every event goes three places: the `log` facade, a per-tick queue the host
//! drains with [`EventLog::take`], and a bounded journal of recent history.

use crate::carrot::CarrotId;
use crate::debug::ring::RingBuffer;
use crate::grid::Cell;

/// How many past events the journal keeps.
const JOURNAL_LEN: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// Partner vanished, became ineligible, or stopped pointing back.
    PartnerUnavailable,
    /// Too many blocked steps toward the partner.
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    VillagerAdded {
        villager: hecs::Entity,
        cell: Cell,
    },
    CarrotSpawned {
        carrot: CarrotId,
        cell: Cell,
    },
    CarrotEaten {
        villager: hecs::Entity,
        carrot: CarrotId,
        total: u32,
    },
    GrewUp {
        villager: hecs::Entity,
    },
    Paired {
        a: hecs::Entity,
        b: hecs::Entity,
    },
    PairingCancelled {
        villager: hecs::Entity,
        partner: Option<hecs::Entity>,
        reason: CancelReason,
    },
    Born {
        baby: hecs::Entity,
        parents: (hecs::Entity, hecs::Entity),
        cell: Cell,
        population: usize,
    },
    Reset {
        population: usize,
    },
}

/// An event tagged with the tick it happened on.
#[derive(Debug, Clone, Copy)]
pub struct Stamped {
    pub tick: u64,
    pub event: SimEvent,
}

pub struct EventLog {
    tick: u64,
    pending: Vec<SimEvent>,
    journal: RingBuffer<Stamped>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            tick: 0,
            pending: Vec::with_capacity(16),
            journal: RingBuffer::new(JOURNAL_LEN),
        }
    }

    pub fn set_tick(&mut self, tick: u64) {
        self.tick = tick;
    }

    pub fn emit(&mut self, event: SimEvent) {
        log_event(self.tick, &event);
        self.pending.push(event);
        self.journal.push(Stamped {
            tick: self.tick,
            event,
        });
    }

    /// Drain events emitted since the last call.
    pub fn take(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Recent events, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &Stamped> {
        self.journal.iter()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

fn log_event(tick: u64, event: &SimEvent) {
    match *event {
        SimEvent::Born {
            baby, population, ..
        } => log::info!("[{tick}] baby {baby:?} born, population {population}"),
        SimEvent::GrewUp { villager } => log::info!("[{tick}] {villager:?} grew up"),
        SimEvent::Reset { population } => {
            log::info!("[{tick}] reset with {population} villagers")
        }
        SimEvent::PairingCancelled {
            villager,
            partner,
            reason,
        } => log::debug!("[{tick}] {villager:?} dropped partner {partner:?}: {reason:?}"),
        SimEvent::Paired { a, b } => log::debug!("[{tick}] {a:?} paired with {b:?}"),
        SimEvent::CarrotEaten {
            villager, total, ..
        } => log::debug!("[{tick}] {villager:?} ate a carrot, total {total}"),
        SimEvent::CarrotSpawned { cell, .. } => {
            log::debug!("[{tick}] carrot at ({}, {})", cell.row, cell.col)
        }
        SimEvent::VillagerAdded { villager, cell } => {
            log::debug!("[{tick}] {villager:?} placed at ({}, {})", cell.row, cell.col)
        }
    }
}
