use crate::grid::{Cell, Grid};

/// Placement attempts before a spawn is abandoned.
pub const SPAWN_ATTEMPTS: u32 = 100;
/// Bob phase advance per tick (radians).
const BOB_SPEED: f32 = 0.1;
/// Bob height in pixels.
pub const BOB_AMPLITUDE: f32 = 3.0;

/// Stable identity for a carrot. Never reused within a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CarrotId(pub u64);

/// A carrot sitting on a walkable cell, bobbing gently until eaten.
#[derive(Debug, Clone, Copy)]
pub struct Carrot {
    pub id: CarrotId,
    pub cell: Cell,
    pub bob_phase: f32,
}

impl Carrot {
    /// Vertical draw offset from the bob animation. Cosmetic only.
    pub fn bob_offset(&self) -> f32 {
        self.bob_phase.sin() * BOB_AMPLITUDE
    }
}

/// Owns every carrot on the map.
pub struct Carrots {
    carrots: Vec<Carrot>,
    cap: usize,
    next_id: u64,
}

impl Carrots {
    pub fn new(cap: usize) -> Self {
        Self {
            carrots: Vec::with_capacity(cap),
            cap,
            next_id: 0,
        }
    }

    /// Try to place a carrot on a random walkable cell. Returns `None` when
    /// the map is full or no walkable cell turned up within the attempt budget.
    pub fn spawn(&mut self, grid: &Grid, rng: &mut fastrand::Rng) -> Option<Carrot> {
        if self.is_full() {
            return None;
        }
        let cell = grid.sample_walkable(rng, SPAWN_ATTEMPTS, |_| true)?;
        Some(self.insert(cell))
    }

    /// Place a carrot on a specific cell, bypassing the cap and the walkable
    /// check. Used to stage scenarios.
    pub fn insert(&mut self, cell: Cell) -> Carrot {
        let carrot = Carrot {
            id: CarrotId(self.next_id),
            cell,
            bob_phase: 0.0,
        };
        self.next_id += 1;
        self.carrots.push(carrot);
        carrot
    }

    /// Advance the bob animation.
    pub fn update(&mut self) {
        for c in &mut self.carrots {
            c.bob_phase += BOB_SPEED;
        }
    }

    /// Remove every carrot on `cell`, returning them in list order.
    pub fn take_at(&mut self, cell: Cell) -> Vec<Carrot> {
        let mut taken = Vec::new();
        self.carrots.retain(|c| {
            if c.cell == cell {
                taken.push(*c);
                false
            } else {
                true
            }
        });
        taken
    }

    pub fn get(&self, id: CarrotId) -> Option<&Carrot> {
        self.carrots.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: CarrotId) -> bool {
        self.get(id).is_some()
    }

    /// Nearest carrot by Manhattan distance. Ties go to the oldest carrot.
    pub fn nearest(&self, from: Cell) -> Option<&Carrot> {
        let mut best: Option<(&Carrot, u32)> = None;
        for c in &self.carrots {
            let d = from.manhattan(c.cell);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((c, d));
            }
        }
        best.map(|(c, _)| c)
    }

    pub fn clear(&mut self) {
        self.carrots.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Carrot> {
        self.carrots.iter()
    }

    pub fn len(&self) -> usize {
        self.carrots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.carrots.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn is_full(&self) -> bool {
        self.carrots.len() >= self.cap
    }
}
