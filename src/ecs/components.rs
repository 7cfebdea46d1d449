use glam::Vec2;

use crate::carrot::CarrotId;
use crate::grid::Cell;

/// Authoritative grid position. Only changes when a move completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile(pub Cell);

/// In-flight movement between two cells.
#[derive(Debug, Clone, Copy)]
pub struct Motion {
    /// Destination cell; equals the current tile when idle.
    pub target: Cell,
    pub moving: bool,
    /// Top-left of the body in screen pixels, interpolated toward the target.
    pub pos: Vec2,
    /// Pixels per tick.
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeClass {
    Baby,
    Adult,
}

/// Age and on-screen size.
#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub age: AgeClass,
    /// Carrots eaten while a baby.
    pub growth: u32,
    /// Current sprite size in pixels.
    pub size: Vec2,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Inventory {
    pub carrots: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReproductionState {
    None,
    Seeking,
}

/// Pairing protocol state. `partner` is a relation, never ownership.
#[derive(Debug, Clone, Copy)]
pub struct Mating {
    pub state: ReproductionState,
    pub partner: Option<hecs::Entity>,
    /// Ticks until eligible again.
    pub cooldown: u32,
    /// Consecutive blocked steps toward the partner.
    pub stuck: u32,
}

impl Mating {
    pub fn idle() -> Self {
        Self {
            state: ReproductionState::None,
            partner: None,
            cooldown: 0,
            stuck: 0,
        }
    }

    /// Drop back to neutral, keeping the cooldown.
    pub fn clear(&mut self) {
        self.state = ReproductionState::None;
        self.partner = None;
        self.stuck = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorState {
    Pause,
    Move,
}

/// Decision cadence and foraging goal.
#[derive(Debug, Clone, Copy)]
pub struct Mind {
    pub state: BehaviorState,
    /// Ticks until the next decision while paused.
    pub timer: i32,
    pub carrot: Option<CarrotId>,
    /// Consecutive blocked steps toward the carrot.
    pub forage_stuck: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}
