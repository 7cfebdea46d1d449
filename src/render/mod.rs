//! Draw descriptors. The simulation never draws; a host turns these into
//! sprites.

pub mod instance;

use self::instance::{CarrotInstance, ParticleInstance, VillagerInstance};

/// Reusable per-frame buffers so hosts don't allocate every frame.
#[derive(Debug, Default)]
pub struct FrameInstances {
    pub villagers: Vec<VillagerInstance>,
    pub carrots: Vec<CarrotInstance>,
    pub particles: Vec<ParticleInstance>,
}

impl FrameInstances {
    pub fn new() -> Self {
        Self::default()
    }
}
