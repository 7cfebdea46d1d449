//! Villagers forage for carrots on an isometric grid, pair up, and raise
//! babies. The crate is the simulation core; drawing is left to the host,
//! which reads the draw lists in [`render`].

pub mod app;
pub mod carrot;
pub mod config;
pub mod debug;
pub mod ecs;
pub mod error;
pub mod events;
pub mod grid;
pub mod map;
pub mod particles;
pub mod projection;
pub mod render;
pub mod simulation;
pub mod spatial;
pub mod villager;

#[cfg(test)]
pub(crate) mod testing;

pub use config::SimConfig;
pub use error::{Result, SimError};
pub use events::SimEvent;
pub use simulation::{Command, Simulation};
