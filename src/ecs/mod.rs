pub mod components;
pub mod systems;
