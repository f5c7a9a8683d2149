//! Orrery - Solar System Clock
//!
//! Closed-form orbital positions for a Sun → planet → moon hierarchy, driven
//! by a scrubbable simulated clock, with an optional Bevy plugin.

pub mod bodies;
pub mod config;
pub mod orbit;
pub mod plugin;
pub mod simulation;
pub mod time;
pub mod types;
pub mod vector3d;

#[cfg(test)]
pub mod test_utils;
