//! Voxel storage core: block storage that many threads can mutate at once,
//! plus the fixed-tick simulation / presentation loop pair that drives it.

pub mod runtime;
pub mod world;
