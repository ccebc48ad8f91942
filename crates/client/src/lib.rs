//! AbyssCraft front end over the voxel core: configuration, the standard
//! block table, texture layers, and the headless frame surface.

pub mod blocks;
pub mod config;
pub mod scene;
pub mod textures;
pub mod window;
