//! Demo scene driven by the simulation thread.
//!
//! A marker sweeps back and forth across the spawn column, and once a second
//! a log beacon at spawn grows by one block, resetting after it reaches its
//! full height. Both exercise the shared-state path: the beacon writes go
//! straight to the world from the simulation thread, the marker travels to
//! the renderer through [`DemoFrame`] snapshots.

use std::sync::Arc;

use abyss_engine::runtime::Scene;
use abyss_engine::world::World;
use abyss_engine::world::block::BlockId;
use abyss_engine::world::position::BlockPos;

use crate::blocks;

/// Surface height of the spawn platform.
pub const SPAWN_Y: i32 = 64;
/// Beacon resets after reaching this many blocks.
pub const BEACON_MAX: u8 = 8;
/// Ticks between beacon growth steps (one second at 20 Hz).
pub const BEACON_INTERVAL: u64 = 20;

const MARKER_LIMIT: f32 = 0.8;
const MARKER_SPEED: f32 = 0.05;

/// What the presentation loop copies out each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemoFrame {
    pub tick: u64,
    /// Horizontal marker position in `[-0.8, 0.8]` (normalized screen space).
    pub marker_x: f32,
    pub beacon_height: u8,
}

pub struct DemoScene {
    world: Arc<World>,
    tick: u64,
    marker_x: f32,
    marker_speed: f32,
    beacon_height: u8,
}

impl DemoScene {
    pub fn new(world: Arc<World>) -> Self {
        Self {
            world,
            tick: 0,
            marker_x: 0.0,
            marker_speed: MARKER_SPEED,
            beacon_height: 0,
        }
    }

    fn grow_beacon(&mut self) {
        if self.beacon_height >= BEACON_MAX {
            for h in 0..i32::from(BEACON_MAX) {
                self.world.set_block(beacon_pos(h), blocks::AIR);
            }
            self.beacon_height = 0;
            tracing::debug!(tick = self.tick, "Beacon reset");
            return;
        }
        self.world.set_block(beacon_pos(i32::from(self.beacon_height)), blocks::LOG);
        self.beacon_height += 1;
    }
}

impl Scene for DemoScene {
    type Frame = DemoFrame;

    fn tick(&mut self, tick: u64) {
        self.tick = tick;

        self.marker_x += self.marker_speed;
        if self.marker_x > MARKER_LIMIT || self.marker_x < -MARKER_LIMIT {
            self.marker_speed = -self.marker_speed;
        }

        if tick % BEACON_INTERVAL == 0 {
            self.grow_beacon();
        }
    }

    fn frame(&self) -> DemoFrame {
        DemoFrame {
            tick: self.tick,
            marker_x: self.marker_x,
            beacon_height: self.beacon_height,
        }
    }
}

/// Block `h` of the beacon, counted from just above the platform.
pub fn beacon_pos(h: i32) -> BlockPos {
    BlockPos::new(0, SPAWN_Y + 1 + h, 0)
}

/// A 9x9 grass pad over dirt and stone, centred on the origin, with a small
/// ore vein under it and one leaf block on a corner.
pub fn spawn_platform() -> Vec<(BlockPos, BlockId)> {
    let mut placed = Vec::new();
    for x in -4..=4i32 {
        for z in -4..=4i32 {
            placed.push((BlockPos::new(x, SPAWN_Y, z), blocks::GRASS));
            for y in SPAWN_Y - 3..SPAWN_Y {
                placed.push((BlockPos::new(x, y, z), blocks::DIRT));
            }
            for y in SPAWN_Y - 8..SPAWN_Y - 3 {
                placed.push((BlockPos::new(x, y, z), blocks::STONE));
            }
        }
    }
    for x in -2..=2i32 {
        placed.push((BlockPos::new(x, SPAWN_Y - 6, 0), blocks::COAL_ORE));
    }
    placed.push((BlockPos::new(0, SPAWN_Y - 7, 0), blocks::IRON_ORE));
    placed.push((BlockPos::new(4, SPAWN_Y + 1, 4), blocks::LEAVES));
    placed
}
