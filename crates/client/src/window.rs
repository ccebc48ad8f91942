//! Headless stand-in for the platform window.
//!
//! Owns the (virtual) graphics context: single owner, never cloned, and
//! deliberately `!Send` so it cannot leave the thread that opened it. Frame
//! presentation is paced to a target FPS the way vsync would pace a real
//! swap chain.

use std::marker::PhantomData;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Result, bail};

use abyss_engine::runtime::FrameSurface;
use abyss_engine::world::World;
use abyss_engine::world::catalog::{BlockCatalog, TextureLayer};
use abyss_engine::world::position::BlockPos;

use crate::scene::{BEACON_MAX, DemoFrame, SPAWN_Y};

/// What the last draw call resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// World X of the strip that was drawn.
    pub strip_x: i32,
    pub opaque: u32,
    pub transparent: u32,
    /// Top-face texture of the highest non-air block in the strip.
    pub top_texture: Option<TextureLayer>,
}

/// Read-only world access for drawing.
struct WorldView {
    world: Arc<World>,
    catalog: Arc<BlockCatalog>,
}

pub struct HeadlessWindow {
    width: u32,
    height: u32,
    title: String,
    frame_time: Duration,
    frame_budget: Option<u64>,
    frames: u64,
    last_swap: Instant,
    close_requested: bool,
    view: Option<WorldView>,
    last_draw: DrawStats,
    // Graphics contexts are bound to their creating thread.
    _not_send: PhantomData<*const ()>,
}

impl HeadlessWindow {
    /// Create the window. Fails if either dimension is zero, which a real
    /// backend would also refuse.
    pub fn open(width: u32, height: u32, title: &str) -> Result<Self> {
        if width == 0 || height == 0 {
            bail!("cannot create a {width}x{height} window {title:?}");
        }
        tracing::info!("Window opened: {:?} ({}x{})", title, width, height);
        Ok(Self {
            width,
            height,
            title: title.to_string(),
            frame_time: Duration::from_secs(1) / 60,
            frame_budget: None,
            frames: 0,
            last_swap: Instant::now(),
            close_requested: false,
            view: None,
            last_draw: DrawStats::default(),
            _not_send: PhantomData,
        })
    }

    /// Pace `swap_buffers` to `fps` frames per second.
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.frame_time = Duration::from_secs(1) / fps.max(1);
        self
    }

    /// Report a close request once `frames` frames have been presented.
    pub fn with_frame_budget(mut self, frames: Option<u64>) -> Self {
        self.frame_budget = frames;
        self
    }

    /// Give draw calls access to the world and block table.
    pub fn attach_world(mut self, world: Arc<World>, catalog: Arc<BlockCatalog>) -> Self {
        self.view = Some(WorldView { world, catalog });
        self
    }

    /// Behave as if the user clicked the close button.
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_draw(&self) -> DrawStats {
        self.last_draw
    }

    fn draw_strip(view: &WorldView, frame: &DemoFrame) -> DrawStats {
        let strip_x = ((frame.marker_x + 1.0) * 8.0).floor() as i32 - 8;
        let mut stats = DrawStats {
            strip_x,
            ..DrawStats::default()
        };

        let top = SPAWN_Y + 1 + i32::from(BEACON_MAX);
        for y in (SPAWN_Y - 8..=top).rev() {
            let id = view.world.get_block(BlockPos::new(strip_x, y, 0));
            if id.is_air() {
                continue;
            }
            let block = view.catalog.get(id);
            if stats.top_texture.is_none() {
                stats.top_texture = Some(block.texture_top);
            }
            if block.transparent {
                stats.transparent += 1;
            } else {
                stats.opaque += 1;
            }
        }
        stats
    }
}

impl FrameSurface<DemoFrame> for HeadlessWindow {
    fn should_close(&self) -> bool {
        self.close_requested || self.frame_budget.is_some_and(|budget| self.frames >= budget)
    }

    fn clear(&mut self) {
        self.last_draw = DrawStats::default();
    }

    fn draw(&mut self, frame: &DemoFrame) {
        if let Some(view) = &self.view {
            self.last_draw = Self::draw_strip(view, frame);
        }
        tracing::trace!(
            tick = frame.tick,
            marker_x = frame.marker_x,
            beacon = frame.beacon_height,
            opaque = self.last_draw.opaque,
            "frame"
        );
    }

    fn swap_buffers(&mut self) {
        let next = self.last_swap + self.frame_time;
        let now = Instant::now();
        if next > now {
            thread::sleep(next - now);
        }
        self.last_swap = Instant::now();
        self.frames += 1;
    }

    fn poll_events(&mut self) {}
}

impl Drop for HeadlessWindow {
    fn drop(&mut self) {
        tracing::info!("Window released: {:?} after {} frames", self.title, self.frames);
    }
}
