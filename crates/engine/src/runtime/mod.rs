//! Simulation / presentation loop pair.
//!
//! Exactly two long-lived threads: the caller's thread runs the presentation
//! loop (the graphics context lives there and never moves), and a spawned
//! `simulation` thread advances the shared [`Scene`] at a fixed tick rate.
//! The only state they exchange is the scene, behind one mutex:
//!
//! ```text
//!   simulation thread                    presentation thread
//!   ─────────────────                    ───────────────────
//!   accumulate elapsed time              surface.clear()
//!   per full period:                     lock ─ scene.frame() ─ unlock
//!     lock ─ scene.tick() ─ unlock       surface.draw(&frame)
//!   nothing due: sleep                   surface.swap_buffers()
//!                                        surface.poll_events()
//! ```

pub mod coordinator;
pub mod error;
pub mod metrics;
pub mod state;
pub mod tick;

pub use coordinator::{Coordinator, LoopConfig};
pub use error::RuntimeError;
pub use metrics::{LoopMetrics, MetricsSnapshot};
pub use state::{RunState, StopHandle};
pub use tick::TickAccumulator;

/// Shared simulation state. Mutated only by the simulation thread; the
/// presentation thread only ever copies a [`Scene::Frame`] out of it.
pub trait Scene: Send + 'static {
    /// What one presented frame needs. Keep it small: it is built while the
    /// simulation thread is locked out.
    type Frame;

    /// Advance one fixed tick. `tick` counts from 1.
    fn tick(&mut self, tick: u64);

    /// Copy out the fields the next frame draws.
    fn frame(&self) -> Self::Frame;
}

/// Window / graphics collaborator.
///
/// Render-thread-only: implementations are not required to be `Send`, and the
/// coordinator only ever calls them from the thread that runs
/// [`Coordinator::run`].
pub trait FrameSurface<F> {
    /// The user (or the platform) asked to close.
    fn should_close(&self) -> bool;

    fn clear(&mut self);

    /// Issue drawing work for one frame. Called without any lock held.
    fn draw(&mut self, frame: &F);

    fn swap_buffers(&mut self);

    fn poll_events(&mut self);
}
