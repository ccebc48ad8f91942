use super::error::RuntimeError;
use super::metrics::LoopMetrics;
use super::state::{RunFlag, RunState, StopHandle};
use super::tick::TickAccumulator;
use super::{FrameSurface, Scene};
use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Loop timing.
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Simulation ticks per second.
    pub tick_rate: u32,
    /// How long the simulation thread sleeps when no tick is due.
    pub idle_sleep: Duration,
}

impl LoopConfig {
    pub fn validate(&self) -> Result<(), RuntimeError> {
        if self.tick_rate == 0 {
            return Err(RuntimeError::ZeroTickRate);
        }
        Ok(())
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_rate: 20,
            idle_sleep: Duration::from_millis(1),
        }
    }
}

/// Owns the simulation thread, the shared scene and the running flag.
///
/// [`Coordinator::run`] spawns the simulation thread, runs the presentation
/// loop on the calling thread until the surface closes or a stop is
/// requested, then joins. Dropping a coordinator whose thread is still alive
/// requests a stop and joins as well, so the scene is never torn down under
/// a running simulation.
pub struct Coordinator<S: Scene> {
    scene: Arc<Mutex<S>>,
    flag: Arc<RunFlag>,
    metrics: Arc<LoopMetrics>,
    config: LoopConfig,
    simulation: Option<JoinHandle<()>>,
}

impl<S: Scene> Coordinator<S> {
    pub fn new(scene: S, config: LoopConfig) -> Self {
        Self {
            scene: Arc::new(Mutex::new(scene)),
            flag: Arc::new(RunFlag::new()),
            metrics: Arc::new(LoopMetrics::new()),
            config,
            simulation: None,
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle::new(Arc::clone(&self.flag))
    }

    pub fn metrics(&self) -> Arc<LoopMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn state(&self) -> RunState {
        self.flag.state()
    }

    /// Inspect the scene under its guard.
    pub fn with_scene<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let scene = lock_scene(&self.scene);
        f(&scene)
    }

    /// Run both loops to completion. Blocks the calling thread, which must be
    /// the thread that owns `surface`.
    pub fn run<W>(&mut self, surface: &mut W) -> Result<(), RuntimeError>
    where
        W: FrameSurface<S::Frame>,
    {
        if self.flag.state() == RunState::Stopped {
            return Err(RuntimeError::AlreadyStopped);
        }
        self.config.validate()?;

        let scene = Arc::clone(&self.scene);
        let flag = Arc::clone(&self.flag);
        let metrics = Arc::clone(&self.metrics);
        let config = self.config.clone();
        let handle = thread::Builder::new()
            .name("simulation".into())
            .spawn(move || simulation_loop(scene, flag, metrics, config))?;
        self.simulation = Some(handle);

        self.presentation_loop(surface);
        self.flag.request_stop();
        self.join()
    }

    fn presentation_loop<W>(&self, surface: &mut W)
    where
        W: FrameSurface<S::Frame>,
    {
        tracing::info!("Presentation loop started");
        while self.flag.is_running() {
            if surface.should_close() {
                tracing::info!("Surface requested close");
                break;
            }

            let started = Instant::now();
            surface.clear();

            // Snapshot under the guard, draw without it.
            let frame = {
                let waiting = Instant::now();
                let scene = lock_scene(&self.scene);
                self.metrics.record_guard_wait(waiting.elapsed());
                scene.frame()
            };

            surface.draw(&frame);
            surface.swap_buffers();
            surface.poll_events();
            self.metrics.record_frame(started.elapsed());
        }
        tracing::info!(frames = self.metrics.frames(), "Presentation loop exited");
    }

    fn join(&mut self) -> Result<(), RuntimeError> {
        let result = match self.simulation.take() {
            Some(handle) => handle
                .join()
                .map_err(|payload| RuntimeError::SimulationPanicked(panic_message(&*payload))),
            None => Ok(()),
        };
        self.flag.mark_stopped();
        match &result {
            Ok(()) => tracing::info!(ticks = self.metrics.ticks(), "Simulation thread joined"),
            Err(e) => tracing::error!("{}", e),
        }
        result
    }
}

impl<S: Scene> Drop for Coordinator<S> {
    fn drop(&mut self) {
        if self.simulation.is_some() {
            self.flag.request_stop();
            // The error was already logged by `join`.
            let _ = self.join();
        }
    }
}

/// Fixed-tick driver. Runs on the `simulation` thread until the flag leaves
/// `Running`.
fn simulation_loop<S: Scene>(
    scene: Arc<Mutex<S>>,
    flag: Arc<RunFlag>,
    metrics: Arc<LoopMetrics>,
    config: LoopConfig,
) {
    let _stop_on_panic = StopOnPanic(Arc::clone(&flag));
    let mut accumulator = TickAccumulator::from_rate(config.tick_rate);
    let mut tick = 0u64;
    let mut last = Instant::now();

    tracing::info!(tick_rate = config.tick_rate, "Simulation loop started");

    while flag.is_running() {
        let now = Instant::now();
        let due = accumulator.advance(now - last);
        last = now;

        if due == 0 {
            thread::sleep(config.idle_sleep);
            continue;
        }

        for _ in 0..due {
            tick += 1;
            let started = Instant::now();
            lock_scene(&scene).tick(tick);
            metrics.record_tick(started.elapsed());
        }
        if due > 1 {
            tracing::debug!(due, "Simulation fell behind, catching up");
        }
    }

    tracing::info!(ticks = tick, "Simulation loop exited");
}

/// A panicking tick poisons the scene mutex; the presentation side keeps
/// reading whatever the scene holds and lets `join` report the panic.
fn lock_scene<S>(scene: &Mutex<S>) -> MutexGuard<'_, S> {
    scene.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Requests a stop if the simulation thread unwinds, so the presentation
/// loop does not keep running against a dead simulation.
struct StopOnPanic(Arc<RunFlag>);

impl Drop for StopOnPanic {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.request_stop();
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
