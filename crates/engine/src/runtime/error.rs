use thiserror::Error;

/// Failures of the loop coordinator.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The OS refused to start the simulation thread.
    #[error("failed to spawn simulation thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// The simulation thread panicked; the panic message, if it was a string.
    #[error("simulation thread panicked: {0}")]
    SimulationPanicked(String),

    /// `LoopConfig::tick_rate` was 0; there is no tick period to run at.
    #[error("tick rate must be at least 1")]
    ZeroTickRate,

    /// `run` was called on a coordinator that already finished.
    #[error("coordinator already stopped")]
    AlreadyStopped,
}
