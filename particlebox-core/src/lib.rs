pub mod boundary;
pub mod clock;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod integrator;
pub mod particle;
pub mod render;
pub mod runtime;
pub mod scheduler;

pub use boundary::{AxisClamp, BoundaryVolume};
pub use clock::{Clock, FrameTimer, ManualClock, SystemClock};
pub use config::{BoundaryConfig, Placement, Preset, SimulationConfig};
pub use error::SimulationError;
pub use particle::{Particle, SimulationState};
pub use render::{render_particles, Renderer};
pub use runtime::{run_headless, ParticleState, Simulation, SimulationResult};
pub use scheduler::{FixedStepScheduler, Tick, Ticks};
