//! Simulation configuration and named presets.
//!
//! A scenario can be written in YAML:
//!
//! ```yaml
//! fixed_delta_time: 0.01      # seconds per physics step
//! gravity: [0.0, -9.8, 0.0]
//! boundary:
//!   origin: [-2.5, 0.0, -2.5]
//!   bound: [2.5, 5.0, 2.5]
//! restitution: 0.7            # 1.0 is a perfectly elastic bounce
//! particle_count: 300
//! seed: 42                    # only used by random placements
//! placement:
//!   pattern: ring
//!   position: [0.0, 4.0, 0.0]
//!   speed: 1.0
//! max_steps_per_frame: 16     # optional
//! ```
//!
//! Omitted keys fall back to [`SimulationConfig::default`].

use crate::boundary::BoundaryVolume;
use crate::error::SimulationError;
use crate::particle::Particle;
use crate::scheduler::FixedStepScheduler;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, TAU};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Box corners as written in a scenario file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryConfig {
    pub origin: Vec3,
    pub bound: Vec3,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        let volume = BoundaryVolume::default();
        Self {
            origin: volume.origin(),
            bound: volume.bound(),
        }
    }
}

/// How particles are laid out at the start of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pattern", rename_all = "snake_case")]
pub enum Placement {
    /// Every particle starts at the same spot with the same velocity
    Point { position: Vec3, velocity: Vec3 },
    /// Same start point, particle `i` moves horizontally along (sin i, 0, cos i)
    Ring { position: Vec3, speed: f32 },
    /// Same start point, random upward spray drawn from the seeded RNG
    Fountain { position: Vec3 },
}

impl Placement {
    pub fn position(&self) -> Vec3 {
        match *self {
            Placement::Point { position, .. }
            | Placement::Ring { position, .. }
            | Placement::Fountain { position } => position,
        }
    }
}

/// Everything needed to build a [`crate::Simulation`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Physics step in seconds
    pub fixed_delta_time: f64,
    pub gravity: Vec3,
    pub boundary: BoundaryConfig,
    /// Fraction of the normal velocity kept after a bounce, in (0, 1]
    pub restitution: f32,
    pub particle_count: usize,
    pub seed: u64,
    pub placement: Placement,
    /// Uniform render scale of each particle
    pub particle_scale: f32,
    /// Quarter turn about +X for meshes authored lying flat
    pub upright: bool,
    /// Multiplier applied to wall-clock time in real-time runs
    pub time_scale: f64,
    /// Upper bound on physics steps per rendered frame
    pub max_steps_per_frame: Option<u32>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_delta_time: 0.01,
            gravity: Vec3::new(0.0, -9.8, 0.0),
            boundary: BoundaryConfig::default(),
            restitution: 1.0,
            particle_count: 1,
            seed: 0,
            placement: Placement::Point {
                position: Vec3::new(0.0, 5.0, 0.0),
                velocity: Vec3::ZERO,
            },
            particle_scale: 0.1,
            upright: true,
            time_scale: 1.0,
            max_steps_per_frame: None,
        }
    }
}

impl SimulationConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self, SimulationError> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&source)
    }

    pub fn to_yaml_string(&self) -> Result<String, SimulationError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn boundary_volume(&self) -> Result<BoundaryVolume, SimulationError> {
        BoundaryVolume::new(self.boundary.origin, self.boundary.bound)
    }

    /// Reject configurations the simulation cannot run meaningfully
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.fixed_delta_time.is_finite() || self.fixed_delta_time <= 0.0 {
            return Err(SimulationError::invalid(format!(
                "fixed_delta_time must be positive, got {}",
                self.fixed_delta_time
            )));
        }
        // Also catches steps too large for a Duration or too small to be nonzero
        FixedStepScheduler::from_secs(self.fixed_delta_time)?;
        if !self.gravity.is_finite() {
            return Err(SimulationError::invalid(format!(
                "gravity must be finite, got {}",
                self.gravity
            )));
        }
        if !(self.restitution > 0.0 && self.restitution <= 1.0) {
            return Err(SimulationError::invalid(format!(
                "restitution must lie in (0, 1], got {}",
                self.restitution
            )));
        }
        if !self.time_scale.is_finite() || self.time_scale <= 0.0 {
            return Err(SimulationError::invalid(format!(
                "time_scale must be positive, got {}",
                self.time_scale
            )));
        }
        if !self.particle_scale.is_finite() || self.particle_scale <= 0.0 {
            return Err(SimulationError::invalid(format!(
                "particle_scale must be positive, got {}",
                self.particle_scale
            )));
        }
        if self.max_steps_per_frame == Some(0) {
            return Err(SimulationError::invalid(
                "max_steps_per_frame must be at least 1",
            ));
        }

        let boundary = self.boundary_volume()?;
        let start = self.placement.position();
        if !start.is_finite() || !boundary.contains(start) {
            return Err(SimulationError::invalid(format!(
                "start position {} lies outside the boundary {} .. {}",
                start,
                boundary.origin(),
                boundary.bound()
            )));
        }
        match self.placement {
            Placement::Point { velocity, .. } if !velocity.is_finite() => Err(
                SimulationError::invalid(format!("start velocity must be finite, got {}", velocity)),
            ),
            Placement::Ring { speed, .. } if !speed.is_finite() => Err(SimulationError::invalid(
                format!("ring speed must be finite, got {}", speed),
            )),
            _ => Ok(()),
        }
    }

    /// Lay out `particle_count` particles according to the placement pattern.
    ///
    /// Deterministic for a given `seed`.
    pub fn spawn_particles(&self) -> Vec<Particle> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut particles = Vec::with_capacity(self.particle_count);

        for i in 0..self.particle_count {
            let mut particle = match self.placement {
                Placement::Point { position, velocity } => Particle::new(position, velocity),
                Placement::Ring { position, speed } => {
                    let phase = i as f32;
                    Particle::new(position, Vec3::new(phase.sin(), 0.0, phase.cos()) * speed)
                }
                Placement::Fountain { position } => {
                    Particle::new(position, fountain_velocity(&mut rng))
                }
            };
            particle.scale_by(Vec3::splat(self.particle_scale));
            if self.upright {
                particle.rotate(FRAC_PI_2, Vec3::X);
            }
            particles.push(particle);
        }

        particles
    }
}

fn fountain_velocity(rng: &mut StdRng) -> Vec3 {
    let angle = TAU * rng.gen::<f32>();
    let vx = 1.0 - 2.0 * angle.cos() * rng.gen::<f32>();
    let vy = 7.0 - 10.0 * rng.gen::<f32>();
    let vz = 1.0 - 2.0 * angle.sin() * rng.gen::<f32>();
    Vec3::new(vx, vy, vz)
}

/// Named starting setups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// One particle dropped from the ceiling, elastic floor
    Drop,
    /// A hundred particles sprayed upward from the ceiling centre, elastic walls
    Fountain,
    /// Three hundred particles fanned out horizontally, lossy walls
    Ring,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Drop, Preset::Fountain, Preset::Ring];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Drop => "drop",
            Preset::Fountain => "fountain",
            Preset::Ring => "ring",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Preset::Drop => "single particle falling from rest onto an elastic floor",
            Preset::Fountain => {
                "100 particles with random upward velocities, elastic walls, 1.5x speed"
            }
            Preset::Ring => "300 full-size particles fanned out horizontally, restitution 0.7, 1.5x speed",
        }
    }

    pub fn config(&self) -> SimulationConfig {
        let base = SimulationConfig::default();
        match self {
            Preset::Drop => base,
            Preset::Fountain => SimulationConfig {
                particle_count: 100,
                seed: 42,
                placement: Placement::Fountain {
                    position: Vec3::new(0.0, 5.0, 0.0),
                },
                time_scale: 1.5,
                ..base
            },
            Preset::Ring => SimulationConfig {
                particle_count: 300,
                restitution: 0.7,
                placement: Placement::Ring {
                    position: Vec3::new(0.0, 4.0, 0.0),
                    speed: 1.0,
                },
                particle_scale: 1.0,
                upright: false,
                time_scale: 1.5,
                ..base
            },
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                SimulationError::invalid(format!(
                    "unknown preset '{}' (expected one of: drop, fountain, ring)",
                    s
                ))
            })
    }
}
