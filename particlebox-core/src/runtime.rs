use crate::boundary::BoundaryVolume;
use crate::clock::{Clock, FrameTimer};
use crate::config::{Preset, SimulationConfig};
use crate::error::SimulationError;
use crate::integrator::step;
use crate::particle::{Particle, SimulationState};
use crate::render::{render_particles, Renderer};
use crate::scheduler::{FixedStepScheduler, Ticks};
use glam::Vec3;
use std::time::Duration;

/// Snapshot of a particle for reporting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleState {
    pub index: usize,
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Outcome of a headless run
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub frames: u64,
    pub ticks: u64,
    pub simulated_time: f64,
    pub particles: Vec<ParticleState>,
}

/// A running simulation: particles, the box they live in, and the step clock
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    boundary: BoundaryVolume,
    scheduler: FixedStepScheduler,
    state: SimulationState,
    frames: u64,
}

impl Simulation {
    /// Validate the configuration and lay out the initial particles
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let boundary = config.boundary_volume()?;
        let mut scheduler = FixedStepScheduler::from_secs(config.fixed_delta_time)?;
        if let Some(max_steps) = config.max_steps_per_frame {
            scheduler = scheduler.with_max_steps(max_steps);
        }
        let state = SimulationState::new(config.spawn_particles());

        log::info!(
            "simulation ready: {} particles, dt = {}s, restitution = {}, box {} .. {}",
            state.len(),
            config.fixed_delta_time,
            config.restitution,
            boundary.origin(),
            boundary.bound()
        );

        Ok(Self {
            config,
            boundary,
            scheduler,
            state,
            frames: 0,
        })
    }

    pub fn from_preset(preset: Preset) -> Result<Self, SimulationError> {
        Self::new(preset.config())
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, SimulationError> {
        Self::new(SimulationConfig::from_yaml_str(source)?)
    }

    /// Replace the spawned particles with an explicit set
    pub fn with_particles(mut self, particles: Vec<Particle>) -> Self {
        self.state = SimulationState::new(particles);
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn boundary(&self) -> &BoundaryVolume {
        &self.boundary
    }

    pub fn scheduler(&self) -> &FixedStepScheduler {
        &self.scheduler
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn particles(&self) -> &[Particle] {
        &self.state.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.state.particles
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run exactly one fixed physics step, bypassing the accumulator
    pub fn step_once(&mut self) {
        let dt = self.scheduler.fixed_delta_time();
        self.integrate(dt);
    }

    fn integrate(&mut self, dt: f32) {
        step(
            &mut self.state.particles,
            &self.boundary,
            dt,
            self.config.gravity,
            self.config.restitution,
        );
        self.state.time += f64::from(dt);
        self.state.ticks += 1;
    }

    /// Feed one frame's worth of real time; returns how many steps ran
    pub fn advance(&mut self, real_delta: Duration) -> u64 {
        let ticks = self.scheduler.advance(real_delta);
        self.run_ticks(ticks)
    }

    /// Same as [`advance`](Self::advance) with the frame time in seconds
    pub fn advance_secs(&mut self, real_delta_time: f64) -> u64 {
        let ticks = self.scheduler.advance_secs(real_delta_time);
        self.run_ticks(ticks)
    }

    fn run_ticks(&mut self, ticks: Ticks) -> u64 {
        let count = ticks.count_remaining();
        for tick in ticks {
            self.integrate(tick.dt);
        }
        self.frames += 1;
        log::debug!(
            "frame {}: {} steps, t = {:.4}s, {:?} carried",
            self.frames,
            count,
            self.state.time,
            self.scheduler.accumulator()
        );
        count
    }

    /// Read the frame time from `timer`, advance, and draw the result
    pub fn frame<C: Clock, R: Renderer + ?Sized>(
        &mut self,
        timer: &mut FrameTimer<C>,
        renderer: &mut R,
    ) -> u64 {
        let steps = self.advance(timer.tick());
        self.render(renderer);
        steps
    }

    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        render_particles(&self.state.particles, renderer);
    }

    pub fn particle_states(&self) -> Vec<ParticleState> {
        self.state
            .particles
            .iter()
            .enumerate()
            .map(|(index, p)| ParticleState {
                index,
                position: p.position,
                velocity: p.velocity,
            })
            .collect()
    }

    pub fn result(&self) -> SimulationResult {
        SimulationResult {
            frames: self.frames,
            ticks: self.state.ticks,
            simulated_time: self.state.time,
            particles: self.particle_states(),
        }
    }
}

/// Build a simulation and drive it for `frames` frames of `frame_delta` each
pub fn run_headless(
    config: SimulationConfig,
    frames: u64,
    frame_delta: Duration,
) -> Result<SimulationResult, SimulationError> {
    let mut simulation = Simulation::new(config)?;
    for _ in 0..frames {
        simulation.advance(frame_delta);
    }
    Ok(simulation.result())
}
