use glam::{Mat4, Quat, Vec3};

/// A point mass tracked by the simulation.
///
/// Holds state only. Dynamics live in [`crate::integrator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Overwritten by the force model every step
    pub acceleration: Vec3,
    pub scale: Vec3,
    pub orientation: Quat,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            scale: Vec3::ONE,
            orientation: Quat::IDENTITY,
        }
    }
}

impl Particle {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self {
            position,
            velocity,
            ..Self::default()
        }
    }

    /// A particle at rest at `position`
    pub fn at(position: Vec3) -> Self {
        Self::new(position, Vec3::ZERO)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Overwrite a single coordinate (0 = x, 1 = y, 2 = z)
    pub fn set_position_axis(&mut self, axis: usize, value: f32) {
        self.position[axis] = value;
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    pub fn acceleration(&self) -> Vec3 {
        self.acceleration
    }

    pub fn set_acceleration(&mut self, acceleration: Vec3) {
        self.acceleration = acceleration;
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Multiply the current render scale componentwise
    pub fn scale_by(&mut self, factor: Vec3) {
        self.scale *= factor;
    }

    /// Compose a rotation of `angle` radians about `axis` onto the orientation
    pub fn rotate(&mut self, angle: f32, axis: Vec3) {
        let rotation = Quat::from_axis_angle(axis.normalize_or_zero(), angle);
        self.orientation = (rotation * self.orientation).normalize();
    }

    /// Model matrix handed to the renderer: translation * rotation * scale
    pub fn placement(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.orientation, self.position)
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite() && self.acceleration.is_finite()
    }
}

/// All particles of a running simulation plus the simulated clock
#[derive(Debug, Clone, Default)]
pub struct SimulationState {
    pub particles: Vec<Particle>,
    /// Simulated seconds elapsed
    pub time: f64,
    /// Fixed steps taken so far
    pub ticks: u64,
}

impl SimulationState {
    pub fn new(particles: Vec<Particle>) -> Self {
        Self {
            particles,
            time: 0.0,
            ticks: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Index of the first particle holding a NaN or infinite component
    pub fn first_non_finite(&self) -> Option<usize> {
        self.particles.iter().position(|p| !p.is_finite())
    }
}
