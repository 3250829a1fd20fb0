use crate::boundary::BoundaryVolume;
use crate::particle::Particle;
use glam::Vec3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Step every particle forward by dt using semi-implicit Euler integration,
/// then resolve collisions against the boundary.
///
/// Particles are independent, so the loop order does not matter. With the
/// `parallel` feature the loop is split across rayon workers.
pub fn step(
    particles: &mut [Particle],
    boundary: &BoundaryVolume,
    dt: f32,
    gravity: Vec3,
    restitution: f32,
) {
    debug_assert!(dt > 0.0, "dt must be positive, got {}", dt);
    debug_assert!(gravity.is_finite(), "gravity must be finite, got {}", gravity);

    #[cfg(feature = "parallel")]
    {
        particles
            .par_iter_mut()
            .for_each(|particle| step_particle(particle, boundary, dt, gravity, restitution));
    }
    #[cfg(not(feature = "parallel"))]
    {
        for particle in particles.iter_mut() {
            step_particle(particle, boundary, dt, gravity, restitution);
        }
    }
}

/// Advance a single particle by one fixed step
#[inline]
pub fn step_particle(
    particle: &mut Particle,
    boundary: &BoundaryVolume,
    dt: f32,
    gravity: Vec3,
    restitution: f32,
) {
    // Gravity is the only force, so it is the acceleration outright
    particle.acceleration = gravity;

    // Semi-implicit Euler: v += a*dt, then x += v*dt
    particle.velocity += particle.acceleration * dt;
    particle.position += particle.velocity * dt;

    collide(particle, boundary, restitution);

    debug_assert!(
        particle.is_finite(),
        "particle state became non-finite: {:?}",
        particle
    );
}

/// Reflect the particle back into the box on every axis it left.
///
/// Axes are handled independently, so a corner hit bounces off both faces.
#[inline]
pub fn collide(particle: &mut Particle, boundary: &BoundaryVolume, restitution: f32) {
    for axis in 0..3 {
        reflect_axis(particle, boundary, axis, restitution);
    }
}

/// Collision response on one axis. Returns true when a face was hit.
#[inline]
pub fn reflect_axis(
    particle: &mut Particle,
    boundary: &BoundaryVolume,
    axis: usize,
    restitution: f32,
) -> bool {
    let resolved = boundary.reflect_axis(axis, particle.position[axis]);
    if !resolved.crossed() {
        return false;
    }
    particle.position[axis] = resolved.value;
    particle.velocity[axis] *= -restitution;
    true
}
