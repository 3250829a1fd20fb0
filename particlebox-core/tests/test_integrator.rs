//! Unit tests for the fixed-step integrator and its collision response

use glam::Vec3;
use particlebox_core::integrator::{step, step_particle};
use particlebox_core::tests::test_helpers::{approx_eq_f32, particles_approx_equal};
use particlebox_core::{BoundaryVolume, Particle, Preset};

const DT: f32 = 0.01;
const GRAVITY: Vec3 = Vec3::new(0.0, -9.8, 0.0);

fn ground_box() -> BoundaryVolume {
    BoundaryVolume::default()
}

#[test]
fn test_semi_implicit_euler_single_step() {
    let mut particles = vec![Particle::at(Vec3::new(0.0, 2.0, 0.0))];
    step(&mut particles, &ground_box(), DT, GRAVITY, 1.0);

    // Velocity is updated first, and the new velocity moves the particle
    let expected_vy = -9.8 * DT;
    let expected_y = 2.0 + expected_vy * DT;
    assert!(approx_eq_f32(particles[0].velocity.y, expected_vy, 1e-7));
    assert!(approx_eq_f32(particles[0].position.y, expected_y, 1e-7));
    assert_eq!(particles[0].position.x, 0.0);
    assert_eq!(particles[0].position.z, 0.0);
}

#[test]
fn test_acceleration_is_overwritten_each_step() {
    let mut particles = vec![Particle::at(Vec3::new(0.0, 2.0, 0.0))];
    particles[0].acceleration = Vec3::new(100.0, 100.0, 100.0);

    step(&mut particles, &ground_box(), DT, GRAVITY, 1.0);
    assert_eq!(particles[0].acceleration, GRAVITY);

    step(&mut particles, &ground_box(), DT, GRAVITY, 1.0);
    assert_eq!(particles[0].acceleration, GRAVITY);
}

#[test]
fn test_floor_hit_mirrors_position_and_negates_velocity() {
    let mut particles = vec![Particle::new(Vec3::new(0.0, 0.001, 0.0), Vec3::new(0.0, -1.0, 0.0))];
    step(&mut particles, &ground_box(), DT, Vec3::ZERO, 1.0);

    // 0.001 - 0.01 = -0.009 below the floor, mirrored to 0.009 above it
    assert!(approx_eq_f32(particles[0].position.y, 0.009, 1e-6));
    assert_eq!(particles[0].velocity.y, 1.0);
}

#[test]
fn test_ceiling_hit_mirrors_position_and_negates_velocity() {
    let mut particles = vec![Particle::new(Vec3::new(0.0, 4.995, 0.0), Vec3::new(0.0, 2.0, 0.0))];
    step(&mut particles, &ground_box(), DT, Vec3::ZERO, 1.0);

    // 4.995 + 0.02 = 5.015, mirrored to 4.985
    assert!(approx_eq_f32(particles[0].position.y, 4.985, 1e-5));
    assert_eq!(particles[0].velocity.y, -2.0);
}

#[test]
fn test_inelastic_bounce_scales_reflected_component() {
    let restitution = 0.7;
    let mut particles = vec![Particle::new(Vec3::new(1.0, 0.01, 0.0), Vec3::new(0.5, -3.0, 0.0))];

    let before = particles[0].velocity + GRAVITY * DT;
    step(&mut particles, &ground_box(), DT, GRAVITY, restitution);
    let after = particles[0].velocity;

    assert!(after.y > 0.0, "bounce should send the particle upward");
    assert!(approx_eq_f32(after.y.abs(), restitution * before.y.abs(), 1e-6));
    assert!(after.y.abs() < before.y.abs());
    // Tangential components are untouched
    assert_eq!(after.x, 0.5);
}

#[test]
fn test_corner_hit_reflects_every_crossed_axis() {
    let mut particles = vec![Particle::new(
        Vec3::new(2.49, 4.99, 2.49),
        Vec3::new(2.0, 2.0, 2.0),
    )];
    step(&mut particles, &ground_box(), DT, Vec3::ZERO, 1.0);

    let p = &particles[0];
    assert_eq!(p.velocity, Vec3::new(-2.0, -2.0, -2.0));
    assert!(ground_box().contains(p.position), "position {} left the box", p.position);
    assert!(approx_eq_f32(p.position.x, 2.49, 1e-5));
    assert!(approx_eq_f32(p.position.y, 4.99, 1e-5));
}

#[test]
fn test_large_overshoot_stays_inside() {
    // 1000 m/s over 0.01 s travels 10 m, twice the box width
    let mut particles = vec![Particle::new(Vec3::new(0.0, 2.5, 0.0), Vec3::new(1000.0, 0.0, 0.0))];
    step(&mut particles, &ground_box(), DT, Vec3::ZERO, 1.0);

    let p = &particles[0];
    assert!(ground_box().contains(p.position));
    assert_eq!(p.position.x, -2.5);
    assert_eq!(p.velocity.x, -1000.0);
}

#[test]
fn test_elastic_bounces_preserve_speed() {
    let mut particles = vec![Particle::new(Vec3::new(0.0, 2.5, 0.0), Vec3::new(3.0, 0.0, 0.0))];
    let mut bounces = 0;
    let mut last_sign = 1.0f32;

    for _ in 0..10_000 {
        step(&mut particles, &ground_box(), DT, Vec3::ZERO, 1.0);
        let vx = particles[0].velocity.x;
        if vx.signum() != last_sign {
            bounces += 1;
            last_sign = vx.signum();
        }
        assert_eq!(vx.abs(), 3.0, "speed changed after {} bounces", bounces);
    }

    // 300 m of travel over a 5 m box
    assert!(bounces >= 50, "only {} bounces", bounces);
    assert_eq!(particles[0].velocity.y, 0.0);
    assert_eq!(particles[0].velocity.z, 0.0);
}

#[test]
fn test_inelastic_bounces_lose_energy() {
    let mut particles = vec![Particle::new(Vec3::new(0.0, 2.5, 0.0), Vec3::new(3.0, 0.0, 0.0))];
    let mut speeds = vec![3.0f32];

    for _ in 0..1_000 {
        let before = particles[0].velocity.x;
        step(&mut particles, &ground_box(), DT, Vec3::ZERO, 0.5);
        let after = particles[0].velocity.x;
        if after.signum() != before.signum() {
            speeds.push(after.abs());
        }
    }

    assert!(speeds.len() > 2);
    for pair in speeds.windows(2) {
        assert!(pair[1] < pair[0]);
        assert!(approx_eq_f32(pair[1], pair[0] * 0.5, 1e-6));
    }
}

#[test]
fn test_fountain_stays_bounded() {
    let config = Preset::Fountain.config();
    let boundary = config.boundary_volume().expect("preset boundary is valid");
    let mut particles = config.spawn_particles();

    for tick in 0..2_000 {
        step(&mut particles, &boundary, DT, GRAVITY, config.restitution);
        for (i, p) in particles.iter().enumerate() {
            assert!(
                boundary.contains(p.position),
                "particle {} at {} left the box on tick {}",
                i,
                p.position,
                tick
            );
            assert!(p.is_finite());
        }
    }
}

#[test]
fn test_particles_are_independent() {
    let config = Preset::Ring.config();
    let boundary = config.boundary_volume().expect("preset boundary is valid");
    let mut batch = config.spawn_particles();
    let mut one_by_one = batch.clone();

    for _ in 0..500 {
        step(&mut batch, &boundary, DT, GRAVITY, config.restitution);
        for p in one_by_one.iter_mut().rev() {
            step_particle(p, &boundary, DT, GRAVITY, config.restitution);
        }
    }

    assert!(particles_approx_equal(&batch, &one_by_one, 0.0));
}

#[test]
fn test_empty_population_is_a_no_op() {
    let mut particles: Vec<Particle> = Vec::new();
    step(&mut particles, &ground_box(), DT, GRAVITY, 1.0);
    assert!(particles.is_empty());
}

#[cfg(feature = "parallel")]
#[test]
fn test_rayon_step_matches_serial_loop() {
    for preset in [Preset::Fountain, Preset::Ring] {
        let config = preset.config();
        let boundary = config.boundary_volume().expect("preset box is valid");
        let dt = config.fixed_delta_time as f32;

        let mut parallel = config.spawn_particles();
        let mut serial = parallel.clone();

        for _ in 0..500 {
            step(&mut parallel, &boundary, dt, config.gravity, config.restitution);
            for particle in serial.iter_mut() {
                step_particle(particle, &boundary, dt, config.gravity, config.restitution);
            }
        }

        // Each particle is integrated alone, so thread scheduling cannot change the bits
        assert_eq!(parallel, serial, "preset {} diverged under rayon", preset);
    }
}
