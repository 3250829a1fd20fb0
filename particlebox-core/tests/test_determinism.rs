//! Determinism tests - same input must produce identical trajectories

use particlebox_core::tests::test_helpers::states_approx_equal;
use particlebox_core::{run_headless, Preset, Simulation, SimulationConfig};
use std::time::Duration;

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[test]
fn test_repeated_runs_match() {
    let results: Vec<_> = (0..3)
        .map(|_| run_headless(Preset::Fountain.config(), 300, ms(16)).expect("run failed"))
        .collect();

    for (i, result) in results.iter().enumerate().skip(1) {
        assert!(
            states_approx_equal(&results[0], result, 0.0),
            "run {} should match run 0",
            i
        );
    }
}

#[test]
fn test_one_frame_equals_five_frames() {
    let mut once = Simulation::from_preset(Preset::Ring).expect("preset is valid");
    let mut chunked = Simulation::from_preset(Preset::Ring).expect("preset is valid");

    once.advance(ms(50));
    for _ in 0..5 {
        chunked.advance(ms(10));
    }

    assert_eq!(once.state().ticks, 5);
    assert_eq!(chunked.state().ticks, 5);
    assert_eq!(once.particles(), chunked.particles());
}

#[test]
fn test_frame_rate_does_not_change_physics() {
    // Two seconds delivered at 50, 125 and 200 frames per second
    let config = Preset::Fountain.config();
    let slow = run_headless(config.clone(), 100, ms(20)).expect("run failed");
    let medium = run_headless(config.clone(), 250, ms(8)).expect("run failed");
    let fast = run_headless(config, 400, ms(5)).expect("run failed");

    assert_eq!(slow.ticks, 200);
    assert!(states_approx_equal(&slow, &medium, 0.0));
    assert!(states_approx_equal(&slow, &fast, 0.0));
}

#[test]
fn test_irregular_frames_match_regular_frames() {
    let mut irregular = Simulation::from_preset(Preset::Fountain).expect("preset is valid");
    let mut regular = Simulation::from_preset(Preset::Fountain).expect("preset is valid");

    // 17 + 3 + 33 + 7 + 0 + 40 = 100ms
    for frame in [17, 3, 33, 7, 0, 40] {
        irregular.advance(ms(frame));
    }
    regular.advance(ms(100));

    assert_eq!(irregular.state().ticks, 10);
    assert_eq!(irregular.particles(), regular.particles());
}

#[test]
fn test_seed_controls_fountain() {
    let a = run_headless(Preset::Fountain.config(), 50, ms(16)).expect("run failed");

    let reseeded = SimulationConfig {
        seed: 7,
        ..Preset::Fountain.config()
    };
    let b = run_headless(reseeded, 50, ms(16)).expect("run failed");

    assert!(!states_approx_equal(&a, &b, 1e-6));
}
