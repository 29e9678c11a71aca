use super::*;
use glide_core::{DefaultScheduler, FrameRuntime};
use std::cell::RefCell;
use std::sync::Arc;

const MS: u64 = 1_000_000;

fn run_frames(runtime: &FrameRuntime, deltas_ms: &[u64]) {
    let mut now = 0u64;
    runtime.drain_frame_callbacks(now);
    for dt in deltas_ms {
        now += dt * MS;
        runtime.drain_frame_callbacks(now);
    }
}

#[test]
fn step_never_leaves_bounds() {
    let options = InertiaOptions::new(50.0, 0.0, 100.0);
    for velocity in [-10.0, -0.5, 0.3, 4.0, 25.0] {
        for dt in [1.0, 8.0, 16.0, 32.0] {
            let mut state = InertiaState::new(&options);
            state.velocity_px_ms = velocity;
            while state.step(dt).expect("finite") {
                assert!((0.0..=100.0).contains(&state.value));
            }
            assert!((0.0..=100.0).contains(&state.value));
            assert_eq!(state.velocity_px_ms, 0.0);
        }
    }
}

#[test]
fn trajectory_is_deterministic_for_a_dt_sequence() {
    let options = InertiaOptions::new(0.0, -500.0, 500.0).with_friction(0.9);
    let deltas = [16.0, 17.0, 15.5, 32.0, 8.0, 16.0, 16.0];
    let trace = || {
        let mut state = InertiaState::new(&options);
        state.velocity_px_ms = 1.25;
        deltas
            .iter()
            .map(|dt| {
                let _ = state.step(*dt);
                state.value
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(trace(), trace());
}

#[test]
fn boundary_hit_is_terminal() {
    let mut state = InertiaState::new(&InertiaOptions::new(95.0, 0.0, 100.0));
    state.velocity_px_ms = 2.0;

    let keep_going = state.step(16.0).expect("finite");

    assert!(!keep_going);
    assert_eq!(state.value, 100.0);
    assert_eq!(state.velocity_px_ms, 0.0);
}

#[test]
fn slow_motion_is_terminal() {
    let mut state =
        InertiaState::new(&InertiaOptions::new(0.0, -100.0, 100.0).with_min_velocity(0.5));
    state.velocity_px_ms = 0.4;

    assert!(!state.step(16.0).expect("finite"));
    assert_eq!(state.velocity_px_ms, 0.0);
}

#[test]
fn non_finite_velocity_reports_error() {
    let mut state = InertiaState::new(&InertiaOptions::new(0.0, -100.0, 100.0));
    state.velocity_px_ms = f64::NAN;

    assert!(state.step(16.0).is_err());
    assert_eq!(state.value, 0.0);
    assert_eq!(state.velocity_px_ms, 0.0);
}

#[test]
fn simulator_integrates_release_velocity() {
    let runtime = FrameRuntime::new(Arc::new(DefaultScheduler));
    let inertia = InertiaSimulator::new(&runtime.handle(), InertiaOptions::new(0.0, 0.0, 1000.0));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    inertia.set_on_change(move |value| sink.borrow_mut().push(value));

    inertia.start(1.0);
    assert!(inertia.is_running());
    run_frames(&runtime, &[16]);

    assert!((inertia.value() - 15.2).abs() < 1e-9);
    assert!((inertia.velocity() - 0.95).abs() < 1e-12);
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn simulator_settles_and_stops() {
    let runtime = FrameRuntime::new(Arc::new(DefaultScheduler));
    let inertia = InertiaSimulator::new(&runtime.handle(), InertiaOptions::new(0.0, 0.0, 10_000.0));
    let projected = {
        inertia.start(2.0);
        inertia.projected_rest_value()
    };

    run_frames(&runtime, &[16; 400]);

    assert!(!inertia.is_running());
    assert_eq!(inertia.velocity(), 0.0);
    assert!((inertia.value() - projected).abs() < 1.0);
}

#[test]
fn simulator_stops_at_bound() {
    let runtime = FrameRuntime::new(Arc::new(DefaultScheduler));
    let inertia = InertiaSimulator::new(&runtime.handle(), InertiaOptions::new(0.0, -40.0, 40.0));

    inertia.start(-5.0);
    run_frames(&runtime, &[16, 16, 16]);

    assert_eq!(inertia.value(), -40.0);
    assert!(!inertia.is_running());
    assert!(!runtime.has_frame_callbacks());
}

#[test]
fn snap_to_overrides_in_flight_motion() {
    let runtime = FrameRuntime::new(Arc::new(DefaultScheduler));
    let inertia = InertiaSimulator::new(&runtime.handle(), InertiaOptions::new(0.0, 0.0, 1000.0));

    inertia.start(3.0);
    run_frames(&runtime, &[16, 16]);
    inertia.snap_to(250.0);

    assert_eq!(inertia.value(), 250.0);
    assert!(!inertia.is_running());
    assert_eq!(inertia.velocity(), 0.0);
    runtime.drain_frame_callbacks(1_000 * MS);
    assert_eq!(inertia.value(), 250.0);
}

#[test]
fn stop_zeroes_velocity() {
    let runtime = FrameRuntime::new(Arc::new(DefaultScheduler));
    let inertia = InertiaSimulator::new(&runtime.handle(), InertiaOptions::new(0.0, 0.0, 1000.0));

    inertia.start(3.0);
    run_frames(&runtime, &[16]);
    let value = inertia.value();
    inertia.stop();
    runtime.drain_frame_callbacks(100 * MS);

    assert_eq!(inertia.velocity(), 0.0);
    assert_eq!(inertia.value(), value);
    assert!(!inertia.is_running());
}

#[test]
fn diverging_simulation_stops_cleanly() {
    let runtime = FrameRuntime::new(Arc::new(DefaultScheduler));
    let inertia = InertiaSimulator::new(&runtime.handle(), InertiaOptions::new(0.0, -10.0, 10.0));

    inertia.start(f64::INFINITY);
    run_frames(&runtime, &[16, 16]);

    assert!(!inertia.is_running());
    assert_eq!(inertia.value(), 0.0);
}
