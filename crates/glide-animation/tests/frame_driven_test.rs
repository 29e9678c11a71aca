//! Timer and inertia driven through the manual frame driver.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glide_animation::{FrameTimer, FrameTimerOptions, InertiaOptions, InertiaSimulator};
use glide_core::Visibility;
use glide_testing::FrameDriver;

#[test]
fn countdown_reaches_zero_once_after_1200ms() {
    let mut driver = FrameDriver::new();
    let ends = Rc::new(Cell::new(0));
    let counter = Rc::clone(&ends);
    let timer = FrameTimer::new(&driver.handle(), FrameTimerOptions::countdown(1000.0))
        .with_on_end(move || counter.set(counter.get() + 1));

    timer.start();
    driver.frame();
    driver.advance_frames(60, 20.0);

    assert_eq!(timer.time_ms(), 0.0);
    assert_eq!(ends.get(), 1);
    assert!(!driver.has_pending_frames());
}

#[test]
fn hidden_host_pauses_without_banking_time() {
    let mut driver = FrameDriver::new();
    let timer = FrameTimer::new(&driver.handle(), FrameTimerOptions::countdown(1000.0));

    timer.start();
    driver.frame();
    driver.advance_frames(10, 16.0);
    assert_eq!(timer.time_ms(), 840.0);

    driver.set_visibility(Visibility::Hidden);
    assert!(!timer.is_running());
    driver.advance_by(5000.0);
    driver.set_visibility(Visibility::Visible);
    assert!(!timer.is_running());
    assert_eq!(timer.time_ms(), 840.0);

    timer.resume();
    driver.advance_by(16.0);
    driver.advance_by(16.0);
    assert_eq!(timer.time_ms(), 824.0);
}

#[test]
fn tick_observer_sees_every_frame() {
    let mut driver = FrameDriver::new();
    let timer = FrameTimer::new(
        &driver.handle(),
        FrameTimerOptions::countup(0.0)
            .with_target(100.0)
            .with_auto_start(true),
    );
    let ticks = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&ticks);
    timer.set_on_tick(move |time_ms| sink.borrow_mut().push(time_ms));

    driver.frame();
    driver.run_until_idle(25.0, 20);

    assert_eq!(*ticks.borrow(), vec![25.0, 50.0, 75.0, 100.0]);
    assert!(timer.is_finished());
}

#[test]
fn long_frame_gaps_are_clamped() {
    let mut driver = FrameDriver::new();
    let timer = FrameTimer::new(&driver.handle(), FrameTimerOptions::countup(0.0));

    timer.start();
    driver.frame();
    driver.advance_by(500.0);

    assert_eq!(timer.time_ms(), 32.0);
}

#[test]
fn inertia_and_timer_run_side_by_side() {
    let mut driver = FrameDriver::new();
    let timer = FrameTimer::new(&driver.handle(), FrameTimerOptions::countdown(64.0));
    let inertia = InertiaSimulator::new(&driver.handle(), InertiaOptions::new(0.0, 0.0, 10_000.0));
    let values = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&values);
    inertia.set_on_change(move |value| sink.borrow_mut().push(value));

    timer.start();
    inertia.start(1.5);
    let projected = inertia.projected_rest_value();
    driver.frame();
    driver.advance_frames(4, 16.0);

    assert!(timer.is_finished());
    assert!(inertia.is_running());

    driver.run_until_idle(16.0, 1000);
    assert!(!inertia.is_running());
    let values = values.borrow();
    assert!(values.windows(2).all(|pair| pair[1] >= pair[0]));
    // Reference-length frames settle exactly where the closed form says.
    assert!((inertia.value() - projected).abs() < 1e-6);
}

#[test]
fn hiding_the_host_halts_inertia() {
    let mut driver = FrameDriver::new();
    let inertia = InertiaSimulator::new(&driver.handle(), InertiaOptions::new(0.0, -500.0, 500.0));

    inertia.start(2.0);
    driver.frame();
    driver.advance_frames(3, 16.0);
    let value = inertia.value();
    assert!(value > 0.0);

    driver.set_visibility(Visibility::Hidden);
    driver.advance_frames(3, 16.0);

    assert!(!inertia.is_running());
    assert_eq!(inertia.value(), value);
}
