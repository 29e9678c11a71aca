//! Integration tests wiring pointer gestures into scroll translation and
//! inertia through the test host.

use std::cell::RefCell;
use std::rc::Rc;

use glide_animation::{InertiaOptions, InertiaSimulator};
use glide_foundation::{
    DragCallbacks, DragContext, EventDisposition, GestureOptions, MoveHandler,
    PointerGestureTracker, ScrollAxis, ScrollTranslator, ScrollTranslatorOptions,
};
use glide_testing::{FrameDriver, PointerScript, TestElement};
use glide_ui_graphics::{Size, Translation};

#[test]
fn touch_drag_translates_container() {
    let driver = FrameDriver::new();
    let element = TestElement::scroll_container(
        &driver.handle(),
        Size::new(600.0, 400.0),
        Size::new(300.0, 200.0),
    );
    let translator = ScrollTranslator::bind(
        &driver.handle(),
        element.as_container(),
        None,
        ScrollTranslatorOptions::default(),
    );

    let dispositions = PointerScript::touch()
        .down(200.0, 150.0, 0.0)
        .drag_to(100.0, 100.0, 5, 50.0)
        .up_here(60.0)
        .play(&element);

    assert_eq!(dispositions[1], EventDisposition::PreventDefault);
    assert_eq!(translator.translation(), Translation::new(-100.0, -50.0));
    assert_eq!(
        element.stored_translation(),
        Some(Translation::new(-100.0, -50.0))
    );
}

#[test]
fn drag_past_content_edge_clamps_and_continues() {
    let driver = FrameDriver::new();
    let element = TestElement::scroll_container(
        &driver.handle(),
        Size::new(350.0, 200.0),
        Size::new(300.0, 200.0),
    );
    let translator = ScrollTranslator::bind(
        &driver.handle(),
        element.as_container(),
        None,
        ScrollTranslatorOptions::default().with_axis(ScrollAxis::X),
    );

    PointerScript::mouse()
        .down(250.0, 100.0, 0.0)
        .drag_to(50.0, 20.0, 4, 40.0)
        .drag_to(230.0, 20.0, 2, 20.0)
        .up_here(70.0)
        .play(&element);

    // Clamped at -50, then dragged back by 180 and clamped at 0.
    assert_eq!(translator.translation(), Translation::IDENTITY);
}

#[test]
fn wheel_and_resize_share_one_binding() {
    let driver = FrameDriver::new();
    let element = TestElement::scroll_container(
        &driver.handle(),
        Size::new(350.0, 400.0),
        Size::new(300.0, 200.0),
    );
    let window = TestElement::new(&driver.handle());
    let translator = ScrollTranslator::bind(
        &driver.handle(),
        element.as_container(),
        Some(window.as_target()),
        ScrollTranslatorOptions::default(),
    );

    assert_eq!(element.wheel(-100.0, -30.0), EventDisposition::PreventDefault);
    assert_eq!(translator.translation(), Translation::new(-50.0, -30.0));

    window.resize(1024.0, 768.0);
    assert_eq!(element.stored_translation(), None);
    assert_eq!(translator.translation(), Translation::IDENTITY);
}

#[test]
fn release_velocity_hands_off_to_inertia() {
    let mut driver = FrameDriver::new();
    let element = TestElement::scroll_container(
        &driver.handle(),
        Size::new(1300.0, 200.0),
        Size::new(300.0, 200.0),
    );
    let translator = Rc::new(ScrollTranslator::bind(
        &driver.handle(),
        element.as_container(),
        None,
        ScrollTranslatorOptions::default()
            .with_axis(ScrollAxis::X)
            .with_pointer_scroll(false),
    ));
    let inertia = Rc::new(InertiaSimulator::new(
        &driver.handle(),
        InertiaOptions::new(0.0, -1000.0, 0.0),
    ));
    {
        let translator = Rc::clone(&translator);
        inertia.set_on_change(move |value| {
            let current = translator.translation().x;
            translator.apply_scroll_delta(value - current, 0.0);
        });
    }

    let releases: Rc<RefCell<Vec<DragContext>>> = Rc::default();
    let callbacks = {
        let move_translator = Rc::clone(&translator);
        let move_inertia = Rc::clone(&inertia);
        let end_translator = Rc::clone(&translator);
        let end_inertia = Rc::clone(&inertia);
        let releases = Rc::clone(&releases);
        DragCallbacks::new(move |_element| -> MoveHandler {
            // A new touch catches the content.
            move_inertia.stop();
            let translator = Rc::clone(&move_translator);
            Box::new(move |context: &DragContext| {
                translator.apply_scroll_delta(context.delta_x, 0.0);
                true
            })
        })
        .with_on_end(move |context, _element| {
            releases.borrow_mut().push(*context);
            end_inertia.snap_to(end_translator.translation().x);
            end_inertia.start(context.velocity_x);
        })
    };
    let _tracker = PointerGestureTracker::bind(
        &driver.handle(),
        &element,
        callbacks,
        GestureOptions::default(),
    );

    PointerScript::touch()
        .down(500.0, 100.0, 0.0)
        .drag_to(300.0, 100.0, 10, 100.0)
        .up_here(110.0)
        .play(&element);

    assert_eq!(releases.borrow().len(), 1);
    assert_eq!(releases.borrow()[0].velocity_x, -2.0);
    assert_eq!(translator.translation().x, -200.0);
    assert!(inertia.is_running());

    driver.frame();
    driver.run_until_idle(16.0, 500);

    assert!(!inertia.is_running());
    let settled = translator.translation().x;
    assert!(settled < -200.0 && settled >= -1000.0, "settled at {settled}");
    assert!((settled - inertia.value()).abs() < 1e-9);
}

#[test]
fn slow_release_does_not_fling() {
    let mut driver = FrameDriver::new();
    let element = TestElement::scroll_container(
        &driver.handle(),
        Size::new(1300.0, 200.0),
        Size::new(300.0, 200.0),
    );
    let inertia = Rc::new(InertiaSimulator::new(
        &driver.handle(),
        InertiaOptions::new(0.0, -1000.0, 0.0),
    ));
    let callbacks = {
        let inertia = Rc::clone(&inertia);
        DragCallbacks::new(|_element| -> MoveHandler { Box::new(|_: &DragContext| true) })
            .with_on_end(move |context, _element| inertia.start(context.velocity_x))
    };
    let _tracker = PointerGestureTracker::bind(
        &driver.handle(),
        &element,
        callbacks,
        GestureOptions::default(),
    );

    PointerScript::touch()
        .down(500.0, 100.0, 0.0)
        .drag_to(300.0, 100.0, 10, 100.0)
        .up_here(400.0)
        .play(&element);

    driver.frame();
    driver.run_until_idle(16.0, 10);
    assert_eq!(inertia.value(), 0.0);
    assert!(!inertia.is_running());
}
