mod host;

use std::rc::Rc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use glide_animation::{FrameTimer, FrameTimerOptions, InertiaOptions, InertiaSimulator};
use glide_core::{Clock, FrameRuntime, WebClock};
use glide_foundation::{
    DragCallbacks, DragContext, GestureOptions, MoveHandler, PointerEvent, PointerEventKind,
    PointerGestureTracker, PointerType, ScrollAxis, ScrollContainer, ScrollMetrics,
    ScrollTranslator, ScrollTranslatorOptions,
};
use glide_ui_graphics::{Point, Size};

use host::{Panel, VsyncFlag};

const FRAME: Duration = Duration::from_millis(16);
const SWIPE_FRAMES: u32 = 12;
const MAX_FRAMES: u32 = 1_000;

fn main() {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    println!("=== Glide headless demo ===");
    println!("A scripted touch swipe drags a 1200px strip inside a 300px viewport,");
    println!("then inertia carries it until friction or the edge stops it.");
    println!("A 1.5s countdown runs on the same frame runtime.");
    println!();

    let vsync = Arc::new(VsyncFlag::default());
    let runtime = FrameRuntime::new(vsync.clone());
    let handle = runtime.handle();
    let clock = WebClock;
    let origin = clock.now();

    let panel = Panel::new(
        runtime.registry().next_id(),
        ScrollMetrics::new(Size::new(1200.0, 200.0), Size::new(300.0, 200.0)),
    );
    let container: Rc<dyn ScrollContainer> = panel.clone();
    let translator = Rc::new(ScrollTranslator::bind(
        &handle,
        container,
        None,
        ScrollTranslatorOptions::default()
            .with_axis(ScrollAxis::X)
            .with_pointer_scroll(false),
    ));

    let inertia = Rc::new(InertiaSimulator::new(
        &handle,
        InertiaOptions::new(0.0, -900.0, 0.0),
    ));
    {
        let translator = Rc::clone(&translator);
        inertia.set_on_change(move |value| {
            let current = translator.translation().x;
            translator.apply_scroll_delta(value - current, 0.0);
        });
    }

    let callbacks = {
        let drag_translator = Rc::clone(&translator);
        let drag_inertia = Rc::clone(&inertia);
        let end_translator = Rc::clone(&translator);
        let end_inertia = Rc::clone(&inertia);
        DragCallbacks::new(move |element| -> MoveHandler {
            log::info!("drag started on panel {element}");
            drag_inertia.stop();
            let translator = Rc::clone(&drag_translator);
            Box::new(move |context: &DragContext| {
                translator.apply_scroll_delta(context.delta_x, 0.0);
                true
            })
        })
        .with_on_end(move |context, _element| {
            log::info!(
                "released after {:.0}ms at {:.2}px/ms",
                context.elapsed_ms,
                context.velocity_x
            );
            end_inertia.snap_to(end_translator.translation().x);
            end_inertia.start(context.velocity_x);
            log::info!(
                "fling should settle near {:.1}px",
                end_inertia.projected_rest_value()
            );
        })
    };
    let _tracker = PointerGestureTracker::bind(&handle, &panel, callbacks, GestureOptions::default());

    let timer = FrameTimer::new(&handle, FrameTimerOptions::countdown(1_500.0))
        .with_on_end(|| log::info!("countdown finished"));
    timer.start();

    let touch = |kind, x: f64, time_ms| {
        PointerEvent::new(kind, Point::new(x, 100.0), time_ms).with_pointer_type(PointerType::Touch)
    };

    let mut frame = 0;
    let mut frames_drawn = 0;
    while frame < MAX_FRAMES {
        let now_ms = clock.millis_since(origin);
        match frame {
            0 => {
                panel.dispatch(touch(PointerEventKind::Down, 250.0, now_ms));
            }
            n if n <= SWIPE_FRAMES => {
                let x = 250.0 - 20.0 * f64::from(n);
                panel.dispatch(touch(PointerEventKind::Move, x, now_ms));
            }
            n if n == SWIPE_FRAMES + 1 => {
                let x = 250.0 - 20.0 * f64::from(SWIPE_FRAMES);
                panel.dispatch(touch(PointerEventKind::Up, x, now_ms));
            }
            _ => {}
        }

        if vsync.take() {
            runtime.drain_frame_callbacks((now_ms * 1_000_000.0) as u64);
            frames_drawn += 1;
        }
        if frame > SWIPE_FRAMES + 1 && !runtime.has_frame_callbacks() {
            break;
        }
        frame += 1;
        thread::sleep(FRAME);
    }

    println!(
        "settled at {} after {} frames ({}ms elapsed, timer at {}ms)",
        translator.translation(),
        frames_drawn,
        clock.elapsed_millis(origin),
        timer.time_ms()
    );
}
