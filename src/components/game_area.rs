use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlCanvasElement, HtmlElement, MouseEvent, TouchEvent};
use yew::prelude::*;

use crate::config::{EngineConfig, Theme};
use crate::engine::EngineEvent;
use crate::pointer::{BrushCursor, Point, PointerInput};
use crate::util::clog;
use crate::web::{self, SharedEngine};

#[derive(Properties, PartialEq, Clone)]
pub struct GameAreaProps {
    pub on_progress_update: Callback<f64>,
    pub on_cleaning_complete: Callback<()>,
    /// Empty for the flat animated fallback.
    #[prop_or_default]
    pub dirty_image_src: AttrValue,
    pub clean_image_src: AttrValue,
    pub sponge_image_src: AttrValue,
    pub is_game_active: bool,
    #[prop_or_default]
    pub is_idle: bool,
    pub reset_key: u32,
    #[prop_or_default]
    pub dirt_color: Option<AttrValue>,
    /// A changed config remounts the engine; an invalid one leaves the area unmounted.
    #[prop_or_default]
    pub config: EngineConfig,
}

type HostCallbacks = Rc<RefCell<(Callback<f64>, Callback<()>)>>;

#[function_component]
pub fn GameArea(props: &GameAreaProps) -> Html {
    let container_ref = use_node_ref();
    let canvas_ref = use_node_ref();
    let cursor_ref = use_node_ref();
    let engine = use_mut_ref(|| None::<SharedEngine>);
    let callbacks: HostCallbacks = use_mut_ref(|| {
        (
            props.on_progress_update.clone(),
            props.on_cleaning_complete.clone(),
        )
    });
    // listeners read the latest parent callbacks through this cell
    *callbacks.borrow_mut() = (
        props.on_progress_update.clone(),
        props.on_cleaning_complete.clone(),
    );

    // Engine + pointer listeners per config; teardown on unmount or config change.
    {
        let engine = engine.clone();
        let container_ref = container_ref.clone();
        let canvas_ref = canvas_ref.clone();
        let cursor_ref = cursor_ref.clone();
        let callbacks = callbacks.clone();
        use_effect_with(props.config.clone(), move |config| {
            let mut listeners = Vec::new();
            if let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() {
                match web::mount(canvas.clone(), config.clone()) {
                    Ok(shared) => {
                        if let Some(container) = container_ref.cast::<HtmlElement>() {
                            listeners = pointer_listeners(
                                &container, &canvas, &shared, &cursor_ref, &callbacks,
                            );
                        }
                        *engine.borrow_mut() = Some(shared);
                    }
                    Err(e) => clog(&e.to_string()),
                }
            }
            move || {
                drop(listeners);
                if let Some(shared) = engine.borrow_mut().take() {
                    shared.borrow_mut().teardown();
                }
            }
        });
    }

    // Reset on a new key, a new dirt theme, or a fresh mount.
    {
        let engine = engine.clone();
        let callbacks = callbacks.clone();
        let theme = Theme {
            dirt_color: props.dirt_color.as_ref().map(|c| c.to_string()),
            dirt_image: props.dirty_image_src.to_string(),
            clean_image: props.clean_image_src.to_string(),
            brush_image: props.sponge_image_src.to_string(),
        };
        use_effect_with(
            (
                props.reset_key,
                props.dirty_image_src.clone(),
                props.dirt_color.clone(),
                props.config.clone(),
            ),
            move |_| {
                if let Some(shared) = engine.borrow().as_ref() {
                    shared.borrow_mut().reset(theme);
                    flush_events(shared, &callbacks);
                }
                || ()
            },
        );
    }

    {
        let engine = engine.clone();
        use_effect_with(
            (props.is_game_active, props.is_idle, props.config.clone()),
            move |(active, idle, _)| {
                let (active, idle) = (*active, *idle);
                if let Some(shared) = engine.borrow().as_ref() {
                    shared.borrow_mut().set_active(active, idle);
                }
                || ()
            },
        );
    }

    let (w, h) = (props.config.width, props.config.height);
    let container_style = format!(
        "position:relative; width:100%; max-width:{w}px; aspect-ratio:{w} / {h}; margin:0 auto; overflow:hidden; cursor:none; touch-action:none; user-select:none; border:2px solid #30363d; border-radius:8px; background-image:url('{}'); background-size:cover; background-position:center;",
        props.clean_image_src
    );
    html! {
        <div ref={container_ref} style={container_style}>
            <canvas ref={canvas_ref} style="position:absolute; top:0; left:0; width:100%; height:100%; display:block;"></canvas>
            <img ref={cursor_ref} src={props.sponge_image_src.clone()} alt="" draggable="false"
                style="position:absolute; display:none; pointer-events:none; object-fit:contain;" />
        </div>
    }
}

fn flush_events(shared: &SharedEngine, callbacks: &HostCallbacks) {
    let events = shared.borrow_mut().take_events();
    if events.is_empty() {
        return;
    }
    let (on_progress, on_complete) = callbacks.borrow().clone();
    for event in events {
        match event {
            EngineEvent::Progress(p) => on_progress.emit(p),
            EngineEvent::Complete => on_complete.emit(()),
        }
    }
}

fn client_position(event: &Event) -> Option<(f64, f64)> {
    if let Some(e) = event.dyn_ref::<MouseEvent>() {
        return Some((e.client_x() as f64, e.client_y() as f64));
    }
    if let Some(e) = event.dyn_ref::<TouchEvent>() {
        return e
            .touches()
            .item(0)
            .map(|t| (t.client_x() as f64, t.client_y() as f64));
    }
    None
}

fn sync_cursor(cursor_ref: &NodeRef, cursor: BrushCursor) {
    let Some(el) = cursor_ref.cast::<HtmlElement>() else {
        return;
    };
    let style = el.style();
    if !cursor.visible {
        style.set_property("display", "none").ok();
        return;
    }
    let corner = cursor.top_left();
    style.set_property("display", "block").ok();
    style.set_property("left", &format!("{:.1}px", corner.x)).ok();
    style.set_property("top", &format!("{:.1}px", corner.y)).ok();
    style.set_property("width", &format!("{:.1}px", cursor.size)).ok();
    style.set_property("height", &format!("{:.1}px", cursor.size)).ok();
}

fn pointer_listeners(
    container: &HtmlElement,
    canvas: &HtmlCanvasElement,
    shared: &SharedEngine,
    cursor_ref: &NodeRef,
    callbacks: &HostCallbacks,
) -> Vec<EventListener> {
    let options = EventListenerOptions {
        passive: false,
        ..EventListenerOptions::default()
    };
    let bind = |name: &'static str, to_input: fn(Option<Point>) -> Option<PointerInput>| {
        let canvas = canvas.clone();
        let shared = shared.clone();
        let cursor_ref = cursor_ref.clone();
        let callbacks = callbacks.clone();
        EventListener::new_with_options(container, name, options, move |event: &Event| {
            let rect = canvas.get_bounding_client_rect();
            let at = client_position(event).map(|(x, y)| Point::new(x - rect.left(), y - rect.top()));
            let Some(mut input) = to_input(at) else {
                return;
            };
            // touches have no leave event; a drag off the surface ends the stroke
            if let PointerInput::Move(p) = input {
                if p.x < 0.0 || p.y < 0.0 || p.x > rect.width() || p.y > rect.height() {
                    input = PointerInput::Leave;
                }
            }
            {
                let mut engine = shared.borrow_mut();
                engine.set_display_size(rect.width(), rect.height());
                engine.handle_pointer(input);
                if engine.is_erasing() && event.cancelable() {
                    event.prevent_default();
                }
                sync_cursor(&cursor_ref, engine.cursor());
            }
            flush_events(&shared, &callbacks);
        })
    };
    vec![
        bind("mousedown", |at| at.map(PointerInput::Down)),
        bind("mousemove", |at| at.map(PointerInput::Move)),
        bind("mouseup", |_| Some(PointerInput::Up)),
        bind("mouseleave", |_| Some(PointerInput::Leave)),
        bind("touchstart", |at| at.map(PointerInput::Down)),
        bind("touchmove", |at| at.map(PointerInput::Move)),
        bind("touchend", |_| Some(PointerInput::Up)),
        bind("touchcancel", |_| Some(PointerInput::Leave)),
        EventListener::new_with_options(container, "dragstart", options, |event: &Event| {
            event.prevent_default();
        }),
    ]
}
