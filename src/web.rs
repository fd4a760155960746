// Browser implementations of the engine seams

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use gloo::render::{AnimationFrame, request_animation_frame};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::color::Rgb;
use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::error::{MountError, SurfaceError};
use crate::scheduler::{FrameScheduler, FrameTicket, ImageLoader, LoadTicket};
use crate::surface::Surface;
use crate::util::clog;

pub type WebEngine = Engine<CanvasSurface, RafScheduler, DomImageLoader, fn() -> f64>;
pub type SharedEngine = Rc<RefCell<WebEngine>>;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn from_canvas(canvas: HtmlCanvasElement) -> Result<Self, SurfaceError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| SurfaceError::Js(format!("{e:?}")))?
            .ok_or(SurfaceError::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SurfaceError::NoContext)?;
        Ok(Self { canvas, ctx })
    }

    fn dims(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn circle_path(&self, x: f64, y: f64, radius: f64) {
        self.ctx.begin_path();
        self.ctx
            .arc(x, y, radius.max(0.0), 0.0, std::f64::consts::PI * 2.0)
            .ok();
    }
}

impl Surface for CanvasSurface {
    type Image = HtmlImageElement;

    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn clear(&mut self) {
        let (w, h) = self.dims();
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }

    fn fill(&mut self, color: Rgb) {
        let (w, h) = self.dims();
        self.ctx.set_fill_style_str(&color.to_hex());
        self.ctx.fill_rect(0.0, 0.0, w, h);
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgb, alpha: f64) {
        self.ctx.set_fill_style_str(&color.to_css_alpha(alpha));
        self.circle_path(x, y, radius);
        self.ctx.fill();
    }

    fn erase_circle(&mut self, x: f64, y: f64, radius: f64) {
        let previous = self
            .ctx
            .global_composite_operation()
            .unwrap_or_else(|_| "source-over".to_string());
        self.ctx
            .set_global_composite_operation("destination-out")
            .ok();
        self.ctx.set_fill_style_str("#000");
        self.circle_path(x, y, radius);
        self.ctx.fill();
        self.ctx.set_global_composite_operation(&previous).ok();
    }

    fn draw_image(&mut self, image: &HtmlImageElement) {
        let (w, h) = self.dims();
        self.ctx
            .draw_image_with_html_image_element_and_dw_and_dh(image, 0.0, 0.0, w, h)
            .ok();
    }
}

/// requestAnimationFrame; dropping the gloo handle cancels the request.
#[derive(Default)]
pub struct RafScheduler {
    target: Weak<RefCell<WebEngine>>,
}

impl FrameScheduler for RafScheduler {
    type Handle = AnimationFrame;

    fn request_frame(&mut self, ticket: FrameTicket) -> AnimationFrame {
        let target = self.target.clone();
        request_animation_frame(move |_timestamp| {
            if let Some(engine) = target.upgrade() {
                engine.borrow_mut().on_animation_frame(ticket);
            }
        })
    }

    fn cancel_frame(&mut self, handle: AnimationFrame) {
        drop(handle);
    }
}

/// Loads through an `HtmlImageElement`. Starting a new load drops the previous
/// listeners, so at most one load can ever report back.
#[derive(Default)]
pub struct DomImageLoader {
    target: Weak<RefCell<WebEngine>>,
    pending: Option<(HtmlImageElement, EventListener, EventListener)>,
}

impl ImageLoader for DomImageLoader {
    fn load(&mut self, src: &str, ticket: LoadTicket) {
        self.pending = None;
        let img = match HtmlImageElement::new() {
            Ok(img) => img,
            Err(_) => {
                clog("image element unavailable");
                self.report_failure_later(ticket);
                return;
            }
        };
        img.set_cross_origin(Some("anonymous"));
        let on_load = {
            let target = self.target.clone();
            let loaded = img.clone();
            EventListener::once(&img, "load", move |_| {
                if let Some(engine) = target.upgrade() {
                    engine.borrow_mut().on_image_loaded(ticket, loaded);
                }
            })
        };
        let on_error = {
            let target = self.target.clone();
            EventListener::once(&img, "error", move |_| {
                if let Some(engine) = target.upgrade() {
                    engine.borrow_mut().on_image_failed(ticket);
                }
            })
        };
        img.set_src(src);
        self.pending = Some((img, on_load, on_error));
    }
}

impl DomImageLoader {
    // the engine is mid-borrow while load() runs, so defer to the next tick
    fn report_failure_later(&self, ticket: LoadTicket) {
        let target = self.target.clone();
        gloo::timers::callback::Timeout::new(0, move || {
            if let Some(engine) = target.upgrade() {
                engine.borrow_mut().on_image_failed(ticket);
            }
        })
        .forget();
    }
}

/// Build the browser engine for `canvas`, sized to the config's logical resolution.
/// An invalid config leaves the canvas untouched.
pub fn mount(canvas: HtmlCanvasElement, config: EngineConfig) -> Result<SharedEngine, MountError> {
    config.validate()?;
    canvas.set_width(config.width);
    canvas.set_height(config.height);
    let surface = CanvasSurface::from_canvas(canvas)?;
    let engine = Engine::new(
        config,
        surface,
        RafScheduler::default(),
        DomImageLoader::default(),
        js_sys::Math::random as fn() -> f64,
    )?;
    let shared = Rc::new(RefCell::new(engine));
    {
        let mut engine = shared.borrow_mut();
        engine.scheduler_mut().target = Rc::downgrade(&shared);
        engine.loader_mut().target = Rc::downgrade(&shared);
    }
    Ok(shared)
}

/// Engine config embedded in the host page as
/// `<script type="application/json" id="...">`. Missing means defaults; a
/// config that fails to parse or validate is logged and replaced by defaults.
pub fn page_config(element_id: &str) -> EngineConfig {
    let raw = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(element_id))
        .and_then(|el| el.text_content());
    match raw {
        Some(raw) if !raw.trim().is_empty() => EngineConfig::from_json(&raw).unwrap_or_else(|e| {
            clog(&format!("{e}; using default config"));
            EngineConfig::default()
        }),
        _ => EngineConfig::default(),
    }
}
