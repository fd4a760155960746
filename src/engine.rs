// Erase-and-measure engine: dirt surface, cleaned-area accumulator, ambient frame loop

use crate::ambient::{BlobPool, DirtPalette, RandomSource, render_frame, render_static};
use crate::config::{EngineConfig, Theme};
use crate::error::ConfigError;
use crate::pointer::{BrushCursor, Point, PointerInput, Viewport};
use crate::scheduler::{FrameScheduler, FrameTicket, ImageLoader, LoadTicket};
use crate::surface::Surface;
use crate::util::clog;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EngineEvent {
    /// Clamped to `[0, 100]`.
    Progress(f64),
    /// Progress reached 100 for the first time since the last reset.
    Complete,
}

/// Who currently has the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Not playing, flat dirt: one animation frame is always outstanding.
    Animating,
    /// Playing: strokes are accepted, nothing is scheduled.
    Erasing,
    /// Not playing and nothing to animate (image dirt, or still loading).
    Suspended,
}

/// What is painted as the dirt layer right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirtLayer {
    /// Before the first reset, or after teardown.
    Unset,
    /// Flat fill shown while the dirt image loads; not erasable.
    Loading,
    Image,
    /// No usable image: flat fill plus ambient blobs when idle.
    Fallback,
}

impl DirtLayer {
    fn erasable(self) -> bool {
        matches!(self, DirtLayer::Image | DirtLayer::Fallback)
    }
}

/// Running total of estimated cleaned area.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Accumulator {
    total: f64,
}

impl Accumulator {
    pub fn clear(&mut self) {
        self.total = 0.0;
    }

    /// Non-positive or non-finite credits are ignored, keeping the total monotonic.
    pub fn credit(&mut self, area: f64) {
        if area.is_finite() && area > 0.0 {
            self.total += area;
        }
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// `min(100, total / denominator × 100)`.
    pub fn progress(&self, denominator: f64) -> f64 {
        if denominator <= 0.0 {
            return 100.0;
        }
        (self.total / denominator * 100.0).clamp(0.0, 100.0)
    }
}

pub struct Engine<S, F, L, R>
where
    S: Surface,
    F: FrameScheduler,
    L: ImageLoader,
    R: RandomSource,
{
    config: EngineConfig,
    surface: S,
    scheduler: F,
    loader: L,
    rng: R,
    theme: Theme,
    palette: DirtPalette,
    dirt: DirtLayer,
    phase: Phase,
    active: bool,
    blobs: Option<BlobPool>,
    frame: Option<(FrameTicket, F::Handle)>,
    frames_requested: u64,
    generation: u64,
    accumulator: Accumulator,
    completed: bool,
    erasing: bool,
    last_position: Option<Point>,
    viewport: Viewport,
    cursor: BrushCursor,
    events: Vec<EngineEvent>,
}

impl<S, F, L, R> Engine<S, F, L, R>
where
    S: Surface,
    F: FrameScheduler,
    L: ImageLoader,
    R: RandomSource,
{
    /// Rejects configs that would make progress meaningless (zero area,
    /// radius or difficulty). Nothing is painted until the first [`Engine::reset`].
    pub fn new(
        config: EngineConfig,
        surface: S,
        scheduler: F,
        loader: L,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let viewport = Viewport::new(config.width, config.height);
        Ok(Self {
            config,
            surface,
            scheduler,
            loader,
            rng,
            theme: Theme::default(),
            palette: DirtPalette::default(),
            dirt: DirtLayer::Unset,
            phase: Phase::Suspended,
            active: false,
            blobs: None,
            frame: None,
            frames_requested: 0,
            generation: 0,
            accumulator: Accumulator::default(),
            completed: false,
            erasing: false,
            last_position: None,
            viewport,
            cursor: BrushCursor::default(),
            events: Vec::new(),
        })
    }

    // ---------------- Lifecycle -----------------

    /// Start a fresh session on `theme`: cancels any pending frame, zeroes the
    /// accumulator, reports progress 0, repaints the static dirt and, when the
    /// theme names a dirt image, starts loading it.
    pub fn reset(&mut self, theme: Theme) {
        self.stop_animation();
        self.phase = Phase::Suspended;
        self.generation += 1;
        self.accumulator.clear();
        self.completed = false;
        self.erasing = false;
        self.last_position = None;
        self.blobs = None;
        self.palette = DirtPalette::from_theme(theme.dirt_color.as_deref());
        render_static(&mut self.surface, self.palette);
        self.dirt = if theme.has_dirt_image() {
            self.loader
                .load(theme.dirt_image.trim(), LoadTicket(self.generation));
            DirtLayer::Loading
        } else {
            DirtLayer::Fallback
        };
        clog(&format!(
            "reset gen={} dirt={:?} fill={}",
            self.generation,
            self.dirt,
            self.palette.fill.to_hex()
        ));
        self.theme = theme;
        self.events.push(EngineEvent::Progress(0.0));
        self.settle();
    }

    /// `active` gates erasing. Any non-active state shows the idle visual, so
    /// `idle` only shows up in the log.
    pub fn set_active(&mut self, active: bool, idle: bool) {
        if !active {
            self.erasing = false;
        }
        if self.active != active {
            clog(&format!("active={active} idle={idle}"));
        }
        self.active = active;
        self.settle();
    }

    /// Stop everything scheduled and refuse further work until the next reset.
    pub fn teardown(&mut self) {
        self.stop_animation();
        self.phase = Phase::Suspended;
        self.generation += 1;
        self.dirt = DirtLayer::Unset;
        self.active = false;
        self.erasing = false;
        self.cursor.visible = false;
        clog("engine teardown");
    }

    // ---------------- Async continuations -----------------

    pub fn on_animation_frame(&mut self, ticket: FrameTicket) {
        match &self.frame {
            Some((pending, _)) if *pending == ticket => {}
            _ => return,
        }
        // this request has fired; its handle is spent
        self.frame = None;
        if self.phase != Phase::Animating {
            return;
        }
        if let Some(pool) = self.blobs.as_mut() {
            render_frame(&mut self.surface, pool, self.palette, &mut self.rng);
        }
        self.request_next_frame();
    }

    pub fn on_image_loaded(&mut self, ticket: LoadTicket, image: S::Image) {
        if !self.load_is_current(ticket) {
            return;
        }
        self.surface.clear();
        self.surface.draw_image(&image);
        self.dirt = DirtLayer::Image;
        clog(&format!("dirt image loaded gen={}", ticket.0));
        self.settle();
    }

    /// Expected degradation, not an error: flat fill plus ambient blobs.
    pub fn on_image_failed(&mut self, ticket: LoadTicket) {
        if !self.load_is_current(ticket) {
            return;
        }
        clog(&format!(
            "dirt image unavailable ({}), using fallback",
            self.theme.dirt_image
        ));
        self.dirt = DirtLayer::Fallback;
        render_static(&mut self.surface, self.palette);
        self.settle();
    }

    fn load_is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation && self.dirt == DirtLayer::Loading
    }

    // ---------------- Pointer -----------------

    /// Displayed size of the surface element, in CSS pixels.
    pub fn set_display_size(&mut self, width: f64, height: f64) {
        self.viewport.set_display_size(width, height);
    }

    pub fn handle_pointer(&mut self, input: PointerInput) {
        match input {
            PointerInput::Down(p) => self.pointer_down(p),
            PointerInput::Move(p) => self.pointer_move(p),
            PointerInput::Up => self.pointer_up(),
            PointerInput::Leave => self.pointer_leave(),
        }
    }

    /// Presses only start a stroke while playing; the cursor follows regardless.
    pub fn pointer_down(&mut self, at: Point) {
        self.erasing = self.active;
        self.pointer_move(at);
    }

    pub fn pointer_move(&mut self, at: Point) {
        let logical = self.viewport.to_logical(at);
        self.cursor = BrushCursor {
            visible: true,
            center: at,
            size: self.config.cursor_size * self.viewport.cursor_scale(),
        };
        self.last_position = Some(logical);
        if self.erasing && self.phase == Phase::Erasing {
            self.erase_at(logical);
        }
    }

    pub fn pointer_up(&mut self) {
        self.erasing = false;
        self.cursor.visible = false;
    }

    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    fn erase_at(&mut self, at: Point) {
        if !self.dirt.erasable() {
            return;
        }
        self.surface
            .erase_circle(at.x, at.y, self.config.brush_radius);
        self.accumulator.credit(self.config.stroke_credit());
        let progress = self.progress();
        self.events.push(EngineEvent::Progress(progress));
        if progress >= 100.0 && !self.completed {
            self.completed = true;
            clog(&format!("cleaning complete gen={}", self.generation));
            self.events.push(EngineEvent::Complete);
        }
    }

    // ---------------- State machine -----------------

    fn settle(&mut self) {
        let next = if self.active {
            Phase::Erasing
        } else if self.dirt == DirtLayer::Fallback {
            Phase::Animating
        } else {
            Phase::Suspended
        };
        self.transition(next);
    }

    fn transition(&mut self, next: Phase) {
        let from = self.phase;
        if from == next {
            return;
        }
        if from == Phase::Animating {
            self.stop_animation();
        }
        self.phase = next;
        match next {
            Phase::Animating => self.start_animation(),
            Phase::Erasing if from == Phase::Animating => {
                // no blob may linger on screen during play
                render_static(&mut self.surface, self.palette);
            }
            Phase::Erasing | Phase::Suspended => {}
        }
        clog(&format!("phase {from:?} -> {next:?}"));
    }

    fn start_animation(&mut self) {
        if self.blobs.is_none() {
            self.blobs = Some(BlobPool::initialize(
                self.surface.size(),
                self.config.blob_count,
                &mut self.rng,
            ));
        }
        self.request_next_frame();
    }

    fn request_next_frame(&mut self) {
        self.stop_animation();
        self.frames_requested += 1;
        let ticket = FrameTicket(self.frames_requested);
        let handle = self.scheduler.request_frame(ticket);
        self.frame = Some((ticket, handle));
    }

    fn stop_animation(&mut self) {
        if let Some((_, handle)) = self.frame.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    // ---------------- Reads -----------------

    /// Events produced since the last call, oldest first.
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn progress(&self) -> f64 {
        self.accumulator
            .progress(self.config.progress_denominator())
    }

    pub fn accumulator(&self) -> Accumulator {
        self.accumulator
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn dirt_layer(&self) -> DirtLayer {
        self.dirt
    }

    pub fn is_erasing(&self) -> bool {
        self.erasing
    }

    pub fn pending_frame(&self) -> Option<FrameTicket> {
        self.frame.as_ref().map(|(t, _)| *t)
    }

    pub fn cursor(&self) -> BrushCursor {
        self.cursor
    }

    pub fn last_position(&self) -> Option<Point> {
        self.last_position
    }

    pub fn blob_pool(&self) -> Option<&BlobPool> {
        self.blobs.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Host wiring after construction (web callbacks need the shared handle).
    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ambient::tests::lcg;
    use crate::color::Rgb;
    use crate::surface::PixelSurface;

    /// PixelSurface that also counts draw calls.
    struct CountingSurface {
        inner: PixelSurface,
        fills: usize,
        circles: usize,
        erases: usize,
        images: usize,
    }

    impl CountingSurface {
        fn new(w: u32, h: u32) -> Self {
            Self {
                inner: PixelSurface::with_size(w, h),
                fills: 0,
                circles: 0,
                erases: 0,
                images: 0,
            }
        }
    }

    impl Surface for CountingSurface {
        type Image = PixelSurface;
        fn size(&self) -> (u32, u32) {
            self.inner.size()
        }
        fn clear(&mut self) {
            self.inner.clear();
        }
        fn fill(&mut self, color: Rgb) {
            self.fills += 1;
            self.inner.fill(color);
        }
        fn fill_circle(&mut self, x: f64, y: f64, r: f64, color: Rgb, alpha: f64) {
            self.circles += 1;
            self.inner.fill_circle(x, y, r, color, alpha);
        }
        fn erase_circle(&mut self, x: f64, y: f64, r: f64) {
            self.erases += 1;
            self.inner.erase_circle(x, y, r);
        }
        fn draw_image(&mut self, image: &PixelSurface) {
            self.images += 1;
            self.inner.draw_image(image);
        }
    }

    #[derive(Default)]
    struct FakeFrames {
        requested: Vec<FrameTicket>,
        cancelled: Vec<FrameTicket>,
    }

    impl FrameScheduler for FakeFrames {
        type Handle = FrameTicket;
        fn request_frame(&mut self, ticket: FrameTicket) -> FrameTicket {
            self.requested.push(ticket);
            ticket
        }
        fn cancel_frame(&mut self, handle: FrameTicket) {
            self.cancelled.push(handle);
        }
    }

    #[derive(Default)]
    struct FakeLoader {
        requests: Vec<(String, LoadTicket)>,
    }

    impl ImageLoader for FakeLoader {
        fn load(&mut self, src: &str, ticket: LoadTicket) {
            self.requests.push((src.to_string(), ticket));
        }
    }

    type TestEngine = Engine<CountingSurface, FakeFrames, FakeLoader, Box<dyn FnMut() -> f64>>;

    const BROWN: &str = "#8B4513";

    fn engine_with(config: EngineConfig) -> TestEngine {
        let surface = CountingSurface::new(config.width, config.height);
        let rng: Box<dyn FnMut() -> f64> = Box::new(lcg(1));
        Engine::new(
            config,
            surface,
            FakeFrames::default(),
            FakeLoader::default(),
            rng,
        )
        .expect("test config is valid")
    }

    /// Small surface keeps the pixel work cheap; tuned so one stroke is a
    /// hair over 1%, so the 100th stroke lands on 100 despite rounding.
    fn small_config() -> EngineConfig {
        EngineConfig {
            width: 80,
            height: 60,
            brush_radius: 5.0,
            area_credit: 48.0001 / (std::f64::consts::PI * 25.0),
            blob_count: 8,
            ..EngineConfig::default()
        }
    }

    fn flat_theme() -> Theme {
        Theme {
            dirt_color: Some(BROWN.into()),
            ..Theme::default()
        }
    }

    fn image_theme(src: &str) -> Theme {
        Theme {
            dirt_color: Some(BROWN.into()),
            dirt_image: src.into(),
            ..Theme::default()
        }
    }

    fn fire_frames(e: &mut TestEngine, n: usize) {
        for _ in 0..n {
            let t = e.pending_frame().expect("animation should be scheduled");
            e.on_animation_frame(t);
        }
    }

    fn progress_events(events: &[EngineEvent]) -> Vec<f64> {
        events
            .iter()
            .filter_map(|e| match e {
                EngineEvent::Progress(p) => Some(*p),
                EngineEvent::Complete => None,
            })
            .collect()
    }

    fn completions(events: &[EngineEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, EngineEvent::Complete))
            .count()
    }

    #[test]
    fn reset_reports_zero_and_paints_static_fill() {
        let mut e = engine_with(small_config());
        e.reset(flat_theme());
        assert_eq!(e.take_events(), vec![EngineEvent::Progress(0.0)]);
        assert_eq!(e.surface().inner.pixel(0, 0), Some([139, 69, 19, 255]));
        assert_eq!(e.dirt_layer(), DirtLayer::Fallback);
    }

    #[test]
    fn idle_fallback_animates_on_a_recurring_schedule() {
        let mut e = engine_with(small_config());
        e.reset(flat_theme());
        e.set_active(false, true);
        assert_eq!(e.phase(), Phase::Animating);
        let fills_before = e.surface().fills;
        fire_frames(&mut e, 5);
        assert_eq!(e.surface().fills - fills_before, 5);
        assert_eq!(e.surface().circles, 5 * 8);
        // one new request per fired frame, never more than one outstanding
        assert_eq!(e.scheduler().requested.len(), 6);
        assert!(e.scheduler().cancelled.is_empty());
        assert!(e.pending_frame().is_some());
    }

    #[test]
    fn non_idle_non_active_still_animates() {
        let mut e = engine_with(small_config());
        e.reset(flat_theme());
        e.set_active(false, false);
        assert_eq!(e.phase(), Phase::Animating);
        assert!(e.pending_frame().is_some());
    }

    #[test]
    fn activation_stops_animation_with_one_static_redraw() {
        let mut e = engine_with(small_config());
        e.reset(flat_theme());
        e.set_active(false, true);
        fire_frames(&mut e, 3);
        let fills = e.surface().fills;
        let circles = e.surface().circles;
        let requests = e.scheduler().requested.len();

        e.set_active(true, false);
        assert_eq!(e.phase(), Phase::Erasing);
        assert_eq!(e.pending_frame(), None);
        assert_eq!(e.scheduler().cancelled.len(), 1);
        assert_eq!(e.surface().fills, fills + 1);
        assert_eq!(e.surface().circles, circles);
        assert_eq!(e.scheduler().requested.len(), requests);

        // the cancelled request firing anyway must not paint
        let stale = *e.scheduler().requested.last().unwrap();
        e.on_animation_frame(stale);
        assert_eq!(e.surface().fills, fills + 1);
        assert_eq!(e.scheduler().requested.len(), requests);

        // back to not playing: animation resumes with a fresh pool position
        e.set_active(false, false);
        assert_eq!(e.phase(), Phase::Animating);
        assert_eq!(e.scheduler().requested.len(), requests + 1);
    }

    #[test]
    fn reset_mid_animation_leaves_exactly_one_loop() {
        let mut e = engine_with(small_config());
        e.reset(flat_theme());
        e.set_active(false, true);
        fire_frames(&mut e, 2);
        let old = e.pending_frame().unwrap();

        e.reset(flat_theme());
        assert!(e.scheduler().cancelled.contains(&old));
        let current = e.pending_frame().unwrap();
        assert_ne!(current, old);

        let fills = e.surface().fills;
        e.on_animation_frame(old);
        assert_eq!(e.surface().fills, fills, "stale frame painted");
        assert_eq!(e.pending_frame(), Some(current));
    }

    #[test]
    fn repeated_reset_is_idempotent() {
        let mut e = engine_with(small_config());
        e.reset(flat_theme());
        e.set_active(true, false);
        e.pointer_down(Point::new(40.0, 30.0));
        assert!(e.progress() > 0.0);
        e.take_events();

        let mut snapshots = Vec::new();
        for _ in 0..3 {
            e.reset(flat_theme());
            assert_eq!(e.take_events(), vec![EngineEvent::Progress(0.0)]);
            assert_eq!(e.progress(), 0.0);
            snapshots.push(e.surface().inner.clone());
        }
        assert!(snapshots.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(snapshots[0].transparent_count(), 0);
        // only the very first (inactive) reset ever scheduled a frame
        assert_eq!(e.scheduler().requested.len(), 1);
        assert_eq!(e.pending_frame(), None);
    }

    #[test]
    fn reset_discards_blob_pool() {
        let mut e = engine_with(small_config());
        e.reset(flat_theme());
        e.set_active(false, true);
        fire_frames(&mut e, 4);
        let before = e.blob_pool().cloned().unwrap();
        e.reset(Theme {
            dirt_color: Some("#556b2f".into()),
            ..Theme::default()
        });
        let after = e.blob_pool().unwrap();
        assert_ne!(&before, after);
        assert!(after.blobs().iter().all(|b| b.opacity == 0.0));
    }

    #[test]
    fn strokes_only_count_while_active_and_pressed() {
        let mut e = engine_with(small_config());
        e.reset(flat_theme());
        e.take_events();

        // idle: press and drag do nothing but move the cursor
        e.set_active(false, true);
        e.pointer_down(Point::new(10.0, 10.0));
        e.pointer_move(Point::new(20.0, 10.0));
        assert!(e.take_events().is_empty());
        assert!(e.cursor().visible);

        // active but not pressed: hover only
        e.set_active(true, false);
        e.pointer_move(Point::new(30.0, 10.0));
        assert!(e.take_events().is_empty());
        assert_eq!(e.surface().erases, 0);

        // press erases at the press point, drag keeps erasing
        e.pointer_down(Point::new(30.0, 10.0));
        e.pointer_move(Point::new(35.0, 10.0));
        assert_eq!(e.surface().erases, 2);
        assert_eq!(progress_events(&e.take_events()).len(), 2);
        assert_eq!(e.surface().inner.alpha_at(30, 10), Some(0));

        e.pointer_up();
        assert!(!e.cursor().visible);
        e.pointer_move(Point::new(50.0, 10.0));
        assert_eq!(e.surface().erases, 2);
        assert!(e.cursor().visible);
    }

    #[test]
    fn leaving_ends_the_stroke_and_hides_cursor() {
        let mut e = engine_with(small_config());
        e.reset(flat_theme());
        e.set_active(true, false);
        e.handle_pointer(PointerInput::Down(Point::new(10.0, 10.0)));
        e.handle_pointer(PointerInput::Leave);
        assert!(!e.is_erasing());
        assert!(!e.cursor().visible);
        e.handle_pointer(PointerInput::Move(Point::new(12.0, 10.0)));
        assert_eq!(e.surface().erases, 1);
    }

    #[test]
    fn activation_while_held_waits_for_a_fresh_press() {
        let mut e = engine_with(small_config());
        e.reset(flat_theme());
        e.pointer_down(Point::new(10.0, 10.0));
        assert!(!e.is_erasing());
        e.set_active(true, false);
        e.pointer_move(Point::new(14.0, 10.0));
        assert_eq!(e.surface().erases, 0);
        assert!(progress_events(&e.take_events()).iter().all(|p| *p == 0.0));

        e.pointer_down(Point::new(14.0, 10.0));
        assert!(e.is_erasing());
        assert_eq!(e.surface().erases, 1);
    }

    #[test]
    fn degenerate_configs_are_rejected() {
        let build = |config: EngineConfig| {
            let surface = CountingSurface::new(8, 8);
            let rng: Box<dyn FnMut() -> f64> = Box::new(lcg(1));
            Engine::new(
                config,
                surface,
                FakeFrames::default(),
                FakeLoader::default(),
                rng,
            )
            .err()
        };
        assert_eq!(
            build(EngineConfig {
                difficulty: 0.0,
                ..EngineConfig::default()
            }),
            Some(ConfigError::Invalid("difficulty", 0.0))
        );
        assert_eq!(
            build(EngineConfig {
                width: 0,
                ..EngineConfig::default()
            }),
            Some(ConfigError::Invalid("width", 0.0))
        );
        assert_eq!(
            build(EngineConfig {
                brush_radius: f64::NAN,
                ..EngineConfig::default()
            })
            .map(|e| matches!(e, ConfigError::Invalid("brush_radius", _))),
            Some(true)
        );
        assert!(build(EngineConfig::default()).is_none());
    }

    #[test]
    fn deactivation_mid_stroke_stops_erasing() {
        let mut e = engine_with(small_config());
        e.reset(flat_theme());
        e.set_active(true, false);
        e.pointer_down(Point::new(10.0, 10.0));
        e.set_active(false, false);
        e.set_active(true, false);
        e.pointer_move(Point::new(20.0, 20.0));
        assert_eq!(e.surface().erases, 1);
    }

    #[test]
    fn progress_is_monotonic_and_bounded() {
        let mut e = engine_with(small_config());
        e.reset(flat_theme());
        e.set_active(true, false);
        e.take_events();
        e.pointer_down(Point::new(0.0, 0.0));
        for i in 0..150 {
            // includes points far outside the surface
            let p = Point::new((i * 37 % 200) as f64 - 50.0, (i * 11 % 120) as f64 - 30.0);
            e.pointer_move(p);
        }
        let values = progress_events(&e.take_events());
        assert_eq!(values.len(), 151);
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert!(values.iter().all(|p| (0.0..=100.0).contains(p)));
        assert_eq!(*values.last().unwrap(), 100.0);
    }

    #[test]
    fn completion_fires_once_per_crossing() {
        let mut e = engine_with(small_config());
        e.reset(flat_theme());
        e.set_active(true, false);
        e.pointer_down(Point::new(40.0, 30.0));
        for _ in 0..98 {
            e.pointer_move(Point::new(40.0, 30.0));
        }
        let events = e.take_events();
        assert_eq!(completions(&events), 0);
        assert!((e.progress() - 99.0).abs() < 1e-3);

        e.pointer_move(Point::new(40.0, 30.0));
        let events = e.take_events();
        assert_eq!(
            events,
            vec![EngineEvent::Progress(100.0), EngineEvent::Complete]
        );

        for _ in 0..5 {
            e.pointer_move(Point::new(40.0, 30.0));
        }
        let events = e.take_events();
        assert_eq!(completions(&events), 0);
        assert_eq!(progress_events(&events), vec![100.0; 5]);

        // a new session can complete again
        e.reset(flat_theme());
        e.pointer_down(Point::new(40.0, 30.0));
        for _ in 0..99 {
            e.pointer_move(Point::new(40.0, 30.0));
        }
        assert_eq!(completions(&e.take_events()), 1);
    }

    #[test]
    fn full_size_scenario_takes_sixty_two_strokes() {
        let config = EngineConfig {
            area_credit: 1.0,
            blob_count: 0,
            ..EngineConfig::default()
        };
        let mut e = engine_with(config);
        e.reset(flat_theme());
        e.set_active(true, false);
        e.take_events();

        e.pointer_down(Point::new(400.0, 300.0));
        assert!((e.accumulator().total() - 7853.98).abs() < 0.01);
        assert!((e.progress() - 1.636).abs() < 0.001);

        for _ in 1..61 {
            e.pointer_move(Point::new(400.0, 300.0));
        }
        assert!(e.progress() < 100.0, "61 strokes credit 479,093 of 480,000");
        assert_eq!(completions(&e.take_events()), 0);

        e.pointer_move(Point::new(400.0, 300.0));
        assert_eq!(e.progress(), 100.0);
        assert_eq!(completions(&e.take_events()), 1);
    }

    #[test]
    fn erase_center_follows_display_scaling() {
        let config = EngineConfig {
            blob_count: 0,
            ..EngineConfig::default()
        };
        let mut e = engine_with(config);
        e.reset(flat_theme());
        e.set_active(true, false);
        e.set_display_size(400.0, 300.0);
        e.pointer_down(Point::new(200.0, 150.0));
        assert_eq!(e.last_position(), Some(Point::new(400.0, 300.0)));
        let s = &e.surface().inner;
        assert_eq!(s.alpha_at(400, 300), Some(0));
        // radius stays 50 logical px, not 25
        assert_eq!(s.alpha_at(445, 300), Some(0));
        assert_eq!(s.alpha_at(455, 300), Some(255));
        // cursor is drawn in display space, scaled down uniformly
        let c = e.cursor();
        assert_eq!(c.center, Point::new(200.0, 150.0));
        assert_eq!(c.size, 50.0);
    }

    #[test]
    fn dirt_image_replaces_fill_without_animation() {
        let mut e = engine_with(small_config());
        e.reset(image_theme("dirt.png"));
        e.set_active(false, true);
        assert_eq!(e.dirt_layer(), DirtLayer::Loading);
        assert_eq!(e.phase(), Phase::Suspended);
        let (src, ticket) = e.loader().requests[0].clone();
        assert_eq!(src, "dirt.png");

        let grime = PixelSurface::solid(4, 4, Rgb { r: 10, g: 20, b: 30 });
        e.on_image_loaded(ticket, grime);
        assert_eq!(e.dirt_layer(), DirtLayer::Image);
        assert_eq!(e.phase(), Phase::Suspended);
        assert_eq!(e.pending_frame(), None);
        assert_eq!(e.surface().inner.pixel(79, 59), Some([10, 20, 30, 255]));

        e.set_active(true, false);
        e.pointer_down(Point::new(40.0, 30.0));
        assert_eq!(e.surface().inner.alpha_at(40, 30), Some(0));
    }

    #[test]
    fn failed_image_falls_back_to_ambient_blobs() {
        let mut e = engine_with(small_config());
        e.reset(image_theme("https://example.invalid/404.png"));
        e.set_active(false, true);
        let (_, ticket) = e.loader().requests[0].clone();
        e.on_image_failed(ticket);
        assert_eq!(e.dirt_layer(), DirtLayer::Fallback);
        assert_eq!(e.phase(), Phase::Animating);
        let fills = e.surface().fills;
        fire_frames(&mut e, 3);
        assert_eq!(e.surface().fills, fills + 3);
        assert_eq!(e.surface().inner.transparent_count(), 0);
        // silent: nothing beyond the reset's zero
        assert_eq!(e.take_events(), vec![EngineEvent::Progress(0.0)]);
    }

    #[test]
    fn strokes_during_load_are_not_credited() {
        let mut e = engine_with(small_config());
        e.reset(image_theme("dirt.png"));
        e.set_active(true, false);
        e.take_events();
        e.pointer_down(Point::new(40.0, 30.0));
        assert!(e.take_events().is_empty());
        assert_eq!(e.progress(), 0.0);
    }

    #[test]
    fn stale_image_load_cannot_paint_after_reset() {
        let mut e = engine_with(small_config());
        e.reset(image_theme("level1.png"));
        let (_, old) = e.loader().requests[0].clone();
        e.reset(flat_theme());
        e.set_active(false, true);

        let images = e.surface().images;
        e.on_image_loaded(old, PixelSurface::solid(2, 2, Rgb { r: 0, g: 0, b: 0 }));
        assert_eq!(e.surface().images, images);
        assert_eq!(e.dirt_layer(), DirtLayer::Fallback);

        e.on_image_failed(old);
        assert_eq!(e.phase(), Phase::Animating);
        assert_eq!(e.scheduler().requested.len(), 1);
    }

    #[test]
    fn malformed_color_uses_neutral_fill() {
        let mut e = engine_with(small_config());
        e.reset(Theme {
            dirt_color: Some("#nope".into()),
            ..Theme::default()
        });
        assert_eq!(e.surface().inner.pixel(0, 0), Some([0x33, 0x33, 0x33, 255]));
    }

    #[test]
    fn teardown_cancels_and_goes_quiet() {
        let mut e = engine_with(small_config());
        e.reset(flat_theme());
        e.set_active(false, true);
        let t = e.pending_frame().unwrap();
        e.teardown();
        assert_eq!(e.pending_frame(), None);
        assert!(e.scheduler().cancelled.contains(&t));
        e.on_animation_frame(t);
        e.set_active(false, true);
        assert_eq!(e.phase(), Phase::Suspended);
        e.set_active(true, false);
        e.pointer_down(Point::new(10.0, 10.0));
        assert!(e.take_events().iter().all(|ev| *ev == EngineEvent::Progress(0.0)));
    }

    #[test]
    fn accumulator_ignores_bad_credit() {
        let mut a = Accumulator::default();
        a.credit(10.0);
        a.credit(-5.0);
        a.credit(f64::NAN);
        assert_eq!(a.total(), 10.0);
        assert_eq!(a.progress(40.0), 25.0);
        assert_eq!(a.progress(1.0), 100.0);
        a.clear();
        assert_eq!(a.total(), 0.0);
    }
}
