// Unified mouse/touch input and display-to-logical coordinate mapping

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One input edge, already stripped of mouse/touch specifics.
/// Positions are relative to the displayed element's bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerInput {
    Down(Point),
    Move(Point),
    Up,
    Leave,
}

/// Fixed logical surface vs. the size it is currently displayed at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub logical_width: f64,
    pub logical_height: f64,
    pub display_width: f64,
    pub display_height: f64,
}

impl Viewport {
    /// Display size starts equal to the logical size until the host reports otherwise.
    pub fn new(logical_width: u32, logical_height: u32) -> Self {
        Self {
            logical_width: logical_width as f64,
            logical_height: logical_height as f64,
            display_width: logical_width as f64,
            display_height: logical_height as f64,
        }
    }

    /// Ignored for non-positive or non-finite sizes (detached or collapsed element).
    pub fn set_display_size(&mut self, width: f64, height: f64) {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            self.display_width = width;
            self.display_height = height;
        }
    }

    /// Per-axis `logical / displayed` factors.
    pub fn display_to_logical(&self) -> (f64, f64) {
        (
            self.logical_width / self.display_width,
            self.logical_height / self.display_height,
        )
    }

    pub fn to_logical(&self, p: Point) -> Point {
        let (sx, sy) = self.display_to_logical();
        Point::new(p.x * sx, p.y * sy)
    }

    /// Uniform scale for sizing the on-screen brush cursor: the smaller of the
    /// per-axis `displayed / logical` factors, so the cursor never overflows
    /// the tighter axis when the element is letterboxed.
    pub fn cursor_scale(&self) -> f64 {
        (self.display_width / self.logical_width).min(self.display_height / self.logical_height)
    }
}

/// Cosmetic brush cursor, in display space (centered on the pointer).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BrushCursor {
    pub visible: bool,
    pub center: Point,
    pub size: f64,
}

impl BrushCursor {
    /// Top-left corner for absolutely positioning the cursor element.
    pub fn top_left(&self) -> Point {
        Point::new(
            self.center.x - self.size / 2.0,
            self.center.y - self.size / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_center_maps_to_logical_center() {
        let mut vp = Viewport::new(800, 600);
        vp.set_display_size(400.0, 300.0);
        assert_eq!(vp.to_logical(Point::new(200.0, 150.0)), Point::new(400.0, 300.0));

        vp.set_display_size(1234.0, 517.0);
        let c = vp.to_logical(Point::new(617.0, 258.5));
        assert!((c.x - 400.0).abs() < 1e-9);
        assert!((c.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn axes_scale_independently() {
        let mut vp = Viewport::new(800, 600);
        vp.set_display_size(400.0, 600.0);
        assert_eq!(vp.to_logical(Point::new(100.0, 100.0)), Point::new(200.0, 100.0));
        assert_eq!(vp.cursor_scale(), 0.5);
    }

    #[test]
    fn degenerate_display_size_is_ignored() {
        let mut vp = Viewport::new(800, 600);
        vp.set_display_size(0.0, 300.0);
        vp.set_display_size(f64::NAN, 300.0);
        assert_eq!(vp.display_to_logical(), (1.0, 1.0));
    }

    #[test]
    fn cursor_top_left_is_centered() {
        let c = BrushCursor {
            visible: true,
            center: Point::new(100.0, 80.0),
            size: 50.0,
        };
        assert_eq!(c.top_left(), Point::new(75.0, 55.0));
    }
}
