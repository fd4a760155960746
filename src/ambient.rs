// Procedural "bubbling dirt" shown while idle with no dirt image

use crate::color::{BLOB_DARKEN_PERCENT, NEUTRAL_FALLBACK, Rgb, hex_to_rgb};
use crate::surface::Surface;

pub const DEFAULT_BLOB_COUNT: usize = 40;

// Per-blob tuning ranges, as (base, spread): value = base + random * spread.
const MAX_RADIUS: (f64, f64) = (10.0, 20.0);
const MIN_RADIUS: (f64, f64) = (3.0, 5.0);
const GROWTH_SPEED: (f64, f64) = (0.05, 0.10);
const OPACITY_SPEED: (f64, f64) = (0.005, 0.010);
const PEAK_OPACITY: (f64, f64) = (0.20, 0.25);
/// Hard ceiling on blob opacity.
pub const MAX_OPACITY: f64 = 0.45;

/// Uniform samples in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

impl<F: FnMut() -> f64> RandomSource for F {
    fn next_f64(&mut self) -> f64 {
        self()
    }
}

fn sample(rng: &mut impl RandomSource, (base, spread): (f64, f64)) -> f64 {
    base + rng.next_f64().clamp(0.0, 1.0) * spread
}

/// Flat fill and blob color for a theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirtPalette {
    pub fill: Rgb,
    pub blob: Rgb,
}

impl DirtPalette {
    /// Missing or malformed colors fall back to the dark neutral.
    pub fn from_theme(color: Option<&str>) -> Self {
        let fill = color.and_then(hex_to_rgb).unwrap_or(NEUTRAL_FALLBACK);
        Self {
            fill,
            blob: fill.darken(BLOB_DARKEN_PERCENT),
        }
    }
}

impl Default for DirtPalette {
    fn default() -> Self {
        Self::from_theme(None)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Blob {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    pub growth_speed: f64,
    pub opacity: f64,
    pub opacity_speed: f64,
    /// Where this fade-in turns around; re-rolled every time the blob respawns.
    pub peak_opacity: f64,
    pub growing: bool,
    pub fading_in: bool,
}

impl Blob {
    fn spawn(width: f64, height: f64, rng: &mut impl RandomSource) -> Self {
        let max_radius = sample(rng, MAX_RADIUS);
        let min_radius = sample(rng, MIN_RADIUS);
        Self {
            x: rng.next_f64() * width,
            y: rng.next_f64() * height,
            radius: min_radius,
            min_radius,
            max_radius,
            growth_speed: sample(rng, GROWTH_SPEED),
            opacity: 0.0,
            opacity_speed: sample(rng, OPACITY_SPEED),
            peak_opacity: sample(rng, PEAK_OPACITY).min(MAX_OPACITY),
            growing: true,
            fading_in: true,
        }
    }

    /// One frame of radius and opacity oscillation. A blob that has faded out
    /// completely moves somewhere else and starts over from its minimum radius.
    pub fn step(&mut self, width: f64, height: f64, rng: &mut impl RandomSource) {
        if self.growing {
            self.radius += self.growth_speed;
            if self.radius >= self.max_radius {
                self.radius = self.max_radius;
                self.growing = false;
            }
        } else {
            self.radius -= self.growth_speed;
            if self.radius <= self.min_radius {
                self.radius = self.min_radius;
                self.growing = true;
            }
        }

        if self.fading_in {
            self.opacity += self.opacity_speed;
            if self.opacity >= self.peak_opacity {
                self.opacity = self.peak_opacity.min(MAX_OPACITY);
                self.fading_in = false;
            }
        } else {
            self.opacity -= self.opacity_speed;
            if self.opacity <= 0.0 {
                self.opacity = 0.0;
                self.fading_in = true;
                self.x = rng.next_f64() * width;
                self.y = rng.next_f64() * height;
                self.radius = self.min_radius;
                self.growing = true;
                self.peak_opacity = sample(rng, PEAK_OPACITY).min(MAX_OPACITY);
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BlobPool {
    width: f64,
    height: f64,
    blobs: Vec<Blob>,
}

impl BlobPool {
    /// `count` blobs scattered over the surface, all at minimum radius and
    /// zero opacity, growing and fading in.
    pub fn initialize(size: (u32, u32), count: usize, rng: &mut impl RandomSource) -> Self {
        let (width, height) = (size.0 as f64, size.1 as f64);
        let blobs = (0..count)
            .map(|_| Blob::spawn(width, height, rng))
            .collect();
        Self {
            width,
            height,
            blobs,
        }
    }

    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    pub fn advance(&mut self, rng: &mut impl RandomSource) {
        let (w, h) = (self.width, self.height);
        for blob in &mut self.blobs {
            blob.step(w, h, rng);
        }
    }
}

/// The static dirt frame: cleared, then one opaque flat fill.
pub fn render_static<S: Surface>(surface: &mut S, palette: DirtPalette) {
    surface.clear();
    surface.fill(palette.fill);
}

/// One animation frame: flat fill, then every blob advanced and painted.
pub fn render_frame<S: Surface>(
    surface: &mut S,
    pool: &mut BlobPool,
    palette: DirtPalette,
    rng: &mut impl RandomSource,
) {
    render_static(surface, palette);
    pool.advance(rng);
    for blob in pool.blobs() {
        surface.fill_circle(blob.x, blob.y, blob.radius, palette.blob, blob.opacity);
    }
}
