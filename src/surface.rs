// Drawing seam for the dirt layer, and a software RGBA8 surface behind the same trait

use crate::color::Rgb;

pub trait Surface {
    /// Whatever the backend can blit as a full-surface dirt image.
    type Image;

    /// Logical resolution in pixels.
    fn size(&self) -> (u32, u32);
    /// Make every pixel fully transparent.
    fn clear(&mut self);
    /// Paint the whole surface with an opaque color.
    fn fill(&mut self, color: Rgb);
    /// Source-over filled circle; anything off-surface is clipped.
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgb, alpha: f64);
    /// Clear alpha to zero inside the circle (destination-out with an opaque source).
    fn erase_circle(&mut self, x: f64, y: f64, radius: f64);
    /// Stretch `image` over the whole surface.
    fn draw_image(&mut self, image: &Self::Image);
}

/// Software RGBA8 surface, row-major, straight (non-premultiplied) alpha.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelSurface {
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize) * 4],
        }
    }

    /// A fully opaque surface of one color, handy as a dirt image.
    pub fn solid(width: u32, height: u32, color: Rgb) -> Self {
        let mut s = Self::with_size(width, height);
        s.fill(color);
        s
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + x as usize) * 4
    }

    /// `[r, g, b, a]` at `(x, y)`, or `None` out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let o = self.offset(x, y);
        Some([
            self.pixels[o],
            self.pixels[o + 1],
            self.pixels[o + 2],
            self.pixels[o + 3],
        ])
    }

    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        self.pixel(x, y).map(|p| p[3])
    }

    /// Pixels with zero alpha; the engine itself never reads pixels back.
    #[cfg(test)]
    pub(crate) fn transparent_count(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|p| p[3] == 0).count()
    }

    /// Visit every pixel whose center lies inside the circle, clipped to bounds.
    fn for_each_in_circle(&mut self, cx: f64, cy: f64, radius: f64, mut f: impl FnMut(&mut [u8])) {
        if radius <= 0.0 || self.width == 0 || self.height == 0 {
            return;
        }
        let x0 = (cx - radius).floor().max(0.0);
        let y0 = (cy - radius).floor().max(0.0);
        let x1 = (cx + radius).ceil().min(self.width as f64 - 1.0);
        let y1 = (cy + radius).ceil().min(self.height as f64 - 1.0);
        if x0 > x1 || y0 > y1 {
            return;
        }
        let r2 = radius * radius;
        for py in (y0 as u32)..=(y1 as u32) {
            let dy = py as f64 + 0.5 - cy;
            for px in (x0 as u32)..=(x1 as u32) {
                let dx = px as f64 + 0.5 - cx;
                if dx * dx + dy * dy <= r2 {
                    let o = self.offset(px, py);
                    f(&mut self.pixels[o..o + 4]);
                }
            }
        }
    }
}

fn blend_over(dst: &mut [u8], color: Rgb, alpha: f64) {
    let sa = alpha.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f64 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let mix = |s: u8, d: u8| {
        let v = (s as f64 * sa + d as f64 * da * (1.0 - sa)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    dst[0] = mix(color.r, dst[0]);
    dst[1] = mix(color.g, dst[1]);
    dst[2] = mix(color.b, dst[2]);
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

impl Surface for PixelSurface {
    type Image = PixelSurface;

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.pixels.fill(0);
    }

    fn fill(&mut self, color: Rgb) {
        for p in self.pixels.chunks_exact_mut(4) {
            p.copy_from_slice(&[color.r, color.g, color.b, 255]);
        }
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgb, alpha: f64) {
        self.for_each_in_circle(x, y, radius, |p| blend_over(p, color, alpha));
    }

    fn erase_circle(&mut self, x: f64, y: f64, radius: f64) {
        self.for_each_in_circle(x, y, radius, |p| p.fill(0));
    }

    fn draw_image(&mut self, image: &PixelSurface) {
        if image.width == 0 || image.height == 0 {
            return;
        }
        // nearest-neighbour stretch
        for y in 0..self.height {
            let sy = ((y as u64 * image.height as u64) / self.height as u64) as u32;
            for x in 0..self.width {
                let sx = ((x as u64 * image.width as u64) / self.width as u64) as u32;
                let src = image.offset(sx, sy);
                let dst = self.offset(x, y);
                // drawImage is source-over too; dirt images are expected opaque
                let a = image.pixels[src + 3] as f64 / 255.0;
                let c = Rgb {
                    r: image.pixels[src],
                    g: image.pixels[src + 1],
                    b: image.pixels[src + 2],
                };
                blend_over(&mut self.pixels[dst..dst + 4], c, a);
            }
        }
    }
}
