//! Stylize capability - polygon approximation.
//!
//! Rebuilds an image as a bounded number of triangles, each chosen by
//! random-restart hill climbing to minimize squared reconstruction error
//! against the target. The per-step candidate search fans out across
//! workers with rayon; the parallelism is contained entirely within one
//! request and produces a single result.

use image::{imageops::FilterType, DynamicImage, GenericImageView, Rgba, RgbaImage};
use pictor_core::AppError;
use rand::Rng;
use rayon::prelude::*;

/// Default shape budget when `times` is absent or zero.
pub const DEFAULT_SHAPE_BUDGET: u32 = 128;

/// Fixed blend alpha for every shape (out of 255).
const SHAPE_ALPHA: u32 = 128;
const RESTARTS_PER_WORKER: usize = 4;
const CLIMB_STEPS: usize = 30;
const MUTATE_RANGE: i32 = 16;

/// Polygon-approximation engine used by the stylize operation.
pub trait Approximate: Send + Sync {
    /// Approximate `img` with `shapes` shapes, searching candidates across
    /// `workers` parallel workers. A `shapes` of 0 selects the default
    /// budget.
    fn approximate(
        &self,
        img: &DynamicImage,
        shapes: u32,
        workers: usize,
    ) -> Result<DynamicImage, AppError>;
}

#[derive(Debug, Clone, Copy)]
struct Triangle {
    ax: i32,
    ay: i32,
    bx: i32,
    by: i32,
    cx: i32,
    cy: i32,
}

impl Triangle {
    fn random(width: u32, height: u32, rng: &mut impl Rng) -> Self {
        let mut point = || {
            (
                rng.random_range(0..width as i32),
                rng.random_range(0..height as i32),
            )
        };
        let (ax, ay) = point();
        let (bx, by) = point();
        let (cx, cy) = point();
        Triangle {
            ax,
            ay,
            bx,
            by,
            cx,
            cy,
        }
    }

    /// Jitter one vertex, keeping it inside the image bounds.
    fn mutate(&self, width: u32, height: u32, rng: &mut impl Rng) -> Self {
        let mut next = *self;
        let dx = rng.random_range(-MUTATE_RANGE..=MUTATE_RANGE);
        let dy = rng.random_range(-MUTATE_RANGE..=MUTATE_RANGE);
        let clamp_x = |v: i32| v.clamp(0, width as i32 - 1);
        let clamp_y = |v: i32| v.clamp(0, height as i32 - 1);
        match rng.random_range(0..3) {
            0 => {
                next.ax = clamp_x(next.ax + dx);
                next.ay = clamp_y(next.ay + dy);
            }
            1 => {
                next.bx = clamp_x(next.bx + dx);
                next.by = clamp_y(next.by + dy);
            }
            _ => {
                next.cx = clamp_x(next.cx + dx);
                next.cy = clamp_y(next.cy + dy);
            }
        }
        next
    }

    /// Pixels covered by the triangle, via edge-function tests over the
    /// bounding box.
    fn covered(&self, width: u32, height: u32) -> Vec<(u32, u32)> {
        let min_x = self.ax.min(self.bx).min(self.cx).max(0);
        let max_x = self.ax.max(self.bx).max(self.cx).min(width as i32 - 1);
        let min_y = self.ay.min(self.by).min(self.cy).max(0);
        let max_y = self.ay.max(self.by).max(self.cy).min(height as i32 - 1);

        let edge = |x0: i32, y0: i32, x1: i32, y1: i32, px: i32, py: i32| {
            (px - x0) as i64 * (y1 - y0) as i64 - (py - y0) as i64 * (x1 - x0) as i64
        };

        let mut pixels = Vec::new();
        for py in min_y..=max_y {
            for px in min_x..=max_x {
                let d1 = edge(self.ax, self.ay, self.bx, self.by, px, py);
                let d2 = edge(self.bx, self.by, self.cx, self.cy, px, py);
                let d3 = edge(self.cx, self.cy, self.ax, self.ay, px, py);
                let has_neg = d1 < 0 || d2 < 0 || d3 < 0;
                let has_pos = d1 > 0 || d2 > 0 || d3 > 0;
                if !(has_neg && has_pos) {
                    pixels.push((px as u32, py as u32));
                }
            }
        }
        pixels
    }
}

/// A scored shape: the error change it would cause if composited.
struct Candidate {
    tri: Triangle,
    color: Rgba<u8>,
    delta: i64,
}

fn blend(base: &Rgba<u8>, top: Rgba<u8>) -> Rgba<u8> {
    let mix =
        |b: u8, t: u8| (((b as u32) * (255 - SHAPE_ALPHA) + (t as u32) * SHAPE_ALPHA) / 255) as u8;
    Rgba([
        mix(base[0], top[0]),
        mix(base[1], top[1]),
        mix(base[2], top[2]),
        255,
    ])
}

fn pixel_error(a: &Rgba<u8>, b: &Rgba<u8>) -> i64 {
    let mut err = 0i64;
    for i in 0..3 {
        let d = a[i] as i64 - b[i] as i64;
        err += d * d;
    }
    err
}

fn average_color(img: &RgbaImage) -> Rgba<u8> {
    let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
    for p in img.pixels() {
        r += p[0] as u64;
        g += p[1] as u64;
        b += p[2] as u64;
    }
    let n = (img.width() as u64 * img.height() as u64).max(1);
    Rgba([(r / n) as u8, (g / n) as u8, (b / n) as u8, 255])
}

/// Score a triangle: its color is the average target color under it, its
/// delta the error change over the covered pixels only.
fn evaluate(tri: Triangle, target: &RgbaImage, canvas: &RgbaImage) -> Candidate {
    let pixels = tri.covered(target.width(), target.height());
    if pixels.is_empty() {
        return Candidate {
            tri,
            color: Rgba([0, 0, 0, 255]),
            delta: 0,
        };
    }

    let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
    for &(x, y) in &pixels {
        let p = target.get_pixel(x, y);
        r += p[0] as u64;
        g += p[1] as u64;
        b += p[2] as u64;
    }
    let n = pixels.len() as u64;
    let color = Rgba([(r / n) as u8, (g / n) as u8, (b / n) as u8, 255]);

    let mut delta = 0i64;
    for &(x, y) in &pixels {
        let want = target.get_pixel(x, y);
        let have = canvas.get_pixel(x, y);
        delta += pixel_error(&blend(have, color), want) - pixel_error(have, want);
    }

    Candidate { tri, color, delta }
}

/// One worker's search: a few random restarts, each hill-climbed.
fn search(target: &RgbaImage, canvas: &RgbaImage, rng: &mut impl Rng) -> Candidate {
    let (width, height) = target.dimensions();
    let mut best: Option<Candidate> = None;
    for _ in 0..RESTARTS_PER_WORKER {
        let mut current = evaluate(Triangle::random(width, height, rng), target, canvas);
        for _ in 0..CLIMB_STEPS {
            let mutated = evaluate(current.tri.mutate(width, height, rng), target, canvas);
            if mutated.delta < current.delta {
                current = mutated;
            }
        }
        if best.as_ref().map_or(true, |b| current.delta < b.delta) {
            best = Some(current);
        }
    }
    best.expect("at least one restart ran")
}

/// Canvas size rule: the larger dimension is scaled to the source height.
fn canvas_dimensions(width: u32, height: u32) -> (u32, u32) {
    let size = height.max(1);
    if width >= height {
        let scaled = ((size as f32 * height as f32 / width as f32).round() as u32).max(1);
        (size, scaled)
    } else {
        let scaled = ((size as f32 * width as f32 / height as f32).round() as u32).max(1);
        (scaled, size)
    }
}

/// Production stylizer: triangles, hill climbing, rayon-parallel search.
pub struct TriangleStylizer;

impl Approximate for TriangleStylizer {
    fn approximate(
        &self,
        img: &DynamicImage,
        shapes: u32,
        workers: usize,
    ) -> Result<DynamicImage, AppError> {
        let shapes = if shapes == 0 {
            DEFAULT_SHAPE_BUDGET
        } else {
            shapes
        };
        let workers = workers.max(1);

        let (orig_width, orig_height) = img.dimensions();
        if orig_width == 0 || orig_height == 0 {
            return Err(AppError::InvalidParameter(
                "cannot stylize an empty image".to_string(),
            ));
        }

        let (width, height) = canvas_dimensions(orig_width, orig_height);
        let target = img
            .resize_exact(width, height, FilterType::Triangle)
            .to_rgba8();
        let mut canvas = RgbaImage::from_pixel(width, height, average_color(&target));

        for step in 0..shapes {
            let best = (0..workers)
                .into_par_iter()
                .map(|_| {
                    let mut rng = rand::rng();
                    search(&target, &canvas, &mut rng)
                })
                .min_by_key(|c| c.delta);

            match best {
                Some(candidate) if candidate.delta < 0 => {
                    for (x, y) in candidate.tri.covered(width, height) {
                        let blended = blend(canvas.get_pixel(x, y), candidate.color);
                        canvas.put_pixel(x, y, blended);
                    }
                }
                _ => tracing::trace!(step, "no improving shape this step"),
            }
        }

        Ok(DynamicImage::ImageRgba8(canvas))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 8) as u8, (y * 8) as u8, 64, 255])
        }))
    }

    fn total_error(a: &RgbaImage, b: &RgbaImage) -> i64 {
        a.pixels()
            .zip(b.pixels())
            .map(|(p, q)| pixel_error(p, q))
            .sum()
    }

    #[test]
    fn test_canvas_dimensions() {
        assert_eq!(canvas_dimensions(16, 16), (16, 16));
        assert_eq!(canvas_dimensions(200, 100), (100, 50));
        assert_eq!(canvas_dimensions(100, 200), (100, 200));
    }

    #[test]
    fn test_triangle_covered() {
        let tri = Triangle {
            ax: 0,
            ay: 0,
            bx: 4,
            by: 0,
            cx: 0,
            cy: 4,
        };
        let pixels = tri.covered(8, 8);
        assert!(pixels.contains(&(0, 0)));
        assert!(pixels.contains(&(4, 0)));
        assert!(!pixels.contains(&(7, 7)));
    }

    #[test]
    fn test_blend_half_alpha() {
        let mixed = blend(&Rgba([0, 0, 0, 255]), Rgba([255, 255, 255, 255]));
        assert_eq!(mixed.0[0], 128);
    }

    #[test]
    fn test_approximate_square_keeps_dimensions() {
        let out = TriangleStylizer
            .approximate(&gradient(16, 16), 3, 2)
            .unwrap();
        assert_eq!(out.dimensions(), (16, 16));
    }

    #[test]
    fn test_approximate_landscape_uses_height_derived_canvas() {
        let out = TriangleStylizer
            .approximate(&gradient(32, 16), 2, 1)
            .unwrap();
        assert_eq!(out.dimensions(), (16, 8));
    }

    #[test]
    fn test_shapes_never_increase_error() {
        let img = gradient(16, 16);
        let target = img.to_rgba8();
        let flat = RgbaImage::from_pixel(16, 16, average_color(&target));

        let out = TriangleStylizer.approximate(&img, 8, 2).unwrap().to_rgba8();
        assert!(total_error(&out, &target) <= total_error(&flat, &target));
    }
}
