use std::path::Path;

use anyhow::Context;
use glam::{Vec2, Vec3};
use image::{Rgb, RgbImage};
use mesh_scatter::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a stdout subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Top-down (XY) rendering settings.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    /// World-space XY rectangle mapped onto the image.
    pub min: Vec2,
    pub max: Vec2,
    pub background: [u8; 3],
    /// Vertex dots are blended from `low` to `high` by field value.
    pub field_low: [u8; 3],
    pub field_high: [u8; 3],
    pub instance_fill: [u8; 3],
    pub instance_outline: [u8; 3],
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32), min: Vec2, max: Vec2) -> Self {
        Self {
            image_size,
            min,
            max,
            background: [24, 24, 28],
            field_low: [70, 70, 80],
            field_high: [240, 240, 240],
            instance_fill: [40, 120, 240],
            instance_outline: [200, 230, 255],
        }
    }

    /// Frames the whole surface with a margin of `margin` world units.
    pub fn fit_surface(image_size: (u32, u32), surface: &Surface, margin: f32) -> Self {
        let origin = surface.origin().truncate();
        let (min, max) = surface.vertices().iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(lo, hi), v| {
                let p = origin + v.position.truncate();
                (lo.min(p), hi.max(p))
            },
        );
        if !min.is_finite() || !max.is_finite() {
            return Self::new(image_size, Vec2::ZERO, Vec2::ONE);
        }
        Self::new(image_size, min - margin, max + margin)
    }

    pub fn with_background(mut self, rgb: [u8; 3]) -> Self {
        self.background = rgb;
        self
    }

    pub fn with_instance_colors(mut self, fill: [u8; 3], outline: [u8; 3]) -> Self {
        self.instance_fill = fill;
        self.instance_outline = outline;
        self
    }

    fn to_pixel(&self, p: Vec2) -> (i64, i64) {
        let extent = (self.max - self.min).max(Vec2::splat(f32::EPSILON));
        let t = (p - self.min) / extent;
        let (w, h) = self.image_size;
        let x = (t.x * (w.saturating_sub(1)) as f32).round() as i64;
        // Image rows grow downward; world Y grows upward.
        let y = ((1.0 - t.y) * (h.saturating_sub(1)) as f32).round() as i64;
        (x, y)
    }
}

/// Renders surface vertices and instance footprints, top-down, to a PNG file.
pub fn render_instances_to_png(
    surface: &Surface,
    field: Option<&ScalarField>,
    instances: &[Instance],
    rc: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let (w, h) = rc.image_size;
    let mut img = RgbImage::from_pixel(w, h, Rgb(rc.background));
    let origin = surface.origin();

    for (i, v) in surface.vertices().iter().enumerate() {
        let t = field.map_or(0.0, |f| f.value(i as u32)).clamp(0.0, 1.0);
        let color = lerp_rgb(rc.field_low, rc.field_high, t);
        let (x, y) = rc.to_pixel((origin + v.position).truncate());
        fill_rect(&mut img, (x - 1, y - 1), (x + 1, y + 1), color);
    }

    for instance in instances {
        let Some(aabb) = instance.bounds.root_aabb() else {
            continue;
        };
        let (x0, y1) = rc.to_pixel(aabb.min.truncate());
        let (x1, y0) = rc.to_pixel(aabb.max.truncate());
        fill_rect(&mut img, (x0, y0), (x1, y1), rc.instance_fill);
        outline_rect(&mut img, (x0, y0), (x1, y1), rc.instance_outline);

        let (cx, cy) = rc.to_pixel(instance.pose.translation.truncate());
        let up = instance.pose.rotation * Vec3::Z;
        let (tx, ty) = rc.to_pixel((instance.pose.translation + up * 0.5).truncate());
        draw_line(&mut img, (cx, cy), (tx, ty), rc.instance_outline);
    }

    let path = path.as_ref();
    img.save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("Wrote {} instances to {}.", instances.len(), path.display());
    Ok(())
}

fn lerp_rgb(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    std::array::from_fn(|i| (a[i] as f32 + (b[i] as f32 - a[i] as f32) * t).round() as u8)
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: [u8; 3]) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, Rgb(color));
    }
}

fn fill_rect(img: &mut RgbImage, a: (i64, i64), b: (i64, i64), color: [u8; 3]) {
    for y in a.1.min(b.1)..=a.1.max(b.1) {
        for x in a.0.min(b.0)..=a.0.max(b.0) {
            put(img, x, y, color);
        }
    }
}

fn outline_rect(img: &mut RgbImage, a: (i64, i64), b: (i64, i64), color: [u8; 3]) {
    let (x0, x1) = (a.0.min(b.0), a.0.max(b.0));
    let (y0, y1) = (a.1.min(b.1), a.1.max(b.1));
    for x in x0..=x1 {
        put(img, x, y0, color);
        put(img, x, y1, color);
    }
    for y in y0..=y1 {
        put(img, x0, y, color);
        put(img, x1, y, color);
    }
}

fn draw_line(img: &mut RgbImage, a: (i64, i64), b: (i64, i64), color: [u8; 3]) {
    let steps = (b.0 - a.0).abs().max((b.1 - a.1).abs()).max(1);
    for s in 0..=steps {
        let t = s as f32 / steps as f32;
        let x = a.0 as f32 + (b.0 - a.0) as f32 * t;
        let y = a.1 as f32 + (b.1 - a.1) as f32 * t;
        put(img, x.round() as i64, y.round() as i64, color);
    }
}
