use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::assets::fonts::{FontSet, TextBrushRgba8, TextLayoutEngine, TextWeight};
use crate::foundation::core::{Affine, BezPath, Rgba8};
use crate::foundation::error::{SlideshowError, SlideshowResult};
use crate::render::backend::{FrameRGBA, Rasterizer};
use crate::render::scene::{DrawOp, Scene};

#[derive(Clone)]
struct ImagePaint {
    // Held so the pointer key stays unique while cached.
    _source: Arc<PreparedImage>,
    paint: vello_cpu::Image,
    w: u32,
    h: u32,
}

#[derive(Clone)]
struct TextCache {
    layout: Arc<parley::Layout<TextBrushRgba8>>,
    font: vello_cpu::peniko::FontData,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct TextKey {
    text: String,
    size_bits: u32,
    color: [u8; 4],
    weight: TextWeight,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GradientKey {
    start: [u8; 4],
    end: [u8; 4],
    w: u32,
    h: u32,
}

/// [`Rasterizer`] built on `vello_cpu`, with parley for text.
///
/// Image paints, gradients and text layouts are cached across frames; a Ken Burns segment
/// re-rasterizes the same bitmap many times with only the transform changing.
pub struct CpuRasterizer {
    fonts: FontSet,
    ctx: Option<vello_cpu::RenderContext>,
    pixmap: Option<vello_cpu::Pixmap>,

    image_cache: HashMap<usize, ImagePaint>,
    gradient_cache: HashMap<GradientKey, vello_cpu::Image>,
    text_cache: HashMap<TextKey, TextCache>,
    font_data: HashMap<TextWeight, vello_cpu::peniko::FontData>,
    text_engine: TextLayoutEngine,
}

impl CpuRasterizer {
    /// Rasterizer drawing text with `fonts`. Non-blank text with no loaded face is an error.
    pub fn new(fonts: FontSet) -> Self {
        Self {
            fonts,
            ctx: None,
            pixmap: None,
            image_cache: HashMap::new(),
            gradient_cache: HashMap::new(),
            text_cache: HashMap::new(),
            font_data: HashMap::new(),
            text_engine: TextLayoutEngine::new(),
        }
    }

    /// Drop cached paints and layouts, e.g. between generation runs.
    pub fn clear_caches(&mut self) {
        self.image_cache.clear();
        self.gradient_cache.clear();
        self.text_cache.clear();
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> SlideshowResult<R>,
    ) -> SlideshowResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx);
        self.ctx = Some(ctx);
        out
    }

    fn image_paint_for(&mut self, image: &Arc<PreparedImage>) -> SlideshowResult<ImagePaint> {
        let key = Arc::as_ptr(image) as usize;
        if let Some(p) = self.image_cache.get(&key) {
            return Ok(p.clone());
        }
        let paint = rgba_premul_to_image(&image.rgba8_premul, image.width, image.height)?;
        let out = ImagePaint {
            _source: Arc::clone(image),
            paint,
            w: image.width,
            h: image.height,
        };
        self.image_cache.insert(key, out.clone());
        Ok(out)
    }

    fn gradient_paint(
        &mut self,
        start: Rgba8,
        end: Rgba8,
        w: u32,
        h: u32,
    ) -> SlideshowResult<vello_cpu::Image> {
        let key = GradientKey {
            start: start.to_array(),
            end: end.to_array(),
            w,
            h,
        };
        if let Some(img) = self.gradient_cache.get(&key).cloned() {
            return Ok(img);
        }

        // Axis from (0, 0) to (w, h); t is the projection of the pixel center onto it.
        let (wf, hf) = (w as f32, h as f32);
        let len2 = (wf * wf + hf * hf).max(1.0);
        let mut bytes = vec![0u8; (w as usize).saturating_mul(h as usize).saturating_mul(4)];
        for y in 0..h {
            for x in 0..w {
                let t = (((x as f32 + 0.5) * wf + (y as f32 + 0.5) * hf) / len2).clamp(0.0, 1.0);
                let lerp = |a: u8, b: u8| -> u8 {
                    let af = a as f32;
                    let bf = b as f32;
                    (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
                };
                let c = Rgba8 {
                    r: lerp(start.r, end.r),
                    g: lerp(start.g, end.g),
                    b: lerp(start.b, end.b),
                    a: lerp(start.a, end.a),
                };
                let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
                bytes[idx..idx + 4].copy_from_slice(&c.to_premul());
            }
        }
        let img = rgba_premul_to_image(&bytes, w, h)?;
        self.gradient_cache.insert(key, img.clone());
        Ok(img)
    }

    fn font_for(&mut self, weight: TextWeight) -> Option<vello_cpu::peniko::FontData> {
        if let Some(f) = self.font_data.get(&weight) {
            return Some(f.clone());
        }
        let bytes = self.fonts.bytes_for(weight)?;
        let font =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes.to_vec()), 0);
        self.font_data.insert(weight, font.clone());
        Some(font)
    }

    fn text_for(
        &mut self,
        text: &str,
        size_px: f32,
        color: Rgba8,
        weight: TextWeight,
    ) -> SlideshowResult<TextCache> {
        let key = TextKey {
            text: text.to_string(),
            size_bits: size_px.to_bits(),
            color: color.to_array(),
            weight,
        };
        if let Some(t) = self.text_cache.get(&key) {
            return Ok(t.clone());
        }

        let (Some(bytes), Some(font)) = (self.fonts.bytes_for(weight), self.font_for(weight))
        else {
            return Err(SlideshowError::render(format!("no font loaded to draw '{text}'")));
        };

        let brush = TextBrushRgba8 {
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        };
        let layout = self.text_engine.layout_plain(text, &bytes, size_px, brush)?;
        let out = TextCache {
            layout: Arc::new(layout),
            font,
        };
        self.text_cache.insert(key, out.clone());
        Ok(out)
    }

    fn draw_op(
        &mut self,
        op: &DrawOp,
        width: u32,
        height: u32,
        ctx: &mut vello_cpu::RenderContext,
    ) -> SlideshowResult<()> {
        let full = vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(width), f64::from(height));
        match op {
            DrawOp::Fill { color } => {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(cpu_color(*color));
                ctx.fill_rect(&full);
            }
            DrawOp::LinearGradient { start, end } => {
                let paint = self.gradient_paint(*start, *end, width, height)?;
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(paint);
                ctx.fill_rect(&full);
            }
            DrawOp::Image { image, transform } => {
                let p = self.image_paint_for(image)?;
                ctx.set_transform(affine_to_cpu(*transform));
                ctx.set_paint(p.paint);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(p.w),
                    f64::from(p.h),
                ));
            }
            DrawOp::Rect { rect, color } => {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(cpu_color(*color));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1));
            }
            DrawOp::Path { path, color } => {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(cpu_color(*color));
                ctx.fill_path(&bezpath_to_cpu(path));
            }
            DrawOp::Text {
                text,
                size_px,
                color,
                center_x,
                baseline_y,
                weight,
            } => {
                if text.trim().is_empty() {
                    return Ok(());
                }
                let t = self.text_for(text, *size_px, *color, *weight)?;
                let first_baseline = t
                    .layout
                    .lines()
                    .next()
                    .map(|l| f64::from(l.metrics().baseline))
                    .unwrap_or(0.0);
                let x0 = center_x - f64::from(t.layout.width()) / 2.0;
                let y0 = baseline_y - first_baseline;
                ctx.set_transform(affine_to_cpu(Affine::translate((x0, y0))));
                for line in t.layout.lines() {
                    for item in line.items() {
                        let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                            continue;
                        };
                        let brush = run.style().brush;
                        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                            brush.r, brush.g, brush.b, brush.a,
                        ));
                        let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                            id: g.id,
                            x: g.x,
                            y: g.y,
                        });
                        ctx.glyph_run(&t.font)
                            .font_size(run.run().font_size())
                            .fill_glyphs(glyphs);
                    }
                }
            }
        }
        Ok(())
    }
}

impl Rasterizer for CpuRasterizer {
    fn rasterize(&mut self, scene: &Scene, dst: &mut FrameRGBA) -> SlideshowResult<()> {
        let width_u16: u16 = dst
            .width
            .try_into()
            .map_err(|_| SlideshowError::render("surface width exceeds u16"))?;
        let height_u16: u16 = dst
            .height
            .try_into()
            .map_err(|_| SlideshowError::render("surface height exceeds u16"))?;
        if width_u16 == 0 || height_u16 == 0 {
            return Err(SlideshowError::render("surface has zero width or height"));
        }

        let mut pixmap = match self.pixmap.take() {
            Some(pm) if pm.width() == width_u16 && pm.height() == height_u16 => pm,
            _ => vello_cpu::Pixmap::new(width_u16, height_u16),
        };
        let (width, height) = (dst.width, dst.height);

        let result = self.with_ctx_mut(width_u16, height_u16, |this, ctx| {
            for op in &scene.ops {
                this.draw_op(op, width, height, ctx)?;
            }
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        });

        if result.is_ok() {
            let src = pixmap.data_as_u8_slice();
            if dst.data.len() == src.len() {
                dst.data.copy_from_slice(src);
            } else {
                dst.data = src.to_vec();
            }
            dst.premultiplied = true;
        }
        self.pixmap = Some(pixmap);
        result
    }
}

fn cpu_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> SlideshowResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| SlideshowError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| SlideshowError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(SlideshowError::render("pixmap byte len mismatch"));
    }
    let pixels: Vec<vello_cpu::peniko::color::PremulRgba8> = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect();
    let opaque = bytes.chunks_exact(4).all(|px| px[3] == 255);
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, !opaque))
}

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> SlideshowResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
