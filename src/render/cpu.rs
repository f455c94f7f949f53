use std::sync::Arc;

use crate::assets::PreparedImage;
use crate::compose::{BackgroundLayer, CaptionLayer, VisualClip};
use crate::foundation::core::{Affine, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::backend::{FrameRGBA, RenderBackend, check_frame_index};

/// CPU raster backend.
///
/// The background paint is built once per image and reused across frames.
#[derive(Default)]
pub struct CpuBackend {
    image_cache: Option<(usize, vello_cpu::Image)>,
}

impl CpuBackend {
    /// Create a backend with an empty paint cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn image_paint_for(&mut self, img: &PreparedImage) -> ReelResult<vello_cpu::Image> {
        let key = Arc::as_ptr(&img.rgba8_premul) as usize;
        if let Some((cached, paint)) = &self.image_cache
            && *cached == key
        {
            return Ok(paint.clone());
        }

        let pixmap =
            image_premul_bytes_to_pixmap(img.rgba8_premul.as_slice(), img.width, img.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.image_cache = Some((key, paint.clone()));
        Ok(paint)
    }
}

impl RenderBackend for CpuBackend {
    fn render_frame(&mut self, clip: &VisualClip, idx: FrameIndex) -> ReelResult<FrameRGBA> {
        check_frame_index(clip, idx)?;
        let width: u16 = clip
            .canvas
            .width
            .try_into()
            .map_err(|_| ReelError::render("canvas width exceeds u16"))?;
        let height: u16 = clip
            .canvas
            .height
            .try_into()
            .map_err(|_| ReelError::render("canvas height exceeds u16"))?;

        let t = clip.time_at(idx);
        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match &clip.background {
            BackgroundLayer::Solid(rgb) => {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(rgb.r, rgb.g, rgb.b, 255));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(width),
                    f64::from(height),
                ));
            }
            BackgroundLayer::Image(img) => {
                let paint = self.image_paint_for(img)?;
                let transform = clip
                    .background_transform(t)
                    .ok_or_else(|| ReelError::render("image background without a transform"))?;
                ctx.set_transform(affine_to_cpu(transform));
                ctx.set_paint(paint);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(img.width),
                    f64::from(img.height),
                ));
            }
        }

        if let Some(caption) = &clip.caption {
            let opacity = clip.caption_opacity(t);
            if opacity > 0.0 {
                draw_caption(&mut ctx, caption, opacity);
            }
        }

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: clip.canvas.width,
            height: clip.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn draw_caption(ctx: &mut vello_cpu::RenderContext, caption: &CaptionLayer, opacity: f32) {
    ctx.set_transform(affine_to_cpu(Affine::translate(caption.origin)));

    // Outline and fill share one layer so the fade does not reveal the overlap.
    if opacity < 1.0 {
        ctx.push_opacity_layer(opacity);
    }

    let stroke = caption.stroke;
    for line in caption.layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let font_size = run.run().font_size();
            let glyphs: Vec<vello_cpu::Glyph> = run
                .positioned_glyphs()
                .map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                })
                .collect();

            if caption.stroke_width > 0.0 {
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(caption.stroke_width));
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    stroke.r, stroke.g, stroke.b, 255,
                ));
                ctx.glyph_run(&caption.font)
                    .font_size(font_size)
                    .stroke_glyphs(glyphs.iter().copied());
            }

            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            ctx.glyph_run(&caption.font)
                .font_size(font_size)
                .fill_glyphs(glyphs.into_iter());
        }
    }

    if opacity < 1.0 {
        ctx.pop_layer();
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> ReelResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ReelError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ReelError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(ReelError::render("prepared image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
