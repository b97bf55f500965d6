use std::sync::Arc;

use crate::assets::decode::FrameImage;
use crate::foundation::core::{Affine, Rect};
use crate::foundation::error::{ReelError, ReelResult};

/// A composited surface read back as RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// 2D pixel surface the compositor draws onto.
///
/// The size may change between composite calls (viewport resize); implementations report the
/// current size and draw in that coordinate space. Any method may fail with
/// [`ReelError::Surface`] when the underlying pixels cannot be acquired.
pub trait DrawSurface {
    /// Current `(width, height)` in pixels.
    fn size(&self) -> (u32, u32);

    /// Resize to match the viewport. Existing contents are discarded.
    fn resize(&mut self, width: u32, height: u32) -> ReelResult<()>;

    /// Clear the whole surface to transparent.
    fn clear(&mut self) -> ReelResult<()>;

    /// Draw `image` scaled into `dest` (surface pixel coordinates, may extend past the edges).
    fn draw_image(&mut self, image: &FrameImage, dest: Rect) -> ReelResult<()>;
}

/// CPU surface backed by a `vello_cpu` pixmap.
pub struct CpuSurface {
    width: u32,
    height: u32,
    pixmap: Option<vello_cpu::Pixmap>,
    ctx: Option<vello_cpu::RenderContext>,
    paint_cache: Option<(Arc<Vec<u8>>, vello_cpu::Image)>,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("available", &self.pixmap.is_some())
            .finish()
    }
}

impl CpuSurface {
    /// Create a surface of `width x height`.
    ///
    /// A zero-sized surface is allowed but unavailable: drawing on it fails until it is resized.
    pub fn new(width: u32, height: u32) -> ReelResult<Self> {
        let mut s = Self {
            width: 0,
            height: 0,
            pixmap: None,
            ctx: None,
            paint_cache: None,
        };
        s.resize(width, height)?;
        Ok(s)
    }

    /// Read back the current pixels (premultiplied RGBA8).
    pub fn frame_rgba(&self) -> ReelResult<FrameRGBA> {
        let pixmap = self.pixmap()?;
        Ok(FrameRGBA {
            width: self.width,
            height: self.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn pixmap(&self) -> ReelResult<&vello_cpu::Pixmap> {
        self.pixmap
            .as_ref()
            .ok_or_else(|| ReelError::surface("surface has no pixels (zero-sized)"))
    }

    fn paint_for(&mut self, image: &FrameImage) -> ReelResult<vello_cpu::Image> {
        if let Some((bytes, paint)) = &self.paint_cache
            && Arc::ptr_eq(bytes, &image.rgba8_premul)
        {
            return Ok(paint.clone());
        }
        let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, image.width, image.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.paint_cache = Some((Arc::clone(&image.rgba8_premul), paint.clone()));
        Ok(paint)
    }
}

impl DrawSurface for CpuSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) -> ReelResult<()> {
        self.width = width;
        self.height = height;
        self.ctx = None;
        self.pixmap = None;
        if width == 0 || height == 0 {
            return Ok(());
        }
        let (w, h) = surface_dims_u16(width, height)?;
        self.pixmap = Some(vello_cpu::Pixmap::new(w, h));
        Ok(())
    }

    fn clear(&mut self) -> ReelResult<()> {
        let pixmap = self
            .pixmap
            .as_mut()
            .ok_or_else(|| ReelError::surface("cannot clear a zero-sized surface"))?;
        pixmap.data_as_u8_slice_mut().fill(0);
        Ok(())
    }

    fn draw_image(&mut self, image: &FrameImage, dest: Rect) -> ReelResult<()> {
        if !image.has_natural_size() {
            return Err(ReelError::asset("image has zero natural size"));
        }
        let paint = self.paint_for(image)?;
        let (w, h) = surface_dims_u16(self.width, self.height)?;
        let mut pixmap = self
            .pixmap
            .take()
            .ok_or_else(|| ReelError::surface("cannot draw on a zero-sized surface"))?;

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();

        let iw = f64::from(image.width);
        let ih = f64::from(image.height);
        let tr = Affine::translate((dest.x0, dest.y0))
            * Affine::scale_non_uniform(dest.width() / iw, dest.height() / ih);
        ctx.set_transform(affine_to_cpu(tr));
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        self.ctx = Some(ctx);
        self.pixmap = Some(pixmap);
        Ok(())
    }
}

fn surface_dims_u16(width: u32, height: u32) -> ReelResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ReelError::surface(format!("surface width {width} exceeds u16")))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ReelError::surface(format!("surface height {height} exceeds u16")))?;
    Ok((w, h))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ReelResult<vello_cpu::Pixmap> {
    let (w, h) = surface_dims_u16(width, height)?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ReelError::surface("pixmap byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
