use crate::assets::decode::FrameImage;
use crate::assets::preload::{FrameDescriptor, FrameState};
use crate::foundation::core::{FrameIndex, Rect};
use crate::foundation::math::{clamp_unit, lerp};
use crate::render::surface::DrawSurface;
use crate::sequence::mapper::map_progress_to_index;

/// Where a frame lands on the surface after cover-fit scaling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Horizontal offset of the scaled image's left edge.
    pub shift_x: f64,
    /// Vertical offset of the scaled image's top edge.
    pub shift_y: f64,
    /// Scaled width.
    pub width: f64,
    /// Scaled height.
    pub height: f64,
}

impl Placement {
    /// Destination rectangle in surface coordinates.
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.shift_x,
            self.shift_y,
            self.shift_x + self.width,
            self.shift_y + self.height,
        )
    }
}

/// Cover-fit `image_w x image_h` onto `surface_w x surface_h`.
///
/// The image is always centered horizontally. When the scaled image is taller than the surface it
/// is panned vertically from top-aligned (`pan = 0`) to bottom-aligned (`pan = 1`); otherwise it is
/// centered vertically.
pub fn cover_placement(
    surface_w: f64,
    surface_h: f64,
    image_w: f64,
    image_h: f64,
    pan: f64,
) -> Placement {
    let ratio = (surface_w / image_w).max(surface_h / image_h);
    let width = image_w * ratio;
    let height = image_h * ratio;

    let shift_x = (surface_w - width) / 2.0;
    let shift_y = if height > surface_h {
        lerp(0.0, surface_h - height, clamp_unit(pan))
    } else {
        (surface_h - height) / 2.0
    };

    Placement {
        shift_x,
        shift_y,
        width,
        height,
    }
}

/// Placement of frame `index` of a `frame_count` sequence; the pan follows the frame's position in
/// the sequence rather than raw scroll progress.
pub fn frame_placement(
    surface: (u32, u32),
    image: &FrameImage,
    index: FrameIndex,
    frame_count: u32,
) -> Placement {
    cover_placement(
        f64::from(surface.0),
        f64::from(surface.1),
        f64::from(image.width),
        f64::from(image.height),
        index.position_in(frame_count),
    )
}

/// Result of one [`CanvasCompositor::composite`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CompositeOutcome {
    /// The frame was drawn at `placement`.
    Drawn {
        /// Frame that was drawn.
        index: FrameIndex,
        /// Where it was drawn.
        placement: Placement,
    },
    /// The mapped frame is not ready (`Pending`, `Loading` or `Failed`); the surface was left
    /// untouched so the previous frame stays visible.
    NotReady {
        /// Frame that was requested.
        index: FrameIndex,
        /// Its state at the time of the call.
        state: FrameState,
    },
    /// The frame set is empty.
    NoFrames,
    /// The surface could not be drawn on; retry on the next update.
    SurfaceUnavailable,
}

/// Draws the frame matching the current scroll progress.
///
/// Errors are absorbed: a missed frame is a visual imperfection, so every failure is logged and
/// reported as a [`CompositeOutcome`] instead of being propagated.
#[derive(Debug, Default)]
pub struct CanvasCompositor {
    last_drawn: Option<FrameIndex>,
    drawn: u64,
    skipped: u64,
    surface_failures: u64,
}

impl CanvasCompositor {
    /// Create a compositor with no frame drawn yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last frame successfully drawn (the one currently visible).
    pub fn last_drawn(&self) -> Option<FrameIndex> {
        self.last_drawn
    }

    /// `(drawn, skipped, surface_failures)` counters.
    pub fn counters(&self) -> (u64, u64, u64) {
        (self.drawn, self.skipped, self.surface_failures)
    }

    /// Map `progress` to a frame and draw it onto `surface`, replacing the previous drawing.
    #[tracing::instrument(level = "trace", skip(self, surface, frames))]
    pub fn composite(
        &mut self,
        surface: &mut dyn DrawSurface,
        frames: &[FrameDescriptor],
        progress: f64,
    ) -> CompositeOutcome {
        if frames.is_empty() {
            return CompositeOutcome::NoFrames;
        }
        let frame_count = frames.len() as u32;
        let index = map_progress_to_index(progress, frame_count);
        let desc = &frames[index.as_usize()];

        let Some(image) = desc.ready_image() else {
            self.skipped += 1;
            tracing::debug!(index = index.0, state = ?desc.state, "frame not ready; keeping previous frame");
            return CompositeOutcome::NotReady {
                index,
                state: desc.state,
            };
        };

        let size = surface.size();
        if size.0 == 0 || size.1 == 0 {
            self.surface_failures += 1;
            tracing::warn!("drawing surface is zero-sized; skipping render pass");
            return CompositeOutcome::SurfaceUnavailable;
        }

        let placement = frame_placement(size, image, index, frame_count);
        let drawn = surface
            .clear()
            .and_then(|()| surface.draw_image(image, placement.rect()));
        if let Err(e) = drawn {
            self.surface_failures += 1;
            tracing::warn!(index = index.0, error = %e, "composite failed; retrying on next update");
            return CompositeOutcome::SurfaceUnavailable;
        }

        self.drawn += 1;
        self.last_drawn = Some(index);
        CompositeOutcome::Drawn { index, placement }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
