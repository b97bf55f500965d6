use crate::foundation::error::{ReelError, ReelResult};

pub use kurbo::{Affine, Rect, Vec2};

/// Position of a frame within a frame sequence (0-based, contiguous).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u32);

impl FrameIndex {
    /// Index usable for slice access.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Position of this frame within a sequence of `frame_count` frames, in `[0, 1]`.
    ///
    /// Single-frame sequences always sit at `0`.
    pub fn position_in(self, frame_count: u32) -> f64 {
        if frame_count <= 1 {
            return 0.0;
        }
        let last = f64::from(frame_count - 1);
        (f64::from(self.0) / last).clamp(0.0, 1.0)
    }
}

/// Pixel dimensions of the visible viewport (and of the drawing surface that mirrors it).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> ReelResult<Self> {
        if width == 0 || height == 0 {
            return Err(ReelError::validation(format!(
                "viewport must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
