use crate::foundation::core::FrameIndex;
use crate::foundation::math::clamp_unit;

/// Map normalized scroll progress to the frame shown at that progress.
///
/// `index = round(progress * (frame_count - 1))`, clamped to `[0, frame_count - 1]`. Out-of-range and
/// NaN progress are clamped first, so the result is monotonic non-decreasing in `progress`.
/// Empty and single-frame sequences always map to frame 0.
pub fn map_progress_to_index(progress: f64, frame_count: u32) -> FrameIndex {
    let last = frame_count.saturating_sub(1);
    if last == 0 {
        return FrameIndex(0);
    }
    let raw = (clamp_unit(progress) * f64::from(last)).round();
    FrameIndex((raw as u32).min(last))
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/mapper.rs"]
mod tests;
