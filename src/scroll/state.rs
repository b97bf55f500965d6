use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::clamp_unit;

/// Direction of the most recent scroll motion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    /// Scrolling down / towards the end of the page.
    Forward,
    /// Scrolling up / towards the start of the page.
    Backward,
    /// No recent motion.
    #[default]
    None,
}

impl ScrollDirection {
    /// Convert the host's `+1 / -1 / 0` indicator; only the sign matters.
    pub fn from_sign(sign: i32) -> Self {
        match sign.signum() {
            1 => Self::Forward,
            -1 => Self::Backward,
            _ => Self::None,
        }
    }

    /// Direction of travel from `from` to `to`.
    pub fn between(from: f64, to: f64) -> Self {
        if to > from {
            Self::Forward
        } else if to < from {
            Self::Backward
        } else {
            Self::None
        }
    }
}

/// One notification from the scroll-progress source.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollUpdate {
    /// Raw scroll offset in pixels.
    pub raw_position: f64,
    /// Progress over the pinned range, in `[0, 1]`.
    pub progress: f64,
    /// Host direction indicator.
    pub direction: ScrollDirection,
    /// Length of the full scrollable range in pixels.
    pub total_range: f64,
}

/// Scroll state recomputed on every notification.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollState {
    /// Raw scroll offset in pixels.
    pub raw_position: f64,
    /// Normalized progress in `[0, 1]`.
    pub normalized_progress: f64,
    /// Direction of the latest motion.
    pub direction: ScrollDirection,
}

impl ScrollState {
    /// Build a state, clamping progress into `[0, 1]`.
    pub fn new(raw_position: f64, normalized_progress: f64, direction: ScrollDirection) -> Self {
        Self {
            raw_position,
            normalized_progress: clamp_unit(normalized_progress),
            direction,
        }
    }
}

impl From<ScrollUpdate> for ScrollState {
    fn from(u: ScrollUpdate) -> Self {
        Self::new(u.raw_position, u.progress, u.direction)
    }
}

/// A pinned scroll range: progress runs from 0 at `start` to 1 at `start + distance`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PinnedRange {
    /// Raw offset where the range begins.
    pub start: f64,
    /// Length of the range in pixels.
    pub distance: f64,
}

impl PinnedRange {
    /// Validated constructor; `distance` must be finite and positive.
    pub fn new(start: f64, distance: f64) -> ReelResult<Self> {
        if !start.is_finite() || !distance.is_finite() || distance <= 0.0 {
            return Err(ReelError::validation(
                "pinned range requires finite start and distance > 0",
            ));
        }
        Ok(Self { start, distance })
    }

    /// Normalized progress at raw offset `raw`.
    pub fn progress_at(&self, raw: f64) -> f64 {
        clamp_unit((raw - self.start) / self.distance)
    }

    /// Raw offset at normalized `progress`.
    pub fn position_at(&self, progress: f64) -> f64 {
        self.start + clamp_unit(progress) * self.distance
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/state.rs"]
mod tests;
