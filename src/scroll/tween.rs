use std::time::Duration;

use crate::foundation::math::{clamp_unit, lerp};

/// Easing curves for the snap animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    Linear,
    InQuad,
    OutQuad,
    /// Also known as `power2.inOut`.
    #[default]
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = clamp_unit(t);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }
}

/// Timing of the snap animation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SnapTiming {
    /// Shortest animation, used for tiny corrections.
    pub min_duration_ms: u64,
    /// Longest animation, used for corrections of a viewport height or more.
    pub max_duration_ms: u64,
    /// Easing curve.
    pub ease: Ease,
}

impl Default for SnapTiming {
    fn default() -> Self {
        Self {
            min_duration_ms: 200,
            max_duration_ms: 800,
            ease: Ease::InOutQuad,
        }
    }
}

/// Animated scroll from the settled offset to a snap target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapTween {
    from: f64,
    to: f64,
    duration: Duration,
    ease: Ease,
}

impl SnapTween {
    /// Plan a tween from `from` to `to` (pixels). The duration grows with the distance travelled
    /// relative to `viewport_height`, between the configured min and max.
    pub fn new(from: f64, to: f64, viewport_height: f64, timing: SnapTiming) -> Self {
        let min = timing.min_duration_ms.min(timing.max_duration_ms) as f64;
        let max = timing.max_duration_ms.max(timing.min_duration_ms) as f64;
        let reach = if viewport_height > 0.0 {
            clamp_unit((to - from).abs() / viewport_height)
        } else {
            1.0
        };
        let ms = lerp(min, max, reach).round() as u64;
        Self {
            from,
            to,
            duration: Duration::from_millis(ms),
            ease: timing.ease,
        }
    }

    /// Total animation time.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Target offset.
    pub fn target(&self) -> f64 {
        self.to
    }

    /// Scroll offset `elapsed` after the start.
    pub fn sample(&self, elapsed: Duration) -> f64 {
        if self.is_finished(elapsed) {
            return self.to;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        lerp(self.from, self.to, self.ease.apply(t))
    }

    /// Whether the animation has reached its target.
    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/tween.rs"]
mod tests;
