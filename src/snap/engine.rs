use crate::foundation::math::clamp_unit;
use crate::scroll::state::{ScrollDirection, ScrollState};
use crate::snap::sections::{Section, SectionSnapshot};

/// Default pixel tolerance used by the seam tests.
pub const DEFAULT_TOLERANCE_PX: f64 = 5.0;

/// Outcome of one settle-time snap evaluation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct SnapDecision {
    /// Whether a seam is visible and the viewport should move.
    pub should_snap: bool,
    /// Snap target as a fraction of the total scrollable range, in `[0, 1]`.
    pub target_normalized_offset: Option<f64>,
    /// Snap target in page pixels.
    pub target_px: Option<f64>,
}

impl SnapDecision {
    /// Leave the viewport where it is.
    pub fn no_snap() -> Self {
        Self {
            should_snap: false,
            target_normalized_offset: None,
            target_px: None,
        }
    }

    fn snap_to(target_px: f64, total_range: f64) -> Self {
        Self {
            should_snap: true,
            target_normalized_offset: Some(clamp_unit(target_px / total_range)),
            target_px: Some(target_px),
        }
    }
}

/// Decides whether the viewport rests inside a single section or straddles a seam, and where to
/// move it in the latter case.
///
/// Stateless: every settle event gets a fresh decision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapDecisionEngine {
    tolerance_px: f64,
}

impl Default for SnapDecisionEngine {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE_PX)
    }
}

impl SnapDecisionEngine {
    /// Engine with the given edge tolerance in pixels (negative values are treated as 0).
    pub fn new(tolerance_px: f64) -> Self {
        Self {
            tolerance_px: if tolerance_px.is_finite() {
                tolerance_px.max(0.0)
            } else {
                DEFAULT_TOLERANCE_PX
            },
        }
    }

    /// Edge tolerance in pixels.
    pub fn tolerance_px(&self) -> f64 {
        self.tolerance_px
    }

    /// Evaluate the snap decision for a settled viewport.
    ///
    /// `total_range` is the full scrollable length in pixels; the current offset is
    /// `total_range * state.normalized_progress`.
    #[tracing::instrument(level = "debug", skip(self, sections), fields(generation = sections.generation()))]
    pub fn decide(
        &self,
        state: &ScrollState,
        sections: &SectionSnapshot,
        viewport_height: f64,
        total_range: f64,
    ) -> SnapDecision {
        let sections = sections.sections();
        if sections.is_empty() || !total_range.is_finite() || total_range <= 0.0 {
            return SnapDecision::no_snap();
        }

        let eps = self.tolerance_px;
        let current = total_range * clamp_unit(state.normalized_progress);

        if is_inside_one_section(sections, current, viewport_height, eps) {
            return SnapDecision::no_snap();
        }

        let closest = closest_top(sections, current);
        let target = match state.direction {
            // The next section about to be entered.
            ScrollDirection::Forward => sections
                .iter()
                .find(|s| s.top > current + eps)
                .map(|s| s.top),
            // The section being returned to. The cutoff is the offset plus tolerance, not half a
            // viewport below it: resting at 950 over sections at 0 and 1000 goes back to 0.
            ScrollDirection::Backward => sections
                .iter()
                .rev()
                .find(|s| s.top < current + eps)
                .map(|s| s.top),
            ScrollDirection::None => None,
        }
        .unwrap_or(closest);

        tracing::debug!(current, target, direction = ?state.direction, "seam visible; snapping");
        SnapDecision::snap_to(target, total_range)
    }
}

fn is_inside_one_section(sections: &[Section], current: f64, viewport_height: f64, eps: f64) -> bool {
    sections
        .iter()
        .any(|s| current >= s.top - eps && current + viewport_height <= s.bottom + eps)
}

fn closest_top(sections: &[Section], current: f64) -> f64 {
    let mut closest = sections[0].top;
    let mut min_diff = f64::INFINITY;
    for s in sections {
        let diff = (current - s.top).abs();
        if diff < min_diff {
            min_diff = diff;
            closest = s.top;
        }
    }
    closest
}

#[cfg(test)]
#[path = "../../tests/unit/snap/engine.rs"]
mod tests;
