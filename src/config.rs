use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use crate::assets::naming::FrameNaming;
use crate::assets::preload::PreloadOpts;
use crate::foundation::error::{ReelError, ReelResult};
use crate::scroll::state::PinnedRange;
use crate::scroll::tween::SnapTiming;
use crate::snap::engine::DEFAULT_TOLERANCE_PX;

/// Frame sequence: where the frames live, how many there are, and how far the page scrolls
/// while the sequence is pinned.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    #[serde(flatten)]
    pub naming: FrameNaming,
    pub frame_count: u32,
    /// Scroll distance in pixels over which progress runs from 0 to 1.
    pub scroll_distance: f64,
    /// Raw offset where the pinned range starts.
    pub scroll_start: f64,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            naming: FrameNaming::default(),
            frame_count: 100,
            scroll_distance: 6000.0,
            scroll_start: 0.0,
        }
    }
}

impl SequenceConfig {
    /// Pinned range described by `scroll_start` and `scroll_distance`.
    pub fn pinned_range(&self) -> ReelResult<PinnedRange> {
        PinnedRange::new(self.scroll_start, self.scroll_distance)
    }
}

/// Snap behavior after scrolling settles.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Edge tolerance in pixels.
    pub tolerance_px: f64,
    /// Quiet period after the last scroll motion before a snap is evaluated.
    pub settle_delay_ms: u64,
    #[serde(flatten)]
    pub timing: SnapTiming,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            tolerance_px: DEFAULT_TOLERANCE_PX,
            settle_delay_ms: 200,
            timing: SnapTiming::default(),
        }
    }
}

impl SnapConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Everything needed to mount a scroll story.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StoryConfig {
    pub sequence: SequenceConfig,
    pub snap: SnapConfig,
    pub preload: PreloadOpts,
}

impl StoryConfig {
    /// Parse a story config from a JSON reader. Missing fields take their defaults.
    pub fn from_reader<R: std::io::Read>(r: R) -> ReelResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ReelError::serde(format!("parse story config JSON: {e}")))
    }

    /// Parse a story config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ReelError::validation(format!("open story config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check value ranges.
    pub fn validate(&self) -> ReelResult<()> {
        self.sequence.naming.validate()?;
        if self.sequence.frame_count == 0 {
            return Err(ReelError::validation("sequence.frame_count must be >= 1"));
        }
        self.sequence.pinned_range()?;
        if !self.snap.tolerance_px.is_finite() || self.snap.tolerance_px < 0.0 {
            return Err(ReelError::validation(
                "snap.tolerance_px must be finite and >= 0",
            ));
        }
        if self.snap.timing.min_duration_ms > self.snap.timing.max_duration_ms {
            return Err(ReelError::validation(
                "snap.min_duration_ms must not exceed snap.max_duration_ms",
            ));
        }
        if self.preload.threads == Some(0) {
            return Err(ReelError::validation("preload.threads must be >= 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
