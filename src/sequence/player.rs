use std::sync::Arc;
use std::time::Duration;

use crate::assets::preload::{
    CancelToken, FramePreloader, FrameState, PreloadEvent, PreloadOpts,
};
use crate::assets::source::FrameSource;
use crate::config::SequenceConfig;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::ReelResult;
use crate::foundation::math::clamp_unit;
use crate::render::compositor::{CanvasCompositor, CompositeOutcome};
use crate::render::surface::DrawSurface;

/// Readiness of a [`FramePlayer`]. Phases only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
pub enum PlayerPhase {
    /// Frame 0 has not settled; nothing is drawn.
    Initializing,
    /// Frame 0 settled; scroll updates are rendered.
    FirstFrameReady,
    /// Every frame settled.
    FullyReady,
}

type PhaseObserver = Box<dyn FnMut(PlayerPhase, PlayerPhase) + Send>;

/// Scroll-driven frame player.
///
/// Scroll notifications only record the latest progress; the draw happens in
/// [`FramePlayer::on_animation_frame`], so a burst of updates between two animation frames
/// costs one composite.
pub struct FramePlayer {
    preloader: FramePreloader,
    compositor: CanvasCompositor,
    phase: PlayerPhase,
    observers: Vec<PhaseObserver>,
    progress: f64,
    pending: Option<f64>,
    needs_redraw: bool,
    awaiting: Option<FrameIndex>,
    coalesced: u64,
    torn_down: bool,
}

impl std::fmt::Debug for FramePlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FramePlayer")
            .field("phase", &self.phase)
            .field("progress", &self.progress)
            .field("coalesced", &self.coalesced)
            .field("torn_down", &self.torn_down)
            .field("preloader", &self.preloader)
            .finish()
    }
}

impl FramePlayer {
    /// Wrap an already started preloader.
    pub fn new(preloader: FramePreloader) -> Self {
        Self {
            preloader,
            compositor: CanvasCompositor::new(),
            phase: PlayerPhase::Initializing,
            observers: Vec::new(),
            progress: 0.0,
            pending: None,
            needs_redraw: false,
            awaiting: None,
            coalesced: 0,
            torn_down: false,
        }
    }

    /// Start preloading the sequence described by `sequence` and wrap it in a player.
    pub fn start(
        sequence: &SequenceConfig,
        source: Arc<dyn FrameSource>,
        opts: PreloadOpts,
    ) -> ReelResult<Self> {
        let preloader = FramePreloader::start(
            &sequence.naming,
            sequence.frame_count,
            source,
            opts,
            CancelToken::new(),
        )?;
        Ok(Self::new(preloader))
    }

    /// Register a callback invoked with `(from, to)` on every phase change.
    pub fn on_phase_change(&mut self, observer: impl FnMut(PlayerPhase, PlayerPhase) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn phase(&self) -> PlayerPhase {
        self.phase
    }

    /// Latest progress received, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.pending.unwrap_or(self.progress)
    }

    /// Scroll updates overwritten before they were rendered.
    pub fn coalesced_updates(&self) -> u64 {
        self.coalesced
    }

    pub fn preloader(&self) -> &FramePreloader {
        &self.preloader
    }

    pub fn compositor(&self) -> &CanvasCompositor {
        &self.compositor
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Block until frame 0 settles or `timeout` elapses; the phase change is applied on the next
    /// animation frame.
    pub fn wait_first_frame(&mut self, timeout: Duration) -> bool {
        !self.torn_down && self.preloader.wait_first_frame(timeout)
    }

    /// Block until every frame settles or `timeout` elapses.
    pub fn wait_all(&mut self, timeout: Duration) -> bool {
        !self.torn_down && self.preloader.wait_all(timeout)
    }

    /// Record new scroll progress. Latest wins until the next animation frame.
    pub fn on_scroll(&mut self, progress: f64) {
        if self.torn_down {
            return;
        }
        if self.pending.replace(clamp_unit(progress)).is_some() {
            self.coalesced += 1;
        }
    }

    /// Apply preload completions and render at most once.
    ///
    /// Returns `None` when nothing needed drawing (or drawing is not allowed yet).
    pub fn on_animation_frame(&mut self, surface: &mut dyn DrawSurface) -> Option<CompositeOutcome> {
        if self.torn_down {
            return None;
        }
        for event in self.preloader.pump() {
            self.apply_event(event);
        }
        if self.phase == PlayerPhase::Initializing {
            return None;
        }
        if let Some(p) = self.pending.take() {
            self.progress = p;
        } else if !self.needs_redraw {
            return None;
        }
        Some(self.draw(surface))
    }

    /// Resize `surface` to the new viewport and redraw the current frame.
    pub fn on_resize(
        &mut self,
        surface: &mut dyn DrawSurface,
        width: u32,
        height: u32,
    ) -> ReelResult<Option<CompositeOutcome>> {
        if self.torn_down {
            return Ok(None);
        }
        surface.resize(width, height)?;
        self.needs_redraw = true;
        Ok(self.on_animation_frame(surface))
    }

    /// Cancel loading and ignore all further notifications. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.pending = None;
        self.preloader.cancel();
        tracing::debug!(coalesced = self.coalesced, "frame player torn down");
    }

    fn draw(&mut self, surface: &mut dyn DrawSurface) -> CompositeOutcome {
        let out = self
            .compositor
            .composite(surface, self.preloader.frames(), self.progress);
        self.needs_redraw = matches!(out, CompositeOutcome::SurfaceUnavailable);
        self.awaiting = match out {
            CompositeOutcome::NotReady { index, state } if state != FrameState::Failed => {
                Some(index)
            }
            _ => None,
        };
        out
    }

    fn apply_event(&mut self, event: PreloadEvent) {
        match event {
            PreloadEvent::FirstFrameReady => {
                self.needs_redraw = true;
                self.advance(PlayerPhase::FirstFrameReady);
            }
            PreloadEvent::AllSettled => self.advance(PlayerPhase::FullyReady),
            PreloadEvent::Settled {
                index,
                state: FrameState::Ready,
            } if self.awaiting == Some(index) => {
                // The visible position was waiting on this frame.
                self.needs_redraw = true;
            }
            PreloadEvent::Started(_) | PreloadEvent::Settled { .. } => {}
        }
    }

    fn advance(&mut self, to: PlayerPhase) {
        if to <= self.phase {
            return;
        }
        let from = self.phase;
        self.phase = to;
        tracing::debug!(?from, ?to, "player phase changed");
        for observer in &mut self.observers {
            observer(from, to);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/player.rs"]
mod tests;
