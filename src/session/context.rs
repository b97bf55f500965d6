use std::sync::Arc;
use std::time::Instant;

use crate::assets::source::FrameSource;
use crate::config::StoryConfig;
use crate::foundation::core::Viewport;
use crate::foundation::error::ReelResult;
use crate::render::compositor::CompositeOutcome;
use crate::render::surface::DrawSurface;
use crate::scroll::settle::SettleDetector;
use crate::scroll::state::{ScrollState, ScrollUpdate};
use crate::scroll::tween::{SnapTiming, SnapTween};
use crate::sequence::player::FramePlayer;
use crate::session::source::{ListenerHandle, ListenerKind, ScrollProgressSource};
use crate::snap::engine::{SnapDecision, SnapDecisionEngine};
use crate::snap::sections::{SectionLayout, SectionRegistry};

/// Snap evaluated after scrolling settled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SettledSnap {
    /// State the decision was made from.
    pub state: ScrollState,
    pub decision: SnapDecision,
    /// Animation to the snap target, present when `decision.should_snap`.
    pub tween: Option<SnapTween>,
}

/// One mounted scroll story.
///
/// Owns the frame player, the section registry, the snap engine and the listener subscriptions
/// registered on the scroll source. Dropping the context tears it down.
pub struct StoryContext<S: ScrollProgressSource> {
    source: S,
    handles: Vec<ListenerHandle>,
    player: FramePlayer,
    registry: SectionRegistry,
    engine: SnapDecisionEngine,
    settle: SettleDetector,
    timing: SnapTiming,
    viewport: Viewport,
    state: ScrollState,
    total_range: f64,
    torn_down: bool,
}

impl<S: ScrollProgressSource> std::fmt::Debug for StoryContext<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryContext")
            .field("listeners", &self.handles.len())
            .field("viewport", &self.viewport)
            .field("state", &self.state)
            .field("generation", &self.registry.generation())
            .field("torn_down", &self.torn_down)
            .field("player", &self.player)
            .finish()
    }
}

impl<S: ScrollProgressSource> StoryContext<S> {
    /// Validate `config`, start preloading, measure sections and register listeners on `source`.
    ///
    /// Listeners registered before a failure are deregistered again before the error is returned.
    #[tracing::instrument(skip_all, fields(frames = config.sequence.frame_count))]
    pub fn mount(
        config: &StoryConfig,
        frames: Arc<dyn FrameSource>,
        mut source: S,
        viewport: Viewport,
        layout: &dyn SectionLayout,
    ) -> ReelResult<Self> {
        config.validate()?;
        let viewport = Viewport::new(viewport.width, viewport.height)?;

        let mut registry = SectionRegistry::new();
        registry.recompute(layout)?;

        let mut handles = Vec::with_capacity(3);
        for kind in [ListenerKind::Scroll, ListenerKind::Resize, ListenerKind::Layout] {
            match source.subscribe(kind) {
                Ok(h) => handles.push(h),
                Err(e) => {
                    if let Err(cleanup) = source.unsubscribe_all(&handles) {
                        tracing::warn!(error = %cleanup, "failed to roll back listeners");
                    }
                    return Err(e);
                }
            }
        }

        let player = match FramePlayer::start(&config.sequence, frames, config.preload) {
            Ok(p) => p,
            Err(e) => {
                if let Err(cleanup) = source.unsubscribe_all(&handles) {
                    tracing::warn!(error = %cleanup, "failed to roll back listeners");
                }
                return Err(e);
            }
        };

        tracing::info!(
            sections = registry.snapshot().sections().len(),
            listeners = handles.len(),
            "story mounted"
        );
        Ok(Self {
            source,
            handles,
            player,
            registry,
            engine: SnapDecisionEngine::new(config.snap.tolerance_px),
            settle: SettleDetector::new(config.snap.settle_delay()),
            timing: config.snap.timing,
            viewport,
            state: ScrollState::default(),
            total_range: 0.0,
            torn_down: false,
        })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the scroll source, e.g. to drive a [`crate::ManualScrollSource`].
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn player(&self) -> &FramePlayer {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut FramePlayer {
        &mut self.player
    }

    pub fn sections(&self) -> &SectionRegistry {
        &self.registry
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Scroll state from the latest notification; progress is over the whole scrollable page.
    pub fn scroll_state(&self) -> ScrollState {
        self.state
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Scroll notification received at `now`.
    ///
    /// The player follows `update.progress` over the pinned range; snapping works on the raw
    /// offset over the whole page.
    pub fn on_scroll(&mut self, update: ScrollUpdate, now: Instant) {
        if self.torn_down {
            return;
        }
        self.state = page_state(&update);
        self.total_range = update.total_range;
        self.player.on_scroll(update.progress);
        self.settle.note_motion(now);
    }

    /// Viewport resize: resize `surface`, redraw the current frame and re-measure the sections.
    ///
    /// The redraw happens even when the measurement fails; the previous layout is then kept and
    /// the error returned.
    pub fn on_resize(
        &mut self,
        surface: &mut dyn DrawSurface,
        viewport: Viewport,
        layout: &dyn SectionLayout,
    ) -> ReelResult<Option<CompositeOutcome>> {
        if self.torn_down {
            return Ok(None);
        }
        self.viewport = viewport;
        let out = self
            .player
            .on_resize(surface, viewport.width, viewport.height)?;
        self.registry.recompute(layout)?;
        Ok(out)
    }

    /// Content reflow: re-measure the sections. A failed measurement keeps the previous layout.
    pub fn on_layout_change(&mut self, layout: &dyn SectionLayout) -> ReelResult<()> {
        if self.torn_down {
            return Ok(());
        }
        self.registry.recompute(layout)
    }

    /// Host animation frame: render the latest scroll position if anything changed.
    pub fn on_animation_frame(&mut self, surface: &mut dyn DrawSurface) -> Option<CompositeOutcome> {
        if self.torn_down {
            return None;
        }
        self.player.on_animation_frame(surface)
    }

    /// Evaluate the snap once scrolling has been quiet for the settle delay.
    ///
    /// Returns `None` until then, and at most one result per pause.
    pub fn poll_settle(&mut self, now: Instant) -> Option<SettledSnap> {
        if self.torn_down || !self.settle.poll(now) {
            return None;
        }
        let snapshot = self.registry.snapshot();
        let viewport_height = f64::from(self.viewport.height);
        let decision = self
            .engine
            .decide(&self.state, &snapshot, viewport_height, self.total_range);
        let tween = decision.target_px.map(|to| {
            SnapTween::new(self.state.raw_position, to, viewport_height, self.timing)
        });
        Some(SettledSnap {
            state: self.state,
            decision,
            tween,
        })
    }

    /// Cancel preloading and deregister every listener in one call. Idempotent; afterwards every
    /// handler is a no-op.
    pub fn teardown(&mut self) -> ReelResult<()> {
        if self.torn_down {
            return Ok(());
        }
        self.torn_down = true;
        self.player.teardown();
        self.settle.reset();
        let handles = std::mem::take(&mut self.handles);
        self.source.unsubscribe_all(&handles)?;
        tracing::debug!(listeners = handles.len(), "story torn down");
        Ok(())
    }
}

fn page_state(update: &ScrollUpdate) -> ScrollState {
    let progress = if update.total_range > 0.0 {
        update.raw_position / update.total_range
    } else {
        0.0
    };
    ScrollState::new(update.raw_position, progress, update.direction)
}

impl<S: ScrollProgressSource> Drop for StoryContext<S> {
    fn drop(&mut self) {
        if let Err(e) = self.teardown() {
            tracing::warn!(error = %e, "story teardown failed on drop");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/context.rs"]
mod tests;
