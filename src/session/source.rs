use std::collections::BTreeMap;

use crate::foundation::error::{ReelError, ReelResult};
use crate::scroll::state::{PinnedRange, ScrollDirection, ScrollUpdate};

/// Notification streams a story listens to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub enum ListenerKind {
    /// Scroll progress over the pinned range.
    Scroll,
    /// Viewport size changes.
    Resize,
    /// Section layout changes (content reflow).
    Layout,
}

/// Receipt for one registered listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerHandle {
    id: u64,
    kind: ListenerKind,
}

impl ListenerHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> ListenerKind {
        self.kind
    }
}

/// Host-side provider of scroll progress and related notifications.
pub trait ScrollProgressSource {
    /// Register interest in `kind` notifications.
    fn subscribe(&mut self, kind: ListenerKind) -> ReelResult<ListenerHandle>;

    /// Deregister every listener in `handles` in one call.
    ///
    /// Handles that are not (or no longer) registered are ignored, so repeated calls are harmless.
    fn unsubscribe_all(&mut self, handles: &[ListenerHandle]) -> ReelResult<()>;
}

/// In-process scroll source driven by explicit [`ManualScrollSource::scroll_to`] calls.
#[derive(Clone, Debug)]
pub struct ManualScrollSource {
    range: PinnedRange,
    total_range: f64,
    position: f64,
    next_id: u64,
    listeners: BTreeMap<u64, ListenerKind>,
    reject: Option<ListenerKind>,
}

impl ManualScrollSource {
    /// Source for a page whose scrollable length is `total_range` and whose frame sequence is
    /// pinned over `range`.
    pub fn new(range: PinnedRange, total_range: f64) -> Self {
        Self {
            range,
            total_range,
            position: range.start,
            next_id: 1,
            listeners: BTreeMap::new(),
            reject: None,
        }
    }

    /// Make subscriptions of `kind` fail, to exercise registration errors.
    pub fn reject_subscriptions(mut self, kind: ListenerKind) -> Self {
        self.reject = Some(kind);
        self
    }

    /// Current raw offset.
    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn total_range(&self) -> f64 {
        self.total_range
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_subscribed(&self, kind: ListenerKind) -> bool {
        self.listeners.values().any(|k| *k == kind)
    }

    /// Move to raw offset `raw` and build the resulting notification.
    ///
    /// Returns `None` when nobody listens to [`ListenerKind::Scroll`].
    pub fn scroll_to(&mut self, raw: f64) -> Option<ScrollUpdate> {
        let direction = ScrollDirection::between(self.position, raw);
        self.position = raw;
        if !self.is_subscribed(ListenerKind::Scroll) {
            return None;
        }
        Some(ScrollUpdate {
            raw_position: raw,
            progress: self.range.progress_at(raw),
            direction,
            total_range: self.total_range,
        })
    }
}

impl ScrollProgressSource for ManualScrollSource {
    fn subscribe(&mut self, kind: ListenerKind) -> ReelResult<ListenerHandle> {
        if self.reject == Some(kind) {
            return Err(ReelError::lifecycle(format!(
                "{kind:?} listener registration refused"
            )));
        }
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.insert(id, kind);
        Ok(ListenerHandle { id, kind })
    }

    fn unsubscribe_all(&mut self, handles: &[ListenerHandle]) -> ReelResult<()> {
        for h in handles {
            self.listeners.remove(&h.id);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/source.rs"]
mod tests;
