use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crate::assets::decode::{FrameImage, decode_image};
use crate::assets::naming::FrameNaming;
use crate::assets::source::FrameSource;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};

/// Load state of one frame. Transitions are monotonic: `Pending -> Loading -> {Ready | Failed}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum FrameState {
    /// Not yet picked up by a worker.
    Pending,
    /// A worker is fetching/decoding the frame.
    Loading,
    /// Decoded and drawable.
    Ready,
    /// Fetch or decode failed; the frame is skipped when compositing.
    Failed,
}

impl FrameState {
    /// `Ready` or `Failed`.
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }
}

/// One entry of the frame set.
#[derive(Clone, Debug)]
pub struct FrameDescriptor {
    /// Position within the sequence.
    pub index: FrameIndex,
    /// URI derived from `index` via [`FrameNaming`].
    pub source_uri: String,
    /// Decoded pixels; only present when `state == Ready` and the preloader was not cancelled.
    pub image: Option<FrameImage>,
    /// Current load state.
    pub state: FrameState,
}

impl FrameDescriptor {
    /// Decoded image if (and only if) the frame is ready.
    pub fn ready_image(&self) -> Option<&FrameImage> {
        match self.state {
            FrameState::Ready => self.image.as_ref(),
            _ => None,
        }
    }
}

/// Cooperative cancellation flag shared between the preloader and its workers.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a fresh, un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Observable transitions reported by [`FramePreloader::pump`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PreloadEvent {
    /// A frame moved from `Pending` to `Loading`.
    Started(FrameIndex),
    /// A frame reached a terminal state.
    Settled {
        /// Frame that settled.
        index: FrameIndex,
        /// `Ready` or `Failed`.
        state: FrameState,
    },
    /// Frame 0 settled; rendering may begin. Emitted once.
    FirstFrameReady,
    /// Every frame settled. Emitted once; diagnostics only.
    AllSettled,
}

/// Worker configuration for [`FramePreloader`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PreloadOpts {
    /// Worker thread count. `None` uses the host's available parallelism.
    #[serde(default)]
    pub threads: Option<usize>,
}

enum WorkerMsg {
    Started(u32),
    Loaded(u32, FrameImage),
    Failed(u32, String),
}

/// Concurrent frame-set loader.
///
/// Every frame is dispatched at construction. Workers fetch and decode off-thread; their
/// completions are applied serially on the owning thread by [`FramePreloader::pump`] (or the
/// blocking `wait_*` gates), so descriptor state only ever changes on the owner's thread.
pub struct FramePreloader {
    frames: Vec<FrameDescriptor>,
    token: CancelToken,
    rx: Option<mpsc::Receiver<WorkerMsg>>,
    _pool: rayon::ThreadPool,
    queued: Vec<PreloadEvent>,
    settled: usize,
    first_frame_ready: bool,
    all_settled_emitted: bool,
}

impl std::fmt::Debug for FramePreloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FramePreloader")
            .field("frame_count", &self.frames.len())
            .field("settled", &self.settled)
            .field("first_frame_ready", &self.first_frame_ready)
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}

impl FramePreloader {
    /// Create the frame set and begin loading every frame.
    #[tracing::instrument(skip(naming, source, token))]
    pub fn start(
        naming: &FrameNaming,
        frame_count: u32,
        source: Arc<dyn FrameSource>,
        opts: PreloadOpts,
        token: CancelToken,
    ) -> ReelResult<Self> {
        if frame_count == 0 {
            return Err(ReelError::validation("frame_count must be >= 1"));
        }
        naming.validate()?;
        let pool = build_thread_pool(opts.threads)?;

        let frames = (0..frame_count)
            .map(|i| {
                let index = FrameIndex(i);
                FrameDescriptor {
                    index,
                    source_uri: naming.uri_for(index),
                    image: None,
                    state: FrameState::Pending,
                }
            })
            .collect::<Vec<_>>();

        let (tx, rx) = mpsc::channel();
        for desc in &frames {
            let tx = tx.clone();
            let source = Arc::clone(&source);
            let token = token.clone();
            let uri = desc.source_uri.clone();
            let i = desc.index.0;
            pool.spawn(move || {
                if token.is_cancelled() || tx.send(WorkerMsg::Started(i)).is_err() {
                    return;
                }
                let outcome = source.fetch(&uri).and_then(|bytes| decode_image(&bytes));
                // Drop any decoded buffer without reporting once cancelled.
                if token.is_cancelled() {
                    return;
                }
                let msg = match outcome {
                    Ok(image) => WorkerMsg::Loaded(i, image),
                    Err(e) => WorkerMsg::Failed(i, format!("{uri}: {e}")),
                };
                let _ = tx.send(msg);
            });
        }
        drop(tx);
        tracing::debug!(frame_count, "dispatched frame loads");

        Ok(Self {
            frames,
            token,
            rx: Some(rx),
            _pool: pool,
            queued: Vec::new(),
            settled: 0,
            first_frame_ready: false,
            all_settled_emitted: false,
        })
    }

    /// Number of frames in the set.
    pub fn frame_count(&self) -> u32 {
        self.frames.len() as u32
    }

    /// Current descriptor for `index`, or `None` when out of range.
    pub fn get_frame(&self, index: FrameIndex) -> Option<&FrameDescriptor> {
        self.frames.get(index.as_usize())
    }

    /// All descriptors in index order.
    pub fn frames(&self) -> &[FrameDescriptor] {
        &self.frames
    }

    /// True once frame 0 settled, whether it loaded or failed.
    pub fn is_first_frame_ready(&self) -> bool {
        self.first_frame_ready
    }

    /// True once every frame settled.
    pub fn all_settled(&self) -> bool {
        self.settled == self.frames.len()
    }

    /// Number of frames in `state`.
    pub fn count_in(&self, state: FrameState) -> usize {
        self.frames.iter().filter(|f| f.state == state).count()
    }

    /// Whether [`FramePreloader::cancel`] was called or the shared token was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Apply all completions delivered so far and return the resulting transitions.
    ///
    /// Never blocks. After cancellation this always returns an empty list.
    pub fn pump(&mut self) -> Vec<PreloadEvent> {
        if self.token.is_cancelled() {
            self.shutdown();
            return Vec::new();
        }
        loop {
            let msg = match self.rx.as_ref().map(|rx| rx.try_recv()) {
                Some(Ok(msg)) => msg,
                _ => break,
            };
            self.apply(msg);
        }
        std::mem::take(&mut self.queued)
    }

    /// Block until frame 0 settles or `timeout` elapses.
    ///
    /// Completions received meanwhile are applied; their events are returned by the next
    /// [`FramePreloader::pump`]. Returns whether the first frame is ready.
    pub fn wait_first_frame(&mut self, timeout: Duration) -> bool {
        self.wait_until(timeout, |p| p.first_frame_ready)
    }

    /// Block until every frame settles or `timeout` elapses. Returns whether all settled.
    pub fn wait_all(&mut self, timeout: Duration) -> bool {
        self.wait_until(timeout, |p| p.all_settled())
    }

    /// Stop loading and release the frame set. States are frozen as they were, decoded pixels are
    /// dropped, in-flight buffers are dropped by their workers, and queued events are discarded.
    pub fn cancel(&mut self) {
        if !self.token.is_cancelled() {
            tracing::debug!(
                settled = self.settled,
                total = self.frames.len(),
                "cancelling frame preloader"
            );
        }
        self.token.cancel();
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.rx = None;
        self.queued.clear();
        for desc in &mut self.frames {
            desc.image = None;
        }
    }

    fn wait_until(&mut self, timeout: Duration, done: impl Fn(&Self) -> bool) -> bool {
        // Timeouts too large to represent wait without a deadline.
        let deadline = Instant::now().checked_add(timeout);
        while !done(self) {
            if self.token.is_cancelled() {
                self.shutdown();
                return false;
            }
            let Some(rx) = self.rx.as_ref() else {
                return false;
            };
            let received = match deadline {
                Some(deadline) => {
                    rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
                }
                None => rx
                    .recv()
                    .map_err(|_| mpsc::RecvTimeoutError::Disconnected),
            };
            match received {
                Ok(msg) => self.apply(msg),
                Err(mpsc::RecvTimeoutError::Timeout) => return false,
                Err(mpsc::RecvTimeoutError::Disconnected) => return done(self),
            }
        }
        true
    }

    fn apply(&mut self, msg: WorkerMsg) {
        match msg {
            WorkerMsg::Started(i) => {
                if let Some(desc) = self.frames.get_mut(i as usize)
                    && desc.state == FrameState::Pending
                {
                    desc.state = FrameState::Loading;
                    self.queued.push(PreloadEvent::Started(desc.index));
                }
            }
            WorkerMsg::Loaded(i, image) => {
                if image.has_natural_size() {
                    self.settle(i, FrameState::Ready, Some(image));
                } else {
                    tracing::warn!(index = i, "frame decoded with zero natural size");
                    self.settle(i, FrameState::Failed, None);
                }
            }
            WorkerMsg::Failed(i, reason) => {
                tracing::warn!(index = i, %reason, "frame load failed; it will be skipped");
                self.settle(i, FrameState::Failed, None);
            }
        }
    }

    fn settle(&mut self, i: u32, state: FrameState, image: Option<FrameImage>) {
        let Some(desc) = self.frames.get_mut(i as usize) else {
            return;
        };
        if desc.state.is_settled() {
            return;
        }
        desc.state = state;
        desc.image = image;
        self.settled += 1;
        self.queued.push(PreloadEvent::Settled {
            index: desc.index,
            state,
        });

        if i == 0 && !self.first_frame_ready {
            self.first_frame_ready = true;
            self.queued.push(PreloadEvent::FirstFrameReady);
        }
        if self.all_settled() && !self.all_settled_emitted {
            self.all_settled_emitted = true;
            tracing::info!(
                ready = self.count_in(FrameState::Ready),
                failed = self.count_in(FrameState::Failed),
                "all frames loaded/decoded"
            );
            self.queued.push(PreloadEvent::AllSettled);
        }
    }
}

impl Drop for FramePreloader {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ReelError::validation(
            "preload 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("reel-preload-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReelError::lifecycle(format!("failed to build preload thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/preload.rs"]
mod tests;
