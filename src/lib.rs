//! Scrollreel drives a pre-rendered image sequence from scroll progress and snaps the viewport to
//! section boundaries once scrolling settles.
//!
//! The public API is context-oriented:
//!
//! - Describe the sequence and snap behavior in a [`StoryConfig`]
//! - Mount a [`StoryContext`] on a [`ScrollProgressSource`] with a [`FrameSource`] for the frames
//! - Feed it scroll, resize and layout notifications, draw on animation frames onto a
//!   [`DrawSurface`], and poll for [`SettledSnap`]s
//!
//! The lower-level pieces ([`FramePreloader`], [`CanvasCompositor`], [`SnapDecisionEngine`]) are
//! exported for hosts that wire their own lifecycle.
#![forbid(unsafe_code)]

mod assets;
mod config;
mod foundation;
mod render;
mod scroll;
mod sequence;
mod session;
mod snap;

pub use crate::foundation::core::{Affine, FrameIndex, Rect, Vec2, Viewport};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::assets::decode::{FrameImage, decode_image};
pub use crate::assets::naming::FrameNaming;
pub use crate::assets::preload::{
    CancelToken, FrameDescriptor, FramePreloader, FrameState, PreloadEvent, PreloadOpts,
};
pub use crate::assets::source::{FrameSource, FsFrameSource, MemoryFrameSource, normalize_uri_path};
pub use crate::config::{SequenceConfig, SnapConfig, StoryConfig};
pub use crate::render::compositor::{
    CanvasCompositor, CompositeOutcome, Placement, cover_placement, frame_placement,
};
pub use crate::render::surface::{CpuSurface, DrawSurface, FrameRGBA};
pub use crate::scroll::settle::SettleDetector;
pub use crate::scroll::state::{PinnedRange, ScrollDirection, ScrollState, ScrollUpdate};
pub use crate::scroll::tween::{Ease, SnapTiming, SnapTween};
pub use crate::sequence::mapper::map_progress_to_index;
pub use crate::sequence::player::{FramePlayer, PlayerPhase};
pub use crate::session::context::{SettledSnap, StoryContext};
pub use crate::session::source::{
    ListenerHandle, ListenerKind, ManualScrollSource, ScrollProgressSource,
};
pub use crate::snap::engine::{DEFAULT_TOLERANCE_PX, SnapDecision, SnapDecisionEngine};
pub use crate::snap::sections::{Section, SectionLayout, SectionRegistry, SectionSnapshot};
