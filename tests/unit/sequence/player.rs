use std::io::Cursor;
use std::sync::{Condvar, Mutex};

use super::*;
use crate::assets::decode::FrameImage;
use crate::assets::source::MemoryFrameSource;
use crate::foundation::core::Rect;
use crate::foundation::error::{ReelError, ReelResult};

const WAIT: Duration = Duration::from_secs(10);

fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([40, 80, 120, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn sequence(frame_count: u32) -> SequenceConfig {
    SequenceConfig {
        frame_count,
        ..SequenceConfig::default()
    }
}

fn memory_source(frame_count: u32) -> Arc<MemoryFrameSource> {
    let cfg = sequence(frame_count);
    let mut src = MemoryFrameSource::new();
    for i in 0..frame_count {
        src.insert(cfg.naming.uri_for(FrameIndex(i)), png_bytes(4, 8));
    }
    Arc::new(src)
}

/// Holds every frame (optionally except frame 0) until `open` is called.
struct GatedSource {
    png: Vec<u8>,
    first_free: bool,
    gate: Mutex<bool>,
    cv: Condvar,
}

impl GatedSource {
    fn new(first_free: bool) -> Arc<Self> {
        Arc::new(Self {
            png: png_bytes(4, 8),
            first_free,
            gate: Mutex::new(false),
            cv: Condvar::new(),
        })
    }

    fn open(&self) {
        *self.gate.lock().unwrap() = true;
        self.cv.notify_all();
    }
}

impl FrameSource for GatedSource {
    fn fetch(&self, uri: &str) -> ReelResult<Vec<u8>> {
        if self.first_free && uri.ends_with("frame_0000.png") {
            return Ok(self.png.clone());
        }
        let mut open = self.gate.lock().unwrap();
        while !*open {
            open = self.cv.wait(open).unwrap();
        }
        Ok(self.png.clone())
    }
}

#[derive(Default)]
struct CountingSurface {
    size: (u32, u32),
    draws: Vec<Rect>,
}

impl DrawSurface for CountingSurface {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) -> ReelResult<()> {
        if width > 10_000 {
            return Err(ReelError::surface("too large"));
        }
        self.size = (width, height);
        Ok(())
    }

    fn clear(&mut self) -> ReelResult<()> {
        Ok(())
    }

    fn draw_image(&mut self, _image: &FrameImage, dest: Rect) -> ReelResult<()> {
        self.draws.push(dest);
        Ok(())
    }
}

fn surface() -> CountingSurface {
    CountingSurface {
        size: (40, 40),
        ..CountingSurface::default()
    }
}

fn ready_player(frame_count: u32) -> FramePlayer {
    let mut p = FramePlayer::start(
        &sequence(frame_count),
        memory_source(frame_count),
        PreloadOpts::default(),
    )
    .unwrap();
    assert!(p.wait_all(WAIT));
    p
}

#[test]
fn nothing_is_drawn_before_the_first_frame_settles() {
    let src = GatedSource::new(false);
    let mut p = FramePlayer::start(&sequence(4), src.clone(), PreloadOpts::default()).unwrap();
    let mut s = surface();

    p.on_scroll(0.5);
    assert_eq!(p.on_animation_frame(&mut s), None);
    assert_eq!(p.phase(), PlayerPhase::Initializing);
    assert!(s.draws.is_empty());

    src.open();
    assert!(p.wait_all(WAIT));
    let out = p.on_animation_frame(&mut s).unwrap();
    assert!(
        matches!(out, CompositeOutcome::Drawn { index, .. } if index == FrameIndex(2)),
        "{out:?}"
    );
    assert_eq!(p.phase(), PlayerPhase::FullyReady);
}

#[test]
fn first_frame_is_drawn_as_soon_as_it_settles() {
    let mut p = ready_player(3);
    let mut s = surface();
    let out = p.on_animation_frame(&mut s).unwrap();
    assert!(matches!(out, CompositeOutcome::Drawn { index, .. } if index == FrameIndex(0)));
    assert_eq!(p.on_animation_frame(&mut s), None);
}

#[test]
fn bursts_of_scroll_updates_render_once_with_the_latest() {
    let mut p = ready_player(10);
    let mut s = surface();
    p.on_animation_frame(&mut s);
    let before = s.draws.len();

    for progress in [0.1, 0.2, 0.5, 1.0] {
        p.on_scroll(progress);
    }
    assert_eq!(p.coalesced_updates(), 3);
    assert_eq!(p.progress(), 1.0);

    let out = p.on_animation_frame(&mut s).unwrap();
    assert!(matches!(out, CompositeOutcome::Drawn { index, .. } if index == FrameIndex(9)));
    assert_eq!(s.draws.len(), before + 1);
    assert_eq!(p.on_animation_frame(&mut s), None);
}

#[test]
fn observers_see_each_phase_change_once() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut p = ready_player(2);
    let log = Arc::clone(&seen);
    p.on_phase_change(move |from, to| log.lock().unwrap().push((from, to)));

    let mut s = surface();
    p.on_animation_frame(&mut s);
    p.on_animation_frame(&mut s);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            (PlayerPhase::Initializing, PlayerPhase::FirstFrameReady),
            (PlayerPhase::FirstFrameReady, PlayerPhase::FullyReady),
        ]
    );
}

#[test]
fn frame_that_finishes_loading_is_drawn_without_new_scroll() {
    let src = GatedSource::new(true);
    let mut p = FramePlayer::start(&sequence(5), src.clone(), PreloadOpts::default()).unwrap();
    let mut s = surface();
    assert!(p.wait_first_frame(WAIT));
    p.on_animation_frame(&mut s);

    p.on_scroll(1.0);
    let out = p.on_animation_frame(&mut s).unwrap();
    assert!(matches!(out, CompositeOutcome::NotReady { index, .. } if index == FrameIndex(4)));

    src.open();
    assert!(p.wait_all(WAIT));
    let out = p.on_animation_frame(&mut s).unwrap();
    assert!(matches!(out, CompositeOutcome::Drawn { index, .. } if index == FrameIndex(4)));
}

#[test]
fn resize_redraws_with_new_dimensions() {
    let mut p = ready_player(2);
    let mut s = surface();
    p.on_animation_frame(&mut s);

    let out = p.on_resize(&mut s, 80, 20).unwrap().unwrap();
    let CompositeOutcome::Drawn { placement, .. } = out else {
        panic!("expected draw, got {out:?}");
    };
    assert_eq!(placement.width, 80.0);
    assert_eq!(placement.height, 160.0);
    assert_eq!(s.size(), (80, 20));

    assert!(p.on_resize(&mut s, 20_000, 20).is_err());
}

#[test]
fn teardown_silences_all_handlers() {
    let mut p = ready_player(3);
    let mut s = surface();
    p.teardown();
    p.teardown();

    assert!(p.is_torn_down());
    assert!(p.preloader().is_cancelled());
    assert!(p.preloader().frames().iter().all(|f| f.image.is_none()));
    p.on_scroll(0.7);
    assert_eq!(p.coalesced_updates(), 0);
    assert_eq!(p.on_animation_frame(&mut s), None);
    assert_eq!(p.on_resize(&mut s, 10, 10).unwrap(), None);
    assert!(s.draws.is_empty());
}
