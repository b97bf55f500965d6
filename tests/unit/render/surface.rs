use super::*;

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> FrameImage {
    FrameImage::from_premul(w, h, rgba.repeat((w * h) as usize))
}

fn pixel(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

#[test]
fn zero_sized_surface_is_unavailable_until_resized() {
    let mut s = CpuSurface::new(0, 0).unwrap();
    assert!(matches!(s.clear(), Err(ReelError::Surface(_))));
    assert!(s.frame_rgba().is_err());
    assert!(
        s.draw_image(&solid(1, 1, [255, 0, 0, 255]), Rect::new(0.0, 0.0, 1.0, 1.0))
            .is_err()
    );

    s.resize(8, 4).unwrap();
    assert_eq!(s.size(), (8, 4));
    s.clear().unwrap();
    let f = s.frame_rgba().unwrap();
    assert_eq!((f.width, f.height), (8, 4));
    assert_eq!(f.data.len(), 8 * 4 * 4);
    assert!(f.premultiplied);
}

#[test]
fn oversized_surface_is_rejected() {
    assert!(CpuSurface::new(70_000, 10).is_err());
}

#[test]
fn draw_fills_destination_and_clear_wipes_it() {
    let mut s = CpuSurface::new(16, 16).unwrap();
    s.clear().unwrap();
    s.draw_image(
        &solid(4, 4, [255, 0, 0, 255]),
        Rect::new(0.0, 0.0, 16.0, 16.0),
    )
    .unwrap();
    let f = s.frame_rgba().unwrap();
    assert_eq!(pixel(&f, 8, 8), [255, 0, 0, 255]);

    s.clear().unwrap();
    let f = s.frame_rgba().unwrap();
    assert!(f.data.iter().all(|&b| b == 0));
}

#[test]
fn destination_outside_the_image_stays_transparent() {
    let mut s = CpuSurface::new(16, 16).unwrap();
    s.clear().unwrap();
    s.draw_image(&solid(2, 2, [0, 0, 255, 255]), Rect::new(0.0, 0.0, 8.0, 16.0))
        .unwrap();
    let f = s.frame_rgba().unwrap();
    assert_eq!(pixel(&f, 3, 8), [0, 0, 255, 255]);
    assert_eq!(pixel(&f, 12, 8), [0, 0, 0, 0]);
}
