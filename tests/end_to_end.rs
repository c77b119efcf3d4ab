use cursor_capture::asset::upload_custom_cursor;
use cursor_capture::cursor::{CursorCapture, CursorId, CursorInfo, DrawParams, Point};
use cursor_capture::graphics::SoftwareGraphics;
use cursor_capture::image::{Bgra, ColorFormat, ImageBuf};
use cursor_capture::platform::scripted::{arrow_cursor, ScriptedPlatform};

const ARROW: CursorId = CursorId(7);
const WIDTH: u32 = 300;
const HEIGHT: u32 = 200;

fn params(force_custom: bool) -> DrawParams {
    DrawParams {
        x_offset: 0,
        y_offset: 0,
        width: WIDTH as i32,
        height: HEIGHT as i32,
        force_custom,
    }
}

fn frame(capture: &mut CursorCapture<ScriptedPlatform>, gfx: &mut SoftwareGraphics, params: &DrawParams) -> (bool, ImageBuf) {
    gfx.bind_target(ImageBuf::alloc(WIDTH, HEIGHT, None, ColorFormat::Bgra8888));
    capture.capture(gfx);
    let drawn = capture.draw(gfx, params);
    (drawn, gfx.take_target().unwrap())
}

fn assert_arrow_at(img: &ImageBuf, x: u32, y: u32) {
    assert_eq!(img.pixel(x, y), Bgra::BLACK, "tip at ({x}, {y})");
    assert_eq!(img.pixel(x + 1, y + 2), Bgra::WHITE, "fill below ({x}, {y})");
}

#[test]
fn tracks_inside_then_parks_on_last_position() {
    let mut platform = ScriptedPlatform::new().with_cursor(ARROW, arrow_cursor());
    for i in 0..10 {
        platform.push_position(ARROW, 10 + 5 * i, 20 + 3 * i);
    }
    for (x, y) in [(900, -50), (1200, 400), (-5, -5)] {
        platform.push_position(ARROW, x, y);
    }

    let mut gfx = SoftwareGraphics::new();
    let mut capture = CursorCapture::new(platform);
    let params = params(false);

    for i in 0..10 {
        let (drawn, img) = frame(&mut capture, &mut gfx, &params);
        assert!(drawn);
        assert_arrow_at(&img, 10 + 5 * i, 20 + 3 * i);
    }

    let texture = capture.cursor().texture;
    assert!(texture.is_some());

    for _ in 0..3 {
        let (drawn, img) = frame(&mut capture, &mut gfx, &params);
        assert!(drawn);
        assert_arrow_at(&img, 55, 47);
        assert_eq!(capture.cursor().texture, texture);
    }

    assert_eq!(capture.sampler().decodes(), 1);
    assert_eq!(capture.cache().len(), 1);
    assert_eq!(capture.compositor().last_valid_position(), Some(Point::new(55, 47)));
    assert_eq!(gfx.stats().textures_created, 1);

    let stats = capture.platform().stats();
    assert_eq!(stats.live_icons, 0);
    assert_eq!(stats.live_bitmaps, 0);

    capture.free(&mut gfx);
    assert_eq!(gfx.live_textures(), 0);
    assert!(!gfx.is_entered());
}

#[test]
fn nothing_drawn_before_cursor_enters() {
    let mut platform = ScriptedPlatform::new().with_cursor(ARROW, arrow_cursor());
    platform.push_position(ARROW, -40, 10);
    platform.push_position(ARROW, 500, 10);
    platform.push_position(ARROW, 40, 10);

    let mut gfx = SoftwareGraphics::new();
    let mut capture = CursorCapture::new(platform);
    let params = params(false);

    let (drawn, img) = frame(&mut capture, &mut gfx, &params);
    assert!(!drawn);
    assert!(img.data.iter().all(|&x| x == 0));

    let (drawn, _) = frame(&mut capture, &mut gfx, &params);
    assert!(!drawn);

    let (drawn, img) = frame(&mut capture, &mut gfx, &params);
    assert!(drawn);
    assert_arrow_at(&img, 40, 10);

    capture.free(&mut gfx);
}

#[test]
fn hidden_cursor_is_not_drawn() {
    let mut platform = ScriptedPlatform::new().with_cursor(ARROW, arrow_cursor());
    platform.push_frame(Some(CursorInfo {
        position: Point::new(30, 30),
        showing: false,
        id: ARROW,
    }));
    platform.push_position(ARROW, 30, 30);

    let mut gfx = SoftwareGraphics::new();
    let mut capture = CursorCapture::new(platform);
    let params = params(false);

    let (drawn, _) = frame(&mut capture, &mut gfx, &params);
    assert!(!drawn);
    assert!(!capture.cursor().visible);

    let (drawn, img) = frame(&mut capture, &mut gfx, &params);
    assert!(drawn);
    assert_arrow_at(&img, 30, 30);
    assert_eq!(capture.sampler().decodes(), 1);

    capture.free(&mut gfx);
}

#[test]
fn forced_custom_cursor_is_centered() {
    let red = Bgra::new(0xFF, 0, 0, 0xFF);
    let mut custom = ImageBuf::alloc(4, 4, None, ColorFormat::Bgra8888);
    for y in 0..4 {
        custom.bgra_row_mut(y).fill(red);
    }

    let mut platform = ScriptedPlatform::new().with_cursor(ARROW, arrow_cursor());
    platform.push_position(ARROW, 50, 60);
    platform.push_position(ARROW, 1000, 1000);

    let mut gfx = SoftwareGraphics::new();
    let mut capture = CursorCapture::new(platform);
    let uploaded = upload_custom_cursor(&mut gfx, &custom).unwrap();
    assert!(capture.replace_custom_cursor(Some(uploaded)).is_none());
    let params = params(true);

    let (drawn, img) = frame(&mut capture, &mut gfx, &params);
    assert!(drawn);
    assert_eq!(img.pixel(48, 58), red);
    assert_eq!(img.pixel(51, 61), red);
    assert_eq!(img.pixel(52, 62), Bgra::TRANSPARENT);

    // outside: the custom cursor stays parked on the last inside position
    let (drawn, img) = frame(&mut capture, &mut gfx, &params);
    assert!(drawn);
    assert_eq!(img.pixel(48, 58), red);

    capture.free(&mut gfx);
    assert_eq!(gfx.live_textures(), 0);
}
