use anyhow::{Context, Result};
use clap::Parser;
use cursor_capture::config::CaptureConfig;
use cursor_capture::cursor::{CursorCapture, CursorId, CursorPlatform, DrawParams};
use cursor_capture::graphics::SoftwareGraphics;
use cursor_capture::image::{ColorFormat, ImageBuf};
use cursor_capture::overlay::RecordingOverlay;
use cursor_capture::platform::scripted::{arrow_cursor, ScriptedPlatform};
use cursor_capture::recording::{RecordingSession, RecordingState};
use cursor_capture::snapshot::SnapshotEncoder;
use cursor_capture::util::{PerformanceMonitor, Timer};
use log::{debug, error, info};
use std::path::PathBuf;
use std::time::{Duration, Instant};

const ABOUT: &str = "Capture frames with the mouse cursor composited in, writing \
periodic JPEG snapshots.";

#[derive(Parser, Debug)]
#[command(version, about = ABOUT, long_about = None)]
struct Args {
    /// JSON capture config. Built-in defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to capture.
    #[arg(long, default_value_t = 150)]
    frames: u64,

    /// Target frame rate.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Directory snapshots are written to.
    #[arg(long, default_value = "snapshots")]
    output: PathBuf,

    /// Draw the custom cursor instead of the system one.
    #[arg(long)]
    force_custom: bool,

    /// Replay a scripted cursor over blank frames instead of capturing the desktop.
    #[arg(long)]
    scripted: bool,
}

const SCRIPTED_RESOLUTION: (u32, u32) = (640, 480);

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => CaptureConfig::load(path)?,
        None => CaptureConfig::default(),
    };
    debug!("{config:?}");

    cfg_if::cfg_if! {
        if #[cfg(windows)] {
            if !args.scripted {
                return run_desktop(&args, &config);
            }
        } else {
            if !args.scripted {
                info!("Desktop capture is only available on Windows, replaying a scripted cursor");
            }
        }
    }

    let (width, height) = SCRIPTED_RESOLUTION;
    let platform = scripted_platform(args.frames, width, height);
    run(&args, &config, platform, SCRIPTED_RESOLUTION, move || {
        Ok(ImageBuf::alloc(width, height, None, ColorFormat::Bgra8888))
    })
}

#[cfg(windows)]
fn run_desktop(args: &Args, config: &CaptureConfig) -> Result<()> {
    use cursor_capture::platform::win32::{init_dpi, GdiDesktopCapture, Win32CursorPlatform};

    init_dpi();
    let mut desktop = GdiDesktopCapture::new()?;
    let resolution = desktop.resolution();
    run(args, config, Win32CursorPlatform::new(), resolution, move || desktop.grab())
}

/// The arrow sweeps diagonally and overshoots the bottom-right corner.
fn scripted_platform(frames: u64, width: u32, height: u32) -> ScriptedPlatform {
    let id = CursorId(1);
    let mut platform = ScriptedPlatform::new().with_cursor(id, arrow_cursor());

    let steps = frames.max(1) as f64;
    for i in 0..frames {
        let t = 1.25 * i as f64 / steps;
        platform.push_position(id, (t * width as f64) as i32, (t * height as f64) as i32);
    }

    platform
}

fn run<P, F>(args: &Args, config: &CaptureConfig, platform: P, resolution: (u32, u32), mut grab: F) -> Result<()>
where
    P: CursorPlatform,
    F: FnMut() -> Result<ImageBuf>,
{
    let (width, height) = resolution;
    info!("Capturing {} frames at {width}x{height}", args.frames);

    let mut gfx = SoftwareGraphics::new();
    let mut capture = CursorCapture::init(platform, &mut gfx, config);
    let params = DrawParams {
        x_offset: 0,
        y_offset: 0,
        width: width as i32,
        height: height as i32,
        force_custom: args.force_custom,
    };

    let mut snapshots = if config.snapshot_every > 0 {
        std::fs::create_dir_all(&args.output)
            .with_context(|| format!("unable to create {}", args.output.display()))?;
        Some(SnapshotEncoder::new(width, height, 90)?)
    } else {
        None
    };

    let (overlay, events) = RecordingOverlay::new();
    overlay.show();
    let mut session = RecordingSession::start(events, overlay.handle(), Instant::now());

    let frame_interval = Duration::from_secs(1) / args.fps.max(1);
    let mut overlay_timer = Timer::new(Duration::from_millis(config.timer_interval_ms));
    let mut stats_timer = Timer::new(Duration::from_secs(5));
    let mut perf = PerformanceMonitor::new();
    let mut drawn_frames = 0u64;
    let mut written = 0u64;

    for index in 0..args.frames {
        let frame_start = Instant::now();
        session.process_events(frame_start);
        if overlay_timer.poll() {
            session.tick(frame_start);
        }

        match session.state() {
            RecordingState::Stopped => break,
            RecordingState::Paused => {
                std::thread::sleep(frame_interval);
                continue;
            }
            RecordingState::Recording => (),
        }

        let frame = match grab() {
            Ok(x) => x,
            Err(e) => {
                error!("Capture failed: {e:#}");
                break;
            }
        };

        gfx.bind_target(frame);
        if config.capture_cursor {
            let _zone = perf.start_zone();
            capture.capture(&mut gfx);
            if capture.draw(&mut gfx, &params) {
                drawn_frames += 1;
            }
        }
        let frame = gfx.take_target().context("render target went missing")?;

        if let Some(encoder) = &mut snapshots {
            if index % config.snapshot_every as u64 == 0 {
                match encoder.write(frame.as_ref(), &args.output, index) {
                    Ok(_) => written += 1,
                    Err(e) => error!("Snapshot failed: {e:#}"),
                }
            }
        }

        if stats_timer.poll() {
            if let Some(stats) = perf.get() {
                info!(
                    "cursor min={:?} avg={:?} max={:?}",
                    stats.min, stats.avg, stats.max
                );
            }
        }

        if let Some(rest) = frame_interval.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    overlay.on_stop_clicked();
    let now = Instant::now();
    session.process_events(now);
    session.tick(now);

    info!(
        "Recorded {} ({:?}), cursor drawn on {drawn_frames} frames, wrote {written} snapshots",
        overlay.view().timer_text,
        session.elapsed(now)
    );

    capture.free(&mut gfx);
    Ok(())
}
