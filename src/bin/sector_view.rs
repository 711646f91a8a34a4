//! sector_view.rs - walk around the sample map in a minifb window.
//!
//! USAGE:
//! ```bash
//! RUST_LOG=sector_caster=debug cargo run --release -- --width 960 --height 540
//! ```
//!
//! Keys: WASD move, Space/Shift up/down, mouse or ←/→ ↑/↓ look,
//! P play/pause, N next render area (paused), R restart pass, Esc quit.

use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use glam::Vec2;
use log::info;
use minifb::{Key, KeyRepeat, MouseMode, Scale, Window, WindowOptions};

use sector_caster::{
    engine::{Engine, Rasterizer, Screen},
    renderer::{Renderer, Software, color::MAGENTA},
    world::{CameraInput, MoveButtons, sample_camera, sample_level},
};

/// Look speed of the arrow keys, in pointer pixels per frame.
const ARROW_LOOK: f32 = 15.0;

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Render target width in pixels
    #[arg(long, default_value_t = 960)]
    width: u32,

    /// Render target height in pixels
    #[arg(long, default_value_t = 540)]
    height: u32,

    /// Window scale factor (1, 2 or 4)
    #[arg(long, default_value_t = 1)]
    scale: u8,

    /// Horizontal field of view in degrees, below 180
    #[arg(long, default_value_t = 60.0, value_parser = parse_fov)]
    fov: f32,

    /// Maximum render areas per frame
    #[arg(long, default_value_t = 25)]
    budget: u32,

    /// Start paused, stepping one render area per `N`
    #[arg(long)]
    step: bool,

    /// Do not mark span tips
    #[arg(long)]
    no_edges: bool,

    /// Fill open portal windows until their sector is drawn
    #[arg(long)]
    placeholder: bool,
}

/// Edge columns sit `fov / 2` off-axis; from 180° on their cosine is not
/// positive and the projected heights turn negative.
fn parse_fov(s: &str) -> Result<f32, String> {
    let fov: f32 = s.parse().map_err(|e| format!("`{s}` is not a number: {e}"))?;
    if fov > 0.0 && fov < 180.0 {
        Ok(fov)
    } else {
        Err(format!("{fov} is outside 0..180 degrees"))
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opts = Opts::parse();

    let level = sample_level().context("building sample map")?;

    let mut camera = sample_camera();
    camera.fov = opts.fov.to_radians();
    camera.max_iterations = opts.budget;

    let screen = Screen::new(opts.width, opts.height);
    let (w, h) = (opts.width as usize, opts.height as usize);

    let mut engine = Engine::new(Software::default(), &level, camera, screen);
    engine.options.edge_markers = !opts.no_edges;
    if opts.placeholder {
        engine.options.portal_placeholder = Some(MAGENTA);
    }

    let scale = match opts.scale {
        2 => Scale::X2,
        4 => Scale::X4,
        _ => Scale::X1,
    };
    let mut win = Window::new(
        "sector-caster",
        w,
        h,
        WindowOptions {
            scale,
            ..WindowOptions::default()
        },
    )?;
    win.set_target_fps(144);

    // ────────────────── play / step state ──────────────────────────────
    let mut playing = !opts.step;
    let mut stepper: Option<Rasterizer<'_>> = None;

    let mut last_mouse: Option<Vec2> = None;
    let mut last_frame = Instant::now();
    let mut frames = 0usize;
    let mut last_title = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let dt = last_frame.elapsed().as_secs_f32();
        last_frame = Instant::now();

        if win.is_key_pressed(Key::P, KeyRepeat::No) {
            playing = !playing;
            stepper = None;
            info!("{}", if playing { "play" } else { "paused" });
        }

        let mut shown = Ok(());
        if playing {
            let input = read_input(&win, &mut last_mouse);
            engine.camera.update(dt, &input);
            engine.render_frame(|fb, fw, fh| shown = win.update_with_buffer(fb, fw, fh));
        } else {
            let restart = win.is_key_pressed(Key::R, KeyRepeat::No);
            if stepper.is_none() || restart {
                engine.locate_camera();
                engine.renderer.begin_frame(w, h);
                stepper = Some(engine.begin_pass());
            }

            if let Some(pass) = stepper.as_mut() {
                if win.is_key_pressed(Key::N, KeyRepeat::Yes) && pass.has_remaining_work() {
                    pass.step_once(&mut engine.renderer);
                    info!(
                        "iteration {}: new areas {:?}, pending {}",
                        pass.iteration(),
                        pass.last_discovered(),
                        pass.pending().len()
                    );
                }
            }
            engine
                .renderer
                .end_frame(|fb, fw, fh| shown = win.update_with_buffer(fb, fw, fh));
        }
        shown?;

        // ─────────── window title every ~1 s ────────────────────
        frames += 1;
        if last_title.elapsed() >= Duration::from_secs(1) {
            let fps = frames as f64 / last_title.elapsed().as_secs_f64();
            let mode = if playing { "play" } else { "step" };
            win.set_title(&format!(
                "sector-caster [{fps:.0} FPS, {mode}, sector {}]",
                engine.camera.current_sector
            ));
            frames = 0;
            last_title = Instant::now();
        }
    }
    Ok(())
}

/// Sample keyboard and pointer for one frame. Pointer motion is turned into
/// a frame-relative delta against the previous sample.
fn read_input(win: &Window, last_mouse: &mut Option<Vec2>) -> CameraInput {
    let mut buttons = MoveButtons::empty();
    for (key, button) in [
        (Key::W, MoveButtons::FORWARD),
        (Key::S, MoveButtons::BACK),
        (Key::A, MoveButtons::LEFT),
        (Key::D, MoveButtons::RIGHT),
        (Key::Space, MoveButtons::UP),
        (Key::LeftShift, MoveButtons::DOWN),
    ] {
        if win.is_key_down(key) {
            buttons |= button;
        }
    }

    let mut look_delta = Vec2::ZERO;
    if let Some((mx, my)) = win.get_mouse_pos(MouseMode::Pass) {
        let now = Vec2::new(mx, my);
        if let Some(prev) = *last_mouse {
            look_delta += now - prev;
        }
        *last_mouse = Some(now);
    }

    if win.is_key_down(Key::Left) {
        look_delta.x -= ARROW_LOOK;
    }
    if win.is_key_down(Key::Right) {
        look_delta.x += ARROW_LOOK;
    }
    if win.is_key_down(Key::Up) {
        look_delta.y -= ARROW_LOOK;
    }
    if win.is_key_down(Key::Down) {
        look_delta.y += ARROW_LOOK;
    }

    CameraInput {
        buttons,
        look_delta,
    }
}
