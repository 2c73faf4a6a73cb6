mod tracks;

use std::f32::consts::FRAC_PI_2;

use anyhow::Result;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

use genomeshader_engine::core::{App, AppControl, FrameCtx};
use genomeshader_engine::logging::{init_logging, LoggingConfig};
use genomeshader_engine::text::{FontSystem, TextAlign, TextStyle};
use genomeshader_engine::window::{Runtime, RuntimeConfig};
use genomeshader_engine::{EngineConfig, RenderError};

use tracks::{synthetic_tracks, SampleTrack};

// ── palette ───────────────────────────────────────────────────────────────

const BACKGROUND: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const TEXT: &str = "#000000";
const TRACK_1: &str = "#C4D1D9";
const TRACK_2: &str = "#71838F";
const VARIANT: u32 = 0xD9534F;
const GUIDE: u32 = 0xB0B8BE;

// ── layout ────────────────────────────────────────────────────────────────

const LOCUS_LEN: u32 = 2_000;
const LABEL_WIDTH: f32 = 110.0;
const AXIS_WIDTH: f32 = 30.0;
const MARGIN: f32 = 16.0;
const TRACK_SPACING: f32 = 14.0;
const READ_HEIGHT: f32 = 8.0;
const READ_GAP: f32 = 2.0;
const FONT_SIZE: f32 = 14.0;

struct Viewer {
    tracks: Vec<SampleTrack>,
    label_style: TextStyle,
    axis_style: TextStyle,
    text_failed: bool,
}

impl Viewer {
    fn new() -> Self {
        Self {
            tracks: synthetic_tracks(3, LOCUS_LEN, 90, 0x6765_6e6f),
            label_style: TextStyle::new().font_size(FONT_SIZE).fill(TEXT),
            axis_style: TextStyle::new()
                .font_size(FONT_SIZE)
                .fill(TRACK_2)
                .align(TextAlign::Center),
            text_failed: false,
        }
    }

    fn note_text_result(&mut self, result: Result<(), RenderError>) {
        if let Err(e) = result {
            if !self.text_failed {
                log::error!("text unavailable: {e}");
                self.text_failed = true;
            }
        }
    }
}

impl App for Viewer {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        if let WindowEvent::KeyboardInput { event, .. } = event {
            if event.state == ElementState::Pressed && event.logical_key == Key::Named(NamedKey::Escape) {
                return AppControl::Exit;
            }
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let [width, height] = ctx.screen_size();
        let engine = &mut *ctx.engine;
        engine.clear();

        let left = MARGIN + AXIS_WIDTH + LABEL_WIDTH;
        let track_w = (width - left - MARGIN).max(1.0);
        let scale = track_w / LOCUS_LEN as f32;
        let to_x = |pos: u32| left + pos as f32 * scale;

        // Guide lines every 250 bp.
        for pos in (0..=LOCUS_LEN).step_by(250) {
            let x = to_x(pos);
            engine.add_line(x, MARGIN, x, height - MARGIN, GUIDE, 1.0);
        }

        let mut results = Vec::new();
        let mut y = MARGIN;
        for (i, track) in self.tracks.iter().enumerate() {
            let rows = track.rows().max(1) as f32;
            let track_h = rows * (READ_HEIGHT + READ_GAP) + READ_GAP;

            // Background: fill-only mode.
            engine.add_rect(left, y, track_w, track_h, TRACK_1, 0.3);

            results.push(engine.add_text(MARGIN + AXIS_WIDTH, y + 2.0, &track.name, &self.label_style));

            // Reads: opaque node mode.
            for read in &track.reads {
                let ry = y + READ_GAP + read.row as f32 * (READ_HEIGHT + READ_GAP);
                let color = if i % 2 == 0 { TRACK_2 } else { TRACK_1 };
                engine.add_rect(to_x(read.start), ry, (read.end - read.start) as f32 * scale, READ_HEIGHT, color, 1.0);
            }

            // Variant markers above the track.
            for &pos in &track.variants {
                let x = to_x(pos);
                engine.add_triangle(x - 5.0, y - 1.0, x + 5.0, y - 1.0, x, y + 8.0, VARIANT, 1.0);
            }

            y += track_h + TRACK_SPACING;
        }

        // Selection outline: stroke-only mode.
        let (sel_start, sel_end) = (LOCUS_LEN / 3, LOCUS_LEN / 2);
        engine.add_rect(
            to_x(sel_start),
            MARGIN - 4.0,
            (sel_end - sel_start) as f32 * scale,
            (y - MARGIN).max(1.0),
            TEXT,
            0.7,
        );

        results.push(engine.add_text_rotated(MARGIN, MARGIN, "reads", &self.axis_style, -FRAC_PI_2));

        for r in results {
            self.note_text_result(r);
        }

        ctx.render()
    }
}

fn load_font() -> Option<Vec<u8>> {
    [
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut fonts = FontSystem::new();
    match load_font() {
        Some(bytes) => {
            fonts.load_font("sans-serif", 400, &bytes)?;
        }
        None => log::warn!("no system font found; labels will not render"),
    }

    let config = RuntimeConfig {
        title: "GenomeShader".to_string(),
        initial_size: LogicalSize::new(1000.0, 640.0),
    };
    let engine = EngineConfig::default()
        .with_fonts(fonts)
        .with_clear_color(BACKGROUND);

    Runtime::run(config, engine, Viewer::new())
}
