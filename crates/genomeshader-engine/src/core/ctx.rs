use winit::window::Window;

use crate::engine::{Engine, FrameOutcome};

use super::app::AppControl;

/// Per-frame context passed to [`App::on_frame`](super::App::on_frame).
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Engine<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: &'a Window,
    pub engine: &'a mut Engine<'w>,
    /// Frames rendered so far in this window.
    pub frame_index: u64,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Surface size in pixels.
    pub fn screen_size(&self) -> [f32; 2] {
        self.engine.screen_size()
    }

    /// Renders and presents the queued instances.
    ///
    /// Per-frame failures are logged and the loop continues; only an
    /// unrecoverable surface asks the runtime to exit.
    pub fn render(&mut self) -> AppControl {
        self.window.pre_present_notify();
        match self.engine.render_frame() {
            Ok(FrameOutcome::Rendered { draw_calls }) => {
                log::trace!("frame {}: {draw_calls} draw calls", self.frame_index);
                AppControl::Continue
            }
            Ok(FrameOutcome::Skipped) => AppControl::Continue,
            Err(e) if e.is_fatal() => {
                log::error!("{e}");
                AppControl::Exit
            }
            Err(e) => {
                log::error!("frame {} failed: {e}", self.frame_index);
                AppControl::Continue
            }
        }
    }
}
