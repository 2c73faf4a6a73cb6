use crate::device::GpuInit;
use crate::text::FontSystem;

/// Everything [`Engine::new`](crate::Engine::new) needs besides the window.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub gpu: GpuInit,

    /// Straight RGBA the surface is cleared to each frame.
    pub clear_color: [f32; 4],

    /// Faces available to the text renderer.
    pub fonts: FontSystem,

    /// The text cache logs one warning once it holds more entries than this.
    /// Entries are never evicted.
    pub text_cache_warn_entries: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gpu: GpuInit::default(),
            clear_color: [1.0, 1.0, 1.0, 1.0],
            fonts: FontSystem::new(),
            text_cache_warn_entries: 4096,
        }
    }
}

impl EngineConfig {
    pub fn with_fonts(mut self, fonts: FontSystem) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn with_clear_color(mut self, clear_color: [f32; 4]) -> Self {
        self.clear_color = clear_color;
        self
    }
}
