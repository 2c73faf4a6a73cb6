//! Device, surface and projection management.
//!
//! - acquires the wgpu adapter/device/queue and configures the window surface
//! - owns the orthographic projection uniform shared by all pipelines
//! - debounces resize requests and applies them at frame start

mod context;
mod init;
mod projection;
mod resize;
mod surface;

pub use context::{RenderContext, SurfaceFrame};
pub use init::GpuInit;
pub use projection::{Projection, ProjectionUniform};
pub use resize::ResizeDebouncer;
pub use surface::SurfaceRecovery;
