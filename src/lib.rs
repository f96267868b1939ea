//! `glint` is a minimal real-time rendering harness. It opens a window with
//! an OpenGL context, compiles and links shader programs from source text,
//! uploads vertex/index data into GPU-resident buffers, and runs a per-frame
//! loop that processes input, updates uniform state, issues a draw call and
//! presents the result. It exists to render simple 2D primitives as a
//! teaching vehicle for the graphics pipeline, not to be a general engine.
//!
//! The GPU sits behind the [`Device`](video/device/trait.Device.html) trait.
//! [`GlDevice`](video/device/gl/struct.GlDevice.html) talks to a real OpenGL
//! context; [`HeadlessDevice`](video/device/headless/struct.HeadlessDevice.html)
//! accepts the same calls without a GPU and records them, which is what the
//! test-suite runs against. The window and context are likewise reached
//! through the [`WindowSurface`](window/trait.WindowSurface.html) capability,
//! with a glutin-backed implementation in [`window`](window/index.html).
//!
//! All of it is single-threaded: the context is affine to the thread that
//! created it, and every operation in this crate must stay on that thread.

#[macro_use]
extern crate log;

pub mod application;
pub mod errors;
pub mod input;
pub mod math;
pub mod video;
pub mod window;

pub mod prelude {
    pub use crate::application::time::FrameClock;
    pub use crate::application::{LoopState, RunLoop, Scene, UniformPulse};
    pub use crate::errors::{Error, Result};
    pub use crate::input::Key;
    pub use crate::math::{Color, Vector2};
    pub use crate::video::prelude::*;
    pub use crate::window::{GlutinWindow, WindowEvent, WindowParams, WindowSurface};
}
