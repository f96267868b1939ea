//! Represents an OpenGL context and the window or environment around it.
//!
//! The core of the crate treats the window as an opaque capability behind
//! [`WindowSurface`]: something that pumps platform events, answers key and
//! close-request queries, and presents finished frames. The glutin-backed
//! implementation lives in this module; tests substitute scripted ones.

mod glutin;

pub use self::glutin::GlutinWindow;

use crate::errors::Result;
use crate::input::Key;
use crate::math::Vector2;

/// The setup parameters of the window and its context.
#[derive(Debug, Clone)]
pub struct WindowParams {
    /// Sets the title of window.
    pub title: String,
    /// Sets the size in *points* of the client area of the window.
    pub size: Vector2<u32>,
    /// Sets the multisampling level to request. A value of 0 indicates that
    /// multisampling must not be enabled.
    pub multisample: u16,
    /// Specifies whether should we have vsync.
    pub vsync: bool,
}

impl Default for WindowParams {
    fn default() -> Self {
        WindowParams {
            title: "Window".to_owned(),
            size: Vector2::new(800, 600),
            multisample: 0,
            vsync: true,
        }
    }
}

/// Window happenings the frame loop reacts to. Key transitions stay inside
/// the surface and are exposed through [`WindowSurface::is_key_pressed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// The user asked the window to close.
    CloseRequested,
    /// The framebuffer changed size; the new dimensions are in physical
    /// pixels and should be forwarded into a viewport update.
    FramebufferResized(Vector2<u32>),
}

/// The capability the frame loop consumes. Everything about window and
/// context creation, event polling and presentation hides behind it.
pub trait WindowSurface {
    /// Pumps pending platform events, translating the interesting ones into
    /// `events`. Must be called once per frame before anything else.
    fn poll_events(&mut self, events: &mut Vec<WindowEvent>);

    /// True once a close was requested by the user or by `request_close`.
    fn should_close(&self) -> bool;

    /// Flags the surface for closing; the frame in flight still completes.
    fn request_close(&mut self);

    /// Raw key-state query, valid as of the last `poll_events`.
    fn is_key_pressed(&self, key: Key) -> bool;

    /// The framebuffer dimensions in physical pixels.
    fn dimensions(&self) -> Vector2<u32>;

    /// Presents the finished frame. Blocks under the display's
    /// synchronization policy when vsync is on.
    fn swap_buffers(&mut self) -> Result<()>;
}
