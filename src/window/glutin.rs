//! The glutin-backed window surface: one window, one GL context, both alive
//! for the whole run and affine to the creating thread.

use gl;
use glutin;
use glutin::GlContext;

use crate::errors::Result;
use crate::input::{Key, KeyboardState};
use crate::math::Vector2;

use super::{WindowEvent, WindowParams, WindowSurface};

pub struct GlutinWindow {
    window: glutin::GlWindow,
    events_loop: glutin::EventsLoop,
    keyboard: KeyboardState,
    close_requested: bool,
}

impl GlutinWindow {
    /// Creates the window and context, makes the context current on this
    /// thread, and loads the GL function pointers from it.
    pub fn new(params: WindowParams) -> Result<Self> {
        let builder = glutin::WindowBuilder::new()
            .with_title(params.title)
            .with_dimensions(glutin::dpi::LogicalSize::new(
                f64::from(params.size.x),
                f64::from(params.size.y),
            ));

        let context = glutin::ContextBuilder::new()
            .with_multisampling(params.multisample)
            .with_gl_profile(glutin::GlProfile::Core)
            .with_gl(glutin::GlRequest::Latest)
            .with_vsync(params.vsync);

        let events_loop = glutin::EventsLoop::new();
        let window = glutin::GlWindow::new(builder, context, &events_loop)?;

        unsafe {
            window.make_current()?;
            gl::load_with(|symbol| window.get_proc_address(symbol) as *const _);
        }

        info!("window up at {:?} points", params.size);

        Ok(GlutinWindow {
            window,
            events_loop,
            keyboard: KeyboardState::new(),
            close_requested: false,
        })
    }

    fn dispatch(&mut self, event: glutin::Event, out: &mut Vec<WindowEvent>) {
        let event = match event {
            glutin::Event::WindowEvent { event, .. } => event,
            _ => return,
        };

        match event {
            glutin::WindowEvent::CloseRequested => {
                self.close_requested = true;
                out.push(WindowEvent::CloseRequested);
            }

            glutin::WindowEvent::Resized(size) => {
                let physical = size.to_physical(self.window.get_hidpi_factor());
                self.window.resize(physical);
                out.push(WindowEvent::FramebufferResized(Vector2::new(
                    physical.width as u32,
                    physical.height as u32,
                )));
            }

            glutin::WindowEvent::KeyboardInput {
                input:
                    glutin::KeyboardInput {
                        state,
                        virtual_keycode: Some(code),
                        ..
                    },
                ..
            } => {
                if let Some(key) = from_virtual_key_code(code) {
                    match state {
                        glutin::ElementState::Pressed => self.keyboard.press(key),
                        glutin::ElementState::Released => self.keyboard.release(key),
                    }
                }
            }

            _ => {}
        }
    }
}

impl WindowSurface for GlutinWindow {
    fn poll_events(&mut self, events: &mut Vec<WindowEvent>) {
        let mut raw = Vec::new();
        self.events_loop.poll_events(|v| raw.push(v));

        for event in raw {
            self.dispatch(event, events);
        }
    }

    #[inline]
    fn should_close(&self) -> bool {
        self.close_requested
    }

    #[inline]
    fn request_close(&mut self) {
        self.close_requested = true;
    }

    #[inline]
    fn is_key_pressed(&self, key: Key) -> bool {
        self.keyboard.is_pressed(key)
    }

    fn dimensions(&self) -> Vector2<u32> {
        let size = self
            .window
            .get_inner_size()
            .unwrap()
            .to_physical(self.window.get_hidpi_factor());
        Vector2::new(size.width as u32, size.height as u32)
    }

    fn swap_buffers(&mut self) -> Result<()> {
        self.window.swap_buffers()?;
        Ok(())
    }
}

fn from_virtual_key_code(code: glutin::VirtualKeyCode) -> Option<Key> {
    match code {
        glutin::VirtualKeyCode::Escape => Some(Key::Escape),
        glutin::VirtualKeyCode::Space => Some(Key::Space),
        glutin::VirtualKeyCode::Return => Some(Key::Return),
        glutin::VirtualKeyCode::Left => Some(Key::Left),
        glutin::VirtualKeyCode::Right => Some(Key::Right),
        glutin::VirtualKeyCode::Up => Some(Key::Up),
        glutin::VirtualKeyCode::Down => Some(Key::Down),
        glutin::VirtualKeyCode::W => Some(Key::W),
        glutin::VirtualKeyCode::A => Some(Key::A),
        glutin::VirtualKeyCode::S => Some(Key::S),
        glutin::VirtualKeyCode::D => Some(Key::D),
        _ => None,
    }
}
