//! The frame loop. It is the control-flow root of the harness: every other
//! component is a passive resource this module drives, owns for the duration
//! of the run, and tears down in order on the way out.

pub mod time;

use crate::errors::Result;
use crate::input::Key;
use crate::math::Color;
use crate::video::device::Device;
use crate::video::mesh::Mesh;
use crate::video::shader::ShaderProgram;
use crate::video::texture::Texture2D;
use crate::window::{WindowEvent, WindowSurface};

use self::time::FrameClock;

/// The lifecycle of the frame loop.
///
/// `Running` moves to `ExitRequested` when the surface reports a close
/// request or the exit key is observed pressed during input processing;
/// `ExitRequested` moves to `Terminated` only after the current frame's draw
/// and present steps complete. A frame in flight always finishes.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LoopState {
    Running,
    ExitRequested,
    Terminated,
}

/// A time-varying vec4 recomputed and pushed into the program every frame,
/// e.g. a sine-driven color channel. `update` maps elapsed seconds to the
/// uniform value.
pub struct UniformPulse {
    pub name: String,
    pub update: fn(f32) -> [f32; 4],
}

/// Everything one run draws: a linked program, a mesh, an optional texture
/// bound to sampler unit 0, and an optional animated uniform.
pub struct Scene {
    pub program: ShaderProgram,
    pub mesh: Mesh,
    pub texture: Option<Texture2D>,
    pub pulse: Option<UniformPulse>,
}

/// Drives the per-frame cycle: poll input, check the exit condition, clear,
/// bind, update uniforms, draw, present. Owns the scene's resources from
/// `run` until the ordered teardown that follows loop exit.
pub struct RunLoop {
    state: LoopState,
    background: Color,
    exit_key: Key,
    frames: u64,
}

impl Default for RunLoop {
    fn default() -> Self {
        RunLoop {
            state: LoopState::Running,
            background: Color::rgba(0.2, 0.3, 0.3, 1.0),
            exit_key: Key::Escape,
            frames: 0,
        }
    }
}

impl RunLoop {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn with_exit_key(mut self, key: Key) -> Self {
        self.exit_key = key;
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Frames fully drawn and presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Runs until an exit is requested and the in-flight frame has been
    /// presented, then disposes the scene's resources in order: mesh, then
    /// texture, then program. Returns the number of frames presented.
    ///
    /// Teardown happens on every exit. An error aborting the loop still
    /// releases the scene's objects before the error propagates out.
    ///
    /// The surrounding process keeps ownership of the window surface and
    /// context; destroying those after this returns is its job.
    pub fn run<W, D>(&mut self, window: &mut W, device: &mut D, mut scene: Scene) -> Result<u64>
    where
        W: WindowSurface + ?Sized,
        D: Device + ?Sized,
    {
        let outcome = self.drive(window, device, &mut scene);

        let Scene {
            program,
            mesh,
            texture,
            ..
        } = scene;

        let teardown = mesh
            .dispose(device)
            .and_then(|_| match texture {
                Some(texture) => texture.dispose(device),
                None => Ok(()),
            })
            .and_then(|_| program.dispose(device));

        // A loop error outranks whatever teardown reported after it.
        outcome.and(teardown)?;

        info!("run loop terminated after {} frames", self.frames);
        Ok(self.frames)
    }

    fn drive<W, D>(&mut self, window: &mut W, device: &mut D, scene: &mut Scene) -> Result<()>
    where
        W: WindowSurface + ?Sized,
        D: Device + ?Sized,
    {
        let clock = FrameClock::start();
        let mut events = Vec::new();

        unsafe {
            device.set_viewport(window.dimensions())?;
        }

        while self.state != LoopState::Terminated {
            // 1. Pump the platform event queue; resizes go straight into the
            // viewport rather than through any global callback state.
            events.clear();
            window.poll_events(&mut events);
            for event in events.drain(..) {
                if let WindowEvent::FramebufferResized(dimensions) = event {
                    unsafe {
                        device.set_viewport(dimensions)?;
                    }
                }
            }

            // 2. Exit condition. The frame below still runs to completion.
            if self.state == LoopState::Running
                && (window.should_close() || window.is_key_pressed(self.exit_key))
            {
                info!("close requested, finishing the frame in flight");
                self.state = LoopState::ExitRequested;
            }

            // 3-7. Clear, bind, animate, draw. Fixed order, no step skipped
            // even on a quiescent frame.
            unsafe {
                device.clear(self.background)?;
            }
            scene.program.bind(device)?;
            if let Some(pulse) = scene.pulse.as_ref() {
                let value = (pulse.update)(clock.elapsed_secs());
                scene.program.set_uniform_4f(device, &pulse.name, value)?;
            }
            if let Some(texture) = scene.texture.as_ref() {
                texture.bind(device, 0)?;
            }
            scene.mesh.draw(device)?;

            // 8. Present.
            window.swap_buffers()?;
            self.frames += 1;

            if self.state == LoopState::ExitRequested {
                self.state = LoopState::Terminated;
            }
        }

        Ok(())
    }
}
