use glint::prelude::*;

/// A window surface driven by a script instead of a display: it reports the
/// exit key held from a chosen frame onwards and counts presentations.
struct ScriptedWindow {
    frame: usize,
    exit_key_from_frame: Option<usize>,
    close_from_frame: Option<usize>,
    resize_on_frame: Option<(usize, Vector2<u32>)>,
    close_requested: bool,
    swaps: usize,
}

impl ScriptedWindow {
    fn new() -> Self {
        ScriptedWindow {
            frame: 0,
            exit_key_from_frame: None,
            close_from_frame: None,
            resize_on_frame: None,
            close_requested: false,
            swaps: 0,
        }
    }
}

impl WindowSurface for ScriptedWindow {
    fn poll_events(&mut self, events: &mut Vec<WindowEvent>) {
        self.frame += 1;

        if let Some((frame, dimensions)) = self.resize_on_frame {
            if frame == self.frame {
                events.push(WindowEvent::FramebufferResized(dimensions));
            }
        }

        if let Some(frame) = self.close_from_frame {
            if self.frame >= frame {
                self.close_requested = true;
                events.push(WindowEvent::CloseRequested);
            }
        }
    }

    fn should_close(&self) -> bool {
        self.close_requested
    }

    fn request_close(&mut self) {
        self.close_requested = true;
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        key == Key::Escape
            && self
                .exit_key_from_frame
                .map_or(false, |frame| self.frame >= frame)
    }

    fn dimensions(&self) -> Vector2<u32> {
        Vector2::new(800, 600)
    }

    fn swap_buffers(&mut self) -> Result<()> {
        self.swaps += 1;
        Ok(())
    }
}

fn scene(device: &mut HeadlessDevice, with_texture: bool) -> Scene {
    let program = ShaderProgram::link(
        device,
        "#version 330 core\nvoid main(){}\n",
        "#version 330 core\nvoid main(){}\n",
    )
    .unwrap();

    let vertices = [
        0.0, 0.5, 0.0, //
        0.5, -0.5, 0.0, //
        -0.5, -0.5, 0.0,
    ];
    let layout = VertexLayout::build().with(0, 3).finish();
    let mesh = Mesh::new(device, &vertices, &layout, None).unwrap();

    let texture = if with_texture {
        Some(
            Texture2D::new(
                device,
                &[0u8; 16],
                Vector2::new(2, 2),
                8,
                &TextureSampling::default(),
            )
            .unwrap(),
        )
    } else {
        None
    };

    Scene {
        program,
        mesh,
        texture,
        pulse: Some(UniformPulse {
            name: "u_tint".to_owned(),
            update: |t| [0.0, t.sin(), 0.0, 1.0],
        }),
    }
}

#[test]
fn exit_key_finishes_the_frame_in_flight() {
    let mut device = HeadlessDevice::new();
    let mut window = ScriptedWindow::new();
    window.exit_key_from_frame = Some(3);

    let mut run_loop = RunLoop::new();
    let scene = scene(&mut device, true);
    let frames = run_loop.run(&mut window, &mut device, scene).unwrap();

    // The exit key is observed on frame 3; that frame still draws and
    // presents, and no frame 4 begins.
    assert_eq!(frames, 3);
    assert_eq!(window.swaps, 3);
    assert_eq!(device.draw_calls().len(), 3);
    assert_eq!(device.clears(), 3);
    assert_eq!(run_loop.state(), LoopState::Terminated);
}

#[test]
fn close_request_terminates_after_one_more_present() {
    let mut device = HeadlessDevice::new();
    let mut window = ScriptedWindow::new();
    window.close_from_frame = Some(1);

    let mut run_loop = RunLoop::new();
    let scene = scene(&mut device, false);
    let frames = run_loop.run(&mut window, &mut device, scene).unwrap();

    assert_eq!(frames, 1);
    assert_eq!(window.swaps, 1);
    assert_eq!(run_loop.state(), LoopState::Terminated);
}

#[test]
fn teardown_leaves_no_live_handles() {
    let mut device = HeadlessDevice::new();
    let mut window = ScriptedWindow::new();
    window.exit_key_from_frame = Some(2);

    let scene = scene(&mut device, true);
    assert!(device.live_objects() > 0);

    RunLoop::new()
        .run(&mut window, &mut device, scene)
        .unwrap();

    assert_eq!(device.live_objects(), 0);
}

#[test]
fn pulse_uniform_written_every_frame() {
    let mut device = HeadlessDevice::new();
    let mut window = ScriptedWindow::new();
    window.exit_key_from_frame = Some(4);

    let scene = scene(&mut device, false);
    RunLoop::new()
        .run(&mut window, &mut device, scene)
        .unwrap();

    // One write per frame, resolved through a single location lookup.
    assert_eq!(device.uniform_writes().len(), 4);
    assert_eq!(device.uniform_lookups(), 1);
    // Alpha stays pinned at 1 while green oscillates.
    assert!(device.uniform_writes().iter().all(|&(_, v)| v[3] == 1.0));
}

#[test]
fn resize_forwards_into_viewport() {
    let mut device = HeadlessDevice::new();
    let mut window = ScriptedWindow::new();
    window.exit_key_from_frame = Some(3);
    window.resize_on_frame = Some((2, Vector2::new(1024, 768)));

    let scene = scene(&mut device, false);
    RunLoop::new()
        .run(&mut window, &mut device, scene)
        .unwrap();

    assert_eq!(device.viewport(), Some(Vector2::new(1024, 768)));
}

#[test]
fn startup_viewport_comes_from_the_surface() {
    let mut device = HeadlessDevice::new();
    let mut window = ScriptedWindow::new();
    window.close_from_frame = Some(1);

    let scene = scene(&mut device, false);
    RunLoop::new()
        .run(&mut window, &mut device, scene)
        .unwrap();

    // Never resized, so the viewport is the surface's framebuffer size.
    assert_eq!(device.viewport(), Some(Vector2::new(800, 600)));
}

#[test]
fn error_abort_still_releases_scene_resources() {
    struct BrokenSwapWindow(ScriptedWindow);

    impl WindowSurface for BrokenSwapWindow {
        fn poll_events(&mut self, events: &mut Vec<WindowEvent>) {
            self.0.poll_events(events);
        }
        fn should_close(&self) -> bool {
            self.0.should_close()
        }
        fn request_close(&mut self) {
            self.0.request_close();
        }
        fn is_key_pressed(&self, key: Key) -> bool {
            self.0.is_key_pressed(key)
        }
        fn dimensions(&self) -> Vector2<u32> {
            self.0.dimensions()
        }
        fn swap_buffers(&mut self) -> Result<()> {
            if self.0.frame >= 2 {
                return Err(Error::Window("device lost".to_owned()));
            }
            self.0.swap_buffers()
        }
    }

    let mut device = HeadlessDevice::new();
    let mut window = BrokenSwapWindow(ScriptedWindow::new());

    let scene = scene(&mut device, true);
    assert!(device.live_objects() > 0);

    let result = RunLoop::new().run(&mut window, &mut device, scene);

    // The present failure aborts the loop, but the program, mesh and texture
    // are still disposed before the error surfaces.
    assert!(result.is_err());
    assert_eq!(device.live_objects(), 0);
}

#[test]
fn custom_exit_key_is_honored() {
    struct SpaceWindow(ScriptedWindow);

    impl WindowSurface for SpaceWindow {
        fn poll_events(&mut self, events: &mut Vec<WindowEvent>) {
            self.0.poll_events(events);
        }
        fn should_close(&self) -> bool {
            self.0.should_close()
        }
        fn request_close(&mut self) {
            self.0.request_close();
        }
        fn is_key_pressed(&self, key: Key) -> bool {
            key == Key::Space && self.0.frame >= 2
        }
        fn dimensions(&self) -> Vector2<u32> {
            self.0.dimensions()
        }
        fn swap_buffers(&mut self) -> Result<()> {
            self.0.swap_buffers()
        }
    }

    let mut device = HeadlessDevice::new();
    let mut window = SpaceWindow(ScriptedWindow::new());

    let scene = scene(&mut device, false);
    let frames = RunLoop::new()
        .with_exit_key(Key::Space)
        .run(&mut window, &mut device, scene)
        .unwrap();

    assert_eq!(frames, 2);
}
