//! A textured two-triangle quad with a sine-driven tint. Escape or the
//! window's close button exits.

use glint::prelude::*;
use glint::window::GlutinWindow;

const VERTEX_SRC: &str = r#"
#version 330 core

layout (location = 0) in vec3 a_position;
layout (location = 1) in vec2 a_texcoord;

out vec2 v_texcoord;

void main() {
    gl_Position = vec4(a_position, 1.0);
    v_texcoord = a_texcoord;
}
"#;

const FRAGMENT_SRC: &str = r#"
#version 330 core

in vec2 v_texcoord;
out vec4 frag_color;

uniform vec4 u_tint;
uniform sampler2D u_sampler;

void main() {
    frag_color = texture(u_sampler, v_texcoord) * u_tint;
}
"#;

fn main() -> std::result::Result<(), failure::Error> {
    env_logger::init();

    let mut window = GlutinWindow::new(WindowParams {
        title: "glint: hello quad".to_owned(),
        size: Vector2::new(800, 600),
        ..Default::default()
    })?;
    let mut device = unsafe { GlDevice::new()? };

    let program = ShaderProgram::link(&mut device, VERTEX_SRC, FRAGMENT_SRC)?;

    let vertices: [f32; 20] = [
        // x, y, z, u, v
         0.5,  0.5, 0.0, 1.0, 1.0, // top right
         0.5, -0.5, 0.0, 1.0, 0.0, // bottom right
        -0.5, -0.5, 0.0, 0.0, 0.0, // bottom left
        -0.5,  0.5, 0.0, 0.0, 1.0, // top left
    ];
    let indices: [u32; 6] = [0, 1, 3, 1, 2, 3];

    let layout = VertexLayout::build().with(0, 3).with(1, 2).finish();
    let mesh = Mesh::new(&mut device, &vertices, &layout, Some(&indices))?;

    let (pixels, dimensions) = checkerboard(64, 64);
    let texture = Texture2D::new(
        &mut device,
        &pixels,
        dimensions,
        dimensions.x as usize * 4,
        &TextureSampling::default(),
    )?;

    let scene = Scene {
        program,
        mesh,
        texture: Some(texture),
        pulse: Some(UniformPulse {
            name: "u_tint".to_owned(),
            update: |t| [1.0, 0.5 + 0.5 * t.sin(), 1.0, 1.0],
        }),
    };

    let mut run_loop = RunLoop::new();
    let frames = run_loop.run(&mut window, &mut device, scene)?;
    println!("presented {} frames", frames);

    Ok(())
}

fn checkerboard(width: u32, height: u32) -> (Vec<u8>, Vector2<u32>) {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let v = if (x / 8 + y / 8) % 2 == 0 { 0xff } else { 0x40 };
            pixels.extend_from_slice(&[v, v, v, 0xff]);
        }
    }
    (pixels, Vector2::new(width, height))
}
