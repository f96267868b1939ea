use glint::prelude::*;
use glint::video::texture::flip_rows;

fn pixels(width: u32, height: u32) -> Vec<u8> {
    vec![0u8; (width * height * 4) as usize]
}

#[test]
fn tightly_packed_rows_upload() {
    let mut device = HeadlessDevice::new();

    let dimensions = Vector2::new(8, 4);
    let texture = Texture2D::new(
        &mut device,
        &pixels(8, 4),
        dimensions,
        8 * 4,
        &TextureSampling::default(),
    )
    .unwrap();

    assert_eq!(device.live_textures(), 1);
    assert_eq!(texture.dimensions(), dimensions);

    texture.bind(&mut device, 0).unwrap();
    texture.dispose(&mut device).unwrap();
    assert_eq!(device.live_objects(), 0);
}

#[test]
fn padded_rows_are_rejected_before_any_allocation() {
    let mut device = HeadlessDevice::new();

    // A 9-pixel-wide stride over an 8-pixel-wide image.
    let err = Texture2D::new(
        &mut device,
        &pixels(8, 4),
        Vector2::new(8, 4),
        9 * 4,
        &TextureSampling::default(),
    )
    .unwrap_err();

    match err {
        Error::UnsupportedStride { expected, actual } => {
            assert_eq!(expected, 32);
            assert_eq!(actual, 36);
        }
        other => panic!("unexpected error: {}", other),
    }

    // No texture object was created.
    assert_eq!(device.live_textures(), 0);
    assert_eq!(device.live_objects(), 0);
}

#[test]
fn nearest_sampling_without_mipmaps() {
    let mut device = HeadlessDevice::new();

    let sampling = TextureSampling {
        wrap_s: TextureWrap::Clamp,
        wrap_t: TextureWrap::Mirror,
        min_filter: TextureFilter::Nearest,
        mag_filter: TextureFilter::Nearest,
        mipmap: false,
    };

    let texture =
        Texture2D::new(&mut device, &pixels(2, 2), Vector2::new(2, 2), 8, &sampling).unwrap();
    texture.dispose(&mut device).unwrap();
}

#[test]
fn flip_then_upload() {
    let mut device = HeadlessDevice::new();

    let mut bytes = vec![
        1, 1, 1, 1, //
        2, 2, 2, 2,
    ];
    flip_rows(&mut bytes, Vector2::new(1, 2));
    assert_eq!(&bytes[..4], &[2, 2, 2, 2]);

    let texture = Texture2D::new(
        &mut device,
        &bytes,
        Vector2::new(1, 2),
        4,
        &TextureSampling::default(),
    )
    .unwrap();
    texture.dispose(&mut device).unwrap();
}
