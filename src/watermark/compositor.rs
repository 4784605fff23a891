//! Alpha compositing of RGBA layers.

use image::{Rgba, RgbaImage};

/// Top-left corner of a layer relative to its target; negative values clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    pub const ORIGIN: Offset = Offset { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An image placed over another.
#[derive(Debug, Clone, Copy)]
pub struct Layer<'a> {
    pub pixels: &'a RgbaImage,
    pub offset: Offset,
    /// Multiplies each pixel's own alpha; clamped to 0.0..=1.0
    pub opacity: f32,
}

/// Composite `layer` onto `target`. Parts outside the target are dropped.
pub fn blend_layer(target: &mut RgbaImage, layer: &Layer<'_>) {
    let opacity = layer.opacity.clamp(0.0, 1.0);
    let (ox, oy) = (i64::from(layer.offset.x), i64::from(layer.offset.y));

    let xs = ox.max(0)..(ox + i64::from(layer.pixels.width())).min(i64::from(target.width()));
    let ys = oy.max(0)..(oy + i64::from(layer.pixels.height())).min(i64::from(target.height()));

    for ty in ys {
        for tx in xs.clone() {
            let top = *layer.pixels.get_pixel((tx - ox) as u32, (ty - oy) as u32);
            let pixel = target.get_pixel_mut(tx as u32, ty as u32);
            *pixel = over(*pixel, top, opacity);
        }
    }
}

/// Porter-Duff "over" of `top`, its alpha scaled by `opacity`, on `bottom`.
pub(crate) fn over(bottom: Rgba<u8>, top: Rgba<u8>, opacity: f32) -> Rgba<u8> {
    let top_a = f32::from(top[3]) / 255.0 * opacity;
    let bottom_a = f32::from(bottom[3]) / 255.0;
    let out_a = top_a + bottom_a * (1.0 - top_a);

    if out_a < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let mix = |t: u8, b: u8| {
        let value = (f32::from(t) * top_a + f32::from(b) * bottom_a * (1.0 - top_a)) / out_a;
        value.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        mix(top[0], bottom[0]),
        mix(top[1], bottom[1]),
        mix(top[2], bottom[2]),
        (out_a * 255.0).round() as u8,
    ])
}
