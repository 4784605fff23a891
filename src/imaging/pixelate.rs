//! Block downsampling for broadcast copies.
//!
//! Each `block x block` cell is replaced by its average color. The block size
//! scales with image width so the broadcast copy stays recognizable at any
//! resolution but is never redistribution-grade.

use image::{Rgba, RgbaImage};

/// Block size for a broadcast copy: `floor(width / divisor)`, at least 1.
pub fn broadcast_block_size(width: u32, divisor: u32) -> u32 {
    (width / divisor.max(1)).max(1)
}

/// Replace every block with its average color. Edge blocks are clipped.
pub fn pixelate(image: &RgbaImage, block: u32) -> RgbaImage {
    if block <= 1 {
        return image.clone();
    }

    let (width, height) = image.dimensions();
    let mut output = RgbaImage::new(width, height);

    for by in (0..height).step_by(block as usize) {
        for bx in (0..width).step_by(block as usize) {
            let bw = block.min(width - bx);
            let bh = block.min(height - by);

            let mut sum = [0u64; 4];
            for y in by..by + bh {
                for x in bx..bx + bw {
                    let pixel = image.get_pixel(x, y);
                    for (acc, channel) in sum.iter_mut().zip(pixel.0) {
                        *acc += channel as u64;
                    }
                }
            }

            let count = (bw * bh) as u64;
            let average = Rgba([
                (sum[0] / count) as u8,
                (sum[1] / count) as u8,
                (sum[2] / count) as u8,
                (sum[3] / count) as u8,
            ]);

            for y in by..by + bh {
                for x in bx..bx + bw {
                    output.put_pixel(x, y, average);
                }
            }
        }
    }

    output
}
