//! Generated stand-ins for missing image files
//!
//! Both textures are deterministic: the noise generator is seeded with a
//! constant so every run paints the same asphalt.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::bitmap::DecodedBitmap;

const ASPHALT_SEED: u64 = 0x6173_7068;

/// Grey asphalt with per-pixel grain
pub fn background(size: u32) -> DecodedBitmap {
    let mut rng = StdRng::seed_from_u64(ASPHALT_SEED);
    let mut bmp = DecodedBitmap::new(size, size);
    for y in 0..size {
        for x in 0..size {
            let grain: i16 = rng.gen_range(-14..=14);
            let v = (72 + grain).clamp(0, 255) as u8;
            bmp.set_pixel(x, y, [v, v, v.saturating_add(4), 255]);
        }
    }
    bmp
}

/// Top-down car with its nose at the top edge (row 0), transparent around
/// the body. Unrotated it faces screen-up, matching heading `Down`.
pub fn car(size: u32) -> DecodedBitmap {
    const BODY: [u8; 4] = [200, 30, 35, 255];
    const GLASS: [u8; 4] = [140, 190, 230, 255];
    const WHEEL: [u8; 4] = [20, 20, 20, 255];
    const LIGHT: [u8; 4] = [255, 240, 150, 255];

    let mut bmp = DecodedBitmap::new(size, size);
    let s = size as f32;
    let body_left = s * 0.28;
    let body_right = s * 0.72;
    let body_top = s * 0.10;
    let body_bottom = s * 0.90;

    for y in 0..size {
        for x in 0..size {
            // Sample at pixel centre
            let fx = x as f32 + 0.5;
            let fy = y as f32 + 0.5;

            let in_body = fx >= body_left && fx < body_right && fy >= body_top && fy < body_bottom;
            let in_wheel_x = (fx >= body_left - s * 0.05 && fx < body_left)
                || (fx >= body_right && fx < body_right + s * 0.05);
            let in_wheel_y = (fy >= s * 0.18 && fy < s * 0.32) || (fy >= s * 0.68 && fy < s * 0.82);

            let color = if in_wheel_x && in_wheel_y {
                Some(WHEEL)
            } else if in_body {
                let windshield = fy >= s * 0.30 && fy < s * 0.42 && fx >= s * 0.33 && fx < s * 0.67;
                let headlight = fy < s * 0.14
                    && ((fx >= s * 0.31 && fx < s * 0.39) || (fx >= s * 0.61 && fx < s * 0.69));
                Some(if headlight {
                    LIGHT
                } else if windshield {
                    GLASS
                } else {
                    BODY
                })
            } else {
                None
            };

            if let Some(rgba) = color {
                bmp.set_pixel(x, y, rgba);
            }
        }
    }
    bmp
}
