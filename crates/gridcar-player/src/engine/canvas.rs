//! Software canvas implementing the simulation's `Surface` on a u32 ARGB
//! framebuffer.
//!
//! Coordinates are transformed by a 2D affine matrix (translate/rotate with
//! a save/restore stack) at call time, like a browser canvas context. Paths
//! are stroked as 1px Bresenham lines. Images are sampled nearest-neighbour
//! through the inverse transform and alpha-blended onto the framebuffer.

use gridcar_sim::{Color, ImageId, Surface};

use crate::assets::ImageStore;

/// Color the framebuffer is cleared to
pub const CLEAR_COLOR: u32 = 0xFF000000;

/// Affine transform `[a c e; b d f]`
#[derive(Debug, Clone, Copy, PartialEq)]
struct Transform {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Transform {
    const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.e += self.a * dx + self.c * dy;
        self.f += self.b * dx + self.d * dy;
    }

    /// Post-multiply by a rotation (clockwise on a y-down screen)
    fn rotate(&mut self, radians: f32) {
        let (sin, cos) = radians.sin_cos();
        let Transform { a, b, c, d, .. } = *self;
        self.a = a * cos + c * sin;
        self.b = b * cos + d * sin;
        self.c = c * cos - a * sin;
        self.d = d * cos - b * sin;
    }

    fn invert(&self) -> Option<Transform> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < f32::EPSILON {
            return None;
        }
        Some(Transform {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }
}

pub struct Canvas {
    width: usize,
    height: usize,
    buffer: Vec<u32>,
    images: ImageStore,
    transform: Transform,
    stack: Vec<Transform>,
    /// Subpaths in device coordinates
    path: Vec<Vec<(f32, f32)>>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, images: ImageStore) -> Self {
        Self {
            width,
            height,
            buffer: vec![CLEAR_COLOR; width * height],
            images,
            transform: Transform::IDENTITY,
            stack: Vec::new(),
            path: Vec::new(),
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn buffer(&self) -> &[u32] {
        &self.buffer
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    pub fn images_mut(&mut self) -> &mut ImageStore {
        &mut self.images
    }

    fn plot(&mut self, x: i32, y: i32, color: u32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        self.buffer[y as usize * self.width + x as usize] = color;
    }

    fn draw_segment(&mut self, from: (f32, f32), to: (f32, f32), color: u32) {
        let (mut x0, mut y0) = (from.0.floor() as i32, from.1.floor() as i32);
        let (x1, y1) = (to.0.floor() as i32, to.1.floor() as i32);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Device-space pixel bounds of a transformed rectangle, clipped to the
    /// framebuffer: (x0, y0, x1, y1), end-exclusive
    fn device_bounds(
        &self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    ) -> Option<(usize, usize, usize, usize)> {
        let corners = [
            self.transform.apply(x, y),
            self.transform.apply(x + w, y),
            self.transform.apply(x, y + h),
            self.transform.apply(x + w, y + h),
        ];
        let min_x = corners.iter().map(|c| c.0).fold(f32::INFINITY, f32::min);
        let max_x = corners.iter().map(|c| c.0).fold(f32::NEG_INFINITY, f32::max);
        let min_y = corners.iter().map(|c| c.1).fold(f32::INFINITY, f32::min);
        let max_y = corners.iter().map(|c| c.1).fold(f32::NEG_INFINITY, f32::max);

        let x0 = min_x.floor().max(0.0) as usize;
        let y0 = min_y.floor().max(0.0) as usize;
        let x1 = (max_x.ceil().max(0.0) as usize).min(self.width);
        let y1 = (max_y.ceil().max(0.0) as usize).min(self.height);
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }
}

/// Alpha-blend an RGBA source pixel over an ARGB destination pixel
fn blend(dst: u32, [r, g, b, a]: [u8; 4]) -> u32 {
    let (r, g, b, a) = (r as u32, g as u32, b as u32, a as u32);
    if a >= 255 {
        return 0xFF000000 | (r << 16) | (g << 8) | b;
    }
    let dr = (dst >> 16) & 0xFF;
    let dg = (dst >> 8) & 0xFF;
    let db = dst & 0xFF;
    let inv_a = 255 - a;
    let out_r = (r * a + dr * inv_a) / 255;
    let out_g = (g * a + dg * inv_a) / 255;
    let out_b = (b * a + db * inv_a) / 255;
    0xFF000000 | (out_r << 16) | (out_g << 8) | out_b
}

impl Surface for Canvas {
    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.path.push(vec![self.transform.apply(x, y)]);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.transform.apply(x, y);
        match self.path.last_mut() {
            Some(sub) => sub.push(p),
            // line_to without move_to starts a subpath, as on a canvas
            None => self.path.push(vec![p]),
        }
    }

    fn stroke(&mut self, color: Color) {
        let path = std::mem::take(&mut self.path);
        for sub in &path {
            for seg in sub.windows(2) {
                self.draw_segment(seg[0], seg[1], color);
            }
        }
        self.path = path;
    }

    fn draw_image(&mut self, image: ImageId, x: f32, y: f32, w: f32, h: f32) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let Some(inverse) = self.transform.invert() else {
            return;
        };
        let Some((x0, y0, x1, y1)) = self.device_bounds(x, y, w, h) else {
            return;
        };
        let Some(bmp) = self.images.get(image) else {
            return;
        };
        if bmp.width == 0 || bmp.height == 0 {
            return;
        }

        for py in y0..y1 {
            for px in x0..x1 {
                let (u, v) = inverse.apply(px as f32 + 0.5, py as f32 + 0.5);
                if u < x || v < y || u >= x + w || v >= y + h {
                    continue;
                }
                let sx = (((u - x) / w * bmp.width as f32) as u32).min(bmp.width - 1);
                let sy = (((v - y) / h * bmp.height as f32) as u32).min(bmp.height - 1);
                let Some(rgba) = bmp.pixel(sx, sy) else {
                    continue;
                };
                if rgba[3] == 0 {
                    continue; // Fully transparent
                }
                let idx = py * self.width + px;
                self.buffer[idx] = blend(self.buffer[idx], rgba);
            }
        }
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(t) = self.stack.pop() {
            self.transform = t;
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.transform.translate(dx, dy);
    }

    fn rotate(&mut self, radians: f32) {
        self.transform.rotate(radians);
    }

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let Some((x0, y0, x1, y1)) = self.device_bounds(x, y, w, h) else {
            return;
        };
        for row in y0..y1 {
            self.buffer[row * self.width + x0..row * self.width + x1].fill(CLEAR_COLOR);
        }
    }

    fn is_ready(&self, image: ImageId) -> bool {
        self.images.is_ready(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::bitmap::DecodedBitmap;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];
    const IMG: ImageId = ImageId(3);

    fn px(canvas: &Canvas, x: usize, y: usize) -> u32 {
        canvas.buffer()[y * canvas.size().0 + x]
    }

    /// 2x2 image: top row red, bottom row blue
    fn two_tone() -> ImageStore {
        let mut bmp = DecodedBitmap::new(2, 2);
        bmp.set_pixel(0, 0, RED);
        bmp.set_pixel(1, 0, RED);
        bmp.set_pixel(0, 1, BLUE);
        bmp.set_pixel(1, 1, BLUE);
        let mut store = ImageStore::new();
        store.insert(IMG, bmp);
        store
    }

    #[test]
    fn stroke_horizontal_line() {
        let mut canvas = Canvas::new(8, 4, ImageStore::new());
        canvas.begin_path();
        canvas.move_to(0.0, 2.0);
        canvas.line_to(8.0, 2.0);
        canvas.stroke(0xFFFFFFFF);
        for x in 0..8 {
            assert_eq!(px(&canvas, x, 2), 0xFFFFFFFF);
            assert_eq!(px(&canvas, x, 1), CLEAR_COLOR);
        }
    }

    #[test]
    fn stroke_diagonal_hits_endpoints() {
        let mut canvas = Canvas::new(5, 5, ImageStore::new());
        canvas.begin_path();
        canvas.move_to(0.0, 0.0);
        canvas.line_to(4.0, 4.0);
        canvas.stroke(0xFF00FF00);
        for i in 0..5 {
            assert_eq!(px(&canvas, i, i), 0xFF00FF00);
        }
        assert_eq!(px(&canvas, 4, 0), CLEAR_COLOR);
    }

    #[test]
    fn unready_image_draws_nothing() {
        let mut canvas = Canvas::new(4, 4, ImageStore::new());
        assert!(!canvas.is_ready(IMG));
        canvas.draw_image(IMG, 0.0, 0.0, 4.0, 4.0);
        assert!(canvas.buffer().iter().all(|&p| p == CLEAR_COLOR));
    }

    #[test]
    fn scaled_blit_fills_rect() {
        let mut canvas = Canvas::new(6, 6, two_tone());
        canvas.draw_image(IMG, 1.0, 1.0, 4.0, 4.0);
        assert_eq!(px(&canvas, 1, 1), 0xFFFF0000);
        assert_eq!(px(&canvas, 4, 2), 0xFFFF0000);
        assert_eq!(px(&canvas, 1, 3), 0xFF0000FF);
        assert_eq!(px(&canvas, 4, 4), 0xFF0000FF);
        assert_eq!(px(&canvas, 0, 0), CLEAR_COLOR);
        assert_eq!(px(&canvas, 5, 5), CLEAR_COLOR);
    }

    #[test]
    fn rotated_blit_turns_top_to_the_right() {
        let mut canvas = Canvas::new(4, 4, two_tone());
        canvas.save();
        canvas.translate(2.0, 2.0);
        canvas.rotate(90f32.to_radians());
        canvas.draw_image(IMG, -2.0, -2.0, 4.0, 4.0);
        canvas.restore();

        assert_eq!(px(&canvas, 3, 1), 0xFFFF0000);
        assert_eq!(px(&canvas, 0, 1), 0xFF0000FF);
        assert_eq!(canvas.transform, Transform::IDENTITY);
    }

    #[test]
    fn alpha_blends_over_background() {
        let mut bmp = DecodedBitmap::new(1, 1);
        bmp.set_pixel(0, 0, [255, 255, 255, 128]);
        let mut store = ImageStore::new();
        store.insert(IMG, bmp);
        let mut canvas = Canvas::new(1, 1, store);
        canvas.draw_image(IMG, 0.0, 0.0, 1.0, 1.0);
        let p = px(&canvas, 0, 0);
        assert_eq!(p & 0xFF, 128);
    }

    #[test]
    fn clear_rect_resets_region() {
        let mut canvas = Canvas::new(4, 4, two_tone());
        canvas.draw_image(IMG, 0.0, 0.0, 4.0, 4.0);
        canvas.clear_rect(0.0, 0.0, 2.0, 4.0);
        assert_eq!(px(&canvas, 1, 0), CLEAR_COLOR);
        assert_eq!(px(&canvas, 2, 0), 0xFFFF0000);
    }

    #[test]
    fn transform_inverse_round_trips() {
        let mut t = Transform::IDENTITY;
        t.translate(10.0, -4.0);
        t.rotate(0.7);
        let inv = t.invert().unwrap();
        let (x, y) = t.apply(3.0, 5.0);
        let (u, v) = inv.apply(x, y);
        assert!((u - 3.0).abs() < 1e-4 && (v - 5.0).abs() < 1e-4);
    }
}
