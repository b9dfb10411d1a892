use crate::surface::{ImageId, Surface};

/// Image-backed background rectangle. Tiles of one grid share an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub image: ImageId,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Tile {
    pub fn new(image: ImageId, x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { image, x, y, w, h }
    }

    /// Blit the image scaled to the tile. No-op until the image is loaded.
    pub fn draw(&self, surface: &mut impl Surface) {
        if !surface.is_ready(self.image) {
            return;
        }
        surface.draw_image(self.image, self.x, self.y, self.w, self.h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    const BG: ImageId = ImageId(1);

    #[test]
    fn draw_blits_scaled_image() {
        let mut surface = RecordingSurface::with_ready(&[BG]);
        Tile::new(BG, 150.0, 300.0, 150.0, 150.0).draw(&mut surface);
        assert_eq!(
            surface.commands(),
            &[DrawCommand::DrawImage {
                image: BG,
                x: 150.0,
                y: 300.0,
                w: 150.0,
                h: 150.0,
            }]
        );
    }

    #[test]
    fn unready_image_is_skipped() {
        let mut surface = RecordingSurface::new();
        Tile::new(BG, 0.0, 0.0, 150.0, 150.0).draw(&mut surface);
        assert!(surface.commands().is_empty());
    }
}
