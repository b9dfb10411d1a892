//! Playfield: background tiles plus the white lattice drawn over them

use crate::error::{Result, SimError};
use crate::geometry::Point;
use crate::line::Line;
use crate::surface::{ImageId, Surface};
use crate::tile::Tile;

#[derive(Debug, Clone)]
pub struct Grid {
    /// Width in tiles
    pub width: u32,
    /// Height in tiles
    pub height: u32,
    pub tile_size: f32,
    lines: Vec<Line>,
    /// Column-major: `tiles[i][j]` sits at `(i·S, j·S)`
    tiles: Vec<Vec<Tile>>,
}

impl Grid {
    pub fn new(width: u32, height: u32, tile_size: f32, background: ImageId) -> Result<Self> {
        if width == 0 || height == 0 || !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(SimError::InvalidGrid {
                width,
                height,
                tile_size,
            });
        }

        let px_w = width as f32 * tile_size;
        let px_h = height as f32 * tile_size;

        let mut lines = Vec::with_capacity((width + height) as usize);
        for i in 0..width {
            let x = i as f32 * tile_size;
            lines.push(Line::new(x, 0.0, x, px_h));
        }
        for j in 0..height {
            let y = j as f32 * tile_size;
            lines.push(Line::new(0.0, y, px_w, y));
        }

        let tiles = (0..width)
            .map(|i| {
                (0..height)
                    .map(|j| {
                        Tile::new(
                            background,
                            i as f32 * tile_size,
                            j as f32 * tile_size,
                            tile_size,
                            tile_size,
                        )
                    })
                    .collect()
            })
            .collect();

        tracing::debug!(
            "Grid {}x{} tiles at {} px ({}x{} px)",
            width,
            height,
            tile_size,
            px_w,
            px_h
        );

        Ok(Self {
            width,
            height,
            tile_size,
            lines,
            tiles,
        })
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().flatten()
    }

    pub fn tile_at(&self, col: usize, row: usize) -> Option<&Tile> {
        self.tiles.get(col).and_then(|c| c.get(row))
    }

    /// Playfield size in pixels
    pub fn pixel_size(&self) -> (f32, f32) {
        (
            self.width as f32 * self.tile_size,
            self.height as f32 * self.tile_size,
        )
    }

    /// Half-open bounds test: `[0, W·S) × [0, H·S)`
    pub fn contains(&self, p: Point) -> bool {
        let (w, h) = self.pixel_size();
        p.x >= 0.0 && p.x < w && p.y >= 0.0 && p.y < h
    }

    /// Tiles first, then the lattice on top
    pub fn draw(&self, surface: &mut impl Surface) {
        for tile in self.tiles() {
            tile.draw(surface);
        }
        for line in &self.lines {
            line.draw(surface);
        }
    }
}
