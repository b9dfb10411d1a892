//! Drawing surface consumed by the simulation
//!
//! The core never rasterises anything itself. Grid, tiles and the car issue
//! path, image and transform calls against a `Surface`, modelled on a 2D
//! canvas context. The player implements it over a software framebuffer;
//! `RecordingSurface` implements it as a command log for tests and headless
//! runs.

use std::collections::HashSet;

/// ARGB color, same layout as the framebuffer
pub type Color = u32;

pub const WHITE: Color = 0xFFFFFFFF;

/// Handle to an image resource registered with the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub u32);

pub trait Surface {
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    /// Stroke the current path with a 1px line
    fn stroke(&mut self, color: Color);

    /// Draw `image` scaled into the rectangle at (x, y) with size (w, h),
    /// under the current transform
    fn draw_image(&mut self, image: ImageId, x: f32, y: f32, w: f32, h: f32);

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    fn rotate(&mut self, radians: f32);

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32);

    /// Whether `image` has finished loading. Draws of unready images are
    /// skipped by callers.
    fn is_ready(&self, image: ImageId) -> bool;
}

/// One recorded surface call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    BeginPath,
    MoveTo(f32, f32),
    LineTo(f32, f32),
    Stroke(Color),
    DrawImage {
        image: ImageId,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    },
    Save,
    Restore,
    Translate(f32, f32),
    Rotate(f32),
    ClearRect(f32, f32, f32, f32),
}

/// Surface that records every call instead of drawing
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    ready: HashSet<ImageId>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recording surface on which every listed image is already loaded
    pub fn with_ready(images: &[ImageId]) -> Self {
        Self {
            commands: Vec::new(),
            ready: images.iter().copied().collect(),
        }
    }

    pub fn set_ready(&mut self, image: ImageId, ready: bool) {
        if ready {
            self.ready.insert(image);
        } else {
            self.ready.remove(&image);
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop the log, keeping readiness
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn stroke_count(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::Stroke(_)))
    }

    pub fn image_draws(&self, image: ImageId) -> usize {
        self.count(|c| matches!(c, DrawCommand::DrawImage { image: i, .. } if *i == image))
    }

    fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|&c| pred(c)).count()
    }
}

impl Surface for RecordingSurface {
    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::LineTo(x, y));
    }

    fn stroke(&mut self, color: Color) {
        self.commands.push(DrawCommand::Stroke(color));
    }

    fn draw_image(&mut self, image: ImageId, x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(DrawCommand::DrawImage { image, x, y, w, h });
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.commands.push(DrawCommand::Translate(dx, dy));
    }

    fn rotate(&mut self, radians: f32) {
        self.commands.push(DrawCommand::Rotate(radians));
    }

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(DrawCommand::ClearRect(x, y, w, h));
    }

    fn is_ready(&self, image: ImageId) -> bool {
        self.ready.contains(&image)
    }
}
