use crate::surface::{Surface, WHITE};

/// Static grid line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start_x: f32,
    pub start_y: f32,
    pub end_x: f32,
    pub end_y: f32,
}

impl Line {
    pub fn new(start_x: f32, start_y: f32, end_x: f32, end_y: f32) -> Self {
        Self {
            start_x,
            start_y,
            end_x,
            end_y,
        }
    }

    pub fn draw(&self, surface: &mut impl Surface) {
        surface.begin_path();
        surface.move_to(self.start_x, self.start_y);
        surface.line_to(self.end_x, self.end_y);
        surface.stroke(WHITE);
    }
}
