use thiserror::Error;

use crate::geometry::{Direction, Point};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid grid {width}x{height} with tile size {tile_size}")]
    InvalidGrid {
        width: u32,
        height: u32,
        tile_size: f32,
    },

    #[error("Car speed must be at least one step")]
    InvalidSpeed,

    #[error("Frame rate must be positive, got {0}")]
    InvalidFrameRate(f64),

    #[error("No legal move from {position} heading {direction:?}")]
    NoLegalMove {
        position: Point,
        direction: Direction,
    },
}

pub type Result<T> = std::result::Result<T, SimError>;
