//! gridcar simulation core
//!
//! A single car wanders a tiled grid. Each time it reaches its target it
//! picks a weighted-random maneuver (left 1/4, straight 1/2, right 1/4)
//! among those that keep it on the grid, then covers a fixed lookahead
//! distance in `speed` ticks. The host calls `Simulation::frame` once per
//! presented frame; updates run at a fixed target frequency.
//!
//! Modules:
//!   geometry  : points, headings, maneuvers
//!   surface   : drawing surface trait + recording implementation
//!   line, tile: static scene primitives
//!   grid      : tiles + lattice, bounds
//!   car       : movement state machine and sprite drawing
//!   clock     : fixed-interval frame gate
//!   simulation: decision logic and main-loop body

pub mod car;
pub mod clock;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod line;
pub mod simulation;
pub mod surface;
pub mod tile;

pub use car::Car;
pub use clock::FrameClock;
pub use error::{Result, SimError};
pub use geometry::{Direction, Maneuver, Point, TurnHint};
pub use grid::Grid;
pub use line::Line;
pub use simulation::{SceneImages, Simulation};
pub use surface::{Color, DrawCommand, ImageId, RecordingSurface, Surface};
pub use tile::Tile;
