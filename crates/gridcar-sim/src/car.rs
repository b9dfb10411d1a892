//! The car: heading, movement toward a committed target, sprite rendering
//!
//! Movement state machine:
//!   Idle   (ready, no pending motion) --set_distance--> Moving
//!   Moving (remaining > 0)            --last update---> Idle
//!
//! A move always takes exactly `speed` updates. The remaining step count is
//! tracked explicitly and the final step snaps onto the target, so arrival
//! never depends on floating point equality.

use crate::error::{Result, SimError};
use crate::geometry::{Direction, Maneuver, Point, TurnHint};
use crate::surface::{ImageId, Surface};

/// Default number of updates per move
pub const DEFAULT_SPEED: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Motion {
    /// Subtracted from the position every update
    delta: (f32, f32),
    remaining: u32,
}

#[derive(Debug, Clone)]
pub struct Car {
    position: Point,
    /// Width and height of the (square) sprite
    size: f32,
    direction: Direction,
    speed: u32,
    ready: bool,
    target: Option<Point>,
    motion: Option<Motion>,
}

impl Car {
    /// New idle car heading `Right`
    pub fn new(x: f32, y: f32, size: f32, speed: u32) -> Result<Self> {
        if speed == 0 {
            return Err(SimError::InvalidSpeed);
        }
        Ok(Self {
            position: Point::new(x, y),
            size,
            direction: Direction::Right,
            speed,
            ready: true,
            target: None,
            motion: None,
        })
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// True when no move is pending and a new decision may be taken
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Last committed target, if any
    pub fn target(&self) -> Option<Point> {
        self.target
    }

    /// Updates left until the current move completes
    pub fn remaining_steps(&self) -> u32 {
        self.motion.map_or(0, |m| m.remaining)
    }

    /// Commit a destination. The car leaves the ready state until it has
    /// covered the distance in `speed` updates.
    pub fn set_distance(&mut self, target: Point) {
        let steps = self.speed as f32;
        self.motion = Some(Motion {
            delta: (
                (self.position.x - target.x) / steps,
                (self.position.y - target.y) / steps,
            ),
            remaining: self.speed,
        });
        self.target = Some(target);
        self.ready = false;
    }

    /// Advance one tick toward the target
    pub fn update(&mut self) {
        let Some(motion) = self.motion.as_mut() else {
            self.ready = true;
            return;
        };

        self.position.x -= motion.delta.0;
        self.position.y -= motion.delta.1;
        motion.remaining -= 1;

        if motion.remaining == 0 {
            if let Some(target) = self.target {
                self.position = target;
            }
            self.motion = None;
            self.ready = true;
            tracing::trace!("Car arrived at {}", self.position);
        }
    }

    /// Rotate the heading 90° to the given side
    pub fn turn(&mut self, hint: TurnHint) {
        self.direction = self.direction.turned(hint);
    }

    /// Apply a decision maneuver to the heading
    pub fn steer(&mut self, maneuver: Maneuver) {
        self.direction = maneuver.apply(self.direction);
    }

    /// Draw the sprite centred on the car's box, rotated to its heading.
    /// No-op until the sprite image is loaded.
    pub fn draw(&self, surface: &mut impl Surface, image: ImageId) {
        if !surface.is_ready(image) {
            return;
        }
        let half = self.size / 2.0;
        surface.save();
        surface.translate(self.position.x, self.position.y);
        surface.translate(half, half);
        surface.rotate(self.direction.rotation_degrees().to_radians());
        surface.draw_image(image, -half, -half, self.size, self.size);
        surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    const SPRITE: ImageId = ImageId(2);

    #[test]
    fn new_car_is_idle_heading_right() {
        let car = Car::new(0.0, 0.0, 150.0, DEFAULT_SPEED).unwrap();
        assert!(car.is_ready());
        assert_eq!(car.direction(), Direction::Right);
        assert_eq!(car.target(), None);
        assert_eq!(car.remaining_steps(), 0);
    }

    #[test]
    fn zero_speed_is_rejected() {
        assert_eq!(Car::new(0.0, 0.0, 10.0, 0).unwrap_err(), SimError::InvalidSpeed);
    }

    #[test]
    fn arrives_in_exactly_speed_steps() {
        let mut car = Car::new(0.0, 0.0, 150.0, 30).unwrap();
        car.set_distance(Point::new(150.0, 0.0));
        assert!(!car.is_ready());

        for step in 1..30 {
            car.update();
            assert!(!car.is_ready(), "ready too early at step {}", step);
            assert_ne!(car.position(), Point::new(150.0, 0.0));
        }
        car.update();
        assert!(car.is_ready());
        assert_eq!(car.position(), Point::new(150.0, 0.0));
    }

    #[test]
    fn uneven_distance_still_lands_exactly() {
        let mut car = Car::new(0.0, 0.0, 10.0, 7).unwrap();
        car.set_distance(Point::new(0.0, -150.0));
        for _ in 0..7 {
            car.update();
        }
        assert!(car.is_ready());
        assert_eq!(car.position(), Point::new(0.0, -150.0));
    }

    #[test]
    fn idle_update_does_not_move() {
        let mut car = Car::new(10.0, 20.0, 10.0, 3).unwrap();
        car.update();
        assert!(car.is_ready());
        assert_eq!(car.position(), Point::new(10.0, 20.0));
    }

    #[test]
    fn turn_table() {
        let cases = [
            (Direction::Up, TurnHint::Left, Direction::Left),
            (Direction::Up, TurnHint::Right, Direction::Right),
            (Direction::Down, TurnHint::Left, Direction::Right),
            (Direction::Down, TurnHint::Right, Direction::Left),
            (Direction::Left, TurnHint::Left, Direction::Down),
            (Direction::Left, TurnHint::Right, Direction::Up),
            (Direction::Right, TurnHint::Left, Direction::Up),
            (Direction::Right, TurnHint::Right, Direction::Down),
        ];
        for (from, hint, to) in cases {
            let mut car = Car::new(0.0, 0.0, 1.0, 1).unwrap();
            while car.direction() != from {
                car.turn(TurnHint::Left);
            }
            car.turn(hint);
            assert_eq!(car.direction(), to, "{:?} + {:?}", from, hint);
        }
    }

    #[test]
    fn steer_applies_maneuver() {
        let mut car = Car::new(0.0, 0.0, 1.0, 1).unwrap();
        car.steer(Maneuver::Straight);
        assert_eq!(car.direction(), Direction::Right);
        car.steer(Maneuver::Right);
        assert_eq!(car.direction(), Direction::Down);
        car.steer(Maneuver::UTurn);
        assert_eq!(car.direction(), Direction::Up);
    }

    #[test]
    fn draw_rotates_about_centre() {
        let mut car = Car::new(150.0, 300.0, 100.0, 30).unwrap();
        car.turn(TurnHint::Left); // Right -> Up
        let mut surface = RecordingSurface::with_ready(&[SPRITE]);
        car.draw(&mut surface, SPRITE);
        assert_eq!(
            surface.commands(),
            &[
                DrawCommand::Save,
                DrawCommand::Translate(150.0, 300.0),
                DrawCommand::Translate(50.0, 50.0),
                DrawCommand::Rotate(180f32.to_radians()),
                DrawCommand::DrawImage {
                    image: SPRITE,
                    x: -50.0,
                    y: -50.0,
                    w: 100.0,
                    h: 100.0,
                },
                DrawCommand::Restore,
            ]
        );
    }

    #[test]
    fn draw_skips_unloaded_sprite() {
        let car = Car::new(0.0, 0.0, 100.0, 30).unwrap();
        let mut surface = RecordingSurface::new();
        car.draw(&mut surface, SPRITE);
        assert!(surface.commands().is_empty());
    }
}
