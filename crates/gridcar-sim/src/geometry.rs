//! Points, headings and turn maneuvers

use std::fmt;

/// A position on the playfield in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point reached by travelling `distance` along `direction`
    pub fn offset(self, direction: Direction, distance: f32) -> Self {
        let (dx, dy) = direction.vector();
        Self {
            x: self.x + distance * dx as f32,
            y: self.y + distance * dy as f32,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Car heading. Only the four axis-aligned unit vectors are representable.
///
/// `Up` is `(0, 1)`: the labels follow the simulation's internal naming,
/// which has y growing "up", not screen orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector of this heading
    pub const fn vector(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Heading after a 90° turn to the given side
    pub const fn turned(self, hint: TurnHint) -> Self {
        match (self, hint) {
            (Direction::Up, TurnHint::Left) => Direction::Left,
            (Direction::Up, TurnHint::Right) => Direction::Right,
            (Direction::Down, TurnHint::Left) => Direction::Right,
            (Direction::Down, TurnHint::Right) => Direction::Left,
            (Direction::Left, TurnHint::Left) => Direction::Down,
            (Direction::Left, TurnHint::Right) => Direction::Up,
            (Direction::Right, TurnHint::Left) => Direction::Up,
            (Direction::Right, TurnHint::Right) => Direction::Down,
        }
    }

    pub const fn reversed(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Sprite rotation in degrees.
    /// Right → 90, Left → −90, Up → 180, Down → 0.
    pub const fn rotation_degrees(self) -> f32 {
        match self {
            Direction::Right => 90.0,
            Direction::Left => -90.0,
            Direction::Up => 180.0,
            Direction::Down => 0.0,
        }
    }
}

/// Side of a 90° turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnHint {
    Left,
    Right,
}

/// What the car does at a decision point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Maneuver {
    Left,
    Straight,
    Right,
    /// Fallback when no forward maneuver stays on the grid
    UTurn,
}

impl Maneuver {
    /// Maneuvers considered at every decision point
    pub const REGULAR: [Maneuver; 3] = [Maneuver::Left, Maneuver::Straight, Maneuver::Right];

    /// Relative likelihood among the regular maneuvers: left 1/4,
    /// straight 1/2, right 1/4
    pub const fn weight(self) -> u32 {
        match self {
            Maneuver::Straight => 2,
            Maneuver::Left | Maneuver::Right => 1,
            Maneuver::UTurn => 0,
        }
    }

    /// Heading after performing this maneuver from `direction`
    pub const fn apply(self, direction: Direction) -> Direction {
        match self {
            Maneuver::Left => direction.turned(TurnHint::Left),
            Maneuver::Straight => direction,
            Maneuver::Right => direction.turned(TurnHint::Right),
            Maneuver::UTurn => direction.reversed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vectors_are_axis_aligned_units() {
        for d in Direction::ALL {
            let (x, y) = d.vector();
            assert_eq!(x.abs() + y.abs(), 1, "{:?} is not a unit vector", d);
        }
    }

    #[test]
    fn left_then_right_is_identity() {
        for d in Direction::ALL {
            assert_eq!(d.turned(TurnHint::Left).turned(TurnHint::Right), d);
            assert_eq!(d.turned(TurnHint::Right).turned(TurnHint::Left), d);
        }
    }

    #[test]
    fn turns_are_perpendicular() {
        for d in Direction::ALL {
            for hint in [TurnHint::Left, TurnHint::Right] {
                let (ax, ay) = d.vector();
                let (bx, by) = d.turned(hint).vector();
                assert_eq!(ax * bx + ay * by, 0);
            }
        }
    }

    #[test]
    fn two_same_side_turns_reverse() {
        for d in Direction::ALL {
            let twice = d.turned(TurnHint::Left).turned(TurnHint::Left);
            assert_eq!(twice, d.reversed());
            assert_eq!(Maneuver::UTurn.apply(d), twice);
        }
    }

    #[test]
    fn offset_follows_heading() {
        let p = Point::new(150.0, 300.0);
        assert_eq!(p.offset(Direction::Right, 150.0), Point::new(300.0, 300.0));
        assert_eq!(p.offset(Direction::Down, 150.0), Point::new(150.0, 150.0));
        assert_eq!(p.offset(Direction::Up, 150.0), Point::new(150.0, 450.0));
    }
}
