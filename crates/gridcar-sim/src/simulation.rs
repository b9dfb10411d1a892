//! Simulation: owns the grid, the car, the frame clock and the surface
//!
//! The host drives it by calling `frame(now)` once per presented frame.
//! When an update is due, an idle car gets a new weighted-random maneuver
//! whose target stays on the grid, the car advances one tick, and the scene
//! is redrawn.

use gridcar_common::SimConfig;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::car::Car;
use crate::clock::FrameClock;
use crate::error::{Result, SimError};
use crate::geometry::{Maneuver, Point};
use crate::grid::Grid;
use crate::surface::{ImageId, Surface};

/// Default distance from the car to its next target
pub const DEFAULT_LOOKAHEAD: f32 = 150.0;

/// Image handles the scene draws with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneImages {
    pub background: ImageId,
    pub car: ImageId,
}

pub struct Simulation<S, R = StdRng> {
    grid: Grid,
    car: Car,
    clock: FrameClock,
    surface: S,
    rng: R,
    images: SceneImages,
    lookahead: f32,
    ticks: u64,
    stalled: bool,
}

impl<S: Surface> Simulation<S, StdRng> {
    /// Build from config, seeding the RNG from `config.seed` or from entropy
    pub fn from_config(
        config: &SimConfig,
        images: SceneImages,
        surface: S,
        now: f64,
    ) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(config, images, surface, rng, now)
    }
}

impl<S: Surface, R: Rng> Simulation<S, R> {
    pub fn new(
        config: &SimConfig,
        images: SceneImages,
        surface: S,
        rng: R,
        now: f64,
    ) -> Result<Self> {
        let grid = Grid::new(
            config.grid_width,
            config.grid_height,
            config.tile_size,
            images.background,
        )?;
        let car = Car::new(0.0, 0.0, config.tile_size, config.car_speed)?;
        let clock = FrameClock::new(config.target_fps, now)?;

        tracing::info!(
            "Simulation {}x{} @ {} px, {} Hz, car speed {}",
            config.grid_width,
            config.grid_height,
            config.tile_size,
            config.target_fps,
            config.car_speed
        );

        Ok(Self {
            grid,
            car,
            clock,
            surface,
            rng,
            images,
            lookahead: config.lookahead,
            ticks: 0,
            stalled: false,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn car(&self) -> &Car {
        &self.car
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn images(&self) -> SceneImages {
        self.images
    }

    /// Number of updates performed so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// True while the idle car has no legal move
    pub fn is_stalled(&self) -> bool {
        self.stalled
    }

    /// Target reached by performing `maneuver` from the car's current state
    fn target_for(&self, maneuver: Maneuver) -> Point {
        let heading = maneuver.apply(self.car.direction());
        self.car.position().offset(heading, self.lookahead)
    }

    /// Regular maneuvers whose target lies on the grid
    pub fn legal_moves(&self) -> Vec<(Maneuver, Point)> {
        Maneuver::REGULAR
            .iter()
            .map(|&m| (m, self.target_for(m)))
            .filter(|&(_, p)| self.grid.contains(p))
            .collect()
    }

    /// Pick the next maneuver: weighted draw among legal regular moves,
    /// falling back to a U-turn when none fits
    fn choose_move(&mut self) -> Result<(Maneuver, Point)> {
        let legal = self.legal_moves();
        if let Ok(dist) = WeightedIndex::new(legal.iter().map(|(m, _)| m.weight())) {
            return Ok(legal[dist.sample(&mut self.rng)]);
        }

        let target = self.target_for(Maneuver::UTurn);
        if self.grid.contains(target) {
            tracing::debug!("Dead end at {}, turning around", self.car.position());
            return Ok((Maneuver::UTurn, target));
        }

        Err(SimError::NoLegalMove {
            position: self.car.position(),
            direction: self.car.direction(),
        })
    }

    /// Turn the car and send it toward the target of `maneuver`.
    /// Fails without touching the car when the target is off the grid.
    pub fn commit(&mut self, maneuver: Maneuver) -> Result<Point> {
        let target = self.target_for(maneuver);
        if !self.grid.contains(target) {
            return Err(SimError::NoLegalMove {
                position: self.car.position(),
                direction: maneuver.apply(self.car.direction()),
            });
        }
        self.car.steer(maneuver);
        self.car.set_distance(target);
        tracing::debug!(
            "Car at {} -> {:?}, heading {:?}, target {}",
            self.car.position(),
            maneuver,
            self.car.direction(),
            target
        );
        Ok(target)
    }

    /// One simulation step: decide if idle, then move one tick.
    /// A car with no legal move stays put and the error is returned; it is
    /// logged once per stall, not once per frame.
    pub fn update(&mut self) -> Result<()> {
        self.ticks += 1;

        if self.car.is_ready() {
            let (maneuver, _) = match self.choose_move() {
                Ok(choice) => {
                    self.stalled = false;
                    choice
                }
                Err(err) => {
                    if !self.stalled {
                        tracing::error!("{}", err);
                        self.stalled = true;
                    }
                    return Err(err);
                }
            };
            self.commit(maneuver)?;
        }

        // First movement tick happens on the deciding frame
        self.car.update();
        Ok(())
    }

    pub fn draw(&mut self) {
        let (w, h) = self.grid.pixel_size();
        self.surface.clear_rect(0.0, 0.0, w, h);
        self.grid.draw(&mut self.surface);
        self.car.draw(&mut self.surface, self.images.car);
    }

    /// Main-loop body. Runs update + draw when the frame interval has
    /// elapsed and reports whether it did.
    pub fn frame(&mut self, now: f64) -> Result<bool> {
        if !self.clock.tick(now) {
            return Ok(false);
        }
        let result = self.update();
        self.draw();
        result.map(|()| true)
    }
}
