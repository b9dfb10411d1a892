//! Frame loop: presents the simulation's canvas in a minifb window, or
//! steps it headlessly against a recording surface.

pub mod canvas;

use std::time::Instant;

use anyhow::{anyhow, Result};
use gridcar_sim::{RecordingSurface, SimError, Simulation};
use minifb::{Key, Window, WindowOptions};

use crate::assets::AssetLoader;
use canvas::Canvas;

/// Presentation rate; above the simulation rate so the frame clock, not
/// the window, decides when updates happen
const DISPLAY_FPS: usize = 240;

/// Presented frames between title refreshes
const TITLE_INTERVAL: u64 = 30;

/// Log a failed tick. `NoLegalMove` is already reported by the simulation
/// when the stall begins.
fn report(err: &SimError) {
    match err {
        SimError::NoLegalMove { .. } => tracing::trace!("{}", err),
        other => tracing::warn!("Tick failed: {}", other),
    }
}

/// Run the windowed loop until the window closes or Escape is pressed
pub fn run(mut sim: Simulation<Canvas>, mut loader: AssetLoader) -> Result<()> {
    let (width, height) = sim.surface().size();

    let mut window = Window::new("gridcar", width, height, WindowOptions::default())
        .map_err(|e| anyhow!("Window creation failed: {}", e))?;
    window.set_target_fps(DISPLAY_FPS);

    tracing::info!("Window {}x{} open, entering frame loop", width, height);
    tracing::info!("Controls: Esc=quit");

    let start = Instant::now();
    let mut presented: u64 = 0;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        if !loader.is_done() {
            let arrived = loader.poll(sim.surface_mut().images_mut());
            if arrived > 0 {
                tracing::debug!("{} image(s) loaded", sim.surface().images().len());
            }
        }

        let now = start.elapsed().as_secs_f64() * 1000.0;
        if let Err(err) = sim.frame(now) {
            report(&err);
        }

        presented += 1;
        if presented % TITLE_INTERVAL == 0 {
            let car = sim.car();
            let title = format!(
                "gridcar | tick {} | {} {:?}{}",
                sim.ticks(),
                car.position(),
                car.direction(),
                if sim.is_stalled() { " | stalled" } else { "" },
            );
            window.set_title(&title);
        }

        window
            .update_with_buffer(sim.surface().buffer(), width, height)
            .map_err(|e| anyhow!("Display error: {}", e))?;
    }

    tracing::info!("Frame loop finished after {} ticks", sim.ticks());
    Ok(())
}

/// Step the simulation `ticks` times on a simulated clock, with no window
pub fn run_headless(mut sim: Simulation<RecordingSurface>, ticks: u64) -> Result<()> {
    // Advance just past the frame interval so every frame runs
    let step = sim.clock().frame_time() + 0.01;
    let mut now = sim.clock().then();
    let mut failed = 0u64;

    while sim.ticks() < ticks {
        now += step;
        match sim.frame(now) {
            Ok(_) => {}
            Err(err) => {
                report(&err);
                failed += 1;
            }
        }
        // The recording only needs to hold the latest frame
        if sim.ticks() < ticks {
            sim.surface_mut().clear();
        }
    }

    let car = sim.car();
    tracing::info!(
        "Headless run: {} ticks, car at {} heading {:?}, {} failed, {} draws in last frame",
        sim.ticks(),
        car.position(),
        car.direction(),
        failed,
        sim.surface().commands().len()
    );
    Ok(())
}
