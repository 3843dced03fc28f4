//! Headless stand-in for the rendering host: drives the wind field at a fixed
//! tick rate from emulated display frames and reads the position buffer back
//! after every frame, as a renderer uploading it would.

use magneto_config::SimulationConfig;
use magneto_field::{RandomSource, SolarWindField};
use tracing::{debug, info};

use crate::tick_loop::TickLoop;

/// Totals accumulated over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub frames: u64,
    pub deflected: u64,
    pub recycled: u64,
    /// Largest position buffer (in floats) handed to the renderer.
    pub uploaded_floats: usize,
}

/// Run `sim.ticks` wind steps, logging a summary every `report_interval` ticks.
pub fn run_wind<R: RandomSource>(
    wind: &mut SolarWindField<R>,
    sim: &SimulationConfig,
    report_interval: u64,
) -> RunSummary {
    let mut tick_loop = TickLoop::new(sim.tick_rate_hz);
    let frame_time = 1.0 / f64::from(sim.refresh_rate_hz.max(1));
    let mut summary = RunSummary::default();
    debug!(
        "Stepping wind at {:.4}s per tick, {:.4}s per frame",
        tick_loop.fixed_dt(),
        frame_time
    );

    while summary.ticks < sim.ticks {
        tick_loop.advance(
            frame_time,
            |_, _| {
                if summary.ticks >= sim.ticks {
                    return;
                }
                let report = wind.step();
                summary.ticks += 1;
                summary.deflected += u64::from(report.deflected);
                summary.recycled += u64::from(report.recycled);

                if report_interval > 0 && summary.ticks % report_interval == 0 {
                    let centroid = wind.centroid();
                    info!(
                        "tick {}: {} deflected, {} recycled, centroid ({:.3}, {:.3}, {:.3})",
                        summary.ticks,
                        report.deflected,
                        report.recycled,
                        centroid.x,
                        centroid.y,
                        centroid.z
                    );
                }
            },
            |alpha| debug!("frame alpha {alpha:.3}"),
        );

        let buffer = wind.position_buffer();
        summary.uploaded_floats = summary.uploaded_floats.max(buffer.len());
    }

    summary.frames = tick_loop.frame_count();
    debug!(
        "{} ticks over {} frames ({:.3}s simulated)",
        summary.ticks,
        summary.frames,
        tick_loop.total_sim_time()
    );
    summary
}
