use super::{RunError, RunManager, RunStep};
use crate::{
    catalog::EquatorialCoord,
    devices::{Awaitable, PlateSolution},
    log,
    util::astro::offset_between,
    warn,
};
use std::sync::Arc;

/// Accepted residual pointing error per axis, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub ra: f64,
    pub dec: f64,
}

/// Whether a normalized `(ra, dec)` offset is inside `tol`.
pub fn within_tolerance((d_ra, d_dec): (f64, f64), tol: Tolerance) -> bool {
    d_ra.abs() <= tol.ra && d_dec.abs() <= tol.dec
}

impl RunManager {
    /// Closed-loop pointing refinement.
    ///
    /// Solves the acquisition field and applies relative corrections until the solved center
    /// is within tolerance of `target`. Returns the last solved center.
    pub(super) async fn converge(
        &mut self,
        target: EquatorialCoord,
    ) -> Result<EquatorialCoord, RunError> {
        let telescope = self.k.telescope();
        let rounds = self.cfg.max_refine_rounds;
        let mut offset = (0.0, 0.0);
        for round in 0..rounds {
            if round > 0 {
                self.set_step(RunStep::SlewOffset);
                telescope.slew_rel(offset.0, offset.1).await.map_err(RunError::Slew)?;
                self.idle_while_busy(vec![Arc::clone(&telescope) as Arc<dyn Awaitable>]).await?;
                self.settle().await;
            }
            let center = self.solve_field().await?.center();
            offset = offset_between(center, target);
            log!(
                "Refinement round {}: solved {center}, offset ({:+.5}, {:+.5}) deg.",
                round + 1,
                offset.0,
                offset.1
            );
            if within_tolerance(offset, self.cfg.tolerance) {
                return Ok(center);
            }
        }
        Err(RunError::NoConvergence { rounds })
    }

    /// Takes acquisition frames until one solves, up to `plate_solve_tries` times.
    async fn solve_field(&mut self) -> Result<PlateSolution, RunError> {
        let camera = self.k.acquisition_camera();
        let solver = self.k.plate_solver();
        let tries = self.cfg.plate_solve_tries;
        for attempt in 1..=tries {
            self.set_step(RunStep::Acq);
            camera.take_temp_light(self.cfg.acq_itime).await?;
            self.idle_while_busy(vec![Arc::clone(&camera) as Arc<dyn Awaitable>]).await?;
            let path = camera.get_img_path().await?.ok_or(RunError::ImageRetrieval)?;

            self.set_step(RunStep::Plate);
            solver.solve(&path).await?;
            self.idle_while_busy(vec![Arc::clone(&solver) as Arc<dyn Awaitable>]).await?;
            if let Some(solution) = solver.plate_solution().await? {
                return Ok(solution);
            }
            warn!("Plate solve {attempt}/{tries} of {path} failed.");
        }
        Err(RunError::PlateSolveExhausted { tries })
    }
}
