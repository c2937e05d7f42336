use super::{GroupPolicy, SchedulerError};
use crate::{
    catalog::{CatalogGateway, EquatorialCoord, Priority, Target},
    devices::Telescope,
    event,
    util::astro::{angular_separation, hour_angle_deg, moon_position},
    warn,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{collections::HashMap, sync::Arc};

/// Weights of the cost terms. All distances are in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostWeights {
    /// Per degree of slew from the current pointing.
    pub distance: f64,
    /// Per inverse hour since the target was last scheduled.
    pub time: f64,
    /// Per degree of separation from the Moon; negative favors targets far from it.
    pub moon: f64,
    /// Per degree of absolute hour angle.
    pub hour_angle: f64,
    /// Per priority level below `Normal`.
    pub priority: f64,
    /// Targets closer to the Moon than this are never selected.
    pub moon_exclusion_deg: f64,
}

/// The sky state a selection is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct SkyContext {
    now: DateTime<Utc>,
    pointing: Option<EquatorialCoord>,
    moon: EquatorialCoord,
    longitude_deg: f64,
}

impl SkyContext {
    pub fn new(
        now: DateTime<Utc>,
        pointing: Option<EquatorialCoord>,
        moon: EquatorialCoord,
        longitude_deg: f64,
    ) -> Self {
        Self { now, pointing, moon, longitude_deg }
    }

    /// Evaluates the lunar position at `now`.
    pub fn at(now: DateTime<Utc>, pointing: Option<EquatorialCoord>, longitude_deg: f64) -> Self {
        Self::new(now, pointing, moon_position(now), longitude_deg)
    }
}

/// Selects the pending target with the lowest scalar cost.
pub struct WeightedPolicy {
    weights: CostWeights,
    longitude_deg: f64,
    telescope: Option<Arc<dyn Telescope>>,
    pending: Option<Vec<Target>>,
    scheduled_time: HashMap<u64, DateTime<Utc>>,
}

impl WeightedPolicy {
    /// Lower bound of the elapsed time in the freshness term.
    const MIN_ELAPSED_HOURS: f64 = 1.0 / 60.0;

    /// # Arguments
    /// * `weights` – Cost term weights.
    /// * `longitude_deg` – Site longitude, east positive, for hour angles.
    /// * `telescope` – Source of the current pointing; without it the distance term is dropped.
    pub fn new(
        weights: CostWeights,
        longitude_deg: f64,
        telescope: Option<Arc<dyn Telescope>>,
    ) -> Self {
        Self { weights, longitude_deg, telescope, pending: None, scheduled_time: HashMap::new() }
    }

    /// When `target` was last selected.
    pub fn last_scheduled(&self, target: &Target) -> Option<DateTime<Utc>> {
        self.scheduled_time.get(&target.id()).copied()
    }

    #[allow(clippy::cast_precision_loss)]
    fn hours_since_scheduled(&self, target: &Target, now: DateTime<Utc>) -> Option<f64> {
        self.last_scheduled(target).map(|t| (now - t).num_milliseconds() as f64 / 3_600_000.0)
    }

    /// Scalar cost of observing `target` located at `coord`; `f64::INFINITY` when excluded.
    pub fn cost(&self, target: &Target, coord: EquatorialCoord, sky: &SkyContext) -> f64 {
        let w = &self.weights;
        let moon_dist = angular_separation(coord, sky.moon);
        if moon_dist < w.moon_exclusion_deg {
            return f64::INFINITY;
        }
        let elapsed = self.hours_since_scheduled(target, sky.now);
        let freshness = elapsed.map_or(0.0, |h| 1.0 / h.max(Self::MIN_ELAPSED_HOURS));
        let overdue = matches!((elapsed, target.max_dt_hours()), (Some(h), Some(max)) if h > max);
        let priority = if overdue { target.priority().promoted() } else { target.priority() };

        let slew = sky.pointing.map_or(0.0, |p| angular_separation(coord, p));
        let hour_angle = hour_angle_deg(coord, sky.longitude_deg, sky.now).abs();

        w.distance * slew
            + w.time * freshness
            + w.moon * moon_dist
            + w.hour_angle * hour_angle
            + w.priority * f64::from(Priority::Normal.rank() - priority.rank())
    }

    /// Picks the cheapest admissible candidate and records its scheduling time.
    ///
    /// Candidates scheduled less than their minimum revisit time ago are skipped. If any
    /// `Now` candidate is admissible, only those are considered.
    ///
    /// # Returns
    /// The selected target, or `None` if every candidate is excluded.
    pub fn select(
        &mut self,
        candidates: &[(Target, EquatorialCoord)],
        sky: &SkyContext,
    ) -> Option<Target> {
        let admissible: Vec<&(Target, EquatorialCoord)> = candidates
            .iter()
            .filter(|(t, _)| t.is_schedulable())
            .filter(|(t, _)| {
                self.hours_since_scheduled(t, sky.now).is_none_or(|h| h >= t.min_dt_hours())
            })
            .collect();
        let urgent = admissible.iter().any(|(t, _)| t.priority() == Priority::Now);

        let (target, cost) = admissible
            .into_iter()
            .filter(|(t, _)| !urgent || t.priority() == Priority::Now)
            .map(|(t, c)| (t, self.cost(t, *c, sky)))
            .min_by(|a, b| a.1.total_cmp(&b.1))?;
        if !cost.is_finite() {
            return None;
        }
        event!("Target {} selected with cost {cost:.3}.", target.id());
        self.scheduled_time.insert(target.id(), sky.now);
        Some(target.clone())
    }

    async fn current_pointing(&self) -> Option<EquatorialCoord> {
        let telescope = self.telescope.as_ref()?;
        match telescope.get_pos().await {
            Ok(pos) => Some(pos),
            Err(e) => {
                warn!("Could not read mount position, ignoring slew distance: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl GroupPolicy for WeightedPolicy {
    fn name(&self) -> &'static str { "weighted" }

    async fn next_group(
        &mut self,
        gateway: &dyn CatalogGateway,
    ) -> Result<Vec<Target>, SchedulerError> {
        if self.pending.is_none() {
            let targets = gateway.targets().await?;
            self.pending = Some(targets.into_iter().filter(Target::is_schedulable).collect());
        }
        let mut candidates = Vec::new();
        for target in self.pending.iter().flatten() {
            match gateway.double_star(target.star_id()).await? {
                Some(star) => candidates.push((target.clone(), star.coord())),
                None => warn!("Target {} refers to unknown star {}.", target.id(), target.star_id()),
            }
        }
        let sky = SkyContext::at(Utc::now(), self.current_pointing().await, self.longitude_deg);
        self.select(&candidates, &sky).map(|t| vec![t]).ok_or(SchedulerError::NoObservableTargets)
    }

    fn reset(&mut self) {
        self.pending = None;
        self.scheduled_time.clear();
    }
}
