use super::{GroupPolicy, ScheduledTarget, SchedulerError, TargetSource};
use crate::{
    catalog::{Band, CatalogGateway, DoubleStar, ReferenceStar, Star},
    error, info, obs,
    util::astro::{flat_distance, stype_to_number},
    warn,
};
use async_trait::async_trait;
use itertools::Itertools;
use std::{
    collections::{HashSet, VecDeque},
    sync::Arc,
};

/// Bounds of the widening reference star search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingleSearch {
    /// Initial RA half-width of the search box in degrees.
    pub max_dist_ra: f64,
    /// Initial Dec half-width of the search box in degrees.
    pub max_dist_dec: f64,
    /// How often the box may double before the search gives up.
    pub max_widenings: u32,
}

impl Default for SingleSearch {
    fn default() -> Self { Self { max_dist_ra: 2.0, max_dist_dec: 2.0, max_widenings: 8 } }
}

#[derive(Debug, Clone)]
struct QueuedDouble {
    star: DoubleStar,
    band: Band,
    requester: Option<String>,
}

/// Double/single pairing scheduler.
///
/// Doubles of the current group are handed out strictly in queue order. Once every double
/// has been tried and at least one succeeded, the group's calibration single follows.
pub struct Scheduler {
    gateway: Arc<dyn CatalogGateway>,
    policy: Box<dyn GroupPolicy>,
    search: SingleSearch,
    /// Permitted filter bands, empty for no restriction.
    filters: HashSet<Band>,
    double_queue: VecDeque<QueuedDouble>,
    successful_doubles: Vec<DoubleStar>,
    single: Option<ReferenceStar>,
    group_band: Option<Band>,
    blacklisted_singles: HashSet<i64>,
    current: Option<ScheduledTarget>,
}

impl Scheduler {
    /// Groups that expand to nothing before loading gives up. Only applies to policies
    /// that never run dry on their own.
    const MAX_EMPTY_GROUPS: usize = 64;

    pub fn new(
        gateway: Arc<dyn CatalogGateway>,
        policy: Box<dyn GroupPolicy>,
        search: SingleSearch,
        filters: Vec<Band>,
    ) -> Self {
        info!("Scheduler using {} group policy.", policy.name());
        Self {
            gateway,
            policy,
            search,
            filters: filters.into_iter().collect(),
            double_queue: VecDeque::new(),
            successful_doubles: Vec::new(),
            single: None,
            group_band: None,
            blacklisted_singles: HashSet::new(),
            current: None,
        }
    }

    /// Returns the next target and remembers it as the one outcome reports refer to.
    ///
    /// # Returns
    /// The head of the double queue; else the group's single if one of its doubles succeeded;
    /// else the first target of a freshly loaded group.
    pub async fn next_target(&mut self) -> Result<ScheduledTarget, SchedulerError> {
        let mut empty_groups = 0;
        loop {
            if let Some(entry) = self.double_queue.pop_front() {
                let target =
                    ScheduledTarget::new(Star::Double(entry.star), entry.band, entry.requester);
                return Ok(self.hand_out(target));
            }
            if !self.successful_doubles.is_empty() {
                if let (Some(single), Some(band)) = (self.single.take(), self.group_band.clone()) {
                    let target = ScheduledTarget::new(Star::Reference(single), band, None);
                    return Ok(self.hand_out(target));
                }
            }
            if !self.policy.consumes_targets() && empty_groups >= Self::MAX_EMPTY_GROUPS {
                warn!("{empty_groups} consecutive groups without observable entries.");
                return Err(SchedulerError::NoObservableTargets);
            }
            self.load_next_group().await?;
            empty_groups += 1;
        }
    }

    fn hand_out(&mut self, target: ScheduledTarget) -> ScheduledTarget {
        obs!("Scheduled {target}.");
        self.current = Some(target.clone());
        target
    }

    /// Records success of the current target. Doubles become eligible for calibration.
    pub fn target_success(&mut self) {
        match self.current.take() {
            Some(target) => {
                obs!("Observed {target}.");
                if let Star::Double(double) = target.star() {
                    if !self.successful_doubles.iter().any(|d| d.id() == double.id()) {
                        self.successful_doubles.push(double.clone());
                    }
                }
            }
            None => warn!("Success reported without a current target."),
        }
    }

    /// Records failure of the current target.
    ///
    /// A failed single is blacklisted and replaced for the doubles that still need it; a
    /// failed double is dropped.
    pub async fn target_failed(&mut self) -> Result<(), SchedulerError> {
        let Some(target) = self.current.take() else {
            warn!("Failure reported without a current target.");
            return Ok(());
        };
        obs!("Giving up on {target}.");
        let Star::Reference(single) = target.star() else {
            return Ok(());
        };
        self.blacklisted_singles.insert(single.id());
        if self.successful_doubles.is_empty() {
            return Ok(());
        }
        let replacement = self.get_next_single_star(&self.successful_doubles).await;
        match replacement {
            Ok(replacement) => {
                info!("Replacing calibration star {} with {}.", single.id(), replacement.id());
                self.single = Some(replacement);
            }
            Err(e @ (SchedulerError::NoReferenceStar { .. } | SchedulerError::UnsupportedGroup(_))) => {
                warn!("No replacement calibration star: {e}");
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Clears all scheduling state, including blacklisted singles.
    pub fn reset(&mut self) {
        self.double_queue.clear();
        self.successful_doubles.clear();
        self.single = None;
        self.group_band = None;
        self.blacklisted_singles.clear();
        self.current = None;
        self.policy.reset();
        info!("Scheduler reset.");
    }

    async fn load_next_group(&mut self) -> Result<(), SchedulerError> {
        self.successful_doubles.clear();
        self.single = None;
        self.group_band = None;

        let group = self.policy.next_group(self.gateway.as_ref()).await?;
        let mut doubles: Vec<DoubleStar> = Vec::new();
        for target in group {
            let Some(star) = self.gateway.double_star(target.star_id()).await? else {
                warn!("Target {} refers to unknown double star {}.", target.id(), target.star_id());
                continue;
            };
            let queued_before = self.double_queue.len();
            for band in target.bands() {
                if !self.filters.is_empty() && !self.filters.contains(band) {
                    warn!("Band {band} of target {} is not in the filter set.", target.id());
                    continue;
                }
                for _ in 0..target.mpo() {
                    self.double_queue.push_back(QueuedDouble {
                        star: star.clone(),
                        band: band.clone(),
                        requester: target.requester().map(String::from),
                    });
                }
            }
            if self.double_queue.len() > queued_before && !doubles.iter().any(|d| d.id() == star.id()) {
                doubles.push(star);
            }
        }
        let Some(first) = self.double_queue.front() else {
            return Ok(());
        };
        self.group_band = Some(first.band.clone());
        info!("Loaded group of {} double(s), {} exposure(s).", doubles.len(), self.double_queue.len());

        let single = self.get_next_single_star(&doubles).await;
        match single {
            Ok(single) => {
                info!("Calibration star for this group: {} ({}).", single.name(), single.id());
                self.single = Some(single);
            }
            Err(e @ (SchedulerError::NoReferenceStar { .. } | SchedulerError::UnsupportedGroup(_))) => {
                error!("Group will be observed without calibration: {e}");
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Finds a calibration single for a group consisting of exactly one double.
    ///
    /// The search box starts at the configured half-widths around the double and doubles
    /// until it contains a non-blacklisted reference star or the widening bound is hit.
    /// Among the candidates the closest spectral type wins, ties go to the nearest star.
    pub async fn get_next_single_star(
        &self,
        doubles: &[DoubleStar],
    ) -> Result<ReferenceStar, SchedulerError> {
        let [double] = doubles else {
            return Err(SchedulerError::UnsupportedGroup(doubles.len()));
        };
        let center = double.coord();
        let (mut half_ra, mut half_dec) = (self.search.max_dist_ra, self.search.max_dist_dec);
        for attempt in 0..=self.search.max_widenings {
            let candidates: Vec<ReferenceStar> = self
                .gateway
                .reference_stars_in_box(
                    (center.ra_deg() - half_ra, center.ra_deg() + half_ra),
                    (center.dec_deg() - half_dec, center.dec_deg() + half_dec),
                )
                .await?
                .into_iter()
                .filter(|r| !self.blacklisted_singles.contains(&r.id()))
                .collect();
            if let Some(best) = Self::best_single(double, candidates) {
                return Ok(best);
            }
            if attempt < self.search.max_widenings {
                half_ra *= 2.0;
                half_dec *= 2.0;
            }
        }
        Err(SchedulerError::NoReferenceStar {
            double_id: double.id(),
            half_width_ra: half_ra,
            half_width_dec: half_dec,
        })
    }

    fn best_single(double: &DoubleStar, candidates: Vec<ReferenceStar>) -> Option<ReferenceStar> {
        let double_type = stype_to_number(double.stype());
        candidates
            .into_iter()
            .min_set_by_key(|r| stype_to_number(r.stype()).abs_diff(double_type))
            .into_iter()
            .min_by(|a, b| {
                flat_distance(a.coord(), double.coord())
                    .total_cmp(&flat_distance(b.coord(), double.coord()))
            })
    }
}

#[async_trait]
impl TargetSource for Scheduler {
    async fn next_target(&mut self) -> Result<ScheduledTarget, SchedulerError> {
        Scheduler::next_target(self).await
    }

    async fn target_success(&mut self) -> Result<(), SchedulerError> {
        Scheduler::target_success(self);
        Ok(())
    }

    async fn target_failed(&mut self) -> Result<(), SchedulerError> {
        Scheduler::target_failed(self).await
    }

    async fn reset(&mut self) -> Result<(), SchedulerError> {
        Scheduler::reset(self);
        Ok(())
    }
}
