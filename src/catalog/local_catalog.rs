use super::{CatalogError, CatalogGateway, DoubleStar, Observation, ReferenceStar, Target};
use crate::{info, log};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};
use tokio::{io::AsyncWriteExt, sync::RwLock};

/// A catalog store backed by JSON files in a single directory.
///
/// Reference data and targets are read once at start-up; observations are kept in
/// memory and appended to a JSON lines log if the catalog was opened from disk.
pub struct LocalCatalog {
    doubles: HashMap<i64, DoubleStar>,
    references: Vec<ReferenceStar>,
    targets: Vec<Target>,
    observations: RwLock<Vec<Observation>>,
    observation_log: Option<PathBuf>,
}

impl LocalCatalog {
    const DOUBLE_STARS_FILE: &'static str = "double_stars.json";
    const REFERENCE_STARS_FILE: &'static str = "reference_stars.json";
    const TARGETS_FILE: &'static str = "targets.json";
    const OBSERVATION_LOG_FILE: &'static str = "observations.jsonl";

    /// Loads a catalog directory.
    ///
    /// # Arguments
    /// * `dir` – Directory containing `double_stars.json`, `reference_stars.json` and `targets.json`.
    ///
    /// # Returns
    /// The loaded catalog or the first I/O or format error encountered.
    pub async fn open(dir: &Path) -> Result<Self, CatalogError> {
        let doubles: Vec<DoubleStar> = read_json(&dir.join(Self::DOUBLE_STARS_FILE)).await?;
        let references: Vec<ReferenceStar> =
            read_json(&dir.join(Self::REFERENCE_STARS_FILE)).await?;
        let targets: Vec<Target> = read_json(&dir.join(Self::TARGETS_FILE)).await?;
        info!(
            "Loaded catalog from {}: {} double stars, {} reference stars, {} targets.",
            dir.display(),
            doubles.len(),
            references.len(),
            targets.len()
        );
        let mut catalog = Self::in_memory(doubles, references, targets);
        catalog.observation_log = Some(dir.join(Self::OBSERVATION_LOG_FILE));
        Ok(catalog)
    }

    /// Builds a catalog that never touches the filesystem.
    pub fn in_memory(
        doubles: Vec<DoubleStar>,
        references: Vec<ReferenceStar>,
        targets: Vec<Target>,
    ) -> Self {
        Self {
            doubles: doubles.into_iter().map(|d| (d.id(), d)).collect(),
            references,
            targets,
            observations: RwLock::new(Vec::new()),
            observation_log: None,
        }
    }

    /// Observations committed during this session.
    pub async fn observations(&self) -> Vec<Observation> { self.observations.read().await.clone() }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&raw)?)
}

/// Checks `ra` against an RA interval that may wrap around 0°/360°.
pub(super) fn ra_in_range(ra: f64, (lo, hi): (f64, f64)) -> bool {
    let span = hi - lo;
    if span >= 360.0 {
        return true;
    }
    (ra - lo).rem_euclid(360.0) <= span
}

#[async_trait]
impl CatalogGateway for LocalCatalog {
    async fn double_star(&self, id: i64) -> Result<Option<DoubleStar>, CatalogError> {
        Ok(self.doubles.get(&id).cloned())
    }

    async fn reference_stars_in_box(
        &self,
        ra_range: (f64, f64),
        dec_range: (f64, f64),
    ) -> Result<Vec<ReferenceStar>, CatalogError> {
        Ok(self
            .references
            .iter()
            .filter(|r| {
                let c = r.coord();
                ra_in_range(c.ra_deg(), ra_range)
                    && c.dec_deg() >= dec_range.0
                    && c.dec_deg() <= dec_range.1
            })
            .cloned()
            .collect())
    }

    async fn targets(&self) -> Result<Vec<Target>, CatalogError> { Ok(self.targets.clone()) }

    async fn insert_observation(&self, observation: Observation) -> Result<(), CatalogError> {
        if let Some(path) = &self.observation_log {
            let mut line = serde_json::to_string(&observation)?;
            line.push('\n');
            let mut file =
                tokio::fs::OpenOptions::new().create(true).append(true).open(path).await?;
            file.write_all(line.as_bytes()).await?;
            file.flush().await?;
        }
        log!(
            "Committed observation {} of star {} in band {}.",
            observation.filename(),
            observation.star_id(),
            observation.band()
        );
        self.observations.write().await.push(observation);
        Ok(())
    }
}
