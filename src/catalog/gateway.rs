use super::{CatalogError, DoubleStar, Observation, ReferenceStar, Target};
use async_trait::async_trait;

/// Read/write access to the catalog store.
///
/// Constructed once at start-up and shared between the scheduler and the run manager.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Looks up a double star by id.
    async fn double_star(&self, id: i64) -> Result<Option<DoubleStar>, CatalogError>;

    /// Returns all reference stars inside an RA/Dec bounding box.
    ///
    /// # Arguments
    /// * `ra_range` – Lower and upper RA bound in degrees; the box may cross 0°/360°.
    /// * `dec_range` – Lower and upper declination bound in degrees.
    async fn reference_stars_in_box(
        &self,
        ra_range: (f64, f64),
        dec_range: (f64, f64),
    ) -> Result<Vec<ReferenceStar>, CatalogError>;

    /// Returns all pending targets in catalog order.
    async fn targets(&self) -> Result<Vec<Target>, CatalogError>;

    /// Commits an observation record.
    async fn insert_observation(&self, observation: Observation) -> Result<(), CatalogError>;
}
