//! Catalog data model and the gateway the scheduler and run manager use to reach it.
//!
//! The catalog holds immutable reference data (double stars, reference stars), the
//! pending scheduling requests (targets) and the append-only observation log.

mod catalog_error;
mod gateway;
mod local_catalog;
mod observation;
mod star;
mod target;
#[cfg(test)]
mod tests;

pub use catalog_error::CatalogError;
pub use gateway::CatalogGateway;
pub use local_catalog::LocalCatalog;
pub use observation::{ExposureInfo, Observation};
pub use star::{CatalogTable, DoubleStar, EquatorialCoord, ReferenceStar, Star};
pub use target::{Band, Priority, Target};
