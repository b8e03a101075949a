//! Geospatial query engine over a fixed set of land parcels ("fields").
//!
//! Data flows one way at startup:
//!   KML documents → `kml` → `registry` (built once, frozen) → `query`.

pub mod config;
pub mod error;
pub mod field;
pub mod geometry;
pub mod kml;
pub mod query;
pub mod registry;
pub mod types;

pub use config::FieldsConfig;
pub use error::{FieldsError, FieldsResult};
pub use field::{Field, FieldGeometry};
pub use geometry::{GeoPoint, Polygon};
pub use query::{FieldQueries, FieldQueryService};
pub use registry::FieldRegistry;
