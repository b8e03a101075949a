//! Field registry: joins boundary and centroid records into an immutable
//! snapshot.
//!
//! CONSTRUCTION ORDER (fixed):
//!   1. Load boundaries
//!   2. Load centroids
//!   3. Link by id
//!
//! RULES:
//!   - A registry is never mutated after `link` returns.
//!   - Fresher data means building a new registry and swapping the `Arc`
//!     readers hold; never editing fields in place.
//!   - A boundary without a centroid is kept with `center = None`, `size = 0`.

use crate::{
    config::FieldsConfig,
    error::FieldsResult,
    field::{Field, FieldGeometry},
    kml::{self, BoundaryRecord, CentroidIndex},
    types::{FieldId, SquareMeters},
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct FieldRegistry {
    fields:    Vec<Field>,
    by_id:     HashMap<FieldId, usize>,
    loaded_at: DateTime<Utc>,
}

impl FieldRegistry {
    /// Read both source documents named by `config` and link them.
    /// Any loader error aborts; no partial registry is returned.
    pub fn load(config: &FieldsConfig) -> FieldsResult<Self> {
        let boundaries = kml::load_boundaries(&config.boundaries_path())?;
        let centroids = kml::load_centroids(&config.centroids_path())?;
        Ok(Self::link(boundaries, &centroids))
    }

    /// Build the snapshot from already-parsed records, in boundary order.
    ///
    /// The loader rejects duplicate ids; if any slip through, lookups by id
    /// resolve to the first occurrence.
    pub fn link(boundaries: Vec<BoundaryRecord>, centroids: &CentroidIndex) -> Self {
        let mut fields = Vec::with_capacity(boundaries.len());
        let mut by_id = HashMap::with_capacity(boundaries.len());

        for record in boundaries {
            let center = centroids.get(record.id);
            let size = match center {
                Some(_) => record.polygon.area(),
                None => {
                    log::warn!("Field {} ({}) has no centroid; area left at 0", record.id, record.name);
                    0.0
                }
            };

            by_id.entry(record.id).or_insert(fields.len());
            fields.push(Field {
                id:       record.id,
                name:     record.name,
                size,
                geometry: FieldGeometry { center, polygon: record.polygon },
            });
        }

        let registry = Self { fields, by_id, loaded_at: Utc::now() };

        // Field ids are unique, so each linked field consumed a distinct centroid.
        let unused = centroids.len().saturating_sub(registry.linked_count());
        if unused > 0 {
            log::debug!("{unused} centroids matched no field");
        }

        log::info!(
            "Field registry ready: {} fields, {} with centers, total area {:.1} m²",
            registry.len(),
            registry.linked_count(),
            registry.total_area(),
        );
        registry
    }

    /// All fields in boundary-document order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, id: FieldId) -> Option<&Field> {
        self.by_id.get(&id).map(|&i| &self.fields[i])
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn linked_count(&self) -> usize {
        self.fields.iter().filter(|f| f.has_center()).count()
    }

    pub fn total_area(&self) -> SquareMeters {
        self.fields.iter().map(|f| f.size).sum()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}
