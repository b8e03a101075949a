//! Read-only queries over a frozen [`FieldRegistry`].
//!
//! RULE: Steady-state queries never fail. Unknown ids and missing centers
//! come back as `None` from the `try_*` forms and as `0.0` from the
//! sentinel forms the HTTP layer serves.

use crate::{
    field::Field,
    geometry::{haversine_distance, GeoPoint},
    registry::FieldRegistry,
    types::{FieldId, Meters, SquareMeters},
};
use std::sync::Arc;

/// The query surface the request layer depends on.
pub trait FieldQueries: Send + Sync {
    /// All fields, in snapshot order.
    fn list_all(&self) -> &[Field];

    fn get_by_id(&self, id: FieldId) -> Option<&Field>;

    /// Precomputed area; `0.0` for an unknown id.
    fn area_of(&self, id: FieldId) -> SquareMeters;

    /// Meters from `point` to the field's center; `0.0` when the id is
    /// unknown or the field has no center.
    fn distance_to_center(&self, id: FieldId, point: GeoPoint) -> Meters;

    /// First field in snapshot order whose polygon contains `point`.
    fn find_containing(&self, point: GeoPoint) -> Option<&Field>;
}

#[derive(Debug, Clone)]
pub struct FieldQueryService {
    registry: Arc<FieldRegistry>,
}

impl FieldQueryService {
    pub fn new(registry: Arc<FieldRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn try_area_of(&self, id: FieldId) -> Option<SquareMeters> {
        self.registry.get(id).map(|f| f.size)
    }

    pub fn try_distance_to_center(&self, id: FieldId, point: GeoPoint) -> Option<Meters> {
        let center = self.registry.get(id)?.geometry.center?;
        Some(haversine_distance(center, point))
    }
}

impl FieldQueries for FieldQueryService {
    fn list_all(&self) -> &[Field] {
        self.registry.fields()
    }

    fn get_by_id(&self, id: FieldId) -> Option<&Field> {
        self.registry.get(id)
    }

    fn area_of(&self, id: FieldId) -> SquareMeters {
        self.try_area_of(id).unwrap_or(0.0)
    }

    fn distance_to_center(&self, id: FieldId, point: GeoPoint) -> Meters {
        self.try_distance_to_center(id, point).unwrap_or(0.0)
    }

    fn find_containing(&self, point: GeoPoint) -> Option<&Field> {
        self.registry.fields().iter().find(|f| f.contains(point))
    }
}
