//! The field entity as served to callers.

use crate::{
    geometry::{GeoPoint, Polygon},
    types::{FieldId, SquareMeters},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldGeometry {
    /// The source's labeled center. `None` when no centroid matched.
    pub center:  Option<GeoPoint>,
    pub polygon: Polygon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id:       FieldId,
    pub name:     String,
    /// Zero when the field has no center.
    pub size:     SquareMeters,
    #[serde(rename = "locations")]
    pub geometry: FieldGeometry,
}

impl Field {
    pub fn has_center(&self) -> bool {
        self.geometry.center.is_some()
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        self.geometry.polygon.contains(point)
    }
}
