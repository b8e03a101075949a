use crate::types::FieldId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FieldsError {
    #[error("Cannot read {}: {}", .path.display(), .source)]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed KML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("KML root has no <Document> feature container")]
    MissingDocument,

    #[error("Polygon placemark id {raw:?} is not an integer")]
    InvalidFieldId { raw: Option<String> },

    #[error("Point placemark has no id")]
    MissingCentroidId,

    #[error("Polygon placemark {id} has no outer boundary ring")]
    MissingOuterBoundary { id: String },

    #[error("Invalid coordinate tuple {raw:?}")]
    InvalidCoordinate { raw: String },

    #[error("Polygon placemark {id} has {vertices} vertices, need at least 3")]
    DegeneratePolygon { id: String, vertices: usize },

    #[error("Field id {id} appears more than once in the boundary document")]
    DuplicateField { id: FieldId },

    #[error("Centroid id '{id}' appears more than once in the centroid document")]
    DuplicateCentroid { id: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type FieldsResult<T> = Result<T, FieldsError>;
