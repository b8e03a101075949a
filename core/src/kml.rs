//! KML source documents → raw boundary and centroid records.
//!
//! RULE: Only this module reads or parses source documents.
//! The registry consumes the records it returns and never sees XML.
//!
//! Any malformed input aborts the whole load. Placemarks with the wrong
//! geometry kind for their document are skipped.

use crate::{
    error::{FieldsError, FieldsResult},
    geometry::{GeoPoint, Polygon},
    types::FieldId,
};
use roxmltree::{Document, Node};
use std::{
    collections::{hash_map::Entry, HashMap, HashSet},
    path::Path,
};

/// One polygon placemark from the boundary document.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryRecord {
    pub id:      FieldId,
    pub name:    String,
    pub polygon: Polygon,
}

/// Centroid points keyed by the placemark's `id` attribute as written.
///
/// Lookups go through [`CentroidIndex::get`], which matches a field id
/// against the stringified form, so `"01"` never links to field `1`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CentroidIndex {
    points: HashMap<String, GeoPoint>,
}

impl CentroidIndex {
    pub fn get(&self, id: FieldId) -> Option<GeoPoint> {
        self.points.get(&id.to_string()).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Raw ids in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.points.keys().map(String::as_str)
    }

    fn insert(&mut self, id: String, point: GeoPoint) -> FieldsResult<()> {
        match self.points.entry(id) {
            Entry::Occupied(e) => Err(FieldsError::DuplicateCentroid { id: e.key().clone() }),
            Entry::Vacant(e) => {
                e.insert(point);
                Ok(())
            }
        }
    }
}

// ── File entry points ─────────────────────────────────────────

pub fn load_boundaries(path: &Path) -> FieldsResult<Vec<BoundaryRecord>> {
    let text = read_document(path)?;
    let records = parse_boundaries(&text)?;
    log::info!("Loaded {} field boundaries from {}", records.len(), path.display());
    Ok(records)
}

pub fn load_centroids(path: &Path) -> FieldsResult<CentroidIndex> {
    let text = read_document(path)?;
    let index = parse_centroids(&text)?;
    log::info!("Loaded {} centroids from {}", index.len(), path.display());
    Ok(index)
}

fn read_document(path: &Path) -> FieldsResult<String> {
    std::fs::read_to_string(path).map_err(|source| FieldsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ── Parsing ───────────────────────────────────────────────────

/// Polygon placemarks in document order.
pub fn parse_boundaries(text: &str) -> FieldsResult<Vec<BoundaryRecord>> {
    let doc = Document::parse(text)?;
    let mut records = Vec::new();
    let mut seen = HashSet::new();

    for placemark in placemarks(&doc)? {
        let Some(polygon) = child(placemark, "Polygon") else {
            log::debug!("Skipping non-polygon placemark {:?}", placemark.attribute("id"));
            continue;
        };

        let raw_id = placemark.attribute("id");
        let id: FieldId = raw_id
            .and_then(|raw| raw.trim().parse().ok())
            .ok_or_else(|| FieldsError::InvalidFieldId { raw: raw_id.map(str::to_string) })?;

        if !seen.insert(id) {
            return Err(FieldsError::DuplicateField { id });
        }

        let coordinates = descend(polygon, &["outerBoundaryIs", "LinearRing", "coordinates"])
            .ok_or_else(|| FieldsError::MissingOuterBoundary { id: id.to_string() })?;
        let vertices = parse_coordinates(coordinates.text().unwrap_or_default())?;
        let count = vertices.len();
        let polygon = Polygon::new(vertices).ok_or_else(|| FieldsError::DegeneratePolygon {
            id:       id.to_string(),
            vertices: count,
        })?;

        records.push(BoundaryRecord {
            id,
            name: placemark_name(placemark),
            polygon,
        });
    }

    Ok(records)
}

pub fn parse_centroids(text: &str) -> FieldsResult<CentroidIndex> {
    let doc = Document::parse(text)?;
    let mut index = CentroidIndex::default();

    for placemark in placemarks(&doc)? {
        let Some(point) = child(placemark, "Point") else {
            log::debug!("Skipping non-point placemark {:?}", placemark.attribute("id"));
            continue;
        };

        let id = placemark
            .attribute("id")
            .ok_or(FieldsError::MissingCentroidId)?
            .to_string();

        let raw = child(point, "coordinates")
            .and_then(|c| c.text())
            .unwrap_or_default();
        let coordinate = match parse_coordinates(raw)?.as_slice() {
            [only] => *only,
            _ => return Err(FieldsError::InvalidCoordinate { raw: raw.trim().to_string() }),
        };

        index.insert(id, coordinate)?;
    }

    Ok(index)
}

/// Direct `<Placemark>` children of the root `<Document>`.
fn placemarks<'a, 'input>(
    doc: &'a Document<'input>,
) -> FieldsResult<impl Iterator<Item = Node<'a, 'input>>> {
    let container = child(doc.root_element(), "Document").ok_or(FieldsError::MissingDocument)?;
    Ok(container
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "Placemark"))
}

fn placemark_name(placemark: Node) -> String {
    child(placemark, "name")
        .and_then(|n| n.text())
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// `lng,lat[,alt]` tuples separated by whitespace. Altitude is dropped.
fn parse_coordinates(text: &str) -> FieldsResult<Vec<GeoPoint>> {
    text.split_whitespace()
        .map(|tuple| {
            let invalid = || FieldsError::InvalidCoordinate { raw: tuple.to_string() };
            let mut parts = tuple.split(',');
            let lng = parse_degrees(parts.next()).ok_or_else(invalid)?;
            let lat = parse_degrees(parts.next()).ok_or_else(invalid)?;
            if let Some(alt) = parts.next() {
                alt.parse::<f64>().map_err(|_| invalid())?;
            }
            if parts.next().is_some() {
                return Err(invalid());
            }
            Ok(GeoPoint { lat, lng })
        })
        .collect()
}

fn parse_degrees(part: Option<&str>) -> Option<f64> {
    part?.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn descend<'a, 'input>(node: Node<'a, 'input>, path: &[&str]) -> Option<Node<'a, 'input>> {
    path.iter().try_fold(node, |n, name| child(n, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kml(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2"><Document>{body}</Document></kml>"#
        )
    }

    fn polygon_placemark(id: &str, name: &str, coords: &str) -> String {
        format!(
            r#"<Placemark id="{id}"><name>{name}</name><Polygon><outerBoundaryIs><LinearRing>
<coordinates>{coords}</coordinates></LinearRing></outerBoundaryIs></Polygon></Placemark>"#
        )
    }

    fn point_placemark(id: &str, coords: &str) -> String {
        format!(r#"<Placemark id="{id}"><Point><coordinates>{coords}</coordinates></Point></Placemark>"#)
    }

    const SQUARE: &str = "23.70,52.10,0 23.71,52.10,0 23.71,52.11,0 23.70,52.11,0";

    #[test]
    fn boundaries_keep_document_order_and_swap_lng_lat() {
        let text = kml(&format!(
            "{}{}",
            polygon_placemark("7", "North", SQUARE),
            polygon_placemark("3", "South", "1,2 3,4 5,6"),
        ));
        let records = parse_boundaries(&text).expect("parse");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 7);
        assert_eq!(records[0].name, "North");
        assert_eq!(records[1].id, 3);
        assert_eq!(records[1].polygon.vertices()[0], GeoPoint::new(2.0, 1.0));
    }

    #[test]
    fn non_polygon_placemarks_are_skipped_in_boundary_document() {
        let text = kml(&format!(
            "{}{}",
            point_placemark("1", "23.7,52.1,0"),
            polygon_placemark("2", "Only", SQUARE),
        ));
        let records = parse_boundaries(&text).expect("parse");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 2);
    }

    #[test]
    fn non_integer_field_id_is_fatal() {
        let text = kml(&polygon_placemark("field-a", "Bad", SQUARE));
        let err = parse_boundaries(&text).unwrap_err();
        assert!(matches!(err, FieldsError::InvalidFieldId { raw: Some(ref r) } if r == "field-a"), "{err}");
    }

    #[test]
    fn missing_field_id_is_fatal() {
        let text = kml(
            "<Placemark><Polygon><outerBoundaryIs><LinearRing><coordinates>0,0 1,0 1,1</coordinates>\
             </LinearRing></outerBoundaryIs></Polygon></Placemark>",
        );
        assert!(matches!(parse_boundaries(&text), Err(FieldsError::InvalidFieldId { raw: None })));
    }

    #[test]
    fn missing_document_container_is_fatal() {
        let text = r#"<kml xmlns="http://www.opengis.net/kml/2.2"><Folder/></kml>"#;
        assert!(matches!(parse_boundaries(text), Err(FieldsError::MissingDocument)));
        assert!(matches!(parse_centroids(text), Err(FieldsError::MissingDocument)));
    }

    #[test]
    fn malformed_xml_is_fatal() {
        assert!(matches!(parse_boundaries("<kml><Document>"), Err(FieldsError::Xml(_))));
    }

    #[test]
    fn polygon_without_outer_ring_is_fatal() {
        let text = kml(r#"<Placemark id="4"><Polygon/></Placemark>"#);
        assert!(matches!(
            parse_boundaries(&text),
            Err(FieldsError::MissingOuterBoundary { ref id }) if id == "4"
        ));
    }

    #[test]
    fn bad_coordinates_are_fatal() {
        let text = kml(&polygon_placemark("5", "Bad", "1,2 3,abc 5,6"));
        assert!(matches!(parse_boundaries(&text), Err(FieldsError::InvalidCoordinate { .. })));

        let text = kml(&polygon_placemark("5", "Bad", "1,2 3,4 5,6,7,8"));
        assert!(matches!(parse_boundaries(&text), Err(FieldsError::InvalidCoordinate { .. })));
    }

    #[test]
    fn two_vertex_ring_is_degenerate() {
        let text = kml(&polygon_placemark("6", "Line", "1,2 3,4"));
        assert!(matches!(
            parse_boundaries(&text),
            Err(FieldsError::DegeneratePolygon { vertices: 2, .. })
        ));
    }

    #[test]
    fn duplicate_field_ids_are_fatal() {
        let text = kml(&format!(
            "{}{}",
            polygon_placemark("8", "A", SQUARE),
            polygon_placemark("8", "B", SQUARE),
        ));
        assert!(matches!(parse_boundaries(&text), Err(FieldsError::DuplicateField { id: 8 })));
    }

    #[test]
    fn centroids_index_by_raw_id() {
        let text = kml(&format!(
            "{}{}{}",
            point_placemark("1", "23.705,52.105,0"),
            point_placemark("01", "10,20"),
            polygon_placemark("9", "Ignored", SQUARE),
        ));
        let index = parse_centroids(&text).expect("parse");

        assert_eq!(index.len(), 2);
        assert_eq!(index.get(1), Some(GeoPoint::new(52.105, 23.705)));
        assert_eq!(index.get(9), None);
        assert!(index.ids().any(|id| id == "01"));
    }

    #[test]
    fn centroid_without_id_is_fatal() {
        let text = kml("<Placemark><Point><coordinates>1,2</coordinates></Point></Placemark>");
        assert!(matches!(parse_centroids(&text), Err(FieldsError::MissingCentroidId)));
    }

    #[test]
    fn duplicate_centroid_ids_are_fatal() {
        let text = kml(&format!("{}{}", point_placemark("2", "1,2"), point_placemark("2", "3,4")));
        assert!(matches!(
            parse_centroids(&text),
            Err(FieldsError::DuplicateCentroid { ref id }) if id == "2"
        ));
    }

    #[test]
    fn point_with_several_tuples_is_rejected() {
        let text = kml(&point_placemark("3", "1,2 3,4"));
        assert!(matches!(parse_centroids(&text), Err(FieldsError::InvalidCoordinate { .. })));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_boundaries(Path::new("/nonexistent/fields.kml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/fields.kml"), "{err}");
    }
}
