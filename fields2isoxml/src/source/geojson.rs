//! Lecture des limites de champ depuis un fichier GeoJSON
//!
//! Le SCR est lu dans le membre `crs` hérité de GeoJSON 2008
//! (`{"type":"name","properties":{"name":"urn:ogc:def:crs:EPSG::2154"}}`);
//! à défaut, c'est OGC:CRS84 (RFC 7946).

use std::path::{Path, PathBuf};

use geo::Geometry;
use geojson::{GeoJson, JsonValue};
use isoxml::FieldFeature;
use tracing::{debug, info};

use super::FeatureSource;
use crate::crs::Crs;
use crate::ConvertError;

/// Source GeoJSON (FeatureCollection, Feature ou Geometry)
#[derive(Debug)]
pub struct GeoJsonSource {
    path: PathBuf,
    crs: Crs,
    name_attribute: String,
    features: Vec<geojson::Feature>,
}

impl GeoJsonSource {
    /// Ouvre un fichier GeoJSON.
    ///
    /// `crs_override` remplace le SCR déclaré dans le fichier.
    pub fn open(
        path: &Path,
        name_attribute: &str,
        crs_override: Option<Crs>,
    ) -> Result<Self, ConvertError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConvertError::invalid_input(path, e.to_string()))?;
        let source = Self::from_str_at(path, &content, name_attribute, crs_override)?;

        info!(
            path = %path.display(),
            features = source.features.len(),
            crs = %source.crs,
            "GeoJSON source opened"
        );
        Ok(source)
    }

    /// Lit une source depuis une chaîne GeoJSON
    pub fn from_geojson_str(
        content: &str,
        name_attribute: &str,
        crs_override: Option<Crs>,
    ) -> Result<Self, ConvertError> {
        Self::from_str_at(Path::new("<memory>"), content, name_attribute, crs_override)
    }

    fn from_str_at(
        path: &Path,
        content: &str,
        name_attribute: &str,
        crs_override: Option<Crs>,
    ) -> Result<Self, ConvertError> {
        let geojson: GeoJson = content
            .parse()
            .map_err(|e: geojson::Error| ConvertError::invalid_input(path, e.to_string()))?;

        let (declared_crs, features) = match geojson {
            GeoJson::FeatureCollection(fc) => {
                let crs = fc
                    .foreign_members
                    .as_ref()
                    .and_then(|members| members.get("crs"))
                    .map(|value| declared_crs(path, value))
                    .transpose()?;
                (crs, fc.features)
            }
            GeoJson::Feature(feature) => (None, vec![feature]),
            GeoJson::Geometry(geometry) => (
                None,
                vec![geojson::Feature {
                    geometry: Some(geometry),
                    ..Default::default()
                }],
            ),
        };

        let crs = match (crs_override, declared_crs) {
            (Some(crs), _) => crs,
            (None, Some(crs)) => crs,
            (None, None) => {
                debug!("No crs member, assuming OGC:CRS84");
                Crs::crs84()
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            crs,
            name_attribute: name_attribute.to_string(),
            features,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Extrait le SCR d'un membre `crs` nommé
fn declared_crs(path: &Path, value: &JsonValue) -> Result<Crs, ConvertError> {
    let name = value
        .get("properties")
        .and_then(|p| p.get("name"))
        .and_then(JsonValue::as_str)
        .ok_or_else(|| ConvertError::invalid_input(path, "unsupported crs member (expected a named CRS)"))?;
    Crs::parse(name)
}

impl FeatureSource for GeoJsonSource {
    type Features = GeoJsonFeatures;

    fn source_crs(&self) -> &Crs {
        &self.crs
    }

    fn feature_count(&self) -> Option<usize> {
        Some(self.features.len())
    }

    fn into_features(self) -> Self::Features {
        GeoJsonFeatures {
            path: self.path,
            name_attribute: self.name_attribute,
            inner: self.features.into_iter(),
            index: 0,
        }
    }
}

/// Itérateur des features d'une [`GeoJsonSource`]
#[derive(Debug)]
pub struct GeoJsonFeatures {
    path: PathBuf,
    name_attribute: String,
    inner: std::vec::IntoIter<geojson::Feature>,
    index: usize,
}

impl Iterator for GeoJsonFeatures {
    type Item = Result<FieldFeature, ConvertError>;

    fn next(&mut self) -> Option<Self::Item> {
        let feature = self.inner.next()?;
        let index = self.index;
        self.index += 1;

        let name = feature.property(&self.name_attribute).and_then(attribute_to_name);

        let Some(geometry) = feature.geometry else {
            return Some(Ok(FieldFeature::new(name, None)));
        };

        let open_rings = open_rings(&geometry.value);
        match Geometry::<f64>::try_from(geometry) {
            Ok(geometry) => {
                Some(Ok(FieldFeature::new(name, Some(geometry)).with_open_rings(open_rings)))
            }
            Err(e) => Some(Err(ConvertError::invalid_input(
                &self.path,
                format!("feature {}: {}", index, e),
            ))),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Rangs des anneaux de polygone non fermés, dans l'ordre de parcours
/// de la géométrie (extérieur, intérieurs, polygone suivant)
fn open_rings(value: &geojson::Value) -> Vec<usize> {
    let mut open = Vec::new();
    collect_open_rings(value, &mut 0, &mut open);
    open
}

fn collect_open_rings(value: &geojson::Value, ring: &mut usize, open: &mut Vec<usize>) {
    match value {
        geojson::Value::Polygon(rings) => visit_rings(rings, ring, open),
        geojson::Value::MultiPolygon(polygons) => {
            for rings in polygons {
                visit_rings(rings, ring, open);
            }
        }
        geojson::Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                collect_open_rings(&geometry.value, ring, open);
            }
        }
        _ => {}
    }
}

fn visit_rings(rings: &geojson::PolygonType, ring: &mut usize, open: &mut Vec<usize>) {
    for positions in rings {
        if positions.first() != positions.last() {
            open.push(*ring);
        }
        *ring += 1;
    }
}

/// Valeur d'attribut vers nom de parcelle; `null` équivaut à une absence
fn attribute_to_name(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::25832"}},
        "features": [
            {"type": "Feature", "properties": {"Name": "North"},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[0,1],[1,1],[0,0]]]}},
            {"type": "Feature", "properties": {"Name": null}, "geometry": null},
            {"type": "Feature", "properties": {"Name": 42},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[0,1],[1,1],[0,0]]]}},
            {"type": "Feature", "properties": {},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[0,1],[1,1],[0,0]]]}}
        ]
    }"#;

    #[test]
    fn test_declared_crs() {
        let source = GeoJsonSource::from_geojson_str(COLLECTION, "Name", None).unwrap();
        assert_eq!(source.source_crs(), &Crs::epsg(25832));
        assert_eq!(source.feature_count(), Some(4));
    }

    #[test]
    fn test_crs_override_and_default() {
        let source =
            GeoJsonSource::from_geojson_str(COLLECTION, "Name", Some(Crs::wgs84())).unwrap();
        assert_eq!(source.source_crs(), &Crs::wgs84());

        let plain = r#"{"type": "FeatureCollection", "features": []}"#;
        let source = GeoJsonSource::from_geojson_str(plain, "Name", None).unwrap();
        assert_eq!(source.source_crs(), &Crs::crs84());
    }

    #[test]
    fn test_names_and_geometries() {
        let source = GeoJsonSource::from_geojson_str(COLLECTION, "Name", None).unwrap();
        let features: Vec<FieldFeature> = source
            .into_features()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(features.len(), 4);
        assert_eq!(features[0].name.as_deref(), Some("North"));
        assert!(matches!(features[0].geometry, Some(Geometry::Polygon(_))));
        assert_eq!(features[1].name, None);
        assert!(features[1].geometry.is_none());
        assert_eq!(features[2].name.as_deref(), Some("42"));
        assert_eq!(features[3].name, None);
    }

    #[test]
    fn test_custom_name_attribute() {
        let source = GeoJsonSource::from_geojson_str(COLLECTION, "Feldname", None).unwrap();
        let first = source.into_features().next().unwrap().unwrap();
        assert_eq!(first.name, None);
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(
            GeoJsonSource::from_geojson_str("{not json", "Name", None),
            Err(ConvertError::InvalidInput { .. })
        ));

        let bad_crs = r#"{"type": "FeatureCollection", "crs": {"type": "link"}, "features": []}"#;
        assert!(GeoJsonSource::from_geojson_str(bad_crs, "Name", None).is_err());
    }

    #[test]
    fn test_open_rings_recorded() {
        let collection = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "Polygon", "coordinates": [[[0,0],[0,1],[1,1],[1,0]]]}},
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "MultiPolygon", "coordinates": [
                    [[[0,0],[0,1],[1,1],[0,0]], [[0.2,0.2],[0.4,0.2],[0.4,0.4]]],
                    [[[5,5],[5,6],[6,6]]]
                 ]}}
            ]
        }"#;
        let features: Vec<FieldFeature> = GeoJsonSource::from_geojson_str(collection, "Name", None)
            .unwrap()
            .into_features()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(features[0].open_rings, vec![0]);
        assert_eq!(features[1].open_rings, vec![1, 2]);
    }

    #[test]
    fn test_single_geometry() {
        let geometry = r#"{"type": "LineString", "coordinates": [[10.0, 50.0], [10.1, 50.0]]}"#;
        let source = GeoJsonSource::from_geojson_str(geometry, "Name", None).unwrap();
        let features: Vec<_> = source.into_features().collect();
        assert_eq!(features.len(), 1);
    }
}
