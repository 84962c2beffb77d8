//! Tests d'intégration: encodage, sérialisation et relecture

use geo::{Geometry, LineString, Polygon};
use isoxml::{
    encode, parse_task_data, to_string, DocumentHeader, FieldFeature, TaskDataEncoder,
    XML_DECLARATION,
};

fn ring(coords: &[(f64, f64)]) -> Geometry {
    Geometry::LineString(LineString::from(coords.to_vec()))
}

#[test]
fn test_square_field_scenario() {
    // Anneau à 4 sommets, non fermé dans la source
    let square = Polygon::new(
        LineString::from(vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]),
        vec![],
    );
    let feature = FieldFeature::new(Some("FieldA".to_string()), Some(Geometry::Polygon(square)))
        .with_open_rings(vec![0]);
    let doc = encode(&TaskDataEncoder::default(), vec![feature]);

    let xml = to_string(&doc).unwrap();
    assert_eq!(xml.matches("<PFD ").count(), 1);
    assert_eq!(xml.matches("<PLN ").count(), 1);
    assert_eq!(xml.matches("<LSG ").count(), 1);
    assert_eq!(xml.matches("<PNT ").count(), 4);
    assert!(xml.contains(r#"C="FieldA""#));
    assert!(xml.contains(
        r#"<PNT A="2" C="0.0" D="0.0"/><PNT A="2" C="1.0" D="0.0"/><PNT A="2" C="1.0" D="1.0"/><PNT A="2" C="0.0" D="1.0"/>"#
    ));
}

#[test]
fn test_roundtrip_preserves_structure() {
    let encoder = TaskDataEncoder::new(DocumentHeader::new("Agri Soft", "0.9"));
    let polygon = Polygon::new(
        LineString::from(vec![
            (12.1934211840036, 48.9636327590282),
            (12.1944, 48.9636327590282),
            (12.1944, 48.9646),
            (12.1934211840036, 48.9636327590282),
        ]),
        vec![],
    );
    let features = vec![
        FieldFeature::new(Some("Nord".into()), Some(Geometry::Polygon(polygon.clone()))),
        FieldFeature::new(None, None),
        FieldFeature::new(None, Some(Geometry::Polygon(polygon))),
    ];

    let doc = encode(&encoder, features);
    let xml = to_string(&doc).unwrap();
    let parsed = parse_task_data(&xml).unwrap();

    assert_eq!(parsed, doc);
    assert_eq!(parsed.management_software_manufacturer, "Agri Soft");
    assert_eq!(parsed.partfields[1].id, "PFD-2");
    assert_eq!(parsed.partfields[1].designator, "Feld-2");

    let first = parsed.partfields[0].points()[0].to_coord().unwrap();
    assert_eq!(first.x, 12.1934211840036);
    assert_eq!(first.y, 48.9636327590282);
}

#[test]
fn test_vertex_sequence_lat_lon() {
    let doc = encode(
        &TaskDataEncoder::default(),
        vec![FieldFeature::new(
            None,
            Some(ring(&[(10.0, 50.0), (10.1, 50.0), (10.1, 50.1)])),
        )],
    );

    let points = doc.partfields[0].points();
    assert_eq!(points.len(), 3);
    for (point, (lon, lat)) in points.iter().zip([(10.0, 50.0), (10.1, 50.0), (10.1, 50.1)]) {
        assert_eq!(point.latitude.parse::<f64>().unwrap(), lat);
        assert_eq!(point.longitude.parse::<f64>().unwrap(), lon);
    }
}

#[test]
fn test_single_declaration() {
    let doc = encode(&TaskDataEncoder::default(), Vec::new());
    let xml = to_string(&doc).unwrap();
    assert!(xml.starts_with(&format!("{}<ISO11783_TaskData", XML_DECLARATION)));
    assert_eq!(xml.matches("<?xml").count(), 1);
}
