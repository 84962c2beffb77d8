//! Lecture d'un fichier TASKDATA.XML vers le modèle [`TaskData`]
//!
//! Seul le sous-ensemble écrit par ce crate est interprété
//! (`ISO11783_TaskData`, `PFD`, `PLN`, `LSG`, `PNT`). Les autres éléments
//! ISO 11783 (tâches, clients, fermes...) sont ignorés avec leur contenu.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::types::{LineStringGroup, Partfield, Point, PolygonEntry, TaskData};
use crate::IsoxmlError;

/// Parse un document TASKDATA
pub fn parse_task_data(xml: &str) -> Result<TaskData, IsoxmlError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut builder = Builder::default();

    loop {
        match reader.read_event()? {
            Event::Decl(_) => builder.declaration()?,
            Event::Start(e) => builder.open(&e, false)?,
            Event::Empty(e) => builder.open(&e, true)?,
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                builder.close(&name)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    builder.finish()
}

/// État de construction pendant la lecture séquentielle
#[derive(Default)]
struct Builder {
    declarations: usize,
    doc: Option<TaskData>,
    root_closed: bool,
    partfield: Option<Partfield>,
    in_polygon: bool,
    in_line_string: bool,
    /// Profondeur dans un élément ignoré
    skip_depth: usize,
}

impl Builder {
    fn declaration(&mut self) -> Result<(), IsoxmlError> {
        self.declarations += 1;
        if self.declarations > 1 {
            return Err(IsoxmlError::invalid_document("?xml", "duplicate XML declaration"));
        }
        if self.doc.is_some() {
            return Err(IsoxmlError::invalid_document(
                "?xml",
                "declaration after the root element",
            ));
        }
        Ok(())
    }

    fn open(&mut self, e: &BytesStart, empty: bool) -> Result<(), IsoxmlError> {
        if self.skip_depth > 0 {
            if !empty {
                self.skip_depth += 1;
            }
            return Ok(());
        }

        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let attrs = attributes(e)?;

        match name.as_str() {
            TaskData::TAG => self.open_root(&attrs)?,
            Partfield::TAG => self.open_partfield(&attrs)?,
            PolygonEntry::TAG => {
                let pfd = self.partfield.as_mut().ok_or_else(|| {
                    IsoxmlError::invalid_document(PolygonEntry::TAG, "outside of PFD")
                })?;
                pfd.polygon.polygon_type = required(&attrs, PolygonEntry::TAG, "A")?;
                self.in_polygon = true;
            }
            LineStringGroup::TAG => {
                if !self.in_polygon {
                    return Err(IsoxmlError::invalid_document(
                        LineStringGroup::TAG,
                        "outside of PLN",
                    ));
                }
                if let Some(pfd) = self.partfield.as_mut() {
                    pfd.polygon.line_string.line_string_type =
                        required(&attrs, LineStringGroup::TAG, "A")?;
                }
                self.in_line_string = true;
            }
            Point::TAG => {
                if !self.in_line_string {
                    return Err(IsoxmlError::invalid_document(Point::TAG, "outside of LSG"));
                }
                let point = Point {
                    point_type: required(&attrs, Point::TAG, "A")?,
                    latitude: required(&attrs, Point::TAG, "C")?,
                    longitude: required(&attrs, Point::TAG, "D")?,
                };
                if let Some(pfd) = self.partfield.as_mut() {
                    pfd.polygon.line_string.points.push(point);
                }
                // <PNT> n'a pas d'enfants: sa balise fermante éventuelle est ignorée
                return Ok(());
            }
            other => {
                if self.doc.is_none() {
                    return Err(IsoxmlError::invalid_document(
                        other,
                        "unexpected root element",
                    ));
                }
                debug!(element = other, "Skipping unsupported element");
                if !empty {
                    self.skip_depth = 1;
                }
                return Ok(());
            }
        }

        if empty {
            self.close(&name)?;
        }
        Ok(())
    }

    fn open_root(&mut self, attrs: &HashMap<String, String>) -> Result<(), IsoxmlError> {
        if self.doc.is_some() {
            return Err(IsoxmlError::invalid_document(
                TaskData::TAG,
                "duplicate root element",
            ));
        }
        let optional = |key: &str| attrs.get(key).cloned().unwrap_or_default();
        self.doc = Some(TaskData {
            version_major: required(attrs, TaskData::TAG, "VersionMajor")?,
            version_minor: required(attrs, TaskData::TAG, "VersionMinor")?,
            management_software_manufacturer: optional("ManagementSoftwareManufacturer"),
            management_software_version: optional("ManagementSoftwareVersion"),
            data_transfer_origin: required(attrs, TaskData::TAG, "DataTransferOrigin")?,
            partfields: Vec::new(),
        });
        Ok(())
    }

    fn open_partfield(&mut self, attrs: &HashMap<String, String>) -> Result<(), IsoxmlError> {
        if self.doc.is_none() || self.root_closed {
            return Err(IsoxmlError::invalid_document(
                Partfield::TAG,
                "outside of ISO11783_TaskData",
            ));
        }
        if self.partfield.is_some() {
            return Err(IsoxmlError::invalid_document(Partfield::TAG, "nested PFD"));
        }
        self.partfield = Some(Partfield {
            id: required(attrs, Partfield::TAG, "A")?,
            code: attrs.get("B").cloned().unwrap_or_default(),
            designator: required(attrs, Partfield::TAG, "C")?,
            area: attrs
                .get("D")
                .cloned()
                .unwrap_or_else(|| Partfield::DEFAULT_AREA.to_string()),
            polygon: PolygonEntry::new(LineStringGroup::new(Vec::new())),
        });
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<(), IsoxmlError> {
        if self.skip_depth > 0 {
            self.skip_depth -= 1;
            return Ok(());
        }

        match name {
            TaskData::TAG => self.root_closed = true,
            Partfield::TAG => {
                if let (Some(pfd), Some(doc)) = (self.partfield.take(), self.doc.as_mut()) {
                    doc.partfields.push(pfd);
                }
            }
            PolygonEntry::TAG => self.in_polygon = false,
            LineStringGroup::TAG => self.in_line_string = false,
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<TaskData, IsoxmlError> {
        self.doc.ok_or_else(|| {
            IsoxmlError::invalid_document(TaskData::TAG, "missing root element")
        })
    }
}

fn attributes(e: &BytesStart) -> Result<HashMap<String, String>, IsoxmlError> {
    let mut map = HashMap::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        map.insert(key, value);
    }
    Ok(map)
}

fn required(
    attrs: &HashMap<String, String>,
    element: &'static str,
    attribute: &'static str,
) -> Result<String, IsoxmlError> {
    attrs
        .get(attribute)
        .cloned()
        .ok_or(IsoxmlError::MissingAttribute { element, attribute })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?><ISO11783_TaskData VersionMajor="3" VersionMinor="3" ManagementSoftwareManufacturer="" ManagementSoftwareVersion="" DataTransferOrigin="1"><PFD A="PFD-0" B="" C="Nord &amp; Sud" D="1"><PLN A="1"><LSG A="1"><PNT A="2" C="50.0" D="10.0"/><PNT A="2" C="50.1" D="10.1"/></LSG></PLN></PFD></ISO11783_TaskData>"#;

    #[test]
    fn test_parse_sample() {
        let doc = parse_task_data(SAMPLE).unwrap();
        assert_eq!(doc.version_major, "3");
        assert_eq!(doc.partfields.len(), 1);

        let pfd = &doc.partfields[0];
        assert_eq!(pfd.id, "PFD-0");
        assert_eq!(pfd.designator, "Nord & Sud");
        assert_eq!(pfd.points().len(), 2);
        assert_eq!(pfd.points()[1].latitude, "50.1");
        assert_eq!(pfd.points()[1].longitude, "10.1");
    }

    #[test]
    fn test_unknown_elements_are_skipped() {
        let xml = r#"<ISO11783_TaskData VersionMajor="4" VersionMinor="0" DataTransferOrigin="1"><CTR A="CTR1" B="Client"><X/></CTR><PFD A="PFD-7" C="F" D="12000"><PLN A="1"><LSG A="1"><PNT A="2" C="1.0" D="2.0"/></LSG></PLN></PFD></ISO11783_TaskData>"#;
        let doc = parse_task_data(xml).unwrap();
        assert_eq!(doc.partfields.len(), 1);
        assert_eq!(doc.partfields[0].id, "PFD-7");
        assert_eq!(doc.partfields[0].area, "12000");
        assert_eq!(doc.partfields[0].code, "");
    }

    #[test]
    fn test_duplicate_declaration() {
        let xml = format!(r#"<?xml version="1.0" encoding="UTF-8"?>{}"#, SAMPLE);
        assert!(matches!(
            parse_task_data(&xml),
            Err(IsoxmlError::InvalidDocument { .. }) | Err(IsoxmlError::Xml(_))
        ));
    }

    #[test]
    fn test_point_outside_line_string() {
        let xml = r#"<ISO11783_TaskData VersionMajor="3" VersionMinor="3" DataTransferOrigin="1"><PFD A="PFD-0" C="x" D="1"><PNT A="2" C="1" D="2"/></PFD></ISO11783_TaskData>"#;
        assert!(matches!(
            parse_task_data(xml),
            Err(IsoxmlError::InvalidDocument { .. })
        ));
    }

    #[test]
    fn test_missing_attribute() {
        let xml = r#"<ISO11783_TaskData VersionMajor="3" VersionMinor="3" DataTransferOrigin="1"><PFD A="PFD-0" D="1"/></ISO11783_TaskData>"#;
        assert!(matches!(
            parse_task_data(xml),
            Err(IsoxmlError::MissingAttribute {
                element: "PFD",
                attribute: "C"
            })
        ));
    }

    #[test]
    fn test_missing_root() {
        assert!(parse_task_data("").is_err());
        assert!(parse_task_data("<FOO/>").is_err());
    }
}
