//! Sérialisation XML du document TASKDATA (quick-xml)

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::types::{LineStringGroup, Partfield, Point, PolygonEntry, TaskData};
use crate::IsoxmlError;

/// Déclaration écrite en tête de chaque fichier
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Options de sérialisation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Indentation en espaces; `None` = document sur une seule ligne
    pub indent: Option<usize>,
}

impl SerializeOptions {
    pub fn indented(width: usize) -> Self {
        Self {
            indent: Some(width),
        }
    }
}

/// Écrit le document complet (déclaration + arbre) dans `out`
pub fn serialize<W: Write>(doc: &TaskData, out: W) -> Result<W, IsoxmlError> {
    serialize_with(doc, out, SerializeOptions::default())
}

/// Écrit le document complet avec des options de mise en forme
pub fn serialize_with<W: Write>(
    doc: &TaskData,
    out: W,
    options: SerializeOptions,
) -> Result<W, IsoxmlError> {
    let mut writer = match options.indent {
        Some(width) => Writer::new_with_indent(out, b' ', width),
        None => Writer::new(out),
    };

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_task_data(&mut writer, doc)?;

    let mut out = writer.into_inner();
    out.flush()?;
    Ok(out)
}

/// Sérialise le document en `String`
pub fn to_string(doc: &TaskData) -> Result<String, IsoxmlError> {
    to_string_with(doc, SerializeOptions::default())
}

pub fn to_string_with(doc: &TaskData, options: SerializeOptions) -> Result<String, IsoxmlError> {
    let buf = serialize_with(doc, Vec::new(), options)?;
    Ok(String::from_utf8(buf)?)
}

fn write_task_data<W: Write>(writer: &mut Writer<W>, doc: &TaskData) -> Result<(), IsoxmlError> {
    let root = BytesStart::new(TaskData::TAG).with_attributes([
        ("VersionMajor", doc.version_major.as_str()),
        ("VersionMinor", doc.version_minor.as_str()),
        (
            "ManagementSoftwareManufacturer",
            doc.management_software_manufacturer.as_str(),
        ),
        (
            "ManagementSoftwareVersion",
            doc.management_software_version.as_str(),
        ),
        ("DataTransferOrigin", doc.data_transfer_origin.as_str()),
    ]);

    if doc.partfields.is_empty() {
        writer.write_event(Event::Empty(root))?;
        return Ok(());
    }

    writer.write_event(Event::Start(root))?;
    for partfield in &doc.partfields {
        write_partfield(writer, partfield)?;
    }
    writer.write_event(Event::End(BytesEnd::new(TaskData::TAG)))?;
    Ok(())
}

fn write_partfield<W: Write>(writer: &mut Writer<W>, pfd: &Partfield) -> Result<(), IsoxmlError> {
    let start = BytesStart::new(Partfield::TAG).with_attributes([
        ("A", pfd.id.as_str()),
        ("B", pfd.code.as_str()),
        ("C", pfd.designator.as_str()),
        ("D", pfd.area.as_str()),
    ]);
    writer.write_event(Event::Start(start))?;

    let pln = BytesStart::new(PolygonEntry::TAG)
        .with_attributes([("A", pfd.polygon.polygon_type.as_str())]);
    writer.write_event(Event::Start(pln))?;
    write_line_string(writer, &pfd.polygon.line_string)?;
    writer.write_event(Event::End(BytesEnd::new(PolygonEntry::TAG)))?;

    writer.write_event(Event::End(BytesEnd::new(Partfield::TAG)))?;
    Ok(())
}

fn write_line_string<W: Write>(
    writer: &mut Writer<W>,
    lsg: &LineStringGroup,
) -> Result<(), IsoxmlError> {
    let start =
        BytesStart::new(LineStringGroup::TAG).with_attributes([("A", lsg.line_string_type.as_str())]);
    writer.write_event(Event::Start(start))?;

    for point in &lsg.points {
        let pnt = BytesStart::new(Point::TAG).with_attributes([
            ("A", point.point_type.as_str()),
            ("C", point.latitude.as_str()),
            ("D", point.longitude.as_str()),
        ]);
        writer.write_event(Event::Empty(pnt))?;
    }

    writer.write_event(Event::End(BytesEnd::new(LineStringGroup::TAG)))?;
    Ok(())
}
