//! Modèle de document ISO 11783 (sous-ensemble TASKDATA des limites de champ)
//!
//! Hiérarchie: `ISO11783_TaskData` → `PFD` → `PLN` → `LSG` → `PNT`.
//! Toutes les valeurs d'attributs sont conservées sous forme de chaînes,
//! exactement telles qu'elles seront écrites.

use geo::Coord;

use crate::encoder::format_coordinate;

/// Version majeure du schéma TASKDATA
pub const VERSION_MAJOR: &str = "3";

/// Version mineure du schéma TASKDATA
pub const VERSION_MINOR: &str = "3";

/// Origine du transfert: 1 = FMIS vers contrôleur de tâches
pub const DATA_TRANSFER_ORIGIN_FMIS: &str = "1";

/// Informations du logiciel de gestion écrites dans l'en-tête
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentHeader {
    /// ManagementSoftwareManufacturer
    pub manufacturer: String,

    /// ManagementSoftwareVersion
    pub software_version: String,
}

impl DocumentHeader {
    pub fn new(manufacturer: impl Into<String>, software_version: impl Into<String>) -> Self {
        Self {
            manufacturer: manufacturer.into(),
            software_version: software_version.into(),
        }
    }
}

/// Élément racine `ISO11783_TaskData`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskData {
    pub version_major: String,
    pub version_minor: String,
    pub management_software_manufacturer: String,
    pub management_software_version: String,
    pub data_transfer_origin: String,

    /// Parcelles, dans l'ordre des features d'entrée
    pub partfields: Vec<Partfield>,
}

impl TaskData {
    pub const TAG: &'static str = "ISO11783_TaskData";

    /// Crée un document vide avec l'en-tête fixe
    pub fn new(header: &DocumentHeader) -> Self {
        Self {
            version_major: VERSION_MAJOR.to_string(),
            version_minor: VERSION_MINOR.to_string(),
            management_software_manufacturer: header.manufacturer.clone(),
            management_software_version: header.software_version.clone(),
            data_transfer_origin: DATA_TRANSFER_ORIGIN_FMIS.to_string(),
            partfields: Vec::new(),
        }
    }

    /// Nombre total de points, toutes parcelles confondues
    pub fn point_count(&self) -> usize {
        self.partfields.iter().map(Partfield::point_count).sum()
    }

    /// Recherche une parcelle par identifiant (`PFD-n`)
    pub fn partfield(&self, id: &str) -> Option<&Partfield> {
        self.partfields.iter().find(|p| p.id == id)
    }
}

/// Parcelle `PFD`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partfield {
    /// Attribut A: identifiant unique `PFD-{index}`
    pub id: String,

    /// Attribut B: code parcelle (vide par défaut)
    pub code: String,

    /// Attribut C: désignation affichée
    pub designator: String,

    /// Attribut D
    pub area: String,

    pub polygon: PolygonEntry,
}

impl Partfield {
    pub const TAG: &'static str = "PFD";

    /// Valeur fixe de l'attribut D
    pub const DEFAULT_AREA: &'static str = "1";

    /// Identifiant d'une parcelle pour sa position dans la séquence d'entrée
    pub fn id_for(index: usize) -> String {
        format!("PFD-{}", index)
    }

    /// Construit une parcelle à partir de sa position et de ses points
    pub fn new(index: usize, designator: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            id: Self::id_for(index),
            code: String::new(),
            designator: designator.into(),
            area: Self::DEFAULT_AREA.to_string(),
            polygon: PolygonEntry::new(LineStringGroup::new(points)),
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.polygon.line_string.points
    }

    pub fn point_count(&self) -> usize {
        self.points().len()
    }
}

/// Polygone `PLN`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolygonEntry {
    /// Attribut A: type de polygone (1 = limite de parcelle)
    pub polygon_type: String,

    pub line_string: LineStringGroup,
}

impl PolygonEntry {
    pub const TAG: &'static str = "PLN";
    pub const BOUNDARY: &'static str = "1";

    pub fn new(line_string: LineStringGroup) -> Self {
        Self {
            polygon_type: Self::BOUNDARY.to_string(),
            line_string,
        }
    }
}

/// Groupe de lignes `LSG`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineStringGroup {
    /// Attribut A: type de ligne (1 = contour extérieur)
    pub line_string_type: String,

    /// Points dans l'ordre de parcours de la géométrie source
    pub points: Vec<Point>,
}

impl LineStringGroup {
    pub const TAG: &'static str = "LSG";
    pub const EXTERIOR: &'static str = "1";

    pub fn new(points: Vec<Point>) -> Self {
        Self {
            line_string_type: Self::EXTERIOR.to_string(),
            points,
        }
    }
}

/// Point `PNT`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Point {
    /// Attribut A: type de point
    pub point_type: String,

    /// Attribut C: latitude en degrés décimaux (y)
    pub latitude: String,

    /// Attribut D: longitude en degrés décimaux (x)
    pub longitude: String,
}

impl Point {
    pub const TAG: &'static str = "PNT";
    pub const DEFAULT_TYPE: &'static str = "2";

    /// Crée un point depuis une coordonnée WGS84 (x = longitude, y = latitude)
    pub fn from_coord(coord: Coord) -> Self {
        Self {
            point_type: Self::DEFAULT_TYPE.to_string(),
            latitude: format_coordinate(coord.y),
            longitude: format_coordinate(coord.x),
        }
    }

    /// Relit la latitude et la longitude en `f64`
    pub fn to_coord(&self) -> Option<Coord> {
        let y = self.latitude.parse().ok()?;
        let x = self.longitude.parse().ok()?;
        Some(Coord { x, y })
    }
}
