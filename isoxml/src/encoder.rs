//! Construction du document TASKDATA à partir des limites de champ

use geo::{CoordsIter, Geometry, LineString, Polygon};
use tracing::debug;

use crate::types::{DocumentHeader, Partfield, Point, TaskData};

/// Une limite de champ prête à encoder (coordonnées déjà en WGS84)
#[derive(Debug, Clone, Default)]
pub struct FieldFeature {
    /// Valeur de l'attribut nom, `None` si absent ou nul
    pub name: Option<String>,

    /// Géométrie, `None` si la feature n'en a pas
    pub geometry: Option<Geometry>,

    /// Anneaux de polygone non fermés dans la source, numérotés dans
    /// l'ordre de parcours (extérieur, intérieurs, polygone suivant).
    ///
    /// `geo::Polygon` ferme chaque anneau; le point de fermeture ajouté
    /// n'est pas écrit pour ces anneaux.
    pub open_rings: Vec<usize>,
}

impl FieldFeature {
    pub fn new(name: Option<String>, geometry: Option<Geometry>) -> Self {
        Self {
            name,
            geometry,
            open_rings: Vec::new(),
        }
    }

    pub fn with_open_rings(mut self, open_rings: Vec<usize>) -> Self {
        self.open_rings = open_rings;
        self
    }
}

/// Encodeur de parcelles ISO 11783
#[derive(Debug, Clone)]
pub struct TaskDataEncoder {
    header: DocumentHeader,
    designator_prefix: String,
}

impl Default for TaskDataEncoder {
    fn default() -> Self {
        Self::new(DocumentHeader::default())
    }
}

impl TaskDataEncoder {
    /// Préfixe de la désignation générée quand la feature n'a pas de nom
    pub const DEFAULT_DESIGNATOR_PREFIX: &'static str = "Feld";

    pub fn new(header: DocumentHeader) -> Self {
        Self {
            header,
            designator_prefix: Self::DEFAULT_DESIGNATOR_PREFIX.to_string(),
        }
    }

    /// Remplace le préfixe des désignations générées (`{prefix}-{index}`)
    pub fn with_designator_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.designator_prefix = prefix.into();
        self
    }

    pub fn header(&self) -> &DocumentHeader {
        &self.header
    }

    /// Crée un document vide avec l'en-tête fixe
    pub fn new_document(&self) -> TaskData {
        TaskData::new(&self.header)
    }

    /// Désignation d'une parcelle: le nom de la feature, sinon `{prefix}-{index}`
    pub fn designator(&self, index: usize, name: Option<&str>) -> String {
        match name {
            Some(name) => name.to_string(),
            None => format!("{}-{}", self.designator_prefix, index),
        }
    }

    /// Ajoute une parcelle `PFD` pour la feature à la position `index`.
    ///
    /// Une feature sans géométrie est ignorée et le document reste inchangé.
    /// L'index est la position dans la séquence d'entrée: une feature ignorée
    /// ne décale pas la numérotation des suivantes.
    ///
    /// Retourne `true` si une parcelle a été ajoutée.
    pub fn append_feature(&self, doc: &mut TaskData, index: usize, feature: &FieldFeature) -> bool {
        let Some(geometry) = &feature.geometry else {
            debug!(index, "Feature without geometry skipped");
            return false;
        };

        let designator = self.designator(index, feature.name.as_deref());
        let mut walk = BoundaryWalk {
            open_rings: &feature.open_rings,
            ring: 0,
            points: Vec::new(),
        };
        walk.geometry(geometry);
        let points = walk.points;

        debug!(
            index,
            designator = %designator,
            points = points.len(),
            "Partfield encoded"
        );

        doc.partfields.push(Partfield::new(index, designator, points));
        true
    }
}

/// Parcours des sommets d'une géométrie, anneau par anneau
struct BoundaryWalk<'a> {
    open_rings: &'a [usize],
    ring: usize,
    points: Vec<Point>,
}

impl BoundaryWalk<'_> {
    fn geometry(&mut self, geometry: &Geometry) {
        match geometry {
            Geometry::Polygon(p) => self.polygon(p),
            Geometry::MultiPolygon(mp) => mp.iter().for_each(|p| self.polygon(p)),
            Geometry::GeometryCollection(gc) => gc.iter().for_each(|g| self.geometry(g)),
            other => self
                .points
                .extend(other.coords_iter().map(Point::from_coord)),
        }
    }

    fn polygon(&mut self, polygon: &Polygon) {
        self.ring(polygon.exterior());
        polygon.interiors().iter().for_each(|ring| self.ring(ring));
    }

    fn ring(&mut self, ring: &LineString) {
        let open = self.open_rings.contains(&self.ring);
        self.ring += 1;

        let coords = &ring.0;
        let len = if open && coords.len() > 1 && ring.is_closed() {
            coords.len() - 1
        } else {
            coords.len()
        };
        self.points
            .extend(coords[..len].iter().copied().map(Point::from_coord));
    }
}

/// Formate une coordonnée en degrés décimaux.
///
/// Représentation décimale la plus courte qui relit la même valeur `f64`,
/// jamais en notation scientifique. Les valeurs entières gardent `.0`.
pub fn format_coordinate(value: f64) -> String {
    let mut s = value.to_string();
    if value.is_finite() && !s.contains('.') {
        s.push_str(".0");
    }
    s
}
