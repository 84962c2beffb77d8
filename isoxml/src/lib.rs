//! # isoxml
//!
//! Modèle et encodeur de fichiers TASKDATA ISO 11783 (ISOBUS) pour les
//! limites de champ.
//!
//! ## Features
//!
//! - Modèle typé `ISO11783_TaskData` → `PFD` → `PLN` → `LSG` → `PNT`
//! - Encodage des géométries `geo` (coordonnées WGS84) en parcelles
//! - Sérialisation XML avec `quick-xml`, en une seule écriture
//! - Relecture d'un TASKDATA.XML pour inspection
//!
//! ## Usage
//!
//! ```rust,ignore
//! use isoxml::{FieldFeature, TaskDataEncoder};
//!
//! let encoder = TaskDataEncoder::default();
//! let mut doc = encoder.new_document();
//! for (index, feature) in features.into_iter().enumerate() {
//!     encoder.append_feature(&mut doc, index, &feature);
//! }
//! isoxml::serialize(&doc, std::fs::File::create("TASKDATA.XML")?)?;
//! ```

pub mod encoder;
pub mod error;
pub mod reader;
pub mod types;
pub mod writer;

pub use encoder::{format_coordinate, FieldFeature, TaskDataEncoder};
pub use error::IsoxmlError;
pub use reader::parse_task_data;
pub use types::{DocumentHeader, LineStringGroup, Partfield, Point, PolygonEntry, TaskData};
pub use writer::{serialize, serialize_with, to_string, SerializeOptions, XML_DECLARATION};

/// Encode une séquence de features en document TASKDATA.
///
/// La séquence est consommée en une seule passe; l'index de chaque feature
/// est sa position dans la séquence, y compris pour les features ignorées.
pub fn encode<I>(encoder: &TaskDataEncoder, features: I) -> TaskData
where
    I: IntoIterator<Item = FieldFeature>,
{
    let mut doc = encoder.new_document();
    for (index, feature) in features.into_iter().enumerate() {
        encoder.append_feature(&mut doc, index, &feature);
    }
    doc
}
