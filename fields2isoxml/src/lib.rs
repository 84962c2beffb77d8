//! # fields2isoxml
//!
//! Conversion de limites de champ (polygones GeoJSON) en fichier
//! ISO 11783 `TASKDATA.XML`.
//!
//! ## Features
//!
//! - Lecture GeoJSON avec détection du SCR (membre `crs` ou OGC:CRS84)
//! - Reprojection vers WGS84: pure Rust (Lambert 93, UTM, Web Mercator),
//!   PROJ en fallback (feature `reproject`)
//! - Écriture atomique, annulation coopérative, rapport JSON
//!
//! ## Usage CLI
//!
//! ```bash
//! fields2isoxml convert --input fields.geojson --output TASKDATA.XML
//! fields2isoxml convert --input fields.geojson --output TASKDATA.XML --srid 2154 --report report.json
//! fields2isoxml inspect TASKDATA.XML
//! ```

pub mod config;
pub mod convert;
pub mod crs;
pub mod error;
pub mod export;
pub mod gate;
pub mod report;
pub mod reproject_lite;
pub mod source;

pub use config::Config;
pub use convert::{CancellationToken, Converter};
pub use crs::Crs;
pub use error::ConvertError;
pub use gate::{GateDecision, GeometryTransform, ReferenceSystemGate, ReprojectionService};
pub use report::{ConversionReport, ConversionStatus};
pub use reproject_lite::{DefaultReprojection, SmartReprojector};
pub use source::{FeatureSource, GeoJsonSource, MemorySource};
