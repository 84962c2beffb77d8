//! Sources de limites de champ

pub mod geojson;

use isoxml::FieldFeature;

use crate::crs::Crs;
use crate::ConvertError;

pub use self::geojson::GeoJsonSource;

/// Séquence de features consommée en une seule passe
pub trait FeatureSource {
    type Features: Iterator<Item = Result<FieldFeature, ConvertError>>;

    /// SCR des géométries de la source
    fn source_crs(&self) -> &Crs;

    /// Nombre de features, si connu à l'avance (progression)
    fn feature_count(&self) -> Option<usize> {
        None
    }

    /// Consomme la source
    fn into_features(self) -> Self::Features;
}

/// Source en mémoire
#[derive(Debug, Clone)]
pub struct MemorySource {
    crs: Crs,
    features: Vec<FieldFeature>,
}

impl MemorySource {
    pub fn new(crs: Crs, features: Vec<FieldFeature>) -> Self {
        Self { crs, features }
    }
}

impl FeatureSource for MemorySource {
    type Features = std::iter::Map<
        std::vec::IntoIter<FieldFeature>,
        fn(FieldFeature) -> Result<FieldFeature, ConvertError>,
    >;

    fn source_crs(&self) -> &Crs {
        &self.crs
    }

    fn feature_count(&self) -> Option<usize> {
        Some(self.features.len())
    }

    fn into_features(self) -> Self::Features {
        self.features.into_iter().map(Ok as fn(_) -> _)
    }
}
