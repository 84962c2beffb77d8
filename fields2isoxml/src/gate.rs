//! Contrôle du système de coordonnées avant encodage
//!
//! Les coordonnées d'un TASKDATA sont toujours en WGS84 (EPSG:4326).
//! Le [`ReferenceSystemGate`] compare le SCR source au SCR cible et, s'ils
//! diffèrent, obtient une transformation auprès d'un [`ReprojectionService`].

use anyhow::Result;
use geo::Geometry;
use isoxml::FieldFeature;
use tracing::{debug, info};

use crate::crs::Crs;
use crate::ConvertError;

/// Transformation d'une géométrie vers le SCR cible
pub trait GeometryTransform {
    /// Transforme une géométrie (par valeur)
    fn transform(&self, geometry: &Geometry) -> Result<Geometry>;

    /// Description courte de l'implémentation, pour les logs et le rapport
    fn description(&self) -> &str {
        "custom"
    }

    /// Coordonnées rendues inchangées (même SCR sous un autre identifiant)
    fn is_identity(&self) -> bool {
        false
    }
}

/// Fournisseur de transformations entre deux SCR
pub trait ReprojectionService {
    fn transform_for(
        &self,
        source: &Crs,
        target: &Crs,
    ) -> std::result::Result<Box<dyn GeometryTransform>, ConvertError>;
}

/// Décide si une reprojection est nécessaire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSystemGate {
    target: Crs,
}

impl Default for ReferenceSystemGate {
    fn default() -> Self {
        Self::new(Crs::wgs84())
    }
}

impl ReferenceSystemGate {
    pub fn new(target: Crs) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &Crs {
        &self.target
    }

    /// Comparaison stricte des identifiants `AUTORITÉ:CODE`
    pub fn needs_transform(&self, source: &Crs) -> bool {
        *source != self.target
    }

    /// Obtient la décision pour un SCR source.
    ///
    /// Aucune transformation n'est demandée au service quand les SCR sont
    /// identiques. Une erreur du service est propagée telle quelle.
    pub fn open(
        &self,
        source: &Crs,
        service: &dyn ReprojectionService,
    ) -> std::result::Result<GateDecision, ConvertError> {
        if !self.needs_transform(source) {
            debug!(crs = %source, "No CRS transformation needed");
            return Ok(GateDecision::Passthrough);
        }

        info!(from = %source, to = %self.target, "CRS transformation necessary");
        let transform = service.transform_for(source, &self.target)?;
        info!(reprojector = transform.description(), "Reprojector ready");
        Ok(GateDecision::Transform(transform))
    }
}

/// Résultat du contrôle: passage direct ou transformation par géométrie
pub enum GateDecision {
    Passthrough,
    Transform(Box<dyn GeometryTransform>),
}

impl std::fmt::Debug for GateDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Passthrough => f.write_str("Passthrough"),
            Self::Transform(t) => write!(f, "Transform({})", t.description()),
        }
    }
}

impl GateDecision {
    pub fn is_transform(&self) -> bool {
        matches!(self, Self::Transform(_))
    }

    /// Vrai si les coordonnées sont effectivement modifiées
    pub fn changes_coordinates(&self) -> bool {
        match self {
            Self::Passthrough => false,
            Self::Transform(t) => !t.is_identity(),
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::Passthrough => "none",
            Self::Transform(t) => t.description(),
        }
    }

    /// Applique la décision à une feature. Une feature sans géométrie,
    /// ou une décision de passage direct, la laisse intacte.
    pub fn apply(
        &self,
        index: usize,
        mut feature: FieldFeature,
    ) -> std::result::Result<FieldFeature, ConvertError> {
        let Self::Transform(transform) = self else {
            return Ok(feature);
        };
        if let Some(geometry) = feature.geometry.take() {
            let transformed = transform
                .transform(&geometry)
                .map_err(|e| ConvertError::Transform {
                    index,
                    reason: format!("{:#}", e),
                })?;
            feature.geometry = Some(transformed);
        }
        Ok(feature)
    }

    /// Séquence reprojetée, évaluée paresseusement en une seule passe
    pub fn reproject<I>(&self, features: I) -> Reprojected<'_, I::IntoIter>
    where
        I: IntoIterator<Item = std::result::Result<FieldFeature, ConvertError>>,
    {
        Reprojected {
            decision: self,
            inner: features.into_iter(),
            index: 0,
        }
    }
}

/// Itérateur de features reprojetées
pub struct Reprojected<'a, I> {
    decision: &'a GateDecision,
    inner: I,
    index: usize,
}

impl<I> Iterator for Reprojected<'_, I>
where
    I: Iterator<Item = std::result::Result<FieldFeature, ConvertError>>,
{
    type Item = std::result::Result<FieldFeature, ConvertError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        let index = self.index;
        self.index += 1;
        Some(item.and_then(|feature| self.decision.apply(index, feature)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Service qui compte les demandes et décale x de +1
    struct CountingService {
        calls: Cell<usize>,
    }

    struct Shift;

    impl GeometryTransform for Shift {
        fn transform(&self, geometry: &Geometry) -> Result<Geometry> {
            use geo::MapCoords;
            Ok(geometry.map_coords(|c| geo::Coord { x: c.x + 1.0, y: c.y }))
        }
    }

    impl ReprojectionService for CountingService {
        fn transform_for(
            &self,
            _source: &Crs,
            _target: &Crs,
        ) -> std::result::Result<Box<dyn GeometryTransform>, ConvertError> {
            self.calls.set(self.calls.get() + 1);
            Ok(Box::new(Shift))
        }
    }

    struct RefusingService;

    impl ReprojectionService for RefusingService {
        fn transform_for(
            &self,
            source: &Crs,
            target: &Crs,
        ) -> std::result::Result<Box<dyn GeometryTransform>, ConvertError> {
            Err(ConvertError::unsupported_crs(source, target, "refused"))
        }
    }

    fn point_feature(x: f64, y: f64) -> FieldFeature {
        FieldFeature::new(None, Some(Geometry::Point(geo::Point::new(x, y))))
    }

    #[test]
    fn test_same_crs_requests_nothing() {
        let service = CountingService { calls: Cell::new(0) };
        let gate = ReferenceSystemGate::default();

        let decision = gate.open(&Crs::wgs84(), &service).unwrap();
        assert!(!decision.is_transform());
        assert!(!decision.changes_coordinates());
        assert_eq!(service.calls.get(), 0);

        let out = decision.apply(0, point_feature(12.1934211840036, 48.9636327590282)).unwrap();
        let Some(Geometry::Point(p)) = out.geometry else {
            panic!("Expected Point geometry");
        };
        assert_eq!((p.x(), p.y()), (12.1934211840036, 48.9636327590282));
    }

    #[test]
    fn test_different_crs_requests_transform() {
        let service = CountingService { calls: Cell::new(0) };
        let gate = ReferenceSystemGate::default();

        let decision = gate.open(&Crs::epsg(25832), &service).unwrap();
        assert!(decision.is_transform());
        assert!(decision.changes_coordinates());
        assert_eq!(service.calls.get(), 1);

        let features = vec![Ok(point_feature(1.0, 2.0)), Ok(FieldFeature::default())];
        let out: Vec<_> = decision
            .reproject(features)
            .collect::<std::result::Result<_, _>>()
            .unwrap();

        let Some(Geometry::Point(p)) = &out[0].geometry else {
            panic!("Expected Point geometry");
        };
        assert_eq!(p.x(), 2.0);
        assert!(out[1].geometry.is_none());
    }

    #[test]
    fn test_crs84_is_not_wgs84_authid() {
        let gate = ReferenceSystemGate::default();
        assert!(gate.needs_transform(&Crs::crs84()));
        assert!(!gate.needs_transform(&Crs::parse("urn:ogc:def:crs:EPSG::4326").unwrap()));
    }

    #[test]
    fn test_service_error_is_propagated() {
        let gate = ReferenceSystemGate::default();
        let err = gate.open(&Crs::epsg(2154), &RefusingService).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedCrs { .. }));
    }
}
