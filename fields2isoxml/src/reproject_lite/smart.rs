//! Reprojection intelligente : reproject_lite en priorité, fallback sur proj
//!
//! Utilise automatiquement la meilleure option disponible.

use anyhow::Result;
use geo::Geometry;

use super::ReprojectorLite;
use crate::crs::Crs;
use crate::gate::{GeometryTransform, ReprojectionService};
use crate::ConvertError;

/// Reprojection intelligente
///
/// Essaie d'abord reproject_lite (pure Rust), puis fallback sur proj si disponible.
pub enum SmartReprojector {
    /// Reprojection légère (pure Rust)
    Lite(ReprojectorLite),
    /// Reprojection via PROJ (si feature activée)
    #[cfg(feature = "reproject")]
    Proj(crate::export::reproject::Reprojector),
    /// Pas de reprojection (source == cible, ou CRS84 vers EPSG:4326)
    Identity,
}

impl SmartReprojector {
    /// Crée un nouveau reprojector
    pub fn new(source: &Crs, target: &Crs) -> Result<Self, ConvertError> {
        if source == target || (source.is_wgs84_lon_lat() && target.is_wgs84_lon_lat()) {
            return Ok(Self::Identity);
        }

        if ReprojectorLite::is_supported(source, target) {
            return Ok(Self::Lite(ReprojectorLite::new(source, target)?));
        }

        // Fallback sur proj si disponible
        #[cfg(feature = "reproject")]
        {
            if source.epsg_code().is_some() && target.epsg_code().is_some() {
                let proj = crate::export::reproject::Reprojector::new(source, target)
                    .map_err(|e| ConvertError::unsupported_crs(source, target, format!("{:#}", e)))?;
                return Ok(Self::Proj(proj));
            }
        }

        Err(ConvertError::unsupported_crs(
            source,
            target,
            unsupported_reason(),
        ))
    }

    /// Retourne une description du reprojector utilisé
    pub fn description(&self) -> &'static str {
        match self {
            Self::Identity => "identity (no reprojection)",
            Self::Lite(_) => "reproject_lite (pure Rust)",
            #[cfg(feature = "reproject")]
            Self::Proj(_) => "proj (PROJ library)",
        }
    }
}

#[cfg(feature = "reproject")]
fn unsupported_reason() -> &'static str {
    "no pure-Rust projection and PROJ only handles EPSG codes"
}

#[cfg(not(feature = "reproject"))]
fn unsupported_reason() -> &'static str {
    "no pure-Rust projection (EPSG:2154, 3857, 326xx, 327xx, 258xx); \
     build with --features reproject for other EPSG codes"
}

impl GeometryTransform for SmartReprojector {
    fn transform(&self, geometry: &Geometry) -> Result<Geometry> {
        match self {
            Self::Identity => Ok(geometry.clone()),
            Self::Lite(lite) => lite.transform_geometry(geometry),
            #[cfg(feature = "reproject")]
            Self::Proj(proj) => proj.transform_geometry(geometry),
        }
    }

    fn description(&self) -> &str {
        SmartReprojector::description(self)
    }

    fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }
}

/// Service de reprojection par défaut (reproject_lite puis PROJ)
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultReprojection;

impl ReprojectionService for DefaultReprojection {
    fn transform_for(
        &self,
        source: &Crs,
        target: &Crs,
    ) -> Result<Box<dyn GeometryTransform>, ConvertError> {
        Ok(Box::new(SmartReprojector::new(source, target)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let r = SmartReprojector::new(&Crs::wgs84(), &Crs::wgs84()).unwrap();
        assert!(matches!(r, SmartReprojector::Identity));
    }

    #[test]
    fn test_crs84_to_wgs84_is_identity() {
        let r = SmartReprojector::new(&Crs::crs84(), &Crs::wgs84()).unwrap();
        assert!(matches!(r, SmartReprojector::Identity));

        let transform = DefaultReprojection
            .transform_for(&Crs::crs84(), &Crs::wgs84())
            .unwrap();
        assert!(transform.is_identity());
        assert_eq!(transform.description(), "identity (no reprojection)");

        let point = Geometry::Point(geo::Point::new(12.1934211840036, 48.9636327590282));
        assert_eq!(transform.transform(&point).unwrap(), point);
    }

    #[test]
    fn test_lite() {
        let r = SmartReprojector::new(&Crs::epsg(2154), &Crs::wgs84()).unwrap();
        assert!(matches!(r, SmartReprojector::Lite(_)));

        let r = SmartReprojector::new(&Crs::epsg(25832), &Crs::wgs84()).unwrap();
        assert_eq!(r.description(), "reproject_lite (pure Rust)");
    }

    #[test]
    fn test_non_epsg_authority_rejected() {
        let source = Crs::parse("IGNF:LAMB93").unwrap();
        let err = SmartReprojector::new(&source, &Crs::wgs84()).err().unwrap();
        assert!(matches!(err, ConvertError::UnsupportedCrs { .. }));
    }

    #[test]
    fn test_service_builds_transform() {
        let transform = DefaultReprojection
            .transform_for(&Crs::epsg(3857), &Crs::wgs84())
            .unwrap();
        assert!(!transform.is_identity());
        let point = Geometry::Point(geo::Point::new(0.0, 0.0));
        let Geometry::Point(p) = transform.transform(&point).unwrap() else {
            panic!("Expected Point geometry");
        };
        assert!(p.x().abs() < 1e-12 && p.y().abs() < 1e-12);
    }
}
