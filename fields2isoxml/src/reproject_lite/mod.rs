//! Reprojection légère en Rust pur vers WGS84 (EPSG:4326)
//!
//! Sources supportées :
//! - Lambert 93 (EPSG:2154)
//! - UTM WGS84 (EPSG:32601-32660, 32701-32760)
//! - UTM ETRS89 (EPSG:25828-25838)
//! - Web Mercator (EPSG:3857)

mod ellipsoid;
mod lambert;
mod mercator;
mod smart;
mod utm;

pub use smart::{DefaultReprojection, SmartReprojector};

use anyhow::{bail, Result};
use geo::{Coord, Geometry, GeometryCollection, MapCoords};

use crate::crs::Crs;
use crate::ConvertError;

/// Point en coordonnées géographiques (radians)
#[derive(Debug, Clone, Copy)]
pub struct Geographic {
    /// Longitude en radians
    pub lon: f64,
    /// Latitude en radians
    pub lat: f64,
}

impl Geographic {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Convertit en degrés (longitude, latitude)
    pub fn to_degrees(self) -> (f64, f64) {
        (self.lon.to_degrees(), self.lat.to_degrees())
    }
}

/// Projection source prise en charge sans PROJ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteSource {
    Lambert93,
    Utm { zone: u32, south: bool },
    WebMercator,
}

impl LiteSource {
    /// Détermine la projection source depuis un identifiant de SCR
    pub fn from_crs(crs: &Crs) -> Option<Self> {
        match crs.epsg_code()? {
            2154 => Some(Self::Lambert93),
            3857 => Some(Self::WebMercator),
            code @ 32601..=32660 => Some(Self::Utm {
                zone: code - 32600,
                south: false,
            }),
            code @ 32701..=32760 => Some(Self::Utm {
                zone: code - 32700,
                south: true,
            }),
            code @ 25828..=25838 => Some(Self::Utm {
                zone: code - 25800,
                south: false,
            }),
            _ => None,
        }
    }
}

/// Reprojection légère vers WGS84
#[derive(Debug, Clone)]
pub struct ReprojectorLite {
    source: LiteSource,
}

impl ReprojectorLite {
    /// Crée un nouveau reprojector
    pub fn new(source: &Crs, target: &Crs) -> std::result::Result<Self, ConvertError> {
        if !Self::is_supported_target(target) {
            return Err(ConvertError::unsupported_crs(
                source,
                target,
                "reproject_lite only targets EPSG:4326",
            ));
        }
        let source_kind = LiteSource::from_crs(source).ok_or_else(|| {
            ConvertError::unsupported_crs(
                source,
                target,
                "supported sources: EPSG:2154, 3857, 326xx, 327xx, 258xx",
            )
        })?;

        Ok(Self {
            source: source_kind,
        })
    }

    /// Vérifie si le SCR cible est supporté
    pub fn is_supported_target(target: &Crs) -> bool {
        target.epsg_code() == Some(crate::crs::WGS84_EPSG)
    }

    /// Vérifie si la reprojection est supportée
    pub fn is_supported(source: &Crs, target: &Crs) -> bool {
        LiteSource::from_crs(source).is_some() && Self::is_supported_target(target)
    }

    pub fn source(&self) -> LiteSource {
        self.source
    }

    /// Transforme un point (x, y) vers (longitude, latitude) en degrés
    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        let geo = match self.source {
            LiteSource::Lambert93 => lambert::lambert93_to_geographic(x, y),
            LiteSource::Utm { zone, south } => utm::utm_to_geographic(x, y, zone, south),
            LiteSource::WebMercator => mercator::web_mercator_to_geographic(x, y),
        };
        geo.to_degrees()
    }

    /// Transforme toutes les coordonnées d'une géométrie.
    ///
    /// `Rect` et `Triangle` deviennent des `Polygon`: leurs coins projetés
    /// ne sont plus alignés sur les axes.
    pub fn transform_geometry(&self, geom: &Geometry) -> Result<Geometry> {
        match geom {
            Geometry::Rect(r) => self.transform_geometry(&Geometry::Polygon(r.to_polygon())),
            Geometry::Triangle(t) => self.transform_geometry(&Geometry::Polygon(t.to_polygon())),
            Geometry::GeometryCollection(gc) => Ok(Geometry::GeometryCollection(
                GeometryCollection::new_from(
                    gc.iter()
                        .map(|g| self.transform_geometry(g))
                        .collect::<Result<_>>()?,
                ),
            )),
            other => other.try_map_coords(|c: Coord| {
                let (x, y) = self.transform_point(c.x, c.y);
                if !x.is_finite() || !y.is_finite() {
                    bail!("Coordinate transformation failed for ({}, {})", c.x, c.y);
                }
                Ok(Coord { x, y })
            }),
        }
    }
}
