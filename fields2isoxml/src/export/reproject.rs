//! Reprojection via PROJ, pour les SCR sans implémentation pure Rust
//!
//! Disponible uniquement avec le feature `reproject`.

use anyhow::{Context, Result};
use geo::{
    Coord, Geometry, GeometryCollection, Line, LineString, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};
use proj::Proj;

use crate::crs::Crs;

/// Transformation PROJ entre deux SCR
pub struct Reprojector {
    proj: Proj,
    source: Crs,
    target: Crs,
}

impl std::fmt::Debug for Reprojector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Reprojector({} -> {})", self.source, self.target)
    }
}

impl Reprojector {
    /// `new_known_crs` normalise l'ordre des axes: les sorties géographiques
    /// sont en (longitude, latitude).
    pub fn new(source: &Crs, target: &Crs) -> Result<Self> {
        let proj = Proj::new_known_crs(&source.authid(), &target.authid(), None).context(
            format!("Failed to create projection from {} to {}", source, target),
        )?;

        Ok(Self {
            proj,
            source: source.clone(),
            target: target.clone(),
        })
    }

    pub fn source(&self) -> &Crs {
        &self.source
    }

    pub fn target(&self) -> &Crs {
        &self.target
    }

    /// Transforme une géométrie, une séquence de coordonnées par appel PROJ
    pub fn transform_geometry(&self, geom: &Geometry) -> Result<Geometry> {
        Ok(match geom {
            Geometry::Point(p) => Geometry::Point(self.point(p)?),
            Geometry::Line(l) => {
                let c = self.coords(&[l.start, l.end])?;
                Geometry::Line(Line::new(c[0], c[1]))
            }
            Geometry::LineString(ls) => Geometry::LineString(self.line_string(ls)?),
            Geometry::Polygon(p) => Geometry::Polygon(self.polygon(p)?),
            Geometry::MultiPoint(mp) => Geometry::MultiPoint(MultiPoint::new(
                mp.iter().map(|p| self.point(p)).collect::<Result<_>>()?,
            )),
            Geometry::MultiLineString(mls) => Geometry::MultiLineString(MultiLineString::new(
                mls.iter().map(|ls| self.line_string(ls)).collect::<Result<_>>()?,
            )),
            Geometry::MultiPolygon(mp) => Geometry::MultiPolygon(MultiPolygon::new(
                mp.iter().map(|p| self.polygon(p)).collect::<Result<_>>()?,
            )),
            Geometry::GeometryCollection(gc) => Geometry::GeometryCollection(
                GeometryCollection::new_from(
                    gc.iter()
                        .map(|g| self.transform_geometry(g))
                        .collect::<Result<_>>()?,
                ),
            ),
            // Un rectangle projeté n'est plus aligné sur les axes
            Geometry::Rect(r) => Geometry::Polygon(self.polygon(&r.to_polygon())?),
            Geometry::Triangle(t) => Geometry::Polygon(self.polygon(&t.to_polygon())?),
        })
    }

    fn coords(&self, coords: &[Coord]) -> Result<Vec<Coord>> {
        let mut buf: Vec<(f64, f64)> = coords.iter().map(|c| (c.x, c.y)).collect();
        self.proj
            .convert_array(&mut buf)
            .context("Batch coordinate transformation failed")?;

        buf.into_iter()
            .map(|(x, y)| {
                anyhow::ensure!(
                    x.is_finite() && y.is_finite(),
                    "Coordinate transformation produced a non-finite value"
                );
                Ok(Coord { x, y })
            })
            .collect()
    }

    fn point(&self, p: &Point) -> Result<Point> {
        Ok(Point(self.coords(&[p.0])?[0]))
    }

    fn line_string(&self, ls: &LineString) -> Result<LineString> {
        Ok(LineString::new(self.coords(&ls.0)?))
    }

    fn polygon(&self, p: &Polygon) -> Result<Polygon> {
        let exterior = self.line_string(p.exterior())?;
        let interiors = p
            .interiors()
            .iter()
            .map(|ls| self.line_string(ls))
            .collect::<Result<Vec<_>>>()?;
        Ok(Polygon::new(exterior, interiors))
    }
}
