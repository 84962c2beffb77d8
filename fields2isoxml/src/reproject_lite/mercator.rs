//! Web Mercator (EPSG:3857), inverse vers géographique
//!
//! Modèle sphérique de rayon égal au demi-grand axe WGS84.

use super::ellipsoid::WGS84;
use super::Geographic;

/// Convertit Web Mercator vers coordonnées géographiques
pub fn web_mercator_to_geographic(x: f64, y: f64) -> Geographic {
    let r = WGS84::A;
    let lon = x / r;
    let lat = 2.0 * (y / r).exp().atan() - std::f64::consts::FRAC_PI_2;
    Geographic::new(lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paris() {
        // Paris: 2.35°E, 48.85°N ≈ (261600, 6250000) en Web Mercator
        let (lon, lat) = web_mercator_to_geographic(261_600.0, 6_250_000.0).to_degrees();
        assert!((lon - 2.35).abs() < 0.01, "lon={}", lon);
        assert!((lat - 48.85).abs() < 0.05, "lat={}", lat);
    }

    #[test]
    fn test_origin() {
        let (lon, lat) = web_mercator_to_geographic(0.0, 0.0).to_degrees();
        assert_eq!(lon, 0.0);
        assert!(lat.abs() < 1e-12);
    }
}
