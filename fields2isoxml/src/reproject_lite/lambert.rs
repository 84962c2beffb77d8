//! Projection Lambert 93 (EPSG:2154), conique conforme sécante

use super::ellipsoid::GRS80;
use super::Geographic;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// Méridien central (3°E)
const LON0_DEG: f64 = 3.0;
/// Latitude d'origine
const LAT0_DEG: f64 = 46.5;
/// Parallèles standards
const LAT1_DEG: f64 = 44.0;
const LAT2_DEG: f64 = 49.0;
/// Fausse abscisse / fausse ordonnée
const X0: f64 = 700000.0;
const Y0: f64 = 6600000.0;

/// Latitude isométrique
fn isometric_latitude(lat: f64, e: f64) -> f64 {
    let sin_lat = lat.sin();
    let term = ((1.0 - e * sin_lat) / (1.0 + e * sin_lat)).powf(e / 2.0);
    ((FRAC_PI_4 + lat / 2.0).tan() * term).ln()
}

/// Latitude depuis la latitude isométrique (itératif, tolérance 1e-12 rad)
fn latitude_from_isometric(iso_lat: f64, e: f64) -> f64 {
    let mut lat = 2.0 * iso_lat.exp().atan() - FRAC_PI_2;

    for _ in 0..10 {
        let sin_lat = lat.sin();
        let term = ((1.0 + e * sin_lat) / (1.0 - e * sin_lat)).powf(e / 2.0);
        let next = 2.0 * (iso_lat.exp() * term).atan() - FRAC_PI_2;
        if (next - lat).abs() < 1e-12 {
            return next;
        }
        lat = next;
    }
    lat
}

/// Grande normale
fn normal_radius(lat: f64) -> f64 {
    GRS80::A / (1.0 - GRS80::E2 * lat.sin().powi(2)).sqrt()
}

/// Convertit Lambert 93 vers coordonnées géographiques
pub fn lambert93_to_geographic(x: f64, y: f64) -> Geographic {
    let e = GRS80::E;
    let lat0 = LAT0_DEG.to_radians();
    let lat1 = LAT1_DEG.to_radians();
    let lat2 = LAT2_DEG.to_radians();

    let m1 = normal_radius(lat1) * lat1.cos();
    let m2 = normal_radius(lat2) * lat2.cos();
    let l1 = isometric_latitude(lat1, e);
    let l2 = isometric_latitude(lat2, e);

    let n = (m1.ln() - m2.ln()) / (l2 - l1);
    let c = (m1 / n) * (n * l1).exp();
    let r0 = c * (-n * isometric_latitude(lat0, e)).exp();

    let dx = x - X0;
    let dy = r0 - (y - Y0);

    let r = (dx * dx + dy * dy).sqrt().copysign(n);
    let gamma = (dx / dy).atan();

    let lat = latitude_from_isometric(-(r / c).ln() / n, e);
    let lon = LON0_DEG.to_radians() + gamma / n;

    Geographic::new(lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paris() {
        // Tour Eiffel: 2.2945°E, 48.8584°N
        let (lon, lat) = lambert93_to_geographic(648237.0, 6862107.0).to_degrees();
        assert!((lon - 2.2945).abs() < 0.01, "lon={}", lon);
        assert!((lat - 48.8584).abs() < 0.01, "lat={}", lat);
    }

    #[test]
    fn test_origin() {
        let (lon, lat) = lambert93_to_geographic(X0, Y0).to_degrees();
        assert!((lon - 3.0).abs() < 1e-9, "lon={}", lon);
        assert!((lat - 46.5).abs() < 1e-9, "lat={}", lat);
    }
}
