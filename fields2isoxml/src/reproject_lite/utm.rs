//! Projection UTM (Universal Transverse Mercator), inverse
//!
//! Couvre les zones WGS84 (EPSG:326xx nord, 327xx sud) et ETRS89
//! (EPSG:258xx), GRS80 et WGS84 étant confondus à cette précision.

use super::ellipsoid::WGS84;
use super::Geographic;

/// Facteur d'échelle sur le méridien central
const K0: f64 = 0.9996;
/// Fausse abscisse
const FALSE_EASTING: f64 = 500000.0;
/// Fausse ordonnée de l'hémisphère sud
const FALSE_NORTHING_SOUTH: f64 = 10000000.0;

/// Longitude du méridien central d'une zone, en radians
fn central_meridian(zone: u32) -> f64 {
    (zone as f64 * 6.0 - 183.0).to_radians()
}

/// Convertit UTM vers coordonnées géographiques
pub fn utm_to_geographic(x: f64, y: f64, zone: u32, south: bool) -> Geographic {
    let a = WGS84::A;
    let e2 = WGS84::E2;
    let ep2 = WGS84::EP2;

    let x = x - FALSE_EASTING;
    let y = if south { y - FALSE_NORTHING_SOUTH } else { y };

    // Latitude du pied de la perpendiculaire
    let m = y / K0;
    let mu = m / (a * (1.0 - e2 / 4.0 - 3.0 * e2.powi(2) / 64.0 - 5.0 * e2.powi(3) / 256.0));
    let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    let (sin_phi1, cos_phi1) = phi1.sin_cos();
    let tan_phi1 = phi1.tan();

    let n1 = a / (1.0 - e2 * sin_phi1.powi(2)).sqrt();
    let t1 = tan_phi1.powi(2);
    let c1 = ep2 * cos_phi1.powi(2);
    let r1 = a * (1.0 - e2) / (1.0 - e2 * sin_phi1.powi(2)).powf(1.5);
    let d = x / (n1 * K0);

    let lat = phi1
        - (n1 * tan_phi1 / r1)
            * (d.powi(2) / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1.powi(2) - 9.0 * ep2) * d.powi(4) / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1.powi(2) - 252.0 * ep2 - 3.0 * c1.powi(2))
                    * d.powi(6)
                    / 720.0);

    let lon = central_meridian(zone)
        + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1.powi(2) + 8.0 * ep2 + 24.0 * t1.powi(2))
                * d.powi(5)
                / 120.0)
            / cos_phi1;

    Geographic::new(lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_central_meridian() {
        assert!((central_meridian(32).to_degrees() - 9.0).abs() < 1e-12);
        assert!((central_meridian(1).to_degrees() + 177.0).abs() < 1e-12);
    }

    #[test]
    fn test_regensburg_zone_33() {
        // Regensburg: 12.10°E, 49.02°N
        let (lon, lat) = utm_to_geographic(288_000.0, 5_433_000.0, 33, false).to_degrees();
        assert!((lon - 12.10).abs() < 0.05, "lon={}", lon);
        assert!((lat - 49.02).abs() < 0.05, "lat={}", lat);
    }

    #[test]
    fn test_reunion_south() {
        // Saint-Denis: 55.45°E, -20.88°S
        let (lon, lat) = utm_to_geographic(338000.0, 7691000.0, 40, true).to_degrees();
        assert!((lon - 55.45).abs() < 0.2, "lon={}", lon);
        assert!((lat - (-20.88)).abs() < 0.2, "lat={}", lat);
    }
}
