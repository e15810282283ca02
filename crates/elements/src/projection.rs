//! Coordinate references for placing elements on a lat/long map.
//!
//! Model grids are usually in a projected system such as British National
//! Grid or UTM. The inverse Transverse Mercator series below follow the
//! Ordnance Survey formulation and are accurate to well under a millimetre
//! within a zone. No datum shift is applied: coordinates come back on the
//! projection's own ellipsoid.

use std::fmt;
use std::str::FromStr;

use crate::error::ElementError;

/// Conversion between projected `(x, y)` and geographic `(lat, lon)`
/// coordinates, both in degrees for the geographic side.
pub trait CoordinateProjection {
    fn to_geographic(&self, x: f64, y: f64) -> (f64, f64);
    fn to_projected(&self, lat: f64, lon: f64) -> (f64, f64);
}

/// Reference ellipsoid given by its semi-major and semi-minor axes (m).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    pub a: f64,
    pub b: f64,
}

impl Ellipsoid {
    pub const AIRY_1830: Ellipsoid = Ellipsoid {
        a: 6_377_563.396,
        b: 6_356_256.909,
    };
    pub const WGS84: Ellipsoid = Ellipsoid {
        a: 6_378_137.0,
        b: 6_356_752.314_245,
    };

    fn e2(&self) -> f64 {
        (self.a * self.a - self.b * self.b) / (self.a * self.a)
    }

    fn n(&self) -> f64 {
        (self.a - self.b) / (self.a + self.b)
    }
}

/// Identity projection: `x` is longitude and `y` latitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geographic;

impl CoordinateProjection for Geographic {
    fn to_geographic(&self, x: f64, y: f64) -> (f64, f64) {
        (y, x)
    }

    fn to_projected(&self, lat: f64, lon: f64) -> (f64, f64) {
        (lon, lat)
    }
}

/// Transverse Mercator projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransverseMercator {
    ellipsoid: Ellipsoid,
    scale: f64,
    lat0: f64,
    lon0: f64,
    false_easting: f64,
    false_northing: f64,
}

impl TransverseMercator {
    /// Origin latitude and longitude are in degrees.
    pub fn new(
        ellipsoid: Ellipsoid,
        scale: f64,
        origin_lat: f64,
        origin_lon: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        Self {
            ellipsoid,
            scale,
            lat0: origin_lat.to_radians(),
            lon0: origin_lon.to_radians(),
            false_easting,
            false_northing,
        }
    }

    /// Ordnance Survey National Grid (OSGB36, EPSG:27700).
    pub fn british_national_grid() -> Self {
        Self::new(
            Ellipsoid::AIRY_1830,
            0.999_601_271_7,
            49.0,
            -2.0,
            400_000.0,
            -100_000.0,
        )
    }

    /// Universal Transverse Mercator on WGS84.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::InvalidCrs`] for zones outside `1..=60`.
    pub fn utm(zone: u8, north: bool) -> Result<Self, ElementError> {
        if !(1..=60).contains(&zone) {
            return Err(ElementError::InvalidCrs {
                text: format!("utm:{zone}"),
                reason: "zone must be between 1 and 60".to_string(),
            });
        }
        let central_meridian = f64::from(zone) * 6.0 - 183.0;
        let false_northing = if north { 0.0 } else { 10_000_000.0 };
        Ok(Self::new(
            Ellipsoid::WGS84,
            0.9996,
            0.0,
            central_meridian,
            500_000.0,
            false_northing,
        ))
    }

    /// Meridional arc from the origin latitude to `phi` (radians).
    fn meridional_arc(&self, phi: f64) -> f64 {
        let n = self.ellipsoid.n();
        let (n2, n3) = (n * n, n * n * n);
        let d = phi - self.lat0;
        let s = phi + self.lat0;
        self.ellipsoid.b
            * self.scale
            * ((1.0 + n + 1.25 * n2 + 1.25 * n3) * d
                - (3.0 * n + 3.0 * n2 + 21.0 / 8.0 * n3) * d.sin() * s.cos()
                + (15.0 / 8.0 * n2 + 15.0 / 8.0 * n3) * (2.0 * d).sin() * (2.0 * s).cos()
                - 35.0 / 24.0 * n3 * (3.0 * d).sin() * (3.0 * s).cos())
    }

    /// Transverse and meridional radii of curvature (scaled) and eta².
    fn curvature(&self, phi: f64) -> (f64, f64, f64) {
        let af0 = self.ellipsoid.a * self.scale;
        let e2 = self.ellipsoid.e2();
        let w = 1.0 - e2 * phi.sin().powi(2);
        let nu = af0 / w.sqrt();
        let rho = af0 * (1.0 - e2) / w.powf(1.5);
        (nu, rho, nu / rho - 1.0)
    }
}

impl CoordinateProjection for TransverseMercator {
    fn to_geographic(&self, x: f64, y: f64) -> (f64, f64) {
        let af0 = self.ellipsoid.a * self.scale;
        let dn = y - self.false_northing;

        let mut phi = dn / af0 + self.lat0;
        let mut m = self.meridional_arc(phi);
        for _ in 0..100 {
            if (dn - m).abs() < 1e-5 {
                break;
            }
            phi += (dn - m) / af0;
            m = self.meridional_arc(phi);
        }

        let (nu, rho, eta2) = self.curvature(phi);
        let t = phi.tan();
        let (t2, t4, t6) = (t * t, t.powi(4), t.powi(6));
        let sec = 1.0 / phi.cos();

        let vii = t / (2.0 * rho * nu);
        let viii = t / (24.0 * rho * nu.powi(3)) * (5.0 + 3.0 * t2 + eta2 - 9.0 * t2 * eta2);
        let ix = t / (720.0 * rho * nu.powi(5)) * (61.0 + 90.0 * t2 + 45.0 * t4);
        let x1 = sec / nu;
        let xi = sec / (6.0 * nu.powi(3)) * (nu / rho + 2.0 * t2);
        let xii = sec / (120.0 * nu.powi(5)) * (5.0 + 28.0 * t2 + 24.0 * t4);
        let xiia = sec / (5040.0 * nu.powi(7)) * (61.0 + 662.0 * t2 + 1320.0 * t4 + 720.0 * t6);

        let de = x - self.false_easting;
        let lat = phi - vii * de.powi(2) + viii * de.powi(4) - ix * de.powi(6);
        let lon = self.lon0 + x1 * de - xi * de.powi(3) + xii * de.powi(5) - xiia * de.powi(7);
        (lat.to_degrees(), lon.to_degrees())
    }

    fn to_projected(&self, lat: f64, lon: f64) -> (f64, f64) {
        let phi = lat.to_radians();
        let (s, c, t) = (phi.sin(), phi.cos(), phi.tan());
        let t2 = t * t;
        let (nu, rho, eta2) = self.curvature(phi);

        let i = self.meridional_arc(phi) + self.false_northing;
        let ii = nu / 2.0 * s * c;
        let iii = nu / 24.0 * s * c.powi(3) * (5.0 - t2 + 9.0 * eta2);
        let iiia = nu / 720.0 * s * c.powi(5) * (61.0 - 58.0 * t2 + t2 * t2);
        let iv = nu * c;
        let v = nu / 6.0 * c.powi(3) * (nu / rho - t2);
        let vi = nu / 120.0
            * c.powi(5)
            * (5.0 - 18.0 * t2 + t2 * t2 + 14.0 * eta2 - 58.0 * t2 * eta2);

        let p = lon.to_radians() - self.lon0;
        let northing = i + ii * p.powi(2) + iii * p.powi(4) + iiia * p.powi(6);
        let easting = self.false_easting + iv * p + v * p.powi(3) + vi * p.powi(5);
        (easting, northing)
    }
}

/// The coordinate system a model grid is expressed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinateReference {
    Geographic,
    TransverseMercator(TransverseMercator),
}

impl CoordinateReference {
    pub fn british_national_grid() -> Self {
        CoordinateReference::TransverseMercator(TransverseMercator::british_national_grid())
    }
}

impl Default for CoordinateReference {
    fn default() -> Self {
        Self::british_national_grid()
    }
}

impl CoordinateProjection for CoordinateReference {
    fn to_geographic(&self, x: f64, y: f64) -> (f64, f64) {
        match self {
            CoordinateReference::Geographic => Geographic.to_geographic(x, y),
            CoordinateReference::TransverseMercator(tm) => tm.to_geographic(x, y),
        }
    }

    fn to_projected(&self, lat: f64, lon: f64) -> (f64, f64) {
        match self {
            CoordinateReference::Geographic => Geographic.to_projected(lat, lon),
            CoordinateReference::TransverseMercator(tm) => tm.to_projected(lat, lon),
        }
    }
}

impl FromStr for CoordinateReference {
    type Err = ElementError;

    /// Accepts `bng`, `wgs84` and `utm:<zone><N|S>` (case-insensitive),
    /// plus the EPSG codes 27700 and 4326.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let lower = text.trim().to_ascii_lowercase();
        match lower.as_str() {
            "bng" | "osgb" | "27700" | "epsg:27700" => Ok(Self::british_national_grid()),
            "wgs84" | "geographic" | "4326" | "epsg:4326" => Ok(CoordinateReference::Geographic),
            other => {
                let invalid = |reason: &str| ElementError::InvalidCrs {
                    text: text.to_string(),
                    reason: reason.to_string(),
                };
                let Some(spec) = other.strip_prefix("utm:") else {
                    return Err(invalid("expected bng, wgs84 or utm:<zone><N|S>"));
                };
                let (zone, hemisphere) = spec.split_at(spec.len().saturating_sub(1));
                let north = match hemisphere {
                    "n" => true,
                    "s" => false,
                    _ => return Err(invalid("hemisphere must be N or S")),
                };
                let zone: u8 = zone.parse().map_err(|_| invalid("zone is not a number"))?;
                TransverseMercator::utm(zone, north).map(CoordinateReference::TransverseMercator)
            }
        }
    }
}

impl fmt::Display for CoordinateReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateReference::Geographic => write!(f, "wgs84"),
            CoordinateReference::TransverseMercator(tm) => {
                write!(
                    f,
                    "tmerc(lat0={:.4}, lon0={:.4}, k={})",
                    tm.lat0.to_degrees(),
                    tm.lon0.to_degrees(),
                    tm.scale
                )
            }
        }
    }
}
