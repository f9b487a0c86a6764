//! Geographic points in the normalized Mercator plane
//!
//! Longitude maps straight onto `x`; latitude is projected onto `y`. Both
//! projected axes span `[-180, 180]`.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::f64::consts::FRAC_PI_2;
use std::fmt;

/// Lower bound of both projected axes
pub const MIN_COORD: f64 = -180.0;
/// Upper bound of both projected axes
pub const MAX_COORD: f64 = 180.0;

/// Latitudes beyond this are clamped before projection
const MAX_PROJECTED_LAT: f64 = 86.0;

/// Significant digits used by [`point_to_string`]
pub const POINT_STRING_PRECISION: usize = 8;

/// Whether `lon` is a longitude in degrees (`[-180, 180]`, NaN rejected)
#[inline]
#[must_use]
pub fn valid_lon(lon: f64) -> bool {
    (-180.0..=180.0).contains(&lon)
}

/// Whether `lat` is a latitude in degrees (`[-90, 90]`, NaN rejected)
#[inline]
#[must_use]
pub fn valid_lat(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat)
}

#[inline]
fn valid_projected(v: f64) -> bool {
    (MIN_COORD..=MAX_COORD).contains(&v)
}

fn lat_to_y(lat: f64) -> f64 {
    let sinx = lat
        .clamp(-MAX_PROJECTED_LAT, MAX_PROJECTED_LAT)
        .to_radians()
        .sin();
    let y = (0.5 * ((1.0 + sinx) / (1.0 - sinx)).ln()).to_degrees();
    y.clamp(MIN_COORD, MAX_COORD)
}

fn y_to_lat(y: f64) -> f64 {
    (2.0 * y.to_radians().exp().atan() - FRAC_PI_2).to_degrees()
}

/// A location in the projected plane.
///
/// Only constructible from an in-range longitude/latitude pair, so every
/// `GeoPoint` obtained through [`GeoPoint::from_lon_lat`] is valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    x: f64,
    y: f64,
}

impl GeoPoint {
    /// Project a longitude/latitude pair (degrees).
    ///
    /// Returns `None` when either value is out of range or NaN.
    #[must_use]
    pub fn from_lon_lat(lon: f64, lat: f64) -> Option<Self> {
        if !valid_lon(lon) || !valid_lat(lat) {
            return None;
        }
        Some(Self {
            x: lon,
            y: lat_to_y(lat),
        })
    }

    /// Projected x
    #[inline]
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Projected y
    #[inline]
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Longitude in degrees
    #[inline]
    #[must_use]
    pub const fn lon(&self) -> f64 {
        self.x
    }

    /// Latitude in degrees
    #[inline]
    #[must_use]
    pub fn lat(&self) -> f64 {
        y_to_lat(self.y)
    }

    /// Re-check that both projected coordinates lie inside the plane
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        valid_projected(self.x) && valid_projected(self.y)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{}",
            format_significant(self.lon(), POINT_STRING_PRECISION),
            format_significant(self.lat(), POINT_STRING_PRECISION)
        )
    }
}

impl Serialize for GeoPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("GeoPoint", 2)?;
        state.serialize_field("lon", &self.lon())?;
        state.serialize_field("lat", &self.lat())?;
        state.end()
    }
}

/// Canonical `"lon,lat"` rendering with 8 significant digits.
///
/// Used as the display name of records that carry none.
#[must_use]
pub fn point_to_string(point: &GeoPoint) -> String {
    point.to_string()
}

/// Format `value` like C's `%.{digits}g`: fixed notation for ordinary
/// magnitudes, exponent notation otherwise, trailing zeros removed.
pub(crate) fn format_significant(value: f64, digits: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let digits = digits.max(1);
    let precision = digits - 1;
    let sci = format!("{value:.precision$e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or_default();

    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    let digits_i = digits as i32;
    if exp < -4 || exp >= digits_i {
        let mantissa = trim_fraction(mantissa);
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{:02}", exp.abs());
    }

    #[allow(clippy::cast_sign_loss)]
    let decimals = (digits_i - 1 - exp) as usize;
    trim_fraction(&format!("{value:.decimals$}")).to_string()
}

#[inline]
fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
