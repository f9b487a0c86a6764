//! Record types: the in-progress scratch record and the finished bank record

use crate::geo::{point_to_string, GeoPoint};
use crate::normalize::DEFAULT_STYLE;

/// What kind of geometry payload a record has carried so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    /// No coordinate payload seen yet
    #[default]
    Unknown,
    /// A coordinate payload was seen (valid or not)
    Point,
}

/// Fields collected between the open and close of a `Bank` element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRecord {
    /// Display label
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Resolved icon style
    pub style_id: String,
    /// Location, present only after a valid coordinate pair
    pub location: Option<GeoPoint>,
    /// Geometry seen so far
    pub geometry: GeometryKind,
}

impl ParsedRecord {
    /// Back to the freshly-constructed state
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether this record would be emitted if its container closed now
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.geometry == GeometryKind::Point && self.location.is_some_and(|p| p.is_valid())
    }

    /// Validate, apply defaults and move the fields out.
    ///
    /// Returns `None` for records without a valid point; the scratch fields are
    /// left untouched in that case so the caller decides when to reset.
    #[must_use]
    pub fn finalize(&mut self) -> Option<BankRecord> {
        if !self.is_valid() {
            return None;
        }
        let location = self.location?;

        if self.name.is_empty() {
            self.name = point_to_string(&location);
        }
        if self.style_id.is_empty() {
            self.style_id = DEFAULT_STYLE.to_string();
        }

        Some(BankRecord {
            name: std::mem::take(&mut self.name),
            style_id: std::mem::take(&mut self.style_id),
            location,
            description: std::mem::take(&mut self.description),
        })
    }
}

/// A validated bank placemark, ready for a sink
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BankRecord {
    /// Display label (defaults to the canonical point rendering)
    pub name: String,
    /// Whitelisted icon style
    pub style_id: String,
    /// Projected location
    pub location: GeoPoint,
    /// Description, possibly empty
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lon: f64, lat: f64) -> GeoPoint {
        GeoPoint::from_lon_lat(lon, lat).expect("valid point")
    }

    #[test]
    fn test_default_is_empty() {
        let rec = ParsedRecord::default();
        assert!(rec.name.is_empty());
        assert!(rec.location.is_none());
        assert_eq!(rec.geometry, GeometryKind::Unknown);
        assert!(!rec.is_valid());
    }

    #[test]
    fn test_finalize_requires_point_geometry() {
        let mut rec = ParsedRecord {
            location: Some(point(1.0, 2.0)),
            ..ParsedRecord::default()
        };
        assert!(rec.finalize().is_none());

        rec.geometry = GeometryKind::Point;
        assert!(rec.finalize().is_some());
    }

    #[test]
    fn test_finalize_requires_location() {
        let mut rec = ParsedRecord {
            name: "No coords".to_string(),
            geometry: GeometryKind::Point,
            ..ParsedRecord::default()
        };
        assert!(rec.finalize().is_none());
        assert_eq!(rec.name, "No coords");
    }

    #[test]
    fn test_finalize_applies_defaults() {
        let mut rec = ParsedRecord {
            location: Some(point(38.75, 9.03)),
            geometry: GeometryKind::Point,
            ..ParsedRecord::default()
        };
        let out = rec.finalize().expect("valid record");
        assert_eq!(out.name, "38.75,9.03");
        assert_eq!(out.style_id, DEFAULT_STYLE);
        assert!(out.description.is_empty());
    }

    #[test]
    fn test_finalize_keeps_given_fields() {
        let mut rec = ParsedRecord {
            name: "Branch".to_string(),
            description: "Open late".to_string(),
            style_id: "bank-somali".to_string(),
            location: Some(point(45.0, 2.0)),
            geometry: GeometryKind::Point,
        };
        let out = rec.finalize().expect("valid record");
        assert_eq!(out.name, "Branch");
        assert_eq!(out.description, "Open late");
        assert_eq!(out.style_id, "bank-somali");
    }

    #[test]
    fn test_reset() {
        let mut rec = ParsedRecord {
            name: "x".to_string(),
            geometry: GeometryKind::Point,
            ..ParsedRecord::default()
        };
        rec.reset();
        assert_eq!(rec, ParsedRecord::default());
    }
}
