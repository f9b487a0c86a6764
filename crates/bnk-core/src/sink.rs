//! Record sinks
//!
//! The parser hands every finished record to a [`RecordSink`]. Storage and
//! rendering are the sink's business.

use crate::record::BankRecord;

/// Receiver for parser output
pub trait RecordSink {
    /// Take ownership of a validated record
    fn emit_record(&mut self, record: BankRecord);

    /// Document-level visibility flag, called at most once per document and
    /// only when the document carries one
    fn set_visibility(&mut self, visible: bool);
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    #[inline]
    fn emit_record(&mut self, record: BankRecord) {
        (**self).emit_record(record);
    }

    #[inline]
    fn set_visibility(&mut self, visible: bool) {
        (**self).set_visibility(visible);
    }
}

/// Sink that keeps everything in memory, in document order
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct BankCollection {
    /// Emitted records
    pub records: Vec<BankRecord>,
    /// Visibility flag if the document set one
    pub visibility: Option<bool>,
}

impl BankCollection {
    /// Create an empty collection
    #[inline]
    #[must_use = "creates empty collection"]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
            visibility: None,
        }
    }

    /// Visibility, defaulting to visible when never set
    #[inline]
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visibility.unwrap_or(true)
    }

    /// Number of records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records were collected
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop all records and forget the visibility flag
    pub fn clear(&mut self) {
        self.records.clear();
        self.visibility = None;
    }

    /// Replay the collected output into another sink
    pub fn drain_into<S: RecordSink + ?Sized>(&mut self, sink: &mut S) {
        if let Some(visible) = self.visibility.take() {
            sink.set_visibility(visible);
        }
        for record in self.records.drain(..) {
            sink.emit_record(record);
        }
    }
}

impl RecordSink for BankCollection {
    fn emit_record(&mut self, record: BankRecord) {
        self.records.push(record);
    }

    fn set_visibility(&mut self, visible: bool) {
        self.visibility = Some(visible);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;

    fn record(name: &str) -> BankRecord {
        BankRecord {
            name: name.to_string(),
            style_id: "bank-lion".to_string(),
            location: GeoPoint::from_lon_lat(1.0, 1.0).expect("valid point"),
            description: String::new(),
        }
    }

    #[test]
    fn test_collection_defaults_visible() {
        let c = BankCollection::new();
        assert!(c.is_visible());
        assert!(c.is_empty());
    }

    #[test]
    fn test_collection_collects_in_order() {
        let mut c = BankCollection::new();
        c.emit_record(record("a"));
        c.emit_record(record("b"));
        c.set_visibility(false);
        assert_eq!(c.len(), 2);
        assert_eq!(c.records[1].name, "b");
        assert!(!c.is_visible());

        c.clear();
        assert!(c.is_empty());
        assert!(c.is_visible());
    }

    #[test]
    fn test_drain_into_forwards_everything() {
        let mut staged = BankCollection::new();
        staged.emit_record(record("a"));
        staged.set_visibility(false);

        let mut target = BankCollection::new();
        staged.drain_into(&mut target);
        assert!(staged.is_empty());
        assert_eq!(target.len(), 1);
        assert_eq!(target.visibility, Some(false));
    }
}
