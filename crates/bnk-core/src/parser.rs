//! Tag-stack state machine for BNK documents
//!
//! The parser is fed SAX-style events (open, attribute, text, close) and keeps
//! the names of all open elements on a stack. Text is routed to a record field
//! by looking up the innermost frames in [`DISPATCH`]; closing a `Bank` element
//! validates the scratch record and hands it to the sink.

use crate::error::{BnkError, Result};
use crate::normalize::{parse_coordinate_pair, resolve_style_token, COORDINATE_DELIMITERS};
use crate::record::{GeometryKind, ParsedRecord};
use crate::sink::RecordSink;

/// Document root element
pub const DOCUMENT_TAG: &str = "Document";
/// Record container element
pub const BANK_TAG: &str = "Bank";
/// Point geometry element inside a record
pub const POINT_TAG: &str = "Point";

/// Record or document field a text node can populate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Document visibility flag
    Visibility,
    /// Record name
    Name,
    /// Record style reference
    Style,
    /// Record description
    Description,
    /// Point coordinates
    Coordinates,
}

/// Constraint on the grandparent frame of a text node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// Any grandparent, including none
    Any,
    /// Grandparent must be this element
    Tag(&'static str),
}

impl Frame {
    #[inline]
    fn matches(self, tag: Option<&str>) -> bool {
        match self {
            Self::Any => true,
            Self::Tag(expected) => tag == Some(expected),
        }
    }
}

/// One dispatch rule: `(grandparent, parent, leaf) -> field`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    /// Grandparent constraint
    pub grandparent: Frame,
    /// Direct parent of the text-bearing element
    pub parent: &'static str,
    /// Text-bearing element
    pub leaf: &'static str,
    /// Field receiving the text
    pub field: Field,
}

const fn rule(grandparent: Frame, parent: &'static str, leaf: &'static str, field: Field) -> Rule {
    Rule {
        grandparent,
        parent,
        leaf,
        field,
    }
}

/// Routing table for character data. First match wins; unmatched text is ignored.
pub const DISPATCH: &[Rule] = &[
    rule(Frame::Any, DOCUMENT_TAG, "visibility", Field::Visibility),
    rule(Frame::Any, BANK_TAG, "name", Field::Name),
    rule(Frame::Any, BANK_TAG, "bankType", Field::Style),
    rule(Frame::Any, BANK_TAG, "styleUrl", Field::Style),
    rule(Frame::Any, BANK_TAG, "description", Field::Description),
    rule(Frame::Tag(BANK_TAG), POINT_TAG, "coordinates", Field::Coordinates),
];

/// Look up the field for a text node given its innermost frames
#[must_use]
pub fn dispatch(grandparent: Option<&str>, parent: &str, leaf: &str) -> Option<Field> {
    DISPATCH
        .iter()
        .find(|r| r.parent == parent && r.leaf == leaf && r.grandparent.matches(grandparent))
        .map(|r| r.field)
}

/// Counters for one parsed document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize)]
pub struct ParseStats {
    /// Records handed to the sink
    pub records_emitted: usize,
    /// `Bank` elements dropped for lack of a valid point
    pub records_discarded: usize,
    /// Recoverable data problems that were logged
    pub warnings: usize,
}

/// Streaming parser for one BNK document.
///
/// One instance per document; all scratch state lives here.
#[derive(Debug)]
pub struct BnkParser<S> {
    sink: S,
    tags: Vec<String>,
    record: ParsedRecord,
    visibility_seen: bool,
    stats: ParseStats,
}

impl<S: RecordSink> BnkParser<S> {
    /// Create a parser emitting into `sink`
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            tags: Vec::new(),
            record: ParsedRecord::default(),
            visibility_seen: false,
            stats: ParseStats::default(),
        }
    }

    /// Element opened. Never fails; the return value exists for drivers that
    /// expect one.
    pub fn on_element_open(&mut self, name: &str) -> bool {
        self.tags.push(name.to_string());
        true
    }

    /// Attribute of the innermost element. Does not change parser state.
    pub fn on_attribute(&mut self, name: &str, value: &str) {
        log::debug!(
            "Ignoring attribute {}={value:?} on <{}>",
            name.to_ascii_lowercase(),
            self.tags.last().map_or("", String::as_str)
        );
    }

    /// Whether an attribute identifies an element of kind `expected_tag`: the
    /// innermost element must be `expected_tag`, the value non-empty and the
    /// lower-cased attribute name `id`.
    #[must_use]
    pub fn is_valid_attribute(&self, expected_tag: &str, value: &str, attr_lower: &str) -> bool {
        self.tags.last().is_some_and(|t| t == expected_tag) && !value.is_empty() && attr_lower == "id"
    }

    /// Text content of the innermost element
    pub fn on_character_data(&mut self, raw: &str) {
        let value = raw.trim();
        let count = self.tags.len();
        if count < 2 || value.is_empty() {
            return;
        }

        let leaf = self.tags[count - 1].as_str();
        let parent = self.tags[count - 2].as_str();
        let grandparent = count.checked_sub(3).map(|i| self.tags[i].as_str());

        let Some(field) = dispatch(grandparent, parent, leaf) else {
            return;
        };

        match field {
            Field::Visibility => self.set_visibility(value),
            Field::Name => self.record.name = value.to_string(),
            Field::Description => self.record.description = value.to_string(),
            Field::Style => {
                let (style, fell_back) = resolve_style_token(value);
                if fell_back {
                    self.stats.warnings += 1;
                }
                self.record.style_id = style.to_string();
            }
            Field::Coordinates => self.set_origin(value),
        }
    }

    /// Element closed.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not the innermost open element. Drivers must deliver
    /// balanced events.
    pub fn on_element_close(&mut self, name: &str) {
        assert_eq!(
            self.tags.last().map(String::as_str),
            Some(name),
            "close event does not match the innermost open element"
        );

        if name == BANK_TAG {
            if let Some(record) = self.record.finalize() {
                self.sink.emit_record(record);
                self.stats.records_emitted += 1;
            } else {
                log::debug!("Discarding {BANK_TAG} without a valid point");
                self.stats.records_discarded += 1;
            }
            self.record.reset();
        }

        self.tags.pop();
    }

    /// Check that every opened element was closed
    ///
    /// # Errors
    ///
    /// Returns [`BnkError::UnclosedElements`] if elements are still open.
    pub fn finish(&self) -> Result<ParseStats> {
        if self.tags.is_empty() {
            Ok(self.stats)
        } else {
            Err(BnkError::UnclosedElements {
                open: self.tags.clone(),
            })
        }
    }

    /// Counters so far
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> ParseStats {
        self.stats
    }

    /// Scratch record being filled
    #[inline]
    #[must_use]
    pub const fn pending(&self) -> &ParsedRecord {
        &self.record
    }

    /// Number of open elements
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.tags.len()
    }

    /// The sink
    #[inline]
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the parser, returning the sink
    #[inline]
    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn set_visibility(&mut self, value: &str) {
        if self.visibility_seen {
            log::debug!("Ignoring repeated visibility {value:?}");
            return;
        }
        self.visibility_seen = true;

        if value.parse::<i64>().is_err() {
            log::warn!("Non-numeric visibility {value:?}, treating as visible");
            self.stats.warnings += 1;
        }
        self.sink.set_visibility(value != "0");
    }

    fn set_origin(&mut self, value: &str) {
        self.record.geometry = GeometryKind::Point;

        match parse_coordinate_pair(value, COORDINATE_DELIMITERS) {
            Some(point) => self.record.location = Some(point),
            None => {
                log::warn!(
                    "Invalid coordinates {value:?} while loading {:?}",
                    self.record.name
                );
                self.stats.warnings += 1;
            }
        }
    }
}
