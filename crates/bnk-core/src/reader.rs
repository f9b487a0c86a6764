//! Drive a [`BnkParser`] from XML input
//!
//! `quick-xml` tokenizes the input; elements and attributes are forwarded to
//! the parser in document order. Adjacent text, entity and CDATA fragments are
//! joined and delivered once, before the next element event. Tokenizer failures (malformed
//! XML, mismatched end tags, unclosed elements at end of input) are returned as
//! [`BnkError`].
//!
//! ## Example
//!
//! ```
//! use bnk_core::{parse_bnk_str, BankCollection};
//!
//! let xml = r##"<Document>
//!   <Bank>
//!     <name>Head office</name>
//!     <bankType>#bank-lion</bankType>
//!     <Point><coordinates>38.75,9.03</coordinates></Point>
//!   </Bank>
//! </Document>"##;
//!
//! let mut banks = BankCollection::new();
//! let stats = parse_bnk_str(xml, &mut banks)?;
//! assert_eq!(stats.records_emitted, 1);
//! assert_eq!(banks.records[0].style_id, "bank-lion");
//! # Ok::<(), bnk_core::BnkError>(())
//! ```

use crate::error::{BnkError, Result};
use crate::parser::{BnkParser, ParseStats};
use crate::sink::{BankCollection, RecordSink};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Parse a BNK document held in memory.
///
/// Records reach `sink` as soon as their `Bank` element closes, so a document
/// that fails late may already have emitted some. Use [`load_bnk_file`] for
/// all-or-nothing loading.
///
/// # Errors
///
/// Returns [`BnkError::Xml`] for malformed XML and
/// [`BnkError::UnclosedElements`] if the input ends inside an element.
pub fn parse_bnk_str<S: RecordSink>(content: &str, sink: S) -> Result<ParseStats> {
    let mut reader = Reader::from_str(content);
    configure(&mut reader);
    drive(reader, BnkParser::new(sink))
}

/// Parse a BNK document from any buffered reader.
///
/// Same streaming behavior as [`parse_bnk_str`].
///
/// # Errors
///
/// Returns [`BnkError::Xml`] for malformed XML or read failures and
/// [`BnkError::UnclosedElements`] if the input ends inside an element.
pub fn parse_bnk_reader<R: BufRead, S: RecordSink>(input: R, sink: S) -> Result<ParseStats> {
    let mut reader = Reader::from_reader(input);
    configure(&mut reader);
    drive(reader, BnkParser::new(sink))
}

/// Load one BNK file.
///
/// The file is parsed into a staging collection first; `sink` only receives
/// its records (and visibility) if the whole file parsed.
///
/// # Errors
///
/// Returns [`BnkError::Io`] if the file cannot be opened, otherwise the same
/// errors as [`parse_bnk_reader`].
#[must_use = "this function returns load statistics that should be checked"]
pub fn load_bnk_file<P: AsRef<Path>, S: RecordSink + ?Sized>(
    path: P,
    sink: &mut S,
) -> Result<ParseStats> {
    let path = path.as_ref();
    log::debug!("Starting BNK file reading: {}", path.display());

    let mut staged = BankCollection::new();
    let result = File::open(path)
        .map_err(BnkError::from)
        .and_then(|file| parse_bnk_reader(BufReader::new(file), &mut staged));

    match result {
        Ok(stats) => {
            log::debug!(
                "BNK file reading successful: {} ({} records)",
                path.display(),
                stats.records_emitted
            );
            staged.drain_into(sink);
            Ok(stats)
        }
        Err(e) => {
            log::error!("BNK reading error in {}: {e}", path.display());
            Err(e)
        }
    }
}

/// Outcome of loading several files
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Files that loaded, with their statistics
    pub loaded: Vec<(PathBuf, ParseStats)>,
    /// Files that failed and contributed nothing
    pub failed: Vec<(PathBuf, BnkError)>,
}

impl LoadReport {
    /// Records emitted across all loaded files
    #[must_use]
    pub fn records_emitted(&self) -> usize {
        self.loaded.iter().map(|(_, s)| s.records_emitted).sum()
    }

    /// Warnings logged across all loaded files
    #[must_use]
    pub fn warnings(&self) -> usize {
        self.loaded.iter().map(|(_, s)| s.warnings).sum()
    }

    /// Whether no file failed
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Load several BNK files into one sink.
///
/// Each file is all-or-nothing (see [`load_bnk_file`]); a failing file is
/// logged and skipped and the remaining files are still loaded.
pub fn load_bnk_files<I, P, S>(paths: I, sink: &mut S) -> LoadReport
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
    S: RecordSink + ?Sized,
{
    let mut report = LoadReport::default();
    for path in paths {
        let path = path.as_ref();
        match load_bnk_file(path, sink) {
            Ok(stats) => report.loaded.push((path.to_path_buf(), stats)),
            Err(e) => {
                log::warn!("Skipping {}: {e}", path.display());
                report.failed.push((path.to_path_buf(), e));
            }
        }
    }
    report
}

fn configure<R>(reader: &mut Reader<R>) {
    reader.expand_empty_elements(true);
}

/// Deliver buffered text, if any, as one character-data event
fn flush_text<S: RecordSink>(parser: &mut BnkParser<S>, text: &mut String) {
    if !text.is_empty() {
        parser.on_character_data(text);
        text.clear();
    }
}

fn drive<R: BufRead, S: RecordSink>(
    mut reader: Reader<R>,
    mut parser: BnkParser<S>,
) -> Result<ParseStats> {
    let mut buf = Vec::new();
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                flush_text(&mut parser, &mut text);
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                parser.on_element_open(&name);
                for attr in e.attributes() {
                    let attr = attr.map_err(quick_xml::Error::from)?;
                    let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                    let value = attr.unescape_value()?;
                    parser.on_attribute(&key, &value);
                }
            }
            Event::End(e) => {
                flush_text(&mut parser, &mut text);
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                parser.on_element_close(&name);
            }
            Event::Text(e) => text.push_str(&e.unescape()?),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e.into_inner())),
            Event::Eof => {
                flush_text(&mut parser, &mut text);
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    parser.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::DEFAULT_STYLE;

    #[test]
    fn test_parse_minimal_bank() {
        let xml = r##"<Bank><name>Test</name><bankType>#bank-lion</bankType><Point><coordinates>38.75,9.03</coordinates></Point></Bank>"##;
        let mut banks = BankCollection::new();
        let stats = parse_bnk_str(xml, &mut banks).expect("parse");
        assert_eq!(stats.records_emitted, 1);
        assert_eq!(banks.records[0].name, "Test");
        assert_eq!(banks.records[0].style_id, "bank-lion");
    }

    #[test]
    fn test_empty_elements_open_and_close() {
        let xml = r##"<Document><Bank><name/><styleUrl>#bank-oromiya</styleUrl><Point><coordinates>1,2</coordinates></Point></Bank></Document>"##;
        let mut banks = BankCollection::new();
        parse_bnk_str(xml, &mut banks).expect("parse");
        assert_eq!(banks.records[0].name, "1,2");
        assert_eq!(banks.records[0].style_id, "bank-oromiya");
    }

    #[test]
    fn test_cdata_and_entities() {
        let xml = r##"<Document><Bank>
            <name>A &amp; B</name>
            <description><![CDATA[<b>Open</b> 24h]]></description>
            <Point><coordinates>5,6</coordinates></Point>
        </Bank></Document>"##;
        let mut banks = BankCollection::new();
        parse_bnk_str(xml, &mut banks).expect("parse");
        assert_eq!(banks.records[0].name, "A & B");
        assert_eq!(banks.records[0].description, "<b>Open</b> 24h");
        assert_eq!(banks.records[0].style_id, DEFAULT_STYLE);
    }

    #[test]
    fn test_text_split_by_cdata_is_joined() {
        let xml = r##"<Document><Bank><name>Bank <![CDATA[of Abyssinia]]></name><Point><coordinates>38.75,9.03</coordinates></Point></Bank></Document>"##;
        let mut banks = BankCollection::new();
        let stats = parse_bnk_str(xml, &mut banks).expect("parse");
        assert_eq!(stats.records_emitted, 1);
        assert_eq!(banks.records[0].name, "Bank of Abyssinia");
    }

    #[test]
    fn test_text_split_by_comment_is_joined() {
        let xml = r##"<Bank><name>Head<!-- note --> office</name><Point><coordinates>38.75,<!--x-->9.03</coordinates></Point></Bank>"##;
        let mut banks = BankCollection::new();
        let stats = parse_bnk_str(xml, &mut banks).expect("parse");
        assert_eq!(stats.records_emitted, 1);
        assert_eq!(stats.records_discarded, 0);
        assert_eq!(stats.warnings, 0);
        assert_eq!(banks.records[0].name, "Head office");
        assert_eq!(banks.records[0].location.to_string(), "38.75,9.03");
    }

    #[test]
    fn test_whitespace_between_elements_is_inert() {
        let xml = "<Document>\n  <Bank>\n    <name> Piassa </name>\n    <Point>\n      <coordinates>\n        38.75,9.03\n      </coordinates>\n    </Point>\n  </Bank>\n</Document>\n";
        let mut banks = BankCollection::new();
        let stats = parse_bnk_str(xml, &mut banks).expect("parse");
        assert_eq!(stats.records_emitted, 1);
        assert_eq!(stats.warnings, 0);
        assert_eq!(banks.records[0].name, "Piassa");
    }

    #[test]
    fn test_attributes_do_not_change_output() {
        let xml = r##"<Document><Style id="lion"/><Bank id="b1"><name>X</name><Point><coordinates>5,6</coordinates></Point></Bank></Document>"##;
        let mut banks = BankCollection::new();
        let stats = parse_bnk_str(xml, &mut banks).expect("parse");
        assert_eq!(stats.records_emitted, 1);
    }

    #[test]
    fn test_mismatched_end_tag_is_xml_error() {
        let xml = "<Document><Bank></Document></Bank>";
        let err = parse_bnk_str(xml, BankCollection::new()).expect_err("mismatch");
        assert!(matches!(err, BnkError::Xml(_)), "got {err:?}");
    }

    #[test]
    fn test_unclosed_elements_reported() {
        let xml = "<Document><Bank><name>Open</name>";
        let err = parse_bnk_str(xml, BankCollection::new()).expect_err("unclosed");
        assert!(matches!(err, BnkError::UnclosedElements { .. }), "got {err:?}");
    }

    #[test]
    fn test_parse_from_reader() {
        let xml = b"<Document><visibility>0</visibility></Document>";
        let mut banks = BankCollection::new();
        parse_bnk_reader(&xml[..], &mut banks).expect("parse");
        assert_eq!(banks.visibility, Some(false));
    }
}
