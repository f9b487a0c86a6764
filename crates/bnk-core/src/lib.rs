//! # bnk-core
//!
//! Streaming parser for BNK documents: KML-like XML files describing bank
//! branches and agents as point placemarks.
//!
//! The crate turns a document into validated [`BankRecord`]s (name, icon
//! style, location, description) plus an optional document visibility flag,
//! and hands them to a [`RecordSink`]. What the sink does with them (store,
//! render, persist) is up to the caller.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bnk_core::{load_bnk_files, BankCollection};
//!
//! let mut banks = BankCollection::new();
//! let report = load_bnk_files(["lion.bnk", "wegagen.bnk"], &mut banks);
//!
//! for (path, err) in &report.failed {
//!     eprintln!("{}: {err}", path.display());
//! }
//! for bank in &banks.records {
//!     println!("{} [{}] at {}", bank.name, bank.style_id, bank.location);
//! }
//! ```
//!
//! ## Document Format
//!
//! ```xml
//! <Document>
//!   <visibility>1</visibility>
//!   <Bank>
//!     <name>Head office</name>
//!     <description>Open on weekends</description>
//!     <bankType>#bank-lion</bankType>
//!     <Point><coordinates>38.75,9.03</coordinates></Point>
//!   </Bank>
//! </Document>
//! ```
//!
//! | Element | Parent | Meaning |
//! |---------|--------|---------|
//! | `visibility` | `Document` | `0` hides the layer, anything else shows it |
//! | `name` | `Bank` | Display label (defaults to `"lon,lat"`) |
//! | `description` | `Bank` | Free text |
//! | `bankType` / `styleUrl` | `Bank` | `#`-prefixed icon style |
//! | `coordinates` | `Bank` > `Point` | `lon,lat[,alt]` |
//!
//! Unknown elements are ignored. Records without a valid point are dropped.
//!
//! ## Supported Styles
//!
//! | Style | Notes |
//! |-------|-------|
//! | `bank-lion` | default |
//! | `bank-oromiya` | |
//! | `bank-somali` | |
//! | `bank-wegagen` | |
//!
//! Unsupported styles are replaced with the default and logged.
//!
//! ## Error Handling
//!
//! ```no_run
//! use bnk_core::{load_bnk_file, BankCollection, BnkError};
//!
//! let mut banks = BankCollection::new();
//! match load_bnk_file("banks.bnk", &mut banks) {
//!     Ok(stats) => println!("Loaded {} banks", stats.records_emitted),
//!     Err(BnkError::Io(e)) => println!("File error: {e}"),
//!     Err(BnkError::Xml(e)) => println!("Malformed XML: {e}"),
//!     Err(e) => println!("Error: {e}"),
//! }
//! ```

pub mod error;
pub mod geo;
pub mod normalize;
pub mod parser;
pub mod reader;
pub mod record;
pub mod sink;

pub use error::{BnkError, Result};
pub use geo::{point_to_string, valid_lat, valid_lon, GeoPoint};
pub use normalize::{
    normalize_style_token, parse_coordinate_pair, COORDINATE_DELIMITERS, DEFAULT_STYLE,
    STYLE_WHITELIST,
};
pub use parser::{BnkParser, ParseStats};
pub use reader::{load_bnk_file, load_bnk_files, parse_bnk_reader, parse_bnk_str, LoadReport};
pub use record::{BankRecord, GeometryKind, ParsedRecord};
pub use sink::{BankCollection, RecordSink};
