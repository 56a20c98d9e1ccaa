//! @ai:module:intent Extract javadoc-style doc comments into a structured, namespaced catalog
//! @ai:module:layer infrastructure
//! @ai:module:public_api aggregator, config, error, event, grammar, input, language, output, record, scanner
//! @ai:module:stateless true
//!
//! # Emmett
//!
//! Finds `/** ... */` blocks in source text, splits them into `@tag value`
//! events and folds those events into one record per documented entity.
//!
//! ## Example
//!
//! ```rust
//! use emmett::{aggregate, Catalog, Layout};
//!
//! let source = "/** @namespace util */\n/** Adds. @function add @param {number} a */";
//! let Catalog::Tree(root) = aggregate(source, Layout::Tree) else { unreachable!() };
//!
//! let add = &root.entry("util.add").unwrap().records()[0];
//! assert!(add.function);
//! assert_eq!(add.description, "Adds.");
//! assert_eq!(add.param[0].type_name.as_deref(), Some("number"));
//! ```

pub mod aggregator;
pub mod config;
pub mod error;
pub mod event;
pub mod grammar;
pub mod input;
pub mod language;
pub mod output;
pub mod record;
pub mod scanner;

pub use aggregator::{aggregate, aggregate_with, Aggregator};
pub use config::Config;
pub use error::{Error, Result};
pub use event::{Dispatcher, Event, EventSink, HandlerId, Tag};
pub use grammar::{parse_param, parse_return};
pub use input::read_sources;
pub use language::{detect_language, is_supported_file, Language};
pub use output::{format_catalog, format_events, to_json, OutputFormat};
pub use record::{Catalog, Entry, Layout, Namespace, Param, Record, Return};
pub use scanner::{scan_events, DocComment, Scanner, ScannerConfig};
