//! Snapshot layer: catalog files on disk -> immutable type->kind maps.
//!
//! This module is intentionally separate from filtering and reporting.
//! It owns:
//! - locating a trait's catalog file under a snapshot root
//! - the `<type>; <kind>;` line format and namespace normalization
//! - the Snapshot maps the diff engine reads

pub mod locate;
pub mod parse;
pub mod record;

pub use locate::find_trait_file;
pub use parse::{CANONICAL_NAMESPACE, load_snapshot, parse_snapshot};
pub use record::{Snapshot, SymbolRecord};
