//! # places-codec
//!
//! Converts between place records and the Netscape bookmark file format
//! understood by every mainstream browser.
//!
//! - Export writes only bookmarked records, in the order given.
//! - Import accepts `http:`, `https:` and `file:` anchors, tagging each with
//!   the nearest enclosing folder name plus any explicit `TAGS` attribute.

pub mod export;
pub mod import;
mod tree;

pub use export::{export_all, export_bookmarks};
pub use import::{import, parse_bookmarks, ImportSummary, ParsedBookmarks};
pub use tree::is_folder_heading;
