//! Online duplicate clustering of articles.
//!
//! Each new article is compared against the stored ones, joins the group
//! of the last article it matches (or a fresh group when nothing matches),
//! and is linked back into the duplicate lists of its non-unique peers.

pub mod service;

pub use service::{scan_duplicates, ArticleService, DuplicateMatch};
