//! Lexical similarity engine for articles.
//!
//! - [`normalizer`]: punctuation stripping, lowercasing, stopword removal,
//!   irregular verb canonicalization
//! - [`levenshtein`]: generic edit distance and normalized similarity
//! - [`detector`]: thresholded duplicate decision over two articles

pub mod detector;
pub mod irregular;
pub mod levenshtein;
pub mod normalizer;

pub use detector::{DuplicateDetector, Similarity};
pub use irregular::IrregularVerbs;
pub use levenshtein::Levenshtein;
pub use normalizer::Normalizer;
