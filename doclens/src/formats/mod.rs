//! Format implementations
//!
//! Each format pairs a concrete XML vocabulary with a root lens over the abstract XHTML tree.

pub mod word;

pub use word::WordFormat;
