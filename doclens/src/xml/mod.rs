//! Reading and writing XML text
//!
//!     - parser.rs:     roxmltree input copied into an arena document
//!     - serializer.rs: namespace-aware writer with optional indentation

pub mod parser;
pub mod serializer;

pub use parser::{parse_html, parse_xml, ParseOptions};
pub use serializer::{serialize_node, serialize_xml, WriteOptions};
