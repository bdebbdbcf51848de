//! Document object model shared by the concrete and abstract sides of a conversion
//!
//!     - names.rs:    tag and namespace interning, builtin tag constants
//!     - node.rs:     node handles and records
//!     - document.rs: the arena, tree edits, attributes and the seqNo / id indices
//!     - traverse.rs: document-order walks and subtree utilities

pub mod document;
pub mod names;
pub mod node;
pub mod traverse;

pub use document::Document;
pub use names::{NameMap, NamespaceId, Tag};
pub use node::{Attribute, NodeId, NodeKind};
pub use traverse::{is_collapsible_whitespace, Descendants};
