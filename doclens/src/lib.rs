//! Bidirectional transforms between concrete documents and an editable HTML tree
//!
//!     A concrete document (a Word `document.xml`, say) is the durable representation. Users
//!     edit an abstract XHTML view of it instead, and their edits are written back into the
//!     original concrete tree so that everything the abstract view cannot show (section
//!     properties, bookmarks, tables, unknown markup) survives untouched.
//!
//!     TLDR: For format authors:
//!         - A format is a set of lenses, one per concrete element shape (see lens.rs).
//!         - Lenses never walk sibling lists themselves: they hand each container to the engine
//!           in bdt.rs with a sub-lens, and recurse only through that.
//!         - Every abstract element derived from a concrete node carries `id="<prefix><seqNo>"`
//!           (see identity.rs); that is the only link between the two trees.
//!         - Anything a lens marks invisible is never touched by the engine.
//!
//! Architecture
//!
//!     The document tree (./dom) is an arena: nodes are addressed by their seqNo, are never
//!     freed, and can be detached and reattached freely. This makes identity stable across any
//!     edit, including cut and paste, and removes any question of dangling references.
//!
//!     The file structure :
//!     .
//!     ├── dom                     # arena tree, name interning, traversal
//!     ├── lens.rs                 # Lens and LensContext traits
//!     ├── bdt.rs                  # container get / put reconciliation
//!     ├── identity.rs             # seqNo id scheme
//!     ├── html.rs                 # predicates over the abstract tree
//!     ├── normalize               # canonical abstract shape before a put
//!     ├── xml                     # reader (roxmltree) and writer
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── formats
//!     │   └── word                # WordprocessingML body lenses
//!     ├── inspect.rs              # treeviz and JSON views
//!     └── demo.rs                 # move / remove scenarios over a toy lens
//!
//! Core Algorithm
//!
//!     The put direction (bdt::container_put) is where all the care goes. It matches abstract
//!     children to concrete ones by identity, removes what disappeared, creates what is new,
//!     reorders the visible concrete children to follow the abstract order, and then moves
//!     each retained node back next to the invisible sibling it used to follow. An unedited
//!     abstract tree makes every step a no-op.
//!
//!     This is a pure lib: no printing, env vars or process exits. The doclens-cli crate is
//!     the shell.

pub mod bdt;
pub mod demo;
pub mod dom;
pub mod error;
pub mod format;
pub mod formats;
pub mod html;
pub mod identity;
pub mod inspect;
pub mod lens;
pub mod normalize;
pub mod registry;
pub mod xml;

pub use bdt::{container_get, container_put, PutStats};
pub use dom::{Document, NodeId, Tag};
pub use error::{DocError, FormatError};
pub use format::{ConvertOptions, Format};
pub use identity::IdScheme;
pub use lens::{Lens, LensContext, SimpleContext};
pub use registry::FormatRegistry;
