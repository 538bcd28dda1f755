//! Confit - YAML configuration binding
//!
//! Confit reads a YAML document and populates caller-provided typed
//! destinations: a dotted path selects a sub-tree, and a recursive
//! type-directed binder maps nested mappings and sequences onto record
//! fields, vectors, and maps. Mapping keys of the form `name[tag]` select
//! per-identity alternatives, and the placeholders `$hostname` (in keys)
//! and `$public_hostname` (in values) are expanded during binding.
//!
//! # Architecture
//!
//! - **Document Model** (`document`): dynamic mapping/sequence/scalar tree
//!   parsed from YAML
//! - **Identity Filter** (`filter`): pure resolution of `name[tag]` keys
//!   against the session identity
//! - **Path Resolver** (`path`): dotted-path descent through mappings
//! - **Type-Directed Binder** (`bind`): recursive assignment into typed
//!   destinations, with configurable strictness
//! - **Substitution Macros** (`subst`): hostname placeholder expansion
//! - **Session** (`session`): loaded document + identity + options
//! - **Registry** (`registry`): bind many `(path, destination)` pairs in
//!   one pass
//!
//! # Example
//!
//! ```
//! use confit::{record, Session};
//!
//! record! {
//!     #[derive(Debug, Default)]
//!     pub struct Server {
//!         pub host: String,
//!         pub max_retry_count: i64,
//!     }
//! }
//!
//! # fn main() -> Result<(), confit::ConfigError> {
//! let session = Session::from_yaml("server:\n  host: example.org\n  max_retry_count: 3\n")?;
//! let mut server = Server::default();
//! session.configure("server", &mut server)?;
//! assert_eq!(server.host, "example.org");
//! assert_eq!(server.max_retry_count, 3);
//! # Ok(())
//! # }
//! ```

pub mod bind;
pub mod document;
pub mod error;
pub mod filter;
pub mod path;
pub mod registry;
pub mod session;
pub mod subst;

// Re-export commonly used types for convenience
pub use bind::{bind_record, normalize_key, Bind, BindContext, BindOptions, Record, Strictness};
pub use document::{Node, Scalar};
pub use error::ConfigError;
pub use filter::filter_identities;
pub use path::resolve;
pub use registry::Registry;
pub use session::{configure_from_file, Session, CONFIG_ENV, IDENTITY_ENV};
