//! # Arbor
//!
//! Generic, introspectable parameter tree for device data models, as used
//! by remote device-management protocols: a tree of [`Node`]s declares
//! which scalar parameters, child objects, and indexed child-object
//! collections are visible to management tools, validates those
//! declarations against its live bindings, and renders itself as sorted
//! dotted-path listings.
//!
//! ## Architecture
//!
//! ```text
//! path, value          foundation types (addresses, scalar values)
//!     |
//! collection           KeyedCollection: keyed container, stored or delegated
//!     |
//! node                 Node + Collection + Template + Exportable contract
//!     |
//! dump, placeholder    renderers and the unimplemented-branch stub
//! ```
//!
//! Concrete schema types are built by composing nodes; the library itself
//! defines no device model. A transport layer drives the tree through
//! [`Node::get`], [`Node::set_scalar`], [`Node::add_member`],
//! [`Node::delete_member`], and the dump functions, translating the
//! [`Error`] taxonomy into its own protocol codes.
//!
//! ## Usage
//!
//! ```
//! use arbor_core::{Collection, Node, Template, dump_values};
//!
//! let mut hosts = Node::new("Hosts");
//! hosts.declare(&[], &[], &["Host"]);
//! hosts.attach_collection(
//!     "Host",
//!     Collection::stored("Host")
//!         .with_template(Template::new(|| Node::new("Host").with_scalar("HostName", ""))),
//! );
//!
//! let (index, _) = hosts.add_member("Host", None)?;
//! assert_eq!(index, "0");
//! hosts.member_mut("Host", "0")?.set_scalar("HostName", "printer")?;
//!
//! assert_eq!(
//!     dump_values(&hosts)?,
//!     "  Host.\n  Host.0.\n  Host.0.HostName = \"printer\""
//! );
//! # Ok::<(), arbor_core::Error>(())
//! ```

pub mod collection;
pub mod dump;
pub mod error;
pub mod node;
pub mod path;
pub mod placeholder;
pub mod value;

pub use collection::KeyedCollection;
pub use dump::{dump_schema, dump_schema_type, dump_values};
pub use error::{Error, Result};
pub use node::{Collection, Exportable, Node, ObjectSlot, Resolved, Template};
pub use path::Path;
pub use placeholder::Placeholder;
pub use value::Value;
