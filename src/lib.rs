#![forbid(unsafe_code)]
//! tagwright: stable numeric type tags for generated code
//!
//! A code generator discovers named entities (for example protobuf messages) and needs a compact
//! integer for each one so that runtime code can dispatch on it. tagwright hands out those integers:
//! they stay the same from one generation run to the next, never collide, and respect a per-package
//! range. Assignments persist in a sidecar store that is read before a run and rewritten after it.
//!
//! ## Layout
//!
//! - [`tagwright_core`] - the allocation engine (id space, registries, allocator)
//! - [`store`] - sidecar store formats
//! - [`session`] - one run over a manifest of packages
//! - [`cli`] - the `tagwright` binary
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module
//!   enforces `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//! - **True invariants**: use `.expect("INVARIANT: reason")` with a clear explanation.

pub mod cli;
pub mod config;
pub mod manifest;
pub mod session;
pub mod store;
pub mod version;

pub use config::GeneratorConfig;
pub use manifest::{IdRange, Manifest, Message, Package};
pub use session::{PackageReport, Session, SessionError};
pub use store::{EmbeddedStore, StoreAdapter, StoreError, StoreFormat, TableStore};
pub use tagwright_core::{AllocError, Allocator, Assignment, ChangedId};
