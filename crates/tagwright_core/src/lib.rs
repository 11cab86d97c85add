//! Allocate small, stable numeric type tags for named entities discovered by a code generator.
//!
//! This crate is the pure engine: **no IO**, no global state. Persistence formats and the driver live
//! in the `tagwright` crate.
//!
//! ## Example
//! ```rust
//! use tagwright_core::{Allocator, Assignment};
//!
//! let mut alloc = Allocator::with_seed(0, 100, 7);
//! alloc.load_previous("LoginType", 5).unwrap();
//! alloc.load_previous("LogoutType", 9).unwrap();
//!
//! assert_eq!(alloc.generate("LoginType", None).unwrap().id, 5);
//! alloc.done();
//! assert_eq!(
//!     alloc.assignments(),
//!     &[Assignment::new("LoginType", 5), Assignment::new("LogoutType", 9)]
//! );
//! ```

pub mod allocator;
pub mod errors;
pub mod registry;
pub mod space;

pub use allocator::{Allocator, Generated, Phase};
pub use errors::{AllocError, ChangedId};
pub use registry::{Assignment, Conflict, Registry};
pub use space::IdSpace;
