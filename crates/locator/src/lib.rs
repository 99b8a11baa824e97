//! Finding the Wizard101 installation directory and remembering it between
//! runs.

mod errors;
mod in_memory;
mod resolver;
mod store;

pub use errors::{ResolveError, StoreError};
pub use in_memory::MemoryPathStore;
pub use resolver::{resolve_installation, Prompter, Resolved, ResolvedFrom, ResolverOptions};
pub use store::{FilePathStore, PathStore};
