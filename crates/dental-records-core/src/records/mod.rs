//! Record books: the held collection, its current view, and the lifecycle
//! operations that mutate it.
//!
//! ```text
//! intent ─► create/update/delete ─► full collection ─► save(key)
//!                                         │
//!                                  Query::run(search, filter, sort)
//!                                         │
//!                                         ▼
//!                                    current view
//! ```

mod lifecycle;
mod store;

pub use lifecycle::*;
pub use store::*;
