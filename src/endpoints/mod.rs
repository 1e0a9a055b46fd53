//! Caller-facing endpoint facades
//!
//! Maps high-level queries (list, filter, sort, search, find-by) onto page
//! fetches and full traversals, and carries the form submission surface.
//! Reads are wrapped in the injected retry policy; submissions never are.

mod data;
mod forms;
mod projects;

pub use data::{Data, FindKind};
pub use forms::{Forms, ValidationOutcome};
pub use projects::Projects;
