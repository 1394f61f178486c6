//! Value-level building blocks shared by every collection operation.
//!
//! - [`Key`] addresses a record by `id` or a map entry by key
//! - [`Query`] selects records by shape or by closure
//! - [`deep_merge`] combines a partial value into an existing one
//! - [`Path`] addresses nested values with dot notation

mod key;
mod merge;
mod path;
mod query;

pub use key::Key;
pub use merge::deep_merge;
pub use path::Path;
pub use query::{is_match, Query};

pub(crate) use path::{
    get as get_path, get_mut as get_path_mut, remove as remove_path, set as set_path,
};
