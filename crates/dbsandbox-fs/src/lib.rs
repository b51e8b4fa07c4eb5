//! Filesystem primitives used while laying out sandbox binary directories.
//!
//! All operations are blocking and never retry.

mod error;
mod primitives;

pub use error::{Error, Result};
pub use primitives::{dir_exists, merge_collisions, merge_tree, rename_dir};
