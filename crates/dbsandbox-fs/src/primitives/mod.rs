pub mod merge;
pub mod rename;

pub use merge::{merge_collisions, merge_tree};
pub use rename::{dir_exists, rename_dir};
