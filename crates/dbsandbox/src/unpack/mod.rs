//! Turning a tarball plus flags into an installed directory.
//!
//! [`Unpacker`] runs the stages in order; everything touching the disk goes
//! through [`Collaborators`] so the sequencing can be tested without it.

pub mod collab;
pub mod coordinator;
pub mod guard;
pub mod request;
pub mod resolve;

pub use collab::{Collaborators, Extraction, SystemCollaborators};
pub use coordinator::{Completion, Stage, UnpackOutcome, Unpacker};
pub use request::{ArchiveReference, UnpackRequest};
pub use resolve::ResolvedPlan;
