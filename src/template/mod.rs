//! Template materialization.
//!
//! - [`placeholder`] - `{{ key }}` token substitution
//! - [`walk`] - template tree enumeration
//! - [`destination`] - destination directory lifecycle
//! - [`copier`] - recursive copy with substitution

pub mod copier;
pub mod destination;
pub mod placeholder;
pub mod walk;

pub use copier::{CopyReport, TemplateCopier};
pub use destination::{Destination, DestinationState};
pub use placeholder::{has_placeholders, parse, placeholder_keys, substitute, Segment};
pub use walk::{walk_tree, EntryKind, FileEntry};
