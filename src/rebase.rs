//! Interactive rebase todo list model.
//!
//! Entries read from a todo script are turned into an ordered list of
//! [`Element`]s where fixup/squash runs form unite groups (a root followed
//! by its children). [`RebaseTodoModel`] edits that list while keeping the
//! groups contiguous, and [`to_entries`] flattens it back.

pub mod convert;
pub mod element;
pub mod element_list;
pub mod entry;
pub mod error;
pub mod model;
pub mod mutable_list;
pub mod script;

pub use convert::{to_entries, to_model};
pub use element::{Element, ElementKind, ElementType, KeepCommit, Meld, NonUnite};
pub use element_list::ElementList;
pub use entry::{Action, CommitAction, MessageFlag, RebaseEntry};
pub use error::TodoError;
pub use model::RebaseTodoModel;
pub use mutable_list::{MutableElementList, Relocation};
pub use script::{format_script, parse_script};
