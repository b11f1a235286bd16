//! # rebase-todo
//!
//! Scripted editing of `git rebase -i` todo lists.
//!
//! ## Features
//!
//! - A todo list model with unite (fixup) groups that stay contiguous
//!   through picks, drops, rewords and drag-and-drop moves
//! - Todo script parsing and formatting
//! - YAML edit plans and a reword message store
//!
//! ## Quick Start
//!
//! ```rust
//! use rebase_todo::rebase::{format_script, parse_script, to_entries, to_model};
//!
//! let entries = parse_script("pick a1 Add parser\npick b2 Fix parser\n").unwrap();
//! let mut model = to_model(entries).unwrap();
//! model.unite(&[0, 1]);
//! assert_eq!(
//!     format_script(&to_entries(&model)),
//!     "pick a1 Add parser\nfixup b2 Fix parser\n"
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod data;
pub mod git;
pub mod rebase;
pub mod utils;

pub use crate::cli::Cli;

/// The current version of rebase-todo.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
