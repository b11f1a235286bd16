//! YAML documents read and written around a rebase: edit plans, the reword
//! message store and the model view.

pub mod messages;
pub mod plan;
pub mod view;
pub mod yaml;

pub use messages::RewordedMessageStore;
pub use plan::{EditPlan, Operation};
pub use view::{TodoRow, TodoView};
pub use yaml::*;
