//! Wizard data model

mod answers;
mod plan;
mod wizard_state;

pub use answers::*;
pub use plan::*;
pub use wizard_state::*;
