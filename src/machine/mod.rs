//! Transition table and engine.
//!
//! - `Transition`: one guarded row with its actions
//! - `TransitionTable`: ordered rows with pure resolution
//! - `standard_table`: the identification flow itself
//! - `IdentifyMachine`: the instance a host holds and sends events to

mod engine;
mod standard;
mod table;
mod transition;

pub use engine::{IdentifyMachine, StepResult};
pub use standard::standard_table;
pub use table::TransitionTable;
pub use transition::Transition;
