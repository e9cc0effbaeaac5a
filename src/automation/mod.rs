//! Automation: one instruction with several explicit steps.
//!
//! - `parser`: splits the instruction into step texts
//! - `combiner`: fuses app+URL and folder+file step pairs
//! - `runner`: executes the steps in order, stopping on the first failure

pub mod combiner;
pub mod parser;
pub mod runner;

pub use combiner::combine;
pub use parser::parse;
pub use runner::AutomationRunner;
