//! CLI command implementations.

pub mod compare;
pub mod extract;
pub mod spot;

pub use compare::CompareCommand;
pub use extract::ExtractCommand;
pub use spot::SpotCommand;
