//! CLI command implementations

pub mod check;
pub mod compare;
pub mod config;

pub use check::execute as check;
pub use compare::execute as compare;
pub use config::execute as config;
