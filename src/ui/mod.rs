//! Terminal output for the CLI
//!
//! Colors are applied only when stdout is an interactive terminal, so
//! output captured by CI logs or scripts stays plain.

mod context;
mod output;

pub use context::UiContext;
pub use output::{key_value_status, step_ok_detail, step_warn, step_warn_hint};
