//! Command parsing and color themes, shared between the `lingopal` binary
//! and the integration tests under `tests/`.

#[path = "commands.rs"]
pub mod commands;

#[path = "theme.rs"]
pub mod theme;

pub use commands::{handle_command, is_affirmative, CommandResult};
pub use theme::Theme;
