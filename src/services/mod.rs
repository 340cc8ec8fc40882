// Service exports
pub mod preference_file;
pub mod printer;

pub use preference_file::{load_preferences, parse_preferences, ParseError};
pub use printer::{render_event, render_report, render_stability, Narrator, RoleLabels};
